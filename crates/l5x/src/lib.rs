// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! L5X typed data model and codec
//!
//! Reads the data-type definitions and decorated tag values of an L5X
//! controller interchange document into typed values, and writes them back.
//!
//! # Features
//!
//! - **Radix codec** -- literals in Decimal, Hex, Binary, Octal, ASCII, Float,
//!   Exponential and Date/Time, validated against the atomic kind
//! - **Type registry** -- lazy, memoized resolution of user, module-defined,
//!   add-on and predefined types with cycle detection
//! - **Structure builder** -- packs BOOL members into hidden backing SINTs
//!   and instantiates independent value trees
//! - **Serializer** -- decorated `Data` elements to [`LogixType`] and back
//!
//! # Architecture
//!
//! ```text
//! Document
//! +-- ComponentIndex     (name -> DataType / Module / AddOnInstruction node)
//! +-- TypeRegistry       (name -> Arc<TypeDefinition>, cached)
//!     +-- StructureBuilder (definition -> expanded definition -> Structure)
//!     +-- Serializer       (Element <-> LogixType, via RadixCodec)
//! ```
//!
//! # Example
//!
//! ```
//! use l5x::{Document, Serializer, TypeRegistry};
//!
//! let doc = Document::parse(r#"<RSLogix5000Content><Controller Name="PLC">
//!     <DataTypes>
//!       <DataType Name="MOTOR" Family="NoFamily" Class="User"><Members>
//!         <Member Name="Run" DataType="BOOL" Dimension="0" Radix="Decimal"/>
//!         <Member Name="Speed" DataType="DINT" Dimension="0" Radix="Decimal"/>
//!       </Members></DataType>
//!     </DataTypes>
//!     <Tags>
//!       <Tag Name="M1" TagType="Base" DataType="MOTOR">
//!         <Data Format="Decorated"><Structure DataType="MOTOR">
//!           <DataValueMember Name="Speed" DataType="DINT" Radix="Decimal" Value="1500"/>
//!         </Structure></Data>
//!       </Tag>
//!     </Tags>
//!   </Controller></RSLogix5000Content>"#)?;
//!
//! let registry = TypeRegistry::from_document(&doc);
//! let serializer = Serializer::new(&registry);
//! for tag in doc.tags() {
//!     let (name, value) = serializer.decode_tag(tag)?;
//!     println!("{name}: {}", value.type_name());
//! }
//! # Ok::<(), l5x::L5xError>(())
//! ```

pub mod builder;
pub mod config;
pub mod element;
pub mod error;
pub mod index;
pub mod names;
pub mod radix;
pub mod registry;
pub mod serializer;
pub mod types;

pub use builder::{StructureBuilder, BACKING_PREFIX};
pub use config::{SerializerConfig, SerializerConfigBuilder};
pub use element::{Document, Element};
pub use error::{L5xError, Result};
pub use index::{Component, ComponentIndex, ComponentSource};
pub use radix::{Radix, RadixCodec};
pub use registry::{LookupStats, TypeRegistry, MAX_NESTING_DEPTH};
pub use serializer::Serializer;
pub use types::{
    predefined, Array, AtomicKind, AtomicValue, DataType, Dimensions, ExternalAccess, Family,
    LogixType, Member, MemberDefinition, Structure, TypeClass, TypeDefinition, MAX_ELEMENTS,
    PREDEFINED_NAMES,
};
