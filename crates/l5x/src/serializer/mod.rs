// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decorated-data codec: value elements ↔ [`LogixType`].
//!
//! # Element forms
//!
//! | Element | Value |
//! |---------|-------|
//! | `DataValue` / `DataValueMember` | atomic literal (`DataType`, `Radix`, `Value`) |
//! | `Structure` / `StructureMember` | structure, one child per member |
//! | `Array` / `ArrayMember` | array (`DataType`, `Dimensions`, `Radix`) of `Element` children |
//! | `Data Format="Decorated"` | wrapper around one of the above |
//!
//! String-family structures carry their characters as a single
//! `DataValueMember Name="DATA" Radix="ASCII"` with quoted text.
//!
//! # Example
//!
//! ```
//! use l5x::{Element, Serializer, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let serializer = Serializer::new(&registry);
//! let node = Element::parse(r#"<DataValue DataType="INT" Radix="Hex" Value="16#002a"/>"#)?;
//! let value = serializer.decode(&node)?;
//! assert_eq!(value.as_atomic().map(|v| v.as_i64()), Some(42));
//! assert_eq!(serializer.encode(&value)?, node);
//! # Ok::<(), l5x::L5xError>(())
//! ```

mod decode;
mod encode;

use crate::builder::StructureBuilder;
use crate::config::SerializerConfig;
use crate::element::Element;
use crate::registry::TypeRegistry;
use crate::types::LogixType;

/// Element ↔ value codec bound to one registry.
pub struct Serializer<'r, 'a> {
    registry: &'r TypeRegistry<'a>,
    config: SerializerConfig,
}

impl<'r, 'a> Serializer<'r, 'a> {
    pub fn new(registry: &'r TypeRegistry<'a>) -> Self {
        Self::with_config(registry, SerializerConfig::default())
    }

    pub fn with_config(registry: &'r TypeRegistry<'a>, config: SerializerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r TypeRegistry<'a> {
        self.registry
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Render an element with the configured indentation.
    pub fn to_xml(&self, element: &Element) -> String {
        element.to_xml(self.config.indent)
    }

    fn builder(&self) -> StructureBuilder<'r, 'a> {
        StructureBuilder::new(self.registry)
    }
}

/// Path segment for error reports: `Structure[MOTOR]`, `DataValueMember[Speed]`.
fn segment(node: &Element) -> String {
    let label = node
        .attribute("Name")
        .or_else(|| node.attribute("DataType"))
        .unwrap_or_default();
    format!("{}[{label}]", node.name())
}

#[cfg(test)]
mod tests;
