// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Data model: value variants, members and shared type definitions.
//!
//! Two layers live here:
//!
//! - [`TypeDefinition`] / [`MemberDefinition`]: the durable shape of a
//!   structure, created once per name and shared read-only behind an `Arc`.
//! - [`LogixType`] / [`Member`]: a value tree instantiated from definitions.
//!   Every instantiation is independent and freely mutable.
//!
//! [`DataType`] is what the registry hands back for a type name.

mod atomic;
pub(crate) mod definition;
mod dimensions;
mod logix;
mod predefined;

pub use atomic::{AtomicKind, AtomicValue};
pub use definition::{MemberDefinition, TypeDefinition};
pub use dimensions::{Dimensions, MAX_ELEMENTS};
pub(crate) use dimensions::too_many_elements;
pub use logix::{Array, LogixType, Member, Structure};
pub use predefined::{predefined, PREDEFINED_NAMES};

use std::fmt;
use std::sync::Arc;

/// Family attribute of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Family {
    #[default]
    NoFamily,
    StringFamily,
}

impl Family {
    pub const fn token(self) -> &'static str {
        match self {
            Self::NoFamily => "NoFamily",
            Self::StringFamily => "StringFamily",
        }
    }

    /// Unknown tokens fall back to `NoFamily`.
    pub fn from_token(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("StringFamily") {
            Self::StringFamily
        } else {
            Self::NoFamily
        }
    }
}

/// Where a structure type comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeClass {
    #[default]
    User,
    Predefined,
    /// Module-defined (IO) types.
    ProductDefined,
    AddOnDefined,
    Unknown,
}

impl TypeClass {
    pub const fn token(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Predefined => "Predefined",
            Self::ProductDefined => "ProductDefined",
            Self::AddOnDefined => "AddOnDefined",
            Self::Unknown => "Unknown",
        }
    }

    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            t if t.eq_ignore_ascii_case("User") => Self::User,
            t if t.eq_ignore_ascii_case("Predefined") => Self::Predefined,
            t if t.eq_ignore_ascii_case("ProductDefined") || t.eq_ignore_ascii_case("IO") => {
                Self::ProductDefined
            }
            t if t.eq_ignore_ascii_case("AddOnDefined") => Self::AddOnDefined,
            _ => Self::Unknown,
        }
    }
}

/// External access level of a member or tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExternalAccess {
    None,
    ReadOnly,
    #[default]
    ReadWrite,
}

impl ExternalAccess {
    pub const fn token(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::ReadOnly => "Read Only",
            Self::ReadWrite => "Read/Write",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let compact: String = token
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "none" => Some(Self::None),
            "readonly" => Some(Self::ReadOnly),
            "readwrite" => Some(Self::ReadWrite),
            _ => None,
        }
    }
}

/// A resolved type name.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Atomic(AtomicKind),
    Structure(Arc<TypeDefinition>),
    Undefined(String),
}

impl DataType {
    pub fn name(&self) -> &str {
        match self {
            Self::Atomic(kind) => kind.name(),
            Self::Structure(def) => &def.name,
            Self::Undefined(name) => name,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined(_))
    }

    pub fn as_structure(&self) -> Option<&Arc<TypeDefinition>> {
        match self {
            Self::Structure(def) => Some(def),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
