// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for the L5X data model and codec.
//!
//! Every fallible operation in the crate returns [`Result`]. Variants carry the
//! offending name or element path so callers can report precisely.
//! `TypeUnresolved` is the only kind the serializer absorbs on its own (it
//! becomes [`crate::LogixType::Undefined`]); it surfaces only through
//! [`crate::TypeRegistry::require`].

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, L5xError>;

/// Failure modes of resolution, building, and (de)serialization.
#[derive(Debug, Error)]
pub enum L5xError {
    /// Two names in one scope differ only by letter case (or are identical).
    #[error("name collision in {scope}: '{name}' is already defined")]
    NameCollision { scope: String, name: String },

    /// A structure contains itself, directly or through other structures.
    #[error("circular type reference: {}", chain.join(" -> "))]
    CircularReference { chain: Vec<String> },

    /// A structure nests other structures deeper than
    /// [`crate::registry::MAX_NESTING_DEPTH`] levels.
    #[error("type '{name}' nests structures deeper than {limit} levels")]
    NestingTooDeep { name: String, limit: usize },

    /// A name does not satisfy the component identifier grammar.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Radix token is unknown or incompatible with the target atomic kind.
    #[error("radix '{radix}' is not supported for {kind}")]
    RadixUnsupported { radix: String, kind: String },

    /// A required attribute or child is missing or unreadable.
    #[error("malformed element at {path}: {reason}")]
    DecodeMalformed { path: String, reason: String },

    /// No definition source knows this type name.
    #[error("type '{name}' could not be resolved")]
    TypeUnresolved { name: String },

    /// Text does not parse under the given radix, or overflows the kind.
    #[error("invalid {radix} value '{text}' for {kind}")]
    InvalidValue {
        text: String,
        radix: String,
        kind: String,
    },

    /// A structure member lookup by name failed.
    #[error("structure '{structure}' has no member '{member}'")]
    UnknownMember { structure: String, member: String },

    /// The document text is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
}

impl L5xError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DecodeMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
