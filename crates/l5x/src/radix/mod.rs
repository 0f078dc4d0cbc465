// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Radix (textual value encoding) for atomic values.
//!
//! A [`Radix`] names how an atomic value is written in a document. Each radix
//! is compatible with a fixed set of [`AtomicKind`]s:
//!
//! | Radix | Kinds |
//! |-------|-------|
//! | `Decimal` | all integers, `BOOL` |
//! | `Binary`, `Octal`, `Hex`, `ASCII` | all integers except `BOOL` |
//! | `Date/Time` | `LINT` |
//! | `Float`, `Exponential` | `REAL`, `LREAL` |
//! | `NullType` | structures and arrays of structures |
//!
//! Compatibility is checked when a radix is assigned (member definitions,
//! [`crate::Member::set_radix`], decoded literals), see [`Radix::check`].

mod codec;

pub use codec::RadixCodec;
pub(crate) use codec::{format_ascii_bytes, parse_ascii_bytes};

use crate::error::{L5xError, Result};
use crate::types::AtomicKind;
use std::fmt;
use std::str::FromStr;

/// Textual encodings used by the `Radix` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    NullType,
    General,
    Binary,
    Octal,
    Decimal,
    Hex,
    Exponential,
    Float,
    Ascii,
    Unicode,
    DateTime,
}

impl Radix {
    pub const fn token(self) -> &'static str {
        match self {
            Self::NullType => "NullType",
            Self::General => "General",
            Self::Binary => "Binary",
            Self::Octal => "Octal",
            Self::Decimal => "Decimal",
            Self::Hex => "Hex",
            Self::Exponential => "Exponential",
            Self::Float => "Float",
            Self::Ascii => "ASCII",
            Self::Unicode => "Unicode",
            Self::DateTime => "Date/Time",
        }
    }

    /// Whether values of `kind` may be written in this radix.
    pub fn is_compatible(self, kind: AtomicKind) -> bool {
        match self {
            Self::Decimal => !kind.is_float(),
            Self::Binary | Self::Octal | Self::Hex | Self::Ascii => kind.is_integer(),
            Self::DateTime => kind == AtomicKind::Lint,
            Self::Float | Self::Exponential => kind.is_float(),
            Self::NullType | Self::General | Self::Unicode => false,
        }
    }

    /// Reject an incompatible radix/kind pair with `RadixUnsupported`.
    pub fn check(self, kind: AtomicKind) -> Result<()> {
        if self.is_compatible(kind) {
            Ok(())
        } else {
            Err(L5xError::RadixUnsupported {
                radix: self.token().to_string(),
                kind: kind.name().to_string(),
            })
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Radix {
    type Err = L5xError;

    fn from_str(s: &str) -> Result<Self> {
        let radix = match s.trim() {
            "NullType" => Self::NullType,
            "General" => Self::General,
            "Binary" => Self::Binary,
            "Octal" => Self::Octal,
            "Decimal" => Self::Decimal,
            "Hex" => Self::Hex,
            "Exponential" => Self::Exponential,
            "Float" => Self::Float,
            "ASCII" | "Ascii" => Self::Ascii,
            "Unicode" => Self::Unicode,
            "Date/Time" | "DateTime" => Self::DateTime,
            other => {
                return Err(L5xError::RadixUnsupported {
                    radix: other.to_string(),
                    kind: "any type".to_string(),
                })
            }
        };
        Ok(radix)
    }
}
