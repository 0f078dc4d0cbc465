// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Atomic kinds and values.
//!
//! One table drives every primitive: name, bit width, signedness and default
//! radix. Values are stored as raw bits masked to the kind's width (IEEE bits
//! for the floating kinds), so equality is exact and text round trips are
//! lossless.

use crate::error::Result;
use crate::radix::Radix;

/// Primitive scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicKind {
    Bool,
    Sint,
    Int,
    Dint,
    Lint,
    Usint,
    Uint,
    Udint,
    Ulint,
    Real,
    Lreal,
}

impl AtomicKind {
    pub const ALL: [Self; 11] = [
        Self::Bool,
        Self::Sint,
        Self::Int,
        Self::Dint,
        Self::Lint,
        Self::Usint,
        Self::Uint,
        Self::Udint,
        Self::Ulint,
        Self::Real,
        Self::Lreal,
    ];

    /// Look up a kind by type name (case-insensitive). `BIT` is the
    /// definition-side spelling of a packed `BOOL`.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("BIT") {
            return Some(Self::Bool);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::Sint => "SINT",
            Self::Int => "INT",
            Self::Dint => "DINT",
            Self::Lint => "LINT",
            Self::Usint => "USINT",
            Self::Uint => "UINT",
            Self::Udint => "UDINT",
            Self::Ulint => "ULINT",
            Self::Real => "REAL",
            Self::Lreal => "LREAL",
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            Self::Bool => 1,
            Self::Sint | Self::Usint => 8,
            Self::Int | Self::Uint => 16,
            Self::Dint | Self::Udint | Self::Real => 32,
            Self::Lint | Self::Ulint | Self::Lreal => 64,
        }
    }

    /// Storage width in bytes.
    pub const fn width(self) -> usize {
        match self {
            Self::Bool | Self::Sint | Self::Usint => 1,
            Self::Int | Self::Uint => 2,
            Self::Dint | Self::Udint | Self::Real => 4,
            Self::Lint | Self::Ulint | Self::Lreal => 8,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::Sint | Self::Int | Self::Dint | Self::Lint | Self::Real | Self::Lreal
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::Real | Self::Lreal)
    }

    /// Integer kinds other than `BOOL`.
    pub const fn is_integer(self) -> bool {
        !self.is_float() && !matches!(self, Self::Bool)
    }

    pub const fn default_radix(self) -> Radix {
        if self.is_float() {
            Radix::Float
        } else {
            Radix::Decimal
        }
    }

    pub(crate) const fn mask(self) -> u64 {
        match self.bits() {
            64 => u64::MAX,
            bits => (1u64 << bits) - 1,
        }
    }
}

const QUIET_NAN_32: u64 = 0x7fc0_0000;
const QUIET_NAN_64: u64 = 0x7ff8_0000_0000_0000;

/// A typed scalar with its presentation radix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomicValue {
    kind: AtomicKind,
    bits: u64,
    radix: Radix,
}

impl AtomicValue {
    /// Zero value of `kind` in its default radix.
    pub const fn zero(kind: AtomicKind) -> Self {
        Self {
            kind,
            bits: 0,
            radix: kind.default_radix(),
        }
    }

    pub const fn from_bool(value: bool) -> Self {
        Self {
            kind: AtomicKind::Bool,
            bits: value as u64,
            radix: Radix::Decimal,
        }
    }

    /// Store an integer, wrapping to the kind's width. Floating kinds store
    /// the numeric value.
    pub fn from_i64(kind: AtomicKind, value: i64) -> Self {
        match kind {
            AtomicKind::Real | AtomicKind::Lreal => Self::from_f64(kind, value as f64),
            _ => Self::from_bits(kind, value as u64),
        }
    }

    pub fn from_f64(kind: AtomicKind, value: f64) -> Self {
        match kind {
            AtomicKind::Real => Self::from_bits(kind, u64::from((value as f32).to_bits())),
            AtomicKind::Lreal => Self::from_bits(kind, value.to_bits()),
            _ => Self::from_i64(kind, value as i64),
        }
    }

    /// Raw bits, masked to the kind's width. Every NaN is stored as the
    /// positive quiet NaN, the only one the text forms can express.
    pub fn from_bits(kind: AtomicKind, bits: u64) -> Self {
        let bits = match kind {
            AtomicKind::Real if f32::from_bits(bits as u32).is_nan() => QUIET_NAN_32,
            AtomicKind::Lreal if f64::from_bits(bits).is_nan() => QUIET_NAN_64,
            _ => bits & kind.mask(),
        };
        Self {
            kind,
            bits,
            radix: kind.default_radix(),
        }
    }

    /// Same value in another radix, rejecting incompatible pairs.
    pub fn with_radix(self, radix: Radix) -> Result<Self> {
        radix.check(self.kind)?;
        Ok(Self { radix, ..self })
    }

    pub(crate) const fn with_radix_unchecked(self, radix: Radix) -> Self {
        Self { radix, ..self }
    }

    pub const fn kind(&self) -> AtomicKind {
        self.kind
    }

    pub const fn width(&self) -> usize {
        self.kind.width()
    }

    pub const fn radix(&self) -> Radix {
        self.radix
    }

    pub const fn bits(&self) -> u64 {
        self.bits
    }

    pub const fn as_bool(&self) -> bool {
        self.bits != 0
    }

    /// Sign-extended for signed integer kinds; truncated for floats.
    pub fn as_i64(&self) -> i64 {
        match self.kind {
            AtomicKind::Real | AtomicKind::Lreal => self.as_f64() as i64,
            kind if kind.is_signed() => {
                let shift = 64 - kind.bits();
                ((self.bits << shift) as i64) >> shift
            }
            _ => self.bits as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self.kind {
            AtomicKind::Real => f64::from(f32::from_bits(self.bits as u32)),
            AtomicKind::Lreal => f64::from_bits(self.bits),
            kind if kind.is_signed() => self.as_i64() as f64,
            _ => self.bits as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(AtomicKind::from_name("dint"), Some(AtomicKind::Dint));
        assert_eq!(AtomicKind::from_name("BIT"), Some(AtomicKind::Bool));
        assert_eq!(AtomicKind::from_name("TIMER"), None);
    }

    #[test]
    fn signed_values_wrap_to_width() {
        let v = AtomicValue::from_i64(AtomicKind::Sint, -1);
        assert_eq!(v.bits(), 0xFF);
        assert_eq!(v.as_i64(), -1);

        let v = AtomicValue::from_i64(AtomicKind::Usint, -1);
        assert_eq!(v.as_i64(), 255);

        let v = AtomicValue::from_i64(AtomicKind::Lint, i64::MIN);
        assert_eq!(v.as_i64(), i64::MIN);
    }

    #[test]
    fn floats_keep_exact_bits() {
        let v = AtomicValue::from_f64(AtomicKind::Real, 1.5);
        assert_eq!(v.as_f64(), 1.5);
        assert_eq!(v.bits(), u64::from(1.5f32.to_bits()));
    }

    #[test]
    fn nans_share_one_bit_pattern() {
        let negative = AtomicValue::from_bits(AtomicKind::Real, 0xffc0_0001);
        let positive = AtomicValue::from_f64(AtomicKind::Real, f64::NAN);
        assert!(negative.as_f64().is_nan());
        assert_eq!(negative, positive);
        assert_eq!(negative.bits(), 0x7fc0_0000);

        let lreal = AtomicValue::from_f64(AtomicKind::Lreal, -f64::NAN);
        assert_eq!(lreal.bits(), 0x7ff8_0000_0000_0000);
        assert!(lreal.as_f64().is_sign_positive());
    }

    #[test]
    fn with_radix_validates() {
        let v = AtomicValue::zero(AtomicKind::Real);
        assert!(v.with_radix(Radix::Binary).is_err());
        assert_eq!(
            v.with_radix(Radix::Exponential).map(|v| v.radix()).ok(),
            Some(Radix::Exponential)
        );
    }
}
