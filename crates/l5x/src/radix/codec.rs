// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical text forms for each radix.
//!
//! `format` always produces the canonical form; `parse` accepts the canonical
//! form plus the common variants found in exported files (upper-case hex
//! digits, missing group separators, named ASCII escapes).

use super::Radix;
use crate::error::{L5xError, Result};
use crate::types::{AtomicKind, AtomicValue};
use chrono::{DateTime, NaiveDateTime, Utc};

const QNAN: &str = "1.#QNAN";
const INF: &str = "1.#INF";
const NEG_INF: &str = "-1.#INF";

/// Converts atomic values to and from their radix text.
pub struct RadixCodec;

impl RadixCodec {
    /// Format `value` in `radix`.
    pub fn format(value: &AtomicValue, radix: Radix) -> Result<String> {
        let kind = value.kind();
        radix.check(kind)?;
        let bits = value.bits();
        let width = kind.bits() as usize;

        let text = match radix {
            Radix::Decimal => {
                if kind.is_signed() {
                    value.as_i64().to_string()
                } else {
                    bits.to_string()
                }
            }
            Radix::Binary => based("2#", &format!("{bits:0width$b}"), 4),
            Radix::Octal => based("8#", &format!("{bits:0w$o}", w = width.div_ceil(3)), 3),
            Radix::Hex => based("16#", &format!("{bits:0w$x}", w = width / 4), 4),
            Radix::Ascii => format_ascii_bytes(&bits.to_be_bytes()[8 - kind.width()..]),
            Radix::Float => format_float(value),
            Radix::Exponential => format_exponential(value),
            Radix::DateTime => format_date_time(value)?,
            Radix::NullType | Radix::General | Radix::Unicode => {
                return Err(unsupported(radix, kind));
            }
        };
        Ok(text)
    }

    /// Format `value` in the radix it carries.
    pub fn format_value(value: &AtomicValue) -> Result<String> {
        Self::format(value, value.radix())
    }

    /// Parse `text` written in `radix` as a value of `kind`.
    pub fn parse(text: &str, radix: Radix, kind: AtomicKind) -> Result<AtomicValue> {
        radix.check(kind)?;
        let text = text.trim();
        let invalid = || L5xError::InvalidValue {
            text: text.to_string(),
            radix: radix.token().to_string(),
            kind: kind.name().to_string(),
        };

        let bits = match radix {
            Radix::Decimal => parse_decimal(text, kind),
            Radix::Binary => parse_based(text, "2#", 2, kind),
            Radix::Octal => parse_based(text, "8#", 8, kind),
            Radix::Hex => parse_based(text, "16#", 16, kind),
            Radix::Ascii => parse_ascii_bytes(text)
                .filter(|bytes| bytes.len() <= kind.width())
                .map(|bytes| bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))),
            Radix::Float | Radix::Exponential => parse_float(text, kind),
            Radix::DateTime => parse_date_time(text),
            Radix::NullType | Radix::General | Radix::Unicode => {
                return Err(unsupported(radix, kind));
            }
        }
        .ok_or_else(invalid)?;

        Ok(AtomicValue::from_bits(kind, bits).with_radix_unchecked(radix))
    }
}

fn unsupported(radix: Radix, kind: AtomicKind) -> L5xError {
    L5xError::RadixUnsupported {
        radix: radix.token().to_string(),
        kind: kind.name().to_string(),
    }
}

/// Prefix + digits grouped from the right with `_`.
fn based(prefix: &str, digits: &str, group: usize) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(prefix.len() + len + len / group);
    out.push_str(prefix);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % group == 0 {
            out.push('_');
        }
        out.push(ch);
    }
    out
}

fn parse_decimal(text: &str, kind: AtomicKind) -> Option<u64> {
    match kind {
        AtomicKind::Bool => match text {
            "0" => Some(0),
            "1" => Some(1),
            _ => None,
        },
        kind if kind.is_signed() => {
            let value: i64 = text.parse().ok()?;
            let half = 1i128 << (kind.bits() - 1);
            (-half..half)
                .contains(&i128::from(value))
                .then_some(value as u64 & kind.mask())
        }
        kind => {
            let value: u64 = text.parse().ok()?;
            (value & !kind.mask() == 0).then_some(value)
        }
    }
}

fn parse_based(text: &str, prefix: &str, radix: u32, kind: AtomicKind) -> Option<u64> {
    let digits: String = text.strip_prefix(prefix)?.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return None;
    }
    let value = u64::from_str_radix(&digits, radix).ok()?;
    (value & !kind.mask() == 0).then_some(value)
}

/// Quote `bytes` as an ASCII literal (`'A$0D$$'`).
pub(crate) fn format_ascii_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('\'');
    for &b in bytes {
        match b {
            b'$' => out.push_str("$$"),
            b'\'' => out.push_str("$'"),
            0x20..=0x7E => out.push(char::from(b)),
            _ => out.push_str(&format!("${b:02X}")),
        }
    }
    out.push('\'');
    out
}

/// Unquote an ASCII literal into raw bytes.
pub(crate) fn parse_ascii_bytes(text: &str) -> Option<Vec<u8>> {
    let body = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut bytes = Vec::with_capacity(body.len());
    let mut iter = body.bytes();
    while let Some(b) = iter.next() {
        if !b.is_ascii() {
            return None;
        }
        if b != b'$' {
            bytes.push(b);
            continue;
        }
        let escaped = match iter.next()? {
            b'$' => b'$',
            b'\'' => b'\'',
            b'L' | b'l' | b'N' | b'n' => 0x0A,
            b'P' | b'p' => 0x0C,
            b'R' | b'r' => 0x0D,
            b'T' | b't' => 0x09,
            hi => {
                let lo = iter.next()?;
                let hex = [hi, lo];
                u8::from_str_radix(std::str::from_utf8(&hex).ok()?, 16).ok()?
            }
        };
        bytes.push(escaped);
    }
    Some(bytes)
}

fn special_float(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some(QNAN)
    } else if value.is_infinite() {
        Some(if value > 0.0 { INF } else { NEG_INF })
    } else {
        None
    }
}

fn format_float(value: &AtomicValue) -> String {
    if let Some(special) = special_float(value.as_f64()) {
        return special.to_string();
    }
    let text = match value.kind() {
        AtomicKind::Real => f32::from_bits(value.bits() as u32).to_string(),
        _ => f64::from_bits(value.bits()).to_string(),
    };
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

fn format_exponential(value: &AtomicValue) -> String {
    if let Some(special) = special_float(value.as_f64()) {
        return special.to_string();
    }
    let raw = match value.kind() {
        AtomicKind::Real => format!("{:.8e}", f32::from_bits(value.bits() as u32)),
        _ => format!("{:.16e}", f64::from_bits(value.bits())),
    };
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:03}", exp.unsigned_abs())
        }
        None => raw,
    }
}

fn parse_float(text: &str, kind: AtomicKind) -> Option<u64> {
    let special = match text {
        QNAN | "1.#SNAN" | "1.#IND" | "-1.#QNAN" | "-1.#IND" => Some(f64::NAN),
        INF => Some(f64::INFINITY),
        NEG_INF => Some(f64::NEG_INFINITY),
        _ => None,
    };
    match kind {
        AtomicKind::Real => {
            let v = match special {
                Some(s) => s as f32,
                None => text.parse::<f32>().ok()?,
            };
            Some(u64::from(v.to_bits()))
        }
        _ => {
            let v = match special {
                Some(s) => s,
                None => text.parse::<f64>().ok()?,
            };
            Some(v.to_bits())
        }
    }
}

fn format_date_time(value: &AtomicValue) -> Result<String> {
    let micros = value.as_i64();
    let secs = micros.div_euclid(1_000_000);
    let sub = micros.rem_euclid(1_000_000) as u32;
    let stamp = DateTime::<Utc>::from_timestamp(secs, sub * 1_000).ok_or_else(|| L5xError::InvalidValue {
        text: micros.to_string(),
        radix: Radix::DateTime.token().to_string(),
        kind: value.kind().name().to_string(),
    })?;
    Ok(format!(
        "DT#{}.{:03}_{:03}Z",
        stamp.format("%Y-%m-%d-%H:%M:%S"),
        sub / 1_000,
        sub % 1_000
    ))
}

fn parse_date_time(text: &str) -> Option<u64> {
    let body = text.strip_prefix("DT#")?.strip_suffix('Z')?;
    let (stamp, frac) = body.split_once('.').unwrap_or((body, ""));
    let naive = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d-%H:%M:%S").ok()?;

    let mut digits: String = frac.chars().filter(|c| *c != '_').collect();
    if digits.len() > 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    while digits.len() < 6 {
        digits.push('0');
    }
    let frac_micros: i64 = digits.parse().ok()?;

    let micros = naive
        .and_utc()
        .timestamp()
        .checked_mul(1_000_000)?
        .checked_add(frac_micros)?;
    Some(micros as u64)
}
