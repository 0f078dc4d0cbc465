// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Component name grammar and case-insensitive keys.

use crate::error::{L5xError, Result};

/// Longest name a component may carry.
pub const MAX_NAME_LEN: usize = 40;

/// Check a type or member name against the identifier grammar:
/// starts with a letter or underscore, then letters, digits, underscores,
/// at most [`MAX_NAME_LEN`] characters. Underscores may not repeat or end
/// the name.
pub fn validate(name: &str) -> Result<()> {
    let invalid = |reason| {
        Err(L5xError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    let Some(first) = name.chars().next() else {
        return invalid("name is empty");
    };
    if name.chars().count() > MAX_NAME_LEN {
        return invalid("name exceeds 40 characters");
    }
    if !(first.is_ascii_alphabetic() || first == '_') {
        return invalid("name must start with a letter or underscore");
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return invalid("name may only contain letters, digits and underscores");
    }
    if name.contains("__") {
        return invalid("name may not contain consecutive underscores");
    }
    if name.ends_with('_') {
        return invalid("name may not end with an underscore");
    }
    Ok(())
}

/// Case-insensitive identity key.
pub(crate) fn key(name: &str) -> String {
    name.to_ascii_uppercase()
}
