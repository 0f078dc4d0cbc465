// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Array dimensions and element index labels (`[1,2]`).

use crate::error::L5xError;
use std::fmt;

/// Largest element count an array may hold.
pub const MAX_ELEMENTS: usize = 1 << 22;

/// Up to three array dimensions; elements are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimensions(Vec<u32>);

impl Dimensions {
    pub fn new(dims: impl Into<Vec<u32>>) -> Self {
        Self(dims.into())
    }

    pub fn single(length: u32) -> Self {
        Self(vec![length])
    }

    /// Parse `"5"`, `"2 3"` or `"2,3"`. Empty or non-numeric input, more
    /// than three dimensions, or more than [`MAX_ELEMENTS`] elements is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let dims = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()?;
        if dims.is_empty() || dims.len() > 3 {
            return None;
        }
        let dims = Self(dims);
        dims.len().map(|_| dims)
    }

    pub fn dims(&self) -> &[u32] {
        &self.0
    }

    /// Total element count, `None` past [`MAX_ELEMENTS`].
    pub fn len(&self) -> Option<usize> {
        self.0
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d as usize))
            .filter(|n| *n <= MAX_ELEMENTS)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Label of the `flat`-th element in row-major order.
    pub fn label(&self, flat: usize) -> String {
        let mut rest = flat;
        let mut coords = vec![0usize; self.0.len()];
        for (slot, dim) in coords.iter_mut().zip(&self.0).rev() {
            let dim = (*dim as usize).max(1);
            *slot = rest % dim;
            rest /= dim;
        }
        let parts: Vec<String> = coords.iter().map(ToString::to_string).collect();
        format!("[{}]", parts.join(","))
    }

    /// Flat row-major position of a label such as `[1,2]`.
    pub fn position(&self, label: &str) -> Option<usize> {
        let inner = label.trim().strip_prefix('[')?.strip_suffix(']')?;
        let coords = inner
            .split(',')
            .map(|part| part.trim().parse::<usize>().ok())
            .collect::<Option<Vec<_>>>()?;
        if coords.len() != self.0.len() {
            return None;
        }
        let mut flat = 0usize;
        for (coord, dim) in coords.iter().zip(&self.0) {
            if *coord >= *dim as usize {
                return None;
            }
            flat = flat * *dim as usize + coord;
        }
        Some(flat)
    }
}

/// Error for an array whose element count is past [`MAX_ELEMENTS`].
pub(crate) fn too_many_elements(path: impl Into<String>) -> L5xError {
    L5xError::malformed(path, format!("more than {MAX_ELEMENTS} elements"))
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}
