// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Serializer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerializerConfig {
    /// Emit hidden backing members when encoding structures (default: true)
    pub emit_hidden_members: bool,

    /// Write `Radix` on BOOL literals (default: false, as exported files do)
    pub bool_radix_attribute: bool,

    /// Require array `Index` labels to run contiguously from `[0]` (default: true)
    pub strict_array_indices: bool,

    /// Indentation width of the XML writer
    pub indent: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            emit_hidden_members: true,
            bool_radix_attribute: false,
            strict_array_indices: true,
            indent: 2,
        }
    }
}

impl SerializerConfig {
    /// Create a new config builder
    pub fn builder() -> SerializerConfigBuilder {
        SerializerConfigBuilder::default()
    }
}

/// Config builder for fluent API
#[derive(Debug, Default)]
pub struct SerializerConfigBuilder {
    emit_hidden_members: Option<bool>,
    bool_radix_attribute: Option<bool>,
    strict_array_indices: Option<bool>,
    indent: Option<usize>,
}

impl SerializerConfigBuilder {
    /// Emit hidden backing members (default: true)
    pub fn emit_hidden_members(mut self, emit: bool) -> Self {
        self.emit_hidden_members = Some(emit);
        self
    }

    /// Write `Radix` on BOOL literals (default: false)
    pub fn bool_radix_attribute(mut self, write: bool) -> Self {
        self.bool_radix_attribute = Some(write);
        self
    }

    /// Reject non-contiguous array indices (default: true)
    pub fn strict_array_indices(mut self, strict: bool) -> Self {
        self.strict_array_indices = Some(strict);
        self
    }

    /// Set writer indentation
    pub fn indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Build the configuration
    pub fn build(self) -> SerializerConfig {
        let defaults = SerializerConfig::default();

        SerializerConfig {
            emit_hidden_members: self
                .emit_hidden_members
                .unwrap_or(defaults.emit_hidden_members),
            bool_radix_attribute: self
                .bool_radix_attribute
                .unwrap_or(defaults.bool_radix_attribute),
            strict_array_indices: self
                .strict_array_indices
                .unwrap_or(defaults.strict_array_indices),
            indent: self.indent.unwrap_or(defaults.indent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = SerializerConfig::builder()
            .emit_hidden_members(false)
            .strict_array_indices(false)
            .indent(4)
            .build();

        assert!(!config.emit_hidden_members);
        assert!(!config.bool_radix_attribute);
        assert!(!config.strict_array_indices);
        assert_eq!(config.indent, 4);
    }

    #[test]
    fn test_config_defaults() {
        let config = SerializerConfig::default();

        assert!(config.emit_hidden_members);
        assert!(!config.bool_radix_attribute);
        assert!(config.strict_array_indices);
        assert_eq!(config.indent, 2);
        assert_eq!(SerializerConfig::builder().build(), config);
    }
}
