// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value → element.

use super::Serializer;
use crate::element::Element;
use crate::error::Result;
use crate::radix::{format_ascii_bytes, Radix, RadixCodec};
use crate::types::{Array, AtomicKind, AtomicValue, ExternalAccess, Family, LogixType, Member, Structure};

impl<'r, 'a> Serializer<'r, 'a> {
    /// Encode a value as `DataValue`, `Structure` or `Array`.
    ///
    /// Structure members are written in declaration order. Hidden backing
    /// members are written too (unless disabled in the config), with their
    /// byte packed from the booleans that target them.
    pub fn encode(&self, value: &LogixType) -> Result<Element> {
        match value {
            LogixType::Atomic(v) => {
                let mut el = Element::new("DataValue").with_attribute("DataType", v.kind().name());
                self.write_literal(&mut el, v)?;
                Ok(el)
            }
            LogixType::Structure(s) => {
                let mut el = Element::new("Structure").with_attribute("DataType", &s.name);
                self.encode_members(s, &mut el)?;
                Ok(el)
            }
            LogixType::Array(a) => {
                let mut el = Element::new("Array");
                self.encode_array(a, &mut el)?;
                Ok(el)
            }
            LogixType::Undefined { name } => {
                Ok(Element::new("Structure").with_attribute("DataType", name))
            }
        }
    }

    /// Encode a value inside a `Data Format="Decorated"` wrapper.
    pub fn encode_data(&self, value: &LogixType) -> Result<Element> {
        Ok(Element::new("Data")
            .with_attribute("Format", "Decorated")
            .with_child(self.encode(value)?))
    }

    /// Encode a controller-scope `Tag` element holding `value`.
    pub fn encode_tag(&self, name: &str, value: &LogixType) -> Result<Element> {
        let mut tag = Element::new("Tag")
            .with_attribute("Name", name)
            .with_attribute("TagType", "Base")
            .with_attribute("DataType", value.type_name());
        match value {
            LogixType::Array(a) => tag.set_attribute("Dimensions", a.dimensions().to_string()),
            LogixType::Atomic(v) if v.kind() != AtomicKind::Bool || self.config.bool_radix_attribute => {
                tag.set_attribute("Radix", v.radix().token());
            }
            _ => {}
        }
        tag.set_attribute("ExternalAccess", ExternalAccess::ReadWrite.token());
        tag.push(self.encode_data(value)?);
        Ok(tag)
    }

    fn write_literal(&self, el: &mut Element, value: &AtomicValue) -> Result<()> {
        if value.kind() != AtomicKind::Bool || self.config.bool_radix_attribute {
            el.set_attribute("Radix", value.radix().token());
        }
        el.set_attribute("Value", RadixCodec::format_value(value)?);
        Ok(())
    }

    fn encode_members(&self, structure: &Structure, el: &mut Element) -> Result<()> {
        let is_string = structure.family == Family::StringFamily;
        for member in structure.all_members() {
            if member.hidden && !self.config.emit_hidden_members {
                continue;
            }
            if is_string && member.name.eq_ignore_ascii_case("DATA") {
                if let LogixType::Array(data) = &member.value {
                    el.push(string_data(structure, member, data));
                    continue;
                }
            }
            el.push(self.encode_member(structure, member)?);
        }
        Ok(())
    }

    fn encode_member(&self, owner: &Structure, member: &Member) -> Result<Element> {
        let el = match &member.value {
            LogixType::Atomic(v) => {
                let value = if member.hidden {
                    AtomicValue::from_bits(v.kind(), owner.packed_backing(&member.name))
                        .with_radix_unchecked(v.radix())
                } else {
                    *v
                };
                let mut el = Element::new("DataValueMember")
                    .with_attribute("Name", &member.name)
                    .with_attribute("DataType", value.kind().name());
                self.write_literal(&mut el, &value)?;
                el
            }
            LogixType::Structure(inner) => {
                let mut el = Element::new("StructureMember")
                    .with_attribute("Name", &member.name)
                    .with_attribute("DataType", &inner.name);
                self.encode_members(inner, &mut el)?;
                el
            }
            LogixType::Array(array) => {
                let mut el = Element::new("ArrayMember").with_attribute("Name", &member.name);
                self.encode_array(array, &mut el)?;
                el
            }
            LogixType::Undefined { name } => Element::new("StructureMember")
                .with_attribute("Name", &member.name)
                .with_attribute("DataType", name),
        };
        Ok(el)
    }

    fn encode_array(&self, array: &Array, el: &mut Element) -> Result<()> {
        el.set_attribute("DataType", array.element_type());
        el.set_attribute("Dimensions", array.dimensions().to_string());
        if array.radix() != Radix::NullType {
            el.set_attribute("Radix", array.radix().token());
        }
        for (i, value) in array.elements().iter().enumerate() {
            let mut item = Element::new("Element").with_attribute("Index", array.dimensions().label(i));
            match value {
                LogixType::Atomic(v) => item.set_attribute("Value", RadixCodec::format_value(v)?),
                other => item.push(self.encode(other)?),
            }
            el.push(item);
        }
        Ok(())
    }
}

/// `DATA` of a string-family structure: the first `LEN` bytes as ASCII text.
fn string_data(owner: &Structure, member: &Member, data: &Array) -> Element {
    let len = owner
        .get("LEN")
        .and_then(LogixType::as_atomic)
        .map_or(0, AtomicValue::as_i64)
        .clamp(0, i64::try_from(data.length()).unwrap_or(i64::MAX));
    let bytes: Vec<u8> = data
        .elements()
        .iter()
        .take(usize::try_from(len).unwrap_or(0))
        .map(|e| e.as_atomic().map_or(0, |v| v.bits() as u8))
        .collect();
    Element::new("DataValueMember")
        .with_attribute("Name", &member.name)
        .with_attribute("DataType", &owner.name)
        .with_attribute("Radix", Radix::Ascii.token())
        .with_text(format_ascii_bytes(&bytes))
}
