// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Element → value.

use super::{segment, Serializer};
use crate::element::Element;
use crate::error::{L5xError, Result};
use crate::radix::{parse_ascii_bytes, Radix, RadixCodec};
use crate::types::definition::{required, same_type_name};
use crate::types::{
    too_many_elements, Array, AtomicKind, AtomicValue, DataType, Dimensions, Family, LogixType,
    Member, Structure, TypeDefinition,
};

impl<'r, 'a> Serializer<'r, 'a> {
    /// Decode a value element (`DataValue`, `Structure`, `Array`, their
    /// member forms, or a `Data` wrapper).
    ///
    /// Type names no source defines decode to [`LogixType::Undefined`].
    pub fn decode(&self, node: &Element) -> Result<LogixType> {
        self.decode_at(node, &segment(node))
    }

    /// Decode a `Data Format="Decorated"` element.
    pub fn decode_data(&self, data: &Element) -> Result<LogixType> {
        if data.name() != "Data" {
            return Err(L5xError::malformed(segment(data), "expected a Data element"));
        }
        self.decode_data_at(data, "Data")
    }

    /// Decode a `Tag` element into its name and value.
    ///
    /// Tags exported without decorated data get a default value of their
    /// declared type.
    pub fn decode_tag(&self, tag: &Element) -> Result<(String, LogixType)> {
        let name = required(tag, "Name", "Tag")?;
        let path = format!("Tag[{name}]");

        let decorated = tag
            .children_named("Data")
            .find(|d| d.attribute("Format") == Some("Decorated"));
        if let Some(data) = decorated {
            let value = self.decode_data_at(data, &format!("{path}/Data"))?;
            return Ok((name.to_string(), value));
        }

        let type_name = required(tag, "DataType", &path)?;
        let radix: Radix = match tag.attribute("Radix") {
            Some(token) => token.parse()?,
            None => default_radix(type_name),
        };
        let builder = self.builder();
        let dims = match tag.attribute("Dimensions") {
            Some(text) => Some(Dimensions::parse(text).ok_or_else(|| {
                L5xError::malformed(&path, format!("invalid Dimensions '{text}'"))
            })?),
            None => None,
        };
        let value = match dims {
            Some(dims) if !dims.is_empty() => builder.instantiate_array(type_name, dims, radix)?,
            _ => builder.instantiate_type(type_name, radix)?,
        };
        log::debug!("[Serializer] {path}: no decorated data, using defaults");
        Ok((name.to_string(), value))
    }

    fn decode_at(&self, node: &Element, path: &str) -> Result<LogixType> {
        match node.name() {
            "Data" => self.decode_data_at(node, path),
            "DataValue" | "DataValueMember" => self.decode_data_value(node, path),
            "Structure" | "StructureMember" => self.decode_structure(node, path),
            "Array" | "ArrayMember" => Ok(LogixType::Array(self.decode_array(node, path)?)),
            other => Err(L5xError::malformed(
                path,
                format!("unexpected <{other}> element"),
            )),
        }
    }

    fn decode_data_at(&self, data: &Element, path: &str) -> Result<LogixType> {
        if let Some(format) = data.attribute("Format") {
            if format != "Decorated" {
                return Err(L5xError::malformed(
                    path,
                    format!("unsupported data format '{format}'"),
                ));
            }
        }
        let value = data
            .children()
            .first()
            .ok_or_else(|| L5xError::malformed(path, "empty Data element"))?;
        self.decode_at(value, &format!("{path}/{}", segment(value)))
    }

    fn decode_data_value(&self, node: &Element, path: &str) -> Result<LogixType> {
        let type_name = required(node, "DataType", path)?;
        match self.registry.resolve(type_name)? {
            DataType::Atomic(kind) => Ok(LogixType::Atomic(parse_literal(node, kind, None, path)?)),
            DataType::Structure(def) if def.family == Family::StringFamily => {
                let mut value = self.builder().build(&def)?;
                fill_string(&mut value, &string_bytes(node)?, path)?;
                Ok(LogixType::Structure(value))
            }
            DataType::Structure(def) => Err(L5xError::malformed(
                path,
                format!("{} is a structure, expected an atomic type", def.name),
            )),
            DataType::Undefined(name) => Ok(undefined(name, path)),
        }
    }

    fn decode_structure(&self, node: &Element, path: &str) -> Result<LogixType> {
        let type_name = required(node, "DataType", path)?;
        match self.registry.resolve(type_name)? {
            DataType::Structure(def) => Ok(LogixType::Structure(self.decode_members(&def, node, path)?)),
            DataType::Atomic(kind) => Err(L5xError::malformed(
                path,
                format!("{} is atomic, expected a structure", kind.name()),
            )),
            DataType::Undefined(name) => Ok(undefined(name, path)),
        }
    }

    /// Members are matched to children by case-insensitive name. Absent
    /// members keep their defaults; unknown children are skipped.
    fn decode_members(&self, def: &TypeDefinition, node: &Element, path: &str) -> Result<Structure> {
        let mut structure = self.builder().build(def)?;

        // Backing bytes first so explicit booleans override them.
        let (backing, public): (Vec<&Element>, Vec<&Element>) =
            node.children().iter().partition(|child| {
                child
                    .attribute("Name")
                    .and_then(|name| structure.member(name))
                    .is_some_and(|m| m.hidden)
            });

        for child in backing.into_iter().chain(public) {
            let name = required(child, "Name", path)?;
            let child_path = format!("{path}/{}", segment(child));
            let Some(member) = structure.member_mut(name) else {
                log::debug!("[Serializer] {path}: ignoring unknown member {name}");
                continue;
            };
            self.decode_member(member, child, &child_path)?;
            if member.hidden {
                let backing_name = member.name.clone();
                structure.unpack_backing(&backing_name);
            }
        }

        structure.sync_backing();
        Ok(structure)
    }

    fn decode_member(&self, member: &mut Member, child: &Element, path: &str) -> Result<()> {
        match child.name() {
            "DataValueMember" => {
                if let Some(kind) = member.value.as_atomic().map(AtomicValue::kind) {
                    check_declared_type(child, kind.name(), path)?;
                    let value = parse_literal(child, kind, Some(member.radix()), path)?;
                    let radix = value.radix();
                    member.value = LogixType::Atomic(value);
                    return member.set_radix(radix);
                }
                match &mut member.value {
                    LogixType::Structure(s) if s.family == Family::StringFamily => {
                        fill_string(s, &string_bytes(child)?, path)
                    }
                    LogixType::Array(a) if is_byte_array(a) => fill_bytes(a, &string_bytes(child)?, path),
                    LogixType::Undefined { .. } => Ok(()),
                    other => Err(L5xError::malformed(
                        path,
                        format!("DataValueMember given for a {} member", other.type_name()),
                    )),
                }
            }
            "StructureMember" => {
                if member.dimension != 0 {
                    return Err(L5xError::malformed(
                        path,
                        format!("StructureMember given for a {} array member", member.data_type),
                    ));
                }
                check_declared_type(child, &member.data_type, path)?;
                member.value = match self.registry.resolve(&member.data_type)? {
                    DataType::Structure(def) => {
                        LogixType::Structure(self.decode_members(&def, child, path)?)
                    }
                    DataType::Undefined(name) => undefined(name, path),
                    DataType::Atomic(kind) => {
                        return Err(L5xError::malformed(
                            path,
                            format!("StructureMember given for a {} member", kind.name()),
                        ));
                    }
                };
                Ok(())
            }
            "ArrayMember" => {
                if member.dimension == 0 {
                    return Err(L5xError::malformed(
                        path,
                        format!("ArrayMember given for a scalar {} member", member.data_type),
                    ));
                }
                check_declared_type(child, &member.data_type, path)?;
                let array = self.decode_array(child, path)?;
                if array.dimensions().dims().len() != 1
                    || array.length() != member.dimension as usize
                {
                    return Err(L5xError::malformed(
                        path,
                        format!(
                            "member declares {} elements, data has [{}]",
                            member.dimension,
                            array.dimensions()
                        ),
                    ));
                }
                let radix = array.radix();
                member.value = LogixType::Array(array);
                member.set_radix(radix)
            }
            other => Err(L5xError::malformed(
                path,
                format!("unexpected <{other}> for a member"),
            )),
        }
    }

    fn decode_array(&self, node: &Element, path: &str) -> Result<Array> {
        let type_name = required(node, "DataType", path)?;
        let dims_text = required(node, "Dimensions", path)?;
        let dims = Dimensions::parse(dims_text)
            .ok_or_else(|| L5xError::malformed(path, format!("invalid Dimensions '{dims_text}'")))?;
        let len = dims.len().ok_or_else(|| too_many_elements(path))?;

        let element_type = self.registry.resolve(type_name)?;
        let radix: Radix = match node.attribute("Radix") {
            Some(token) => token.parse()?,
            None => default_radix(type_name),
        };
        match &element_type {
            DataType::Atomic(kind) => radix.check(*kind)?,
            DataType::Structure(def) if radix != Radix::NullType => {
                return Err(L5xError::RadixUnsupported {
                    radix: radix.token().to_string(),
                    kind: def.name.clone(),
                });
            }
            DataType::Structure(_) => {}
            DataType::Undefined(name) => {
                // Shape survives; element content cannot be read.
                let elements = vec![undefined(name.clone(), path); len];
                return Array::new(name.clone(), dims, Radix::NullType, elements);
            }
        }

        let strict = self.config.strict_array_indices;
        let children: Vec<&Element> = node.children_named("Element").collect();
        if strict && children.len() != len {
            return Err(L5xError::malformed(
                path,
                format!("expected {len} elements, found {}", children.len()),
            ));
        }

        let mut slots: Vec<Option<LogixType>> = vec![None; len];
        for (i, child) in children.into_iter().enumerate() {
            let label = required(child, "Index", path)?;
            let el_path = format!("{path}/Element{label}");
            let position = dims
                .position(label)
                .ok_or_else(|| L5xError::malformed(&el_path, format!("index outside [{dims}]")))?;
            if strict && position != i {
                return Err(L5xError::malformed(
                    &el_path,
                    format!("expected index {}", dims.label(i)),
                ));
            }
            let slot = slots
                .get_mut(position)
                .ok_or_else(|| L5xError::malformed(&el_path, "index out of range"))?;
            if slot.is_some() {
                return Err(L5xError::malformed(&el_path, "duplicate index"));
            }
            *slot = Some(self.decode_element(&element_type, radix, child, &el_path)?);
        }

        let builder = self.builder();
        let elements = slots
            .into_iter()
            .map(|slot| match slot {
                Some(value) => Ok(value),
                None => builder.instantiate_type(type_name, radix),
            })
            .collect::<Result<Vec<_>>>()?;
        Array::new(element_type.name(), dims, radix, elements)
    }

    fn decode_element(
        &self,
        element_type: &DataType,
        radix: Radix,
        node: &Element,
        path: &str,
    ) -> Result<LogixType> {
        match element_type {
            DataType::Atomic(kind) => Ok(LogixType::Atomic(parse_literal(
                node,
                *kind,
                Some(radix),
                path,
            )?)),
            DataType::Structure(def) => {
                let inner = node
                    .children()
                    .first()
                    .ok_or_else(|| L5xError::malformed(path, "element without a Structure"))?;
                let inner_path = format!("{path}/{}", segment(inner));
                Ok(LogixType::Structure(self.decode_members(def, inner, &inner_path)?))
            }
            DataType::Undefined(name) => Ok(undefined(name.clone(), path)),
        }
    }
}

fn undefined(name: String, path: &str) -> LogixType {
    log::debug!("[Serializer] {path}: type {name} is undefined");
    LogixType::Undefined { name }
}

fn default_radix(type_name: &str) -> Radix {
    AtomicKind::from_name(type_name).map_or(Radix::NullType, AtomicKind::default_radix)
}

/// Read `Value` (or text) in the element's `Radix`, falling back to
/// `fallback` and then the kind's default.
fn parse_literal(
    node: &Element,
    kind: AtomicKind,
    fallback: Option<Radix>,
    path: &str,
) -> Result<AtomicValue> {
    let radix = match node.attribute("Radix") {
        Some(token) => {
            let radix: Radix = token.parse()?;
            radix.check(kind)?;
            radix
        }
        None => fallback
            .filter(|r| r.is_compatible(kind))
            .unwrap_or_else(|| kind.default_radix()),
    };
    let text = node
        .attribute("Value")
        .or_else(|| node.text())
        .ok_or_else(|| L5xError::malformed(path, "missing Value attribute"))?;
    RadixCodec::parse(text, radix, kind)
}

fn check_declared_type(node: &Element, expected: &str, path: &str) -> Result<()> {
    match node.attribute("DataType") {
        Some(declared) if !same_type_name(declared, expected) => Err(L5xError::malformed(
            path,
            format!("declared type {declared} does not match {expected}"),
        )),
        _ => Ok(()),
    }
}

fn is_byte_array(array: &Array) -> bool {
    matches!(
        AtomicKind::from_name(array.element_type()),
        Some(AtomicKind::Sint | AtomicKind::Usint)
    )
}

fn string_bytes(node: &Element) -> Result<Vec<u8>> {
    let text = node
        .text()
        .or_else(|| node.attribute("Value"))
        .unwrap_or("''");
    parse_ascii_bytes(text).ok_or_else(|| L5xError::InvalidValue {
        text: text.to_string(),
        radix: Radix::Ascii.token().to_string(),
        kind: node.attribute("DataType").unwrap_or("STRING").to_string(),
    })
}

fn fill_bytes(array: &mut Array, bytes: &[u8], path: &str) -> Result<()> {
    if bytes.len() > array.length() {
        return Err(L5xError::malformed(
            path,
            format!(
                "{} characters exceed the capacity of {}",
                bytes.len(),
                array.length()
            ),
        ));
    }
    for i in 0..array.length() {
        let byte = bytes.get(i).copied().unwrap_or(0);
        if let Some(LogixType::Atomic(v)) = array.element_mut(i) {
            *v = AtomicValue::from_bits(v.kind(), u64::from(byte)).with_radix_unchecked(v.radix());
        }
    }
    Ok(())
}

/// Store `bytes` in a string-family structure and set `LEN` to match.
fn fill_string(value: &mut Structure, bytes: &[u8], path: &str) -> Result<()> {
    let data = value
        .member_mut("DATA")
        .and_then(|m| m.value.as_array_mut())
        .ok_or_else(|| L5xError::malformed(path, "string type without a DATA array"))?;
    fill_bytes(data, bytes, path)?;
    if let Some(LogixType::Atomic(len)) = value.member_mut("LEN").map(|m| &mut m.value) {
        let count = i64::try_from(bytes.len()).unwrap_or(i64::MAX);
        *len = AtomicValue::from_i64(len.kind(), count).with_radix_unchecked(len.radix());
    }
    Ok(())
}
