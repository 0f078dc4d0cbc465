// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value trees.
//!
//! A [`LogixType`] is one node of a decoded (or freshly instantiated) value:
//! an atomic scalar, a structure of named members, an array of same-typed
//! elements, or a placeholder for a type name nothing could resolve.
//!
//! Structures keep their hidden backing members next to the public ones.
//! [`Structure::members`] never yields them; [`Structure::all_members`] does,
//! for the encoder.

use super::definition::same_type_name;
use super::dimensions::too_many_elements;
use super::{AtomicKind, AtomicValue, Dimensions, ExternalAccess, Family, MemberDefinition, TypeClass};
use crate::error::{L5xError, Result};
use crate::radix::Radix;

/// One node of a value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LogixType {
    Atomic(AtomicValue),
    Structure(Structure),
    Array(Array),
    /// A type name that no definition source knows.
    Undefined { name: String },
}

impl LogixType {
    /// Name of the value's type (`DINT`, `MOTOR`, element type for arrays).
    pub fn type_name(&self) -> &str {
        match self {
            Self::Atomic(v) => v.kind().name(),
            Self::Structure(s) => &s.name,
            Self::Array(a) => &a.element_type,
            Self::Undefined { name } => name,
        }
    }

    pub fn as_atomic(&self) -> Option<&AtomicValue> {
        match self {
            Self::Atomic(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&Structure> {
        match self {
            Self::Structure(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_structure_mut(&mut self) -> Option<&mut Structure> {
        match self {
            Self::Structure(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined { .. })
    }

    /// Re-apply `radix` to atomic leaves where it fits.
    fn adopt_radix(&mut self, radix: Radix) {
        match self {
            Self::Atomic(v) if radix.is_compatible(v.kind()) => {
                *v = v.with_radix_unchecked(radix);
            }
            Self::Array(a) => {
                for el in &mut a.elements {
                    el.adopt_radix(radix);
                }
            }
            _ => {}
        }
    }
}

/// Named member of a structure value.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub data_type: String,
    pub dimension: u32,
    radix: Radix,
    pub external_access: ExternalAccess,
    pub description: Option<String>,
    pub hidden: bool,
    pub target: Option<String>,
    pub bit_number: Option<u8>,
    pub value: LogixType,
}

impl Member {
    /// Pair a definition with a value built for it.
    pub fn from_definition(def: &MemberDefinition, value: LogixType) -> Self {
        Self {
            name: def.name.clone(),
            data_type: def.data_type.clone(),
            dimension: def.dimension,
            radix: def.radix,
            external_access: def.external_access,
            description: def.description.clone(),
            hidden: def.hidden,
            target: def.target.clone(),
            bit_number: def.bit_number,
            value,
        }
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    /// Change the presentation radix of this member and its value.
    ///
    /// Atomic values (and atomic array elements) must be compatible with
    /// `radix`; structure-typed members only accept `NullType`.
    pub fn set_radix(&mut self, radix: Radix) -> Result<()> {
        match &mut self.value {
            LogixType::Atomic(v) => *v = v.with_radix(radix)?,
            LogixType::Array(a) => a.set_radix(radix)?,
            LogixType::Structure(_) | LogixType::Undefined { .. } => {
                if radix != Radix::NullType {
                    return Err(L5xError::RadixUnsupported {
                        radix: radix.token().to_string(),
                        kind: self.data_type.clone(),
                    });
                }
            }
        }
        self.radix = radix;
        Ok(())
    }

    /// Scalar `BOOL`/`BIT` member.
    pub fn is_boolean(&self) -> bool {
        self.dimension == 0
            && matches!(&self.value, LogixType::Atomic(v) if v.kind() == AtomicKind::Bool)
    }
}

/// Structure value.
#[derive(Debug, Clone)]
pub struct Structure {
    pub name: String,
    pub family: Family,
    pub class: TypeClass,
    members: Vec<Member>,
}

impl Structure {
    /// Member names must be unique, ignoring case.
    pub fn new(
        name: impl Into<String>,
        family: Family,
        class: TypeClass,
        members: Vec<Member>,
    ) -> Result<Self> {
        let name = name.into();
        for (i, member) in members.iter().enumerate() {
            if members[..i]
                .iter()
                .any(|m| m.name.eq_ignore_ascii_case(&member.name))
            {
                return Err(L5xError::NameCollision {
                    scope: name,
                    name: member.name.clone(),
                });
            }
        }
        Ok(Self {
            name,
            family,
            class,
            members,
        })
    }

    /// Public members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| !m.hidden)
    }

    /// Every member, hidden backing storage included.
    pub fn all_members(&self) -> &[Member] {
        &self.members
    }

    pub fn hidden_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.hidden)
    }

    /// Case-insensitive lookup.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn get(&self, name: &str) -> Option<&LogixType> {
        self.member(name).map(|m| &m.value)
    }

    /// Replace a member's value. The new value must have the member's type;
    /// it takes on the member's radix where compatible. Writing a packed
    /// boolean refreshes its backing member.
    pub fn set(&mut self, name: &str, value: LogixType) -> Result<()> {
        let structure = self.name.clone();
        let member = self
            .member_mut(name)
            .ok_or_else(|| L5xError::UnknownMember {
                structure,
                member: name.to_string(),
            })?;

        let shape_matches = match (&member.value, &value) {
            (LogixType::Array(a), LogixType::Array(b)) => {
                a.dimensions == b.dimensions && same_type_name(&a.element_type, &b.element_type)
            }
            (LogixType::Array(_), _) | (_, LogixType::Array(_)) => false,
            (current, new) => same_type_name(current.type_name(), new.type_name()),
        };
        if !shape_matches {
            return Err(L5xError::InvalidValue {
                text: value.type_name().to_string(),
                radix: member.radix.token().to_string(),
                kind: member.data_type.clone(),
            });
        }

        let packed = member.target.is_some();
        member.value = value;
        let radix = member.radix;
        member.value.adopt_radix(radix);
        if packed {
            self.sync_backing();
        }
        Ok(())
    }

    /// Byte value of a backing member, packed from the booleans targeting it.
    pub fn packed_backing(&self, backing: &str) -> u64 {
        self.members
            .iter()
            .filter(|m| {
                m.target
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case(backing))
            })
            .filter(|m| m.value.as_atomic().is_some_and(AtomicValue::as_bool))
            .map(|m| 1u64.checked_shl(u32::from(m.bit_number.unwrap_or(0))).unwrap_or(0))
            .fold(0, |acc, bit| acc | bit)
    }

    /// Recompute every hidden backing member from its booleans.
    pub fn sync_backing(&mut self) {
        let packed: Vec<(usize, u64)> = self
            .members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.hidden)
            .map(|(i, m)| (i, self.packed_backing(&m.name)))
            .collect();
        for (i, bits) in packed {
            if let LogixType::Atomic(v) = &mut self.members[i].value {
                *v = AtomicValue::from_bits(v.kind(), bits).with_radix_unchecked(v.radix());
            }
        }
    }

    /// Set the booleans packed into `backing` from its stored byte.
    pub(crate) fn unpack_backing(&mut self, backing: &str) {
        let Some(bits) = self
            .member(backing)
            .and_then(|m| m.value.as_atomic())
            .map(AtomicValue::bits)
        else {
            return;
        };
        for member in &mut self.members {
            let targets = member
                .target
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(backing));
            if !targets {
                continue;
            }
            if let LogixType::Atomic(v) = &mut member.value {
                let bit = bits
                    .checked_shr(u32::from(member.bit_number.unwrap_or(0)))
                    .unwrap_or(0)
                    & 1;
                *v = AtomicValue::from_bits(v.kind(), bit).with_radix_unchecked(v.radix());
            }
        }
    }

    /// Same name and same ordered (name, type, dimension) of public members.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.members().count() == other.members().count()
            && self.members().zip(other.members()).all(|(a, b)| {
                a.name.eq_ignore_ascii_case(&b.name)
                    && same_type_name(&a.data_type, &b.data_type)
                    && a.dimension == b.dimension
            })
    }
}

/// Values compare by type name and public member values; hidden backing
/// members and descriptions do not take part.
impl PartialEq for Structure {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.members().count() == other.members().count()
            && self
                .members()
                .zip(other.members())
                .all(|(a, b)| a.name.eq_ignore_ascii_case(&b.name) && a.value == b.value)
    }
}

/// Array value; elements are stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    element_type: String,
    dimensions: Dimensions,
    radix: Radix,
    elements: Vec<LogixType>,
}

impl Array {
    /// Elements must match the dimensions and share `element_type`. Atomic
    /// elements take on `radix` where compatible.
    pub fn new(
        element_type: impl Into<String>,
        dimensions: Dimensions,
        radix: Radix,
        mut elements: Vec<LogixType>,
    ) -> Result<Self> {
        let element_type = element_type.into();
        let path = format!("{element_type}[{dimensions}]");
        match dimensions.len() {
            Some(len) if len == elements.len() => {}
            Some(len) => {
                return Err(L5xError::malformed(
                    path,
                    format!("expected {len} elements, found {}", elements.len()),
                ));
            }
            None => return Err(too_many_elements(path)),
        }
        if let Some(odd) = elements
            .iter()
            .find(|el| !same_type_name(el.type_name(), &element_type))
        {
            return Err(L5xError::malformed(
                path,
                format!("element of type {} in array of {element_type}", odd.type_name()),
            ));
        }
        for el in &mut elements {
            el.adopt_radix(radix);
        }
        Ok(Self {
            element_type,
            dimensions,
            radix,
            elements,
        })
    }

    pub fn element_type(&self) -> &str {
        &self.element_type
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    pub fn length(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[LogixType] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&LogixType> {
        self.elements.get(index)
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut LogixType> {
        self.elements.get_mut(index)
    }

    fn set_radix(&mut self, radix: Radix) -> Result<()> {
        match AtomicKind::from_name(&self.element_type) {
            Some(kind) => radix.check(kind)?,
            None if radix != Radix::NullType => {
                return Err(L5xError::RadixUnsupported {
                    radix: radix.token().to_string(),
                    kind: self.element_type.clone(),
                });
            }
            None => {}
        }
        for el in &mut self.elements {
            el.adopt_radix(radix);
        }
        self.radix = radix;
        Ok(())
    }
}
