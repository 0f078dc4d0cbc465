// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structure expansion and instantiation.
//!
//! [`StructureBuilder::expand`] turns a declared definition into the shape the
//! registry shares: names validated, member names unique, radices checked and
//! one hidden `SINT` backing member synthesized for every boolean of a
//! user-class structure that does not already declare its `Target`.
//!
//! [`StructureBuilder::build`] creates a fresh default value tree for a
//! definition, resolving nested member types through a [`TypeRegistry`].

use crate::error::{L5xError, Result};
use crate::names;
use crate::radix::Radix;
use crate::registry::TypeRegistry;
use crate::types::{
    too_many_elements, Array, AtomicKind, AtomicValue, DataType, Dimensions, LogixType, Member,
    MemberDefinition, Structure, TypeClass, TypeDefinition,
};
use std::collections::HashSet;

/// Prefix of synthesized backing member names.
pub const BACKING_PREFIX: &str = "ZZZZZZZZZZ";

/// Builds value trees from definitions.
pub struct StructureBuilder<'r, 'a> {
    registry: &'r TypeRegistry<'a>,
}

impl<'r, 'a> StructureBuilder<'r, 'a> {
    pub fn new(registry: &'r TypeRegistry<'a>) -> Self {
        Self { registry }
    }

    /// Validate `definition` and synthesize its backing members.
    ///
    /// Expanding an already expanded definition returns it unchanged.
    pub fn expand(definition: TypeDefinition) -> Result<TypeDefinition> {
        let checked_names = matches!(definition.class, TypeClass::User | TypeClass::AddOnDefined);
        if checked_names {
            names::validate(&definition.name)?;
        }

        let mut seen = HashSet::with_capacity(definition.members.len());
        for member in &definition.members {
            if checked_names && !member.hidden {
                names::validate(&member.name)?;
            }
            if !seen.insert(names::key(&member.name)) {
                return Err(L5xError::NameCollision {
                    scope: definition.name.clone(),
                    name: member.name.clone(),
                });
            }
            check_radix(member)?;
        }

        for member in &definition.members {
            if let Some(target) = &member.target {
                if !seen.contains(&names::key(target)) {
                    return Err(L5xError::UnknownMember {
                        structure: definition.name.clone(),
                        member: target.clone(),
                    });
                }
            }
        }

        if definition.class != TypeClass::User {
            return Ok(definition);
        }

        let TypeDefinition {
            name,
            family,
            class,
            description,
            members,
        } = definition;

        let mut expanded = Vec::with_capacity(members.len() * 2);
        let mut synthesized = 0usize;
        for mut member in members {
            if member.is_boolean() && member.target.is_none() && !member.hidden {
                let backing_name = format!("{BACKING_PREFIX}{name}{synthesized}");
                if !seen.insert(names::key(&backing_name)) {
                    return Err(L5xError::NameCollision {
                        scope: name,
                        name: backing_name,
                    });
                }
                synthesized += 1;

                let mut backing = MemberDefinition::new(backing_name.clone(), "SINT");
                backing.hidden = true;
                backing.external_access = member.external_access;
                expanded.push(backing);

                member.target = Some(backing_name);
                member.bit_number = Some(0);
            }
            expanded.push(member);
        }

        if synthesized > 0 {
            log::debug!("[StructureBuilder] {name}: synthesized {synthesized} backing members");
        }

        Ok(TypeDefinition {
            name,
            family,
            class,
            description,
            members: expanded,
        })
    }

    /// Fresh default value tree for `definition`.
    pub fn build(&self, definition: &TypeDefinition) -> Result<Structure> {
        let members = definition
            .members
            .iter()
            .map(|m| Ok(Member::from_definition(m, self.instantiate_member(m)?)))
            .collect::<Result<Vec<_>>>()?;
        Structure::new(
            definition.name.clone(),
            definition.family,
            definition.class,
            members,
        )
    }

    /// Default value for one member (an array when its dimension is non-zero).
    pub fn instantiate_member(&self, member: &MemberDefinition) -> Result<LogixType> {
        if member.dimension == 0 {
            return self.instantiate_type(&member.data_type, member.radix);
        }
        self.instantiate_array(
            &member.data_type,
            Dimensions::single(member.dimension),
            member.radix,
        )
    }

    /// Default array. Elements of an unresolved type are `Undefined`, so the
    /// array keeps its shape.
    pub fn instantiate_array(
        &self,
        element_type: &str,
        dimensions: Dimensions,
        radix: Radix,
    ) -> Result<LogixType> {
        let len = dimensions
            .len()
            .ok_or_else(|| too_many_elements(format!("{element_type}[{dimensions}]")))?;
        let first = self.instantiate_type(element_type, radix)?;
        let elements = vec![first; len];
        Ok(LogixType::Array(Array::new(
            first_type_name(&elements, element_type),
            dimensions,
            radix,
            elements,
        )?))
    }

    /// Default scalar value of a type name in `radix` (where compatible).
    pub fn instantiate_type(&self, type_name: &str, radix: Radix) -> Result<LogixType> {
        let value = match self.registry.resolve(type_name)? {
            DataType::Atomic(kind) => LogixType::Atomic(zero_in(kind, radix)),
            DataType::Structure(def) => LogixType::Structure(self.build(&def)?),
            DataType::Undefined(name) => LogixType::Undefined { name },
        };
        Ok(value)
    }
}

fn zero_in(kind: AtomicKind, radix: Radix) -> AtomicValue {
    AtomicValue::zero(kind)
        .with_radix(radix)
        .unwrap_or_else(|_| AtomicValue::zero(kind))
}

/// Canonical element type name (`BOOL` for `BIT`, registry spelling for
/// structures).
fn first_type_name(elements: &[LogixType], fallback: &str) -> String {
    elements
        .first()
        .map_or(fallback, LogixType::type_name)
        .to_string()
}

fn check_radix(member: &MemberDefinition) -> Result<()> {
    match member.atomic_kind() {
        Some(kind) => member.radix.check(kind),
        None if member.radix == Radix::NullType => Ok(()),
        None => Err(L5xError::RadixUnsupported {
            radix: member.radix.token().to_string(),
            kind: member.data_type.clone(),
        }),
    }
}
