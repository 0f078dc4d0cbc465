// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Definitions read from module data and Add-On Instructions.

use crate::element::Element;
use crate::error::{L5xError, Result};
use crate::radix::Radix;
use crate::types::definition::{description, required};
use crate::types::{Dimensions, ExternalAccess, MemberDefinition, TypeClass, TypeDefinition};

/// Infer a module-defined type from the shape of its decorated data.
///
/// `DataValueMember` children become atomic members, `StructureMember`
/// children nested structures and `ArrayMember` children arrays sized by
/// their `Dimensions`.
pub(crate) fn definition_from_data(node: &Element) -> Result<TypeDefinition> {
    let name = required(node, "DataType", node.name())?;
    let path = format!("{}[{name}]", node.name());
    let mut def = TypeDefinition::new(name, TypeClass::ProductDefined);

    for child in node.children() {
        let member = match child.name() {
            "DataValueMember" | "StructureMember" => {
                let member_name = required(child, "Name", &path)?;
                let data_type = required(child, "DataType", &path)?;
                with_radix(MemberDefinition::new(member_name, data_type), child)?
            }
            "ArrayMember" => {
                let member_name = required(child, "Name", &path)?;
                let data_type = required(child, "DataType", &path)?;
                let dims = required(child, "Dimensions", &path)?;
                let dims = Dimensions::parse(dims).ok_or_else(|| {
                    L5xError::malformed(
                        format!("{path}/ArrayMember[{member_name}]"),
                        format!("invalid Dimensions '{dims}'"),
                    )
                })?;
                let length = dims
                    .len()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| {
                        L5xError::malformed(&path, format!("array {member_name} is too large"))
                    })?;
                with_radix(
                    MemberDefinition::new(member_name, data_type).with_dimension(length),
                    child,
                )?
            }
            other => {
                log::debug!("[TypeRegistry] {path}: skipping <{other}> while inferring members");
                continue;
            }
        };
        def.members.push(member);
    }
    Ok(def)
}

/// Data layout of an Add-On Instruction: its non-`InOut` parameters followed
/// by its local tags.
pub(crate) fn definition_from_aoi(node: &Element) -> Result<TypeDefinition> {
    let name = required(node, "Name", "AddOnInstructionDefinition")?;
    let path = format!("AddOnInstructionDefinition[{name}]");
    let mut def = TypeDefinition::new(name, TypeClass::AddOnDefined);
    def.description = description(node);

    let parameters = node
        .child("Parameters")
        .into_iter()
        .flat_map(|p| p.children_named("Parameter"))
        .filter(|p| {
            !p.attribute("Usage")
                .is_some_and(|u| u.eq_ignore_ascii_case("InOut"))
        });
    let locals = node
        .child("LocalTags")
        .into_iter()
        .flat_map(|l| l.children_named("LocalTag"));

    for item in parameters.chain(locals) {
        let member_name = required(item, "Name", &path)?;
        let data_type = required(item, "DataType", &path)?;
        let mut member = with_radix(MemberDefinition::new(member_name, data_type), item)?;
        if let Some(dim) = item.attribute("Dimension").or_else(|| item.attribute("Dimensions")) {
            let dims = Dimensions::parse(dim).ok_or_else(|| {
                L5xError::malformed(
                    format!("{path}/{}[{member_name}]", item.name()),
                    format!("invalid Dimension '{dim}'"),
                )
            })?;
            member.dimension = dims
                .len()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    L5xError::malformed(&path, format!("array {member_name} is too large"))
                })?;
        }
        if let Some(access) = item.attribute("ExternalAccess").and_then(ExternalAccess::from_token) {
            member.external_access = access;
        }
        member.description = description(item);
        def.members.push(member);
    }
    Ok(def)
}

fn with_radix(member: MemberDefinition, node: &Element) -> Result<MemberDefinition> {
    match node.attribute("Radix") {
        Some(token) => {
            let radix: Radix = token.parse()?;
            if radix == Radix::NullType && member.atomic_kind().is_some() {
                return Ok(member);
            }
            Ok(member.with_radix(radix))
        }
        None => Ok(member),
    }
}
