// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structure type definitions and their `DataType` element form.

use super::{AtomicKind, ExternalAccess, Family, TypeClass};
use crate::element::Element;
use crate::error::{L5xError, Result};
use crate::radix::Radix;

/// Declared member of a structure type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDefinition {
    pub name: String,
    pub data_type: String,
    /// Array length; `0` means scalar.
    pub dimension: u32,
    pub radix: Radix,
    pub external_access: ExternalAccess,
    pub description: Option<String>,
    /// Hidden bit-backing storage, excluded from public enumeration.
    pub hidden: bool,
    /// Backing member this boolean is packed into.
    pub target: Option<String>,
    pub bit_number: Option<u8>,
}

impl MemberDefinition {
    /// Scalar member with the default radix of its type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        let radix = AtomicKind::from_name(&data_type).map_or(Radix::NullType, AtomicKind::default_radix);
        Self {
            name: name.into(),
            data_type,
            dimension: 0,
            radix,
            external_access: ExternalAccess::default(),
            description: None,
            hidden: false,
            target: None,
            bit_number: None,
        }
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: u32) -> Self {
        self.dimension = dimension;
        self
    }

    /// Radix compatibility is checked when the owning definition is expanded.
    #[must_use]
    pub fn with_radix(mut self, radix: Radix) -> Self {
        self.radix = radix;
        self
    }

    #[must_use]
    pub fn with_external_access(mut self, access: ExternalAccess) -> Self {
        self.external_access = access;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn atomic_kind(&self) -> Option<AtomicKind> {
        AtomicKind::from_name(&self.data_type)
    }

    /// Scalar `BOOL`/`BIT` member.
    pub fn is_boolean(&self) -> bool {
        self.dimension == 0 && self.atomic_kind() == Some(AtomicKind::Bool)
    }

    fn from_element(node: &Element, path: &str) -> Result<Self> {
        let name = required(node, "Name", path)?;
        let path = format!("{path}/Member[{name}]");
        let data_type = required(node, "DataType", &path)?;

        let mut member = Self::new(name, data_type);
        if let Some(dim) = node.attribute("Dimension") {
            member.dimension = dim
                .trim()
                .parse()
                .map_err(|_| L5xError::malformed(&path, format!("invalid Dimension '{dim}'")))?;
        }
        if let Some(radix) = node.attribute("Radix") {
            let radix: Radix = radix.parse()?;
            if radix != Radix::NullType || member.atomic_kind().is_none() {
                member.radix = radix;
            }
        }
        if let Some(access) = node.attribute("ExternalAccess") {
            member.external_access = ExternalAccess::from_token(access).ok_or_else(|| {
                L5xError::malformed(&path, format!("invalid ExternalAccess '{access}'"))
            })?;
        }
        member.hidden = node
            .attribute("Hidden")
            .is_some_and(|h| h.trim().eq_ignore_ascii_case("true"));
        member.target = node.attribute("Target").map(str::to_string);
        if let Some(bit) = node.attribute("BitNumber") {
            member.bit_number =
                Some(bit.trim().parse().map_err(|_| {
                    L5xError::malformed(&path, format!("invalid BitNumber '{bit}'"))
                })?);
        }
        member.description = description(node);
        Ok(member)
    }

    fn to_element(&self) -> Element {
        let data_type = if self.target.is_some() && self.is_boolean() {
            "BIT"
        } else {
            self.data_type.as_str()
        };
        let mut el = Element::new("Member")
            .with_attribute("Name", &self.name)
            .with_attribute("DataType", data_type)
            .with_attribute("Dimension", self.dimension.to_string())
            .with_attribute("Radix", self.radix.token())
            .with_attribute("Hidden", if self.hidden { "true" } else { "false" });
        if let Some(target) = &self.target {
            el.set_attribute("Target", target);
        }
        if let Some(bit) = self.bit_number {
            el.set_attribute("BitNumber", bit.to_string());
        }
        el.set_attribute("ExternalAccess", self.external_access.token());
        if let Some(desc) = &self.description {
            el.push(Element::new("Description").with_text(desc));
        }
        el
    }
}

/// Shape of a structure type, shared read-only by every value built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub family: Family,
    pub class: TypeClass,
    pub description: Option<String>,
    pub members: Vec<MemberDefinition>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, class: TypeClass) -> Self {
        Self {
            name: name.into(),
            family: Family::NoFamily,
            class,
            description: None,
            members: Vec::new(),
        }
    }

    /// User-class definition, the common case for `DataTypes` entries.
    pub fn user(name: impl Into<String>) -> Self {
        Self::new(name, TypeClass::User)
    }

    #[must_use]
    pub fn member(mut self, member: MemberDefinition) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Members visible to callers (hidden backing members excluded).
    pub fn public_members(&self) -> impl Iterator<Item = &MemberDefinition> {
        self.members.iter().filter(|m| !m.hidden)
    }

    pub fn hidden_members(&self) -> impl Iterator<Item = &MemberDefinition> {
        self.members.iter().filter(|m| m.hidden)
    }

    /// Case-insensitive member lookup, hidden members included.
    pub fn find_member(&self, name: &str) -> Option<&MemberDefinition> {
        self.members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Same name and same ordered (name, type, dimension) of public members.
    /// Descriptions and hidden backing members are ignored.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.public_members().count() == other.public_members().count()
            && self
                .public_members()
                .zip(other.public_members())
                .all(|(a, b)| {
                    a.name.eq_ignore_ascii_case(&b.name)
                        && same_type_name(&a.data_type, &b.data_type)
                        && a.dimension == b.dimension
                })
    }

    /// Read a `DataType` element.
    pub fn from_element(node: &Element) -> Result<Self> {
        if node.name() != "DataType" {
            return Err(L5xError::malformed(
                node.name(),
                "expected a DataType element",
            ));
        }
        let name = required(node, "Name", "DataType")?;
        let path = format!("DataType[{name}]");

        let mut def = Self::new(
            name,
            node.attribute("Class")
                .map_or(TypeClass::User, TypeClass::from_token),
        );
        def.family = node
            .attribute("Family")
            .map_or(Family::NoFamily, Family::from_token);
        def.description = description(node);

        if let Some(members) = node.child("Members") {
            for member in members.children_named("Member") {
                def.members.push(MemberDefinition::from_element(member, &path)?);
            }
        }
        Ok(def)
    }

    /// Write the `DataType` element, hidden backing members included.
    pub fn to_element(&self) -> Element {
        let mut el = Element::new("DataType")
            .with_attribute("Name", &self.name)
            .with_attribute("Family", self.family.token())
            .with_attribute("Class", self.class.token());
        if let Some(desc) = &self.description {
            el.push(Element::new("Description").with_text(desc));
        }
        let mut members = Element::new("Members");
        for member in &self.members {
            members.push(member.to_element());
        }
        el.push(members);
        el
    }
}

/// `BIT` and `BOOL` name the same member type.
pub(crate) fn same_type_name(a: &str, b: &str) -> bool {
    match (AtomicKind::from_name(a), AtomicKind::from_name(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a.eq_ignore_ascii_case(b),
    }
}

pub(crate) fn required<'e>(node: &'e Element, attr: &str, path: &str) -> Result<&'e str> {
    node.attribute(attr)
        .ok_or_else(|| L5xError::malformed(path, format!("missing {attr} attribute")))
}

pub(crate) fn description(node: &Element) -> Option<String> {
    node.child("Description")
        .and_then(Element::text)
        .map(str::to_string)
}
