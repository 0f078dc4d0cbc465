// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in structure types every controller knows.

use super::{Family, MemberDefinition, TypeClass, TypeDefinition};
use crate::radix::Radix;

/// Names served by [`predefined`], in registry lookup order.
pub const PREDEFINED_NAMES: [&str; 4] = ["TIMER", "COUNTER", "CONTROL", "STRING"];

/// Characters stored by the default `STRING` type.
pub const STRING_CAPACITY: u32 = 82;

/// Definition of a built-in structure, by case-insensitive name.
pub fn predefined(name: &str) -> Option<TypeDefinition> {
    let name = PREDEFINED_NAMES
        .into_iter()
        .find(|n| n.eq_ignore_ascii_case(name))?;
    let def = match name {
        "TIMER" => with_status(name, &["PRE", "ACC"], &["EN", "TT", "DN"]),
        "COUNTER" => with_status(name, &["PRE", "ACC"], &["CU", "CD", "DN", "OV", "UN"]),
        "CONTROL" => with_status(
            name,
            &["LEN", "POS"],
            &["EN", "EU", "DN", "EM", "ER", "UL", "IN", "FD"],
        ),
        _ => {
            let mut def = TypeDefinition::new(name, TypeClass::Predefined)
                .member(MemberDefinition::new("LEN", "DINT"))
                .member(
                    MemberDefinition::new("DATA", "SINT")
                        .with_dimension(STRING_CAPACITY)
                        .with_radix(Radix::Ascii),
                );
            def.family = Family::StringFamily;
            def
        }
    };
    Some(def)
}

fn with_status(name: &str, words: &[&str], flags: &[&str]) -> TypeDefinition {
    let mut def = TypeDefinition::new(name, TypeClass::Predefined);
    for word in words {
        def = def.member(MemberDefinition::new(*word, "DINT"));
    }
    for flag in flags {
        def = def.member(MemberDefinition::new(*flag, "BOOL"));
    }
    def
}
