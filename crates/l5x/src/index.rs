// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name → definition-node index over a parsed document.
//!
//! Built in one pass over the three definition regions, in registry priority:
//!
//! 1. `DataTypes/DataType` (explicit user definitions)
//! 2. `Modules/Module` (structures named by module connection/config data)
//! 3. `AddOnInstructionDefinitions/AddOnInstructionDefinition`
//!
//! The first occurrence of a (case-insensitive) name wins. The index is
//! immutable once built.

use crate::element::{Document, Element};
use crate::names;
use std::collections::HashMap;

/// Region a component was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentSource {
    DataType,
    /// `Structure`/`StructureMember` data under a module; the node is the
    /// first data element seen with that `DataType`.
    Module,
    AddOnInstruction,
}

/// Indexed definition node.
#[derive(Debug, Clone, Copy)]
pub struct Component<'a> {
    pub source: ComponentSource,
    pub node: &'a Element,
}

/// Case-insensitive lookup of definition nodes.
#[derive(Debug, Default)]
pub struct ComponentIndex<'a> {
    entries: HashMap<String, Component<'a>>,
}

impl<'a> ComponentIndex<'a> {
    /// Index with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(document: &'a Document) -> Self {
        let mut index = Self::empty();

        for node in document.region("DataTypes", "DataType") {
            if let Some(name) = node.attribute("Name") {
                index.insert(name, ComponentSource::DataType, node);
            }
        }

        for module in document.region("Modules", "Module") {
            for node in module.descendants() {
                if !matches!(node.name(), "Structure" | "StructureMember") {
                    continue;
                }
                if let Some(name) = node.attribute("DataType") {
                    index.insert(name, ComponentSource::Module, node);
                }
            }
        }

        for node in document.region("AddOnInstructionDefinitions", "AddOnInstructionDefinition") {
            if let Some(name) = node.attribute("Name") {
                index.insert(name, ComponentSource::AddOnInstruction, node);
            }
        }

        log::debug!("[ComponentIndex] indexed {} components", index.len());
        index
    }

    fn insert(&mut self, name: &str, source: ComponentSource, node: &'a Element) {
        let key = names::key(name);
        if let Some(existing) = self.entries.get(&key) {
            // Module data repeats the same type on every connection.
            if !(existing.source == ComponentSource::Module && source == ComponentSource::Module) {
                log::debug!(
                    "[ComponentIndex] ignoring duplicate {name} from {source:?}, first seen in {:?}",
                    existing.source
                );
            }
            return;
        }
        self.entries.insert(key, Component { source, node });
    }

    pub fn lookup(&self, name: &str) -> Option<Component<'a>> {
        self.entries.get(&names::key(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&names::key(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexed names as spelled in the document, sorted case-insensitively.
    pub fn names(&self) -> Vec<&'a str> {
        let mut out: Vec<&'a str> = self
            .entries
            .values()
            .filter_map(|c| match c.source {
                ComponentSource::Module => c.node.attribute("DataType"),
                _ => c.node.attribute("Name"),
            })
            .collect();
        out.sort_by_key(|n| n.to_ascii_uppercase());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
<RSLogix5000Content SchemaRevision="1.0">
  <Controller Name="Line1">
    <DataTypes>
      <DataType Name="MOTOR" Class="User"/>
      <DataType Name="motor" Class="User"/>
    </DataTypes>
    <Modules>
      <Module Name="Rack">
        <Communications>
          <Connections>
            <Connection Name="Standard">
              <InputTag>
                <Data Format="Decorated">
                  <Structure DataType="AB:1756_DI:I:0">
                    <StructureMember Name="Status" DataType="AB:1756_DI_Status:I:0"/>
                  </Structure>
                </Data>
              </InputTag>
            </Connection>
          </Connections>
        </Communications>
      </Module>
    </Modules>
    <AddOnInstructionDefinitions>
      <AddOnInstructionDefinition Name="Valve"/>
      <AddOnInstructionDefinition Name="MOTOR"/>
    </AddOnInstructionDefinitions>
  </Controller>
</RSLogix5000Content>
"#;

    #[test]
    fn first_occurrence_wins() {
        let doc = Document::parse(DOC).expect("parse");
        let index = ComponentIndex::build(&doc);

        let motor = index.lookup("Motor").expect("MOTOR");
        assert_eq!(motor.source, ComponentSource::DataType);
        assert_eq!(motor.node.attribute("Name"), Some("MOTOR"));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn module_data_types_are_indexed() {
        let doc = Document::parse(DOC).expect("parse");
        let index = ComponentIndex::build(&doc);

        let io = index.lookup("ab:1756_di:i:0").expect("module type");
        assert_eq!(io.source, ComponentSource::Module);
        assert_eq!(io.node.name(), "Structure");
        assert!(index.contains("AB:1756_DI_Status:I:0"));
        assert_eq!(
            index.lookup("VALVE").map(|c| c.source),
            Some(ComponentSource::AddOnInstruction)
        );
    }

    #[test]
    fn names_are_sorted() {
        let doc = Document::parse(DOC).expect("parse");
        let index = ComponentIndex::build(&doc);
        assert_eq!(
            index.names(),
            ["AB:1756_DI:I:0", "AB:1756_DI_Status:I:0", "MOTOR", "Valve"]
        );
    }

    #[test]
    fn empty_index() {
        let index = ComponentIndex::empty();
        assert!(index.is_empty());
        assert!(index.lookup("MOTOR").is_none());
    }
}
