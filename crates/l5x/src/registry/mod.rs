// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-name resolution with per-document memoization.
//!
//! A [`TypeRegistry`] answers "what is type `X`?" for one document. Lookup
//! order, first match wins:
//!
//! 1. atomic kinds (`BOOL`, `DINT`, ...)
//! 2. predefined structures (`TIMER`, `COUNTER`, `CONTROL`, `STRING`)
//! 3. explicit definitions (`DataTypes`, plus [`TypeRegistry::register`])
//! 4. structures named by module connection/config data
//! 5. Add-On Instruction parameter structures
//!
//! Anything else is [`DataType::Undefined`]. Structure definitions are built
//! once per case-insensitive name and shared as `Arc<TypeDefinition>`.
//! Concurrent first lookups use the double-checked pattern: peek under the
//! read lock, then re-check under the write lock before building.
//!
//! Building a definition also builds every structure it reaches, depth first
//! with an explicit stack, so a cycle of any length is reported as
//! [`L5xError::CircularReference`] without recursing. Structures nested more
//! than [`MAX_NESTING_DEPTH`] levels deep are rejected with
//! [`L5xError::NestingTooDeep`]; value trees are walked recursively, so this
//! bounds every walk over an instantiated or decoded value.

mod sources;

use crate::builder::StructureBuilder;
use crate::element::Document;
use crate::error::{L5xError, Result};
use crate::index::{ComponentIndex, ComponentSource};
use crate::names;
use crate::radix::Radix;
use crate::types::{predefined, AtomicKind, DataType, LogixType, TypeDefinition};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Resolution statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    /// Structure lookups served from the cache.
    pub hits: u64,
    /// Structure lookups that had to consult the definition sources.
    pub misses: u64,
    /// Definitions built and inserted (dependencies included).
    pub builds: u64,
}

/// Deepest structure nesting a definition may have. A structure of atomic
/// members is one level deep.
pub const MAX_NESTING_DEPTH: usize = 64;

#[derive(Default)]
struct Cache {
    defs: HashMap<String, Arc<TypeDefinition>>,
    /// Nesting depth of every cached definition.
    depths: HashMap<String, usize>,
}

struct Frame {
    def: Arc<TypeDefinition>,
    next: usize,
    fresh: bool,
}

/// Per-document type registry.
pub struct TypeRegistry<'a> {
    index: ComponentIndex<'a>,
    cache: RwLock<Cache>,
    stats: RwLock<LookupStats>,
}

impl TypeRegistry<'static> {
    /// Registry with only built-in and registered types.
    #[must_use]
    pub fn new() -> Self {
        Self::with_index(ComponentIndex::empty())
    }
}

impl Default for TypeRegistry<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TypeRegistry<'a> {
    /// Registry over the definitions of `document`.
    pub fn from_document(document: &'a Document) -> Self {
        Self::with_index(ComponentIndex::build(document))
    }

    pub fn with_index(index: ComponentIndex<'a>) -> Self {
        Self {
            index,
            cache: RwLock::new(Cache::default()),
            stats: RwLock::new(LookupStats::default()),
        }
    }

    pub fn index(&self) -> &ComponentIndex<'a> {
        &self.index
    }

    /// Resolve a type name. Unknown names are `Undefined`, never an error.
    pub fn resolve(&self, name: &str) -> Result<DataType> {
        if let Some(kind) = AtomicKind::from_name(name) {
            return Ok(DataType::Atomic(kind));
        }

        let key = names::key(name);
        let cached = self.cache.read().defs.get(&key).cloned();
        if let Some(def) = cached {
            self.record_hit();
            return Ok(DataType::Structure(def));
        }

        let mut cache = self.cache.write();
        if let Some(def) = cache.defs.get(&key) {
            self.record_hit();
            return Ok(DataType::Structure(Arc::clone(def)));
        }

        self.stats.write().misses += 1;
        let Some(def) = self.source_definition(name)? else {
            log::debug!("[TypeRegistry] {name} is undefined");
            return Ok(DataType::Undefined(name.to_string()));
        };
        let def = StructureBuilder::expand(def)?;
        let built = self.build_locked(&mut cache, def, false)?;
        Ok(DataType::Structure(built))
    }

    /// Like [`resolve`](Self::resolve), but an unknown name is
    /// [`L5xError::TypeUnresolved`].
    pub fn require(&self, name: &str) -> Result<DataType> {
        match self.resolve(name)? {
            DataType::Undefined(name) => Err(L5xError::TypeUnresolved { name }),
            resolved => Ok(resolved),
        }
    }

    /// Add a definition that no document region carries.
    ///
    /// The name must not match any atomic, predefined, indexed or already
    /// registered type, ignoring case.
    pub fn register(&self, definition: TypeDefinition) -> Result<Arc<TypeDefinition>> {
        let name = definition.name.clone();
        let taken = AtomicKind::from_name(&name).is_some()
            || predefined(&name).is_some()
            || self.index.contains(&name);
        if taken {
            return Err(collision(&name));
        }

        let def = StructureBuilder::expand(definition)?;
        let mut cache = self.cache.write();
        if cache.defs.contains_key(&names::key(&name)) {
            return Err(collision(&name));
        }
        self.build_locked(&mut cache, def, true)
    }

    /// Fresh default value of a type.
    pub fn instantiate(&self, name: &str) -> Result<LogixType> {
        let radix = AtomicKind::from_name(name)
            .map_or(Radix::NullType, AtomicKind::default_radix);
        StructureBuilder::new(self).instantiate_type(name, radix)
    }

    /// Resolve every indexed name, then return all definitions.
    pub fn resolve_all(&self) -> Result<Vec<Arc<TypeDefinition>>> {
        for name in self.index.names() {
            self.resolve(name)?;
        }
        Ok(self.definitions())
    }

    /// Definitions built so far, sorted by name.
    pub fn definitions(&self) -> Vec<Arc<TypeDefinition>> {
        let mut defs: Vec<_> = self.cache.read().defs.values().cloned().collect();
        defs.sort_by_key(|d| names::key(&d.name));
        defs
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    fn record_hit(&self) {
        self.stats.write().hits += 1;
    }

    /// Declared (unexpanded) definition of a structure name, if any source
    /// has one.
    fn source_definition(&self, name: &str) -> Result<Option<TypeDefinition>> {
        if let Some(def) = predefined(name) {
            return Ok(Some(def));
        }
        let Some(component) = self.index.lookup(name) else {
            return Ok(None);
        };
        let def = match component.source {
            ComponentSource::DataType => TypeDefinition::from_element(component.node)?,
            ComponentSource::Module => sources::definition_from_data(component.node)?,
            ComponentSource::AddOnInstruction => sources::definition_from_aoi(component.node)?,
        };
        Ok(Some(def))
    }

    /// Insert `root` and every structure it reaches into `cache`.
    ///
    /// Dependencies are inserted before their dependents. Cached definitions
    /// are trusted as acyclic unless `walk_cached` is set, which `register`
    /// needs because a new definition can close a cycle through cached ones.
    fn build_locked(
        &self,
        cache: &mut Cache,
        root: TypeDefinition,
        walk_cached: bool,
    ) -> Result<Arc<TypeDefinition>> {
        let root_key = names::key(&root.name);
        let mut stack = vec![Frame {
            def: Arc::new(root),
            next: 0,
            fresh: true,
        }];
        let mut on_path: HashSet<String> = HashSet::from([root_key.clone()]);
        let mut done: HashSet<String> = HashSet::new();

        while let Some(frame) = stack.last_mut() {
            if let Some(member) = frame.def.members.get(frame.next) {
                frame.next += 1;
                let type_name = member.data_type.clone();
                if AtomicKind::from_name(&type_name).is_some() {
                    continue;
                }
                let key = names::key(&type_name);
                if on_path.contains(&key) {
                    let mut chain: Vec<String> =
                        stack.iter().map(|f| f.def.name.clone()).collect();
                    chain.push(type_name);
                    return Err(L5xError::CircularReference { chain });
                }
                if done.contains(&key) {
                    continue;
                }
                let next = match cache.defs.get(&key) {
                    Some(def) if walk_cached => Frame {
                        def: Arc::clone(def),
                        next: 0,
                        fresh: false,
                    },
                    Some(_) => continue,
                    None => match self.source_definition(&type_name)? {
                        Some(def) => Frame {
                            def: Arc::new(StructureBuilder::expand(def)?),
                            next: 0,
                            fresh: true,
                        },
                        None => continue,
                    },
                };
                on_path.insert(key);
                stack.push(next);
                continue;
            }

            let Some(frame) = stack.pop() else { break };
            let key = names::key(&frame.def.name);
            on_path.remove(&key);
            done.insert(key.clone());
            if frame.fresh {
                let depth = 1 + frame
                    .def
                    .members
                    .iter()
                    .filter_map(|m| cache.depths.get(&names::key(&m.data_type)))
                    .copied()
                    .max()
                    .unwrap_or(0);
                if depth > MAX_NESTING_DEPTH {
                    return Err(L5xError::NestingTooDeep {
                        name: frame.def.name.clone(),
                        limit: MAX_NESTING_DEPTH,
                    });
                }
                log::debug!(
                    "[TypeRegistry] built {} ({} members, depth {depth})",
                    frame.def.name,
                    frame.def.members.len()
                );
                self.stats.write().builds += 1;
                cache.depths.insert(key.clone(), depth);
                cache.defs.insert(key, Arc::clone(&frame.def));
            }
        }

        cache
            .defs
            .get(&root_key)
            .cloned()
            .ok_or_else(|| L5xError::TypeUnresolved {
                name: root_key.clone(),
            })
    }
}

fn collision(name: &str) -> L5xError {
    L5xError::NameCollision {
        scope: "registry".to_string(),
        name: name.to_string(),
    }
}
