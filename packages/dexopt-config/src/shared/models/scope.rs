//! Class scope
//!
//! A `Scope` is the set of classes a pipeline run operates on. Besides the
//! class list it keeps an index of every type it has seen (defined classes,
//! supertypes and annotation types), which is what name resolution consults.

use super::{DexClass, DexType};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Scope {
    classes: Vec<DexClass>,
    known_types: HashMap<String, DexType>,
}

impl Scope {
    pub fn new(classes: Vec<DexClass>) -> Self {
        let mut scope = Self::default();
        for cls in classes {
            scope.add_class(cls);
        }
        scope
    }

    pub fn add_class(&mut self, cls: DexClass) {
        let referenced = std::iter::once(&cls.ty)
            .chain(cls.supertypes())
            .chain(cls.annotations.iter())
            .chain(cls.fields.iter().flat_map(|f| f.annotations.iter()))
            .chain(cls.methods.iter().flat_map(|m| m.annotations.iter()));
        for ty in referenced {
            self.known_types
                .entry(ty.descriptor().to_string())
                .or_insert_with(|| ty.clone());
        }
        self.classes.push(cls);
    }

    pub fn classes(&self) -> &[DexClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Resolve a type name to a known type identity
    ///
    /// Accepts internal descriptors (`Lcom/foo/Anno;`) and java names
    /// (`com.foo.Anno`). Returns `None` for types the scope never mentions.
    pub fn resolve_type(&self, name: &str) -> Option<DexType> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if let Some(ty) = self.known_types.get(name) {
            return Some(ty.clone());
        }
        let descriptor = super::java_to_descriptor(name);
        self.known_types.get(&descriptor).cloned()
    }
}
