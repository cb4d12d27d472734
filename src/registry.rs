//! Binding registry: target type to its cached binding set

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::debug;

use crate::binding::{FieldBinding, FromXml, ValueKind};
use crate::error::{Error, ErrorKind, Result};

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Validated, immutable bindings of one target type
#[derive(Debug, PartialEq)]
pub struct BindingSet {
    type_name: &'static str,
    bindings: Vec<FieldBinding>,
}

impl BindingSet {
    /// Validate a declared shape
    ///
    /// Rejects empty shapes, XML names claimed twice within the attribute or
    /// child-element namespace, more than one own-text binding, and nested
    /// sources paired with scalar kinds (or the reverse).
    pub fn new(type_name: &'static str, bindings: Vec<FieldBinding>) -> Result<Self> {
        if bindings.is_empty() {
            return Err(Error::mapping(ErrorKind::UnknownBinding { type_name }));
        }

        let mut attributes = Vec::new();
        let mut elements = Vec::new();
        let mut own_text = false;
        for binding in &bindings {
            let nested_kind = matches!(binding.kind, ValueKind::Object(_));
            if binding.source.is_nested() != nested_kind {
                return Err(Error::mapping(ErrorKind::FieldTypeMismatch {
                    field: binding.field,
                    expected: if nested_kind {
                        "scalar"
                    } else {
                        "nested object"
                    },
                }));
            }

            let claimed = match binding.source.xml_name() {
                Some(name) if binding.source.is_attribute() => (&mut attributes, name),
                Some(name) => (&mut elements, name),
                None if own_text => {
                    return Err(Error::mapping(ErrorKind::DuplicateBinding {
                        type_name,
                        name: "#text",
                    }));
                }
                None => {
                    own_text = true;
                    continue;
                }
            };
            let (seen, name) = claimed;
            if seen.contains(&name) {
                return Err(Error::mapping(ErrorKind::DuplicateBinding { type_name, name }));
            }
            seen.push(name);
        }

        Ok(Self {
            type_name,
            bindings,
        })
    }

    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<'a> IntoIterator for &'a BindingSet {
    type Item = &'a FieldBinding;
    type IntoIter = std::slice::Iter<'a, FieldBinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Memoised `TypeId -> BindingSet` table
///
/// Reads take a shared lock. A type's first lookup builds its set outside the
/// lock and inserts it with `entry().or_insert_with`, so racing first uses
/// all end up holding the same `Arc`.
#[derive(Debug, Default)]
pub struct Registry {
    sets: RwLock<HashMap<TypeId, Arc<BindingSet>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by [`crate::from_xml_str`]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Bindings of `T`, registering its declared shape on first use
    pub fn bindings_for<T: FromXml>(&self) -> Result<Arc<BindingSet>> {
        let type_id = TypeId::of::<T>();
        if let Some(set) = self.sets.read().get(&type_id) {
            return Ok(Arc::clone(set));
        }
        self.register(type_id, type_name::<T>(), T::bindings())
    }

    /// Register a binding set explicitly
    ///
    /// The first registration for a type wins; later calls return the set
    /// already stored.
    pub fn register(
        &self,
        type_id: TypeId,
        type_name: &'static str,
        bindings: Vec<FieldBinding>,
    ) -> Result<Arc<BindingSet>> {
        let set = BindingSet::new(type_name, bindings)?;

        let mut sets = self.sets.write();
        let stored = sets.entry(type_id).or_insert_with(|| {
            debug!(
                target_type = type_name,
                bindings = set.len(),
                "registered bindings"
            );
            Arc::new(set)
        });
        Ok(Arc::clone(stored))
    }

    /// Bindings of an already-registered type
    pub fn lookup(&self, type_id: TypeId, type_name: &'static str) -> Result<Arc<BindingSet>> {
        self.sets
            .read()
            .get(&type_id)
            .map(Arc::clone)
            .ok_or_else(|| Error::mapping(ErrorKind::UnknownBinding { type_name }))
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.sets.read().contains_key(&type_id)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.sets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.read().is_empty()
    }
}
