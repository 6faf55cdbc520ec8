//! Per-class instance member tables with delegation to the base class's table

use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;

/// Mapping from instance member name to value.
///
/// A lookup that misses locally continues in the parent table (the base
/// class's members), up to the root. Handles are shared: cloning a
/// `MemberTable` yields another handle to the same storage.
#[derive(Clone)]
pub struct MemberTable(Arc<TableInner>);

struct TableInner {
    entries: RwLock<IndexMap<String, Value, FxBuildHasher>>,
    parent: Option<MemberTable>,
}

impl MemberTable {
    /// Create a root table with no delegation target
    pub fn new() -> Self {
        Self::with_parent(None)
    }

    /// Create a table that delegates misses to `parent`
    pub fn with_parent(parent: Option<MemberTable>) -> Self {
        MemberTable(Arc::new(TableInner {
            entries: RwLock::new(IndexMap::default()),
            parent,
        }))
    }

    /// Table that misses are delegated to
    pub fn parent(&self) -> Option<&MemberTable> {
        self.0.parent.as_ref()
    }

    /// Look up `name` here, then in each ancestor table
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut table = Some(self);
        while let Some(current) = table {
            if let Some(value) = current.get_own(name) {
                return Some(value);
            }
            table = current.parent();
        }
        None
    }

    /// Look up `name` in this table only
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.0.entries.read().get(name).cloned()
    }

    /// Check whether `name` resolves anywhere in the chain
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Check whether `name` is defined in this table
    pub fn contains_own(&self, name: &str) -> bool {
        self.0.entries.read().contains_key(name)
    }

    /// Insert or overwrite a member, returning the previous local value
    pub fn set(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.entries.write().insert(name.into(), value)
    }

    /// Remove a local member, returning it.
    ///
    /// Lookups for `name` fall through to the parent again afterwards.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.0.entries.write().shift_remove(name)
    }

    /// Names defined locally, in first-definition order
    pub fn keys(&self) -> Vec<String> {
        self.0.entries.read().keys().cloned().collect()
    }

    /// Number of locally defined members
    pub fn len(&self) -> usize {
        self.0.entries.read().len()
    }

    /// Check whether no members are defined locally
    pub fn is_empty(&self) -> bool {
        self.0.entries.read().is_empty()
    }

    /// Number of tables in the delegation chain above this one
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut table = self.parent();
        while let Some(current) = table {
            depth += 1;
            table = current.parent();
        }
        depth
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &MemberTable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for MemberTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemberTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberTable")
            .field("keys", &self.keys())
            .field("depth", &self.depth())
            .finish()
    }
}
