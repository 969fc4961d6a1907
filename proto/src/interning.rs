use std::{collections::BTreeMap, fmt, sync::Arc};

use parking_lot::RwLock;

/// Canonical identity of a slot name. Equal names always intern to the same id
/// within one symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u64);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym#{}", self.0)
    }
}

struct SymbolsImpl {
    // comparison-based dedup
    mappings: BTreeMap<Arc<str>, SymbolId>,
    table: Vec<Arc<str>>,
}

/// Append-only symbol table. There is no removal, ids stay valid for as long as
/// the table lives.
#[derive(Clone)]
pub struct Symbols(Arc<RwLock<SymbolsImpl>>);

impl SymbolsImpl {
    fn new() -> Self {
        Self {
            mappings: BTreeMap::new(),
            table: Vec::new(),
        }
    }

    fn get_or_add(&mut self, value: &str) -> SymbolId {
        if let Some(&id) = self.mappings.get(value) {
            return id;
        }
        let id = SymbolId(self.table.len() as u64);
        let interned = Arc::<str>::from(value);
        self.mappings.insert(interned.clone(), id);
        self.table.push(interned);
        id
    }

    fn get(&self, id: SymbolId) -> Option<Arc<str>> {
        self.table.get(id.index()).cloned()
    }
}

impl Symbols {
    pub fn new() -> Self {
        Self(Arc::new(RwLock::new(SymbolsImpl::new())))
    }

    /// Intern `value`, returning the id every equal string maps to.
    pub fn intern(&self, value: &str) -> SymbolId {
        // fast path: most names are already known after bootstrap
        if let Some(&id) = self.0.read().mappings.get(value) {
            return id;
        }
        self.0.write().get_or_add(value)
    }

    /// Id of `value` if it was interned before, without inserting it.
    pub fn find(&self, value: &str) -> Option<SymbolId> {
        self.0.read().mappings.get(value).copied()
    }

    pub fn name(&self, id: SymbolId) -> Option<Arc<str>> {
        self.0.read().get(id)
    }

    pub fn len(&self) -> usize {
        self.0.read().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Symbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbols").field("len", &self.len()).finish()
    }
}
