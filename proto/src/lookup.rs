use std::sync::Arc;

use crate::{Action, NotUnderstood, Object, RuntimeShared, SymbolId};

/// A message name resolved against one runtime's symbol table.
#[derive(Debug, Clone)]
pub struct Selector {
    pub symbol: SymbolId,
    pub name: Arc<str>,
}

#[derive(Debug, Clone)]
pub enum LookupResult {
    NotFound,
    Found {
        /// The object that owns the slot. Differs from the receiver when the
        /// slot was found further up the chain.
        holder: Object,
        action: Action,
    },
}

impl LookupResult {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found { .. })
    }

    pub fn action(&self) -> Option<&Action> {
        match self {
            LookupResult::Found { action, .. } => Some(action),
            LookupResult::NotFound => None,
        }
    }

    pub fn holder(&self) -> Option<&Object> {
        match self {
            LookupResult::Found { holder, .. } => Some(holder),
            LookupResult::NotFound => None,
        }
    }
}

impl Selector {
    pub fn new(name: &str, runtime: &RuntimeShared) -> Self {
        Self {
            symbol: runtime.symbols.intern(name),
            name: Arc::from(name),
        }
    }

    pub fn not_understood(&self, receiver: Option<&Object>) -> NotUnderstood {
        NotUnderstood::new(self.name.clone(), receiver.map(Object::id))
    }

    /// Walk the chain starting at `object`.
    ///
    /// Every level is searched inside that level's own context, and the context
    /// is released before moving to the parent. The found action is handed out
    /// by shared reference, never invoked while a context is held.
    pub fn lookup_object(&self, object: &Object) -> LookupResult {
        let runtime = object.runtime();
        let mut level = Some(object);
        while let Some(current) = level {
            runtime.record_hop();
            let found = current
                .context()
                .confine(|store| store.get(self.symbol).cloned());
            if let Some(action) = found {
                log::trace!("`{}` found on {} for {}", self.name, current, object);
                return LookupResult::Found {
                    holder: current.clone(),
                    action,
                };
            }
            log::trace!("`{}` not on {}, trying parent", self.name, current);
            level = current.parent();
        }
        LookupResult::NotFound
    }
}

/// Find `name` on `target` or its ancestors. A null target finds nothing.
pub fn lookup<'a>(target: impl Into<Option<&'a Object>>, name: &str) -> LookupResult {
    match target.into() {
        Some(object) => Selector::new(name, object.runtime()).lookup_object(object),
        None => LookupResult::NotFound,
    }
}
