use std::{collections::HashMap, fmt, sync::Arc};

use crate::{Object, SymbolId};

type ActionFn = dyn Fn(&Object, Option<&Object>) -> Option<Object> + Send + Sync;

/// Behavior bound to a slot: `(self, argument) -> result`.
///
/// The closure owns whatever state it captured. Cloning an `Action` shares the
/// closure, the captured state is freed once the last holder lets go.
#[derive(Clone)]
pub struct Action(Arc<ActionFn>);

impl Action {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Object, Option<&Object>) -> Option<Object> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Action that always answers `value`, ignoring receiver and argument.
    pub fn constant(value: Option<Object>) -> Self {
        Self::new(move |_, _| value.clone())
    }

    #[inline]
    pub fn invoke(&self, receiver: &Object, argument: Option<&Object>) -> Option<Object> {
        (self.0)(receiver, argument)
    }

    pub fn ptr_eq(&self, other: &Action) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// Slots owned by a single object. Only ever touched while confined to that
/// object's context.
#[derive(Debug, Default)]
pub struct SlotStore {
    slots: HashMap<SymbolId, Action>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: SymbolId) -> Option<&Action> {
        self.slots.get(&name)
    }

    /// Store `action` under `name` and hand back the replaced action, if any.
    /// The caller decides where the old value is dropped.
    #[must_use = "the replaced action is released when this value is dropped"]
    pub fn insert(&mut self, name: SymbolId, action: Action) -> Option<Action> {
        self.slots.insert(name, action)
    }

    pub fn contains(&self, name: SymbolId) -> bool {
        self.slots.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
