use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

use parking_lot::Mutex;

use crate::{Action, RuntimeShared, SlotStore, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Serial execution context of one object.
///
/// At most one confined operation runs inside a context at any time. The slot
/// store is only reachable through [`Context::confine`], so every read or write
/// of an object's slots is serialized with every other one on that object.
/// Nothing else is ever done while a context is held: no sends, no action
/// invocations, no destructor runs.
#[derive(Debug, Default)]
pub struct Context {
    store: Mutex<SlotStore>,
}

impl Context {
    pub fn new(store: SlotStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    #[inline]
    pub fn confine<R>(&self, f: impl FnOnce(&mut SlotStore) -> R) -> R {
        let mut store = self.store.lock();
        f(&mut store)
    }
}

pub(crate) struct ObjectShared {
    id: ObjectId,
    runtime: Arc<RuntimeShared>,
    parent: Option<Object>,
    context: Context,
}

/// Handle to an object. Cloning the handle shares the object; use
/// [`Object::clone_child`] to create a new object delegating to this one.
///
/// Equality is identity.
#[derive(Clone)]
pub struct Object(Arc<ObjectShared>);

impl Object {
    /// A parentless object. Only the runtime bootstrap creates these.
    pub(crate) fn new_root(runtime: Arc<RuntimeShared>, store: SlotStore) -> Self {
        let id = runtime.next_object_id();
        Self(Arc::new(ObjectShared {
            id,
            runtime,
            parent: None,
            context: Context::new(store),
        }))
    }

    /// Create a new object whose unresolved lookups fall through to `self`.
    ///
    /// The child starts with a single `parent` slot answering this object.
    pub fn clone_child(&self) -> Object {
        let runtime = self.0.runtime.clone();
        let id = runtime.next_object_id();

        let parent_ref: Weak<ObjectShared> = Arc::downgrade(&self.0);
        let mut store = SlotStore::new();
        let _ = store.insert(
            runtime.well_known.parent,
            Action::new(move |_, _| parent_ref.upgrade().map(Object)),
        );

        log::debug!("clone {} -> {}", self.id(), id);
        Object(Arc::new(ObjectShared {
            id,
            runtime,
            parent: Some(self.clone()),
            context: Context::new(store),
        }))
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    /// Structural parent link. This is what chain lookup follows; the `parent`
    /// slot is the message-level view of the same reference.
    #[inline]
    pub fn parent(&self) -> Option<&Object> {
        self.0.parent.as_ref()
    }

    #[inline]
    pub fn runtime(&self) -> &Arc<RuntimeShared> {
        &self.0.runtime
    }

    #[inline]
    pub fn context(&self) -> &Context {
        &self.0.context
    }

    /// Bind `action` to `name` on this object only. Ancestors are never touched;
    /// a same-named slot on an ancestor is shadowed, not replaced.
    pub fn set(&self, name: &str, action: Action) {
        let symbol = self.0.runtime.symbols.intern(name);
        self.set_symbol(symbol, action);
    }

    pub fn set_symbol(&self, name: SymbolId, action: Action) {
        let replaced = self.0.context.confine(|store| store.insert(name, action));
        if let Some(replaced) = replaced {
            log::debug!("{}: overwrite slot {}", self.id(), name);
            // released here, outside the context
            drop(replaced);
        }
    }

    /// Convenience for `set(name, Action::new(f))`.
    pub fn define<F>(&self, name: &str, f: F)
    where
        F: Fn(&Object, Option<&Object>) -> Option<Object> + Send + Sync + 'static,
    {
        self.set(name, Action::new(f));
    }

    /// Whether this object itself (not an ancestor) holds `name`.
    pub fn has_own_slot(&self, name: &str) -> bool {
        match self.0.runtime.symbols.find(name) {
            Some(symbol) => self.0.context.confine(|store| store.contains(symbol)),
            None => false,
        }
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Drop for ObjectShared {
    fn drop(&mut self) {
        // Unlink ancestors iteratively. Letting the Arc chain drop on its own
        // recurses once per level and overflows the stack on deep chains.
        let mut next = self.parent.take();
        while let Some(Object(parent)) = next {
            match Arc::try_unwrap(parent) {
                Ok(mut inner) => next = inner.parent.take(),
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Object {}

impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id(), f)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id())
            .field("parent", &self.parent().map(Object::id))
            .finish()
    }
}
