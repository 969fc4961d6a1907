//! Message sends.
//!
//! `send` resolves a name starting at the receiver, `send_super` starts one
//! level above it. Both invoke the found action with the original receiver as
//! `self`, block until it returns, and turn a failed lookup into `None` after
//! reporting it. The `try_` variants hand the failure back instead.

use crate::{LookupResult, NotUnderstood, Object, Selector, runtime::report};

pub fn try_send<'a>(
    target: impl Into<Option<&'a Object>>,
    name: &str,
    argument: impl Into<Option<&'a Object>>,
) -> Result<Option<Object>, NotUnderstood> {
    let Some(receiver) = target.into() else {
        return Err(NotUnderstood::new(name, None));
    };
    let runtime = receiver.runtime();
    runtime.record_send();

    let selector = Selector::new(name, runtime);
    match selector.lookup_object(receiver) {
        LookupResult::Found { action, .. } => Ok(action.invoke(receiver, argument.into())),
        LookupResult::NotFound => Err(selector.not_understood(Some(receiver))),
    }
}

pub fn try_send_super<'a>(
    target: impl Into<Option<&'a Object>>,
    name: &str,
    argument: impl Into<Option<&'a Object>>,
) -> Result<Option<Object>, NotUnderstood> {
    let Some(receiver) = target.into() else {
        return Err(NotUnderstood::new(name, None));
    };
    let argument = argument.into();
    receiver.runtime().record_super_send();

    // resolved through the `parent` slot so an override is honored, but not
    // counted as a send of its own
    let parent_selector = Selector::new("parent", receiver.runtime());
    let parent = match parent_selector.lookup_object(receiver) {
        LookupResult::Found { action, .. } => action.invoke(receiver, argument),
        LookupResult::NotFound => return Err(parent_selector.not_understood(Some(receiver))),
    };
    let Some(parent) = parent else {
        return Err(NotUnderstood::new(name, Some(receiver.id())));
    };

    let selector = Selector::new(name, parent.runtime());
    match selector.lookup_object(&parent) {
        LookupResult::Found { action, .. } => Ok(action.invoke(receiver, argument)),
        LookupResult::NotFound => Err(selector.not_understood(Some(receiver))),
    }
}

/// Send `name` to `target` with `argument`. Answers `None` if nothing in the
/// chain understands it.
pub fn send<'a>(
    target: impl Into<Option<&'a Object>>,
    name: &str,
    argument: impl Into<Option<&'a Object>>,
) -> Option<Object> {
    let target = target.into();
    try_send(target, name, argument).unwrap_or_else(|err| {
        report(&err, target);
        None
    })
}

/// Like [`send`], but the search starts at the receiver's parent while the
/// action still runs with the receiver as `self`.
pub fn send_super<'a>(
    target: impl Into<Option<&'a Object>>,
    name: &str,
    argument: impl Into<Option<&'a Object>>,
) -> Option<Object> {
    let target = target.into();
    try_send_super(target, name, argument).unwrap_or_else(|err| {
        report(&err, target);
        None
    })
}

/// Create a new object delegating to `parent`.
pub fn clone(parent: &Object) -> Object {
    parent.clone_child()
}

/// Bind `action` to `name` on `object`.
pub fn set(object: &Object, name: &str, action: crate::Action) {
    object.set(name, action);
}

impl Object {
    pub fn send(&self, name: &str, argument: Option<&Object>) -> Option<Object> {
        send(self, name, argument)
    }

    pub fn send_super(&self, name: &str, argument: Option<&Object>) -> Option<Object> {
        send_super(self, name, argument)
    }
}
