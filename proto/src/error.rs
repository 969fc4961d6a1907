use std::{fmt, sync::Arc};

use crate::ObjectId;

/// A lookup walked the whole chain without finding the selector.
///
/// `receiver` is `None` when the message was sent to the null object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotUnderstood {
    pub selector: Arc<str>,
    pub receiver: Option<ObjectId>,
}

impl NotUnderstood {
    pub fn new(selector: impl Into<Arc<str>>, receiver: Option<ObjectId>) -> Self {
        Self {
            selector: selector.into(),
            receiver,
        }
    }
}

impl fmt::Display for NotUnderstood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.receiver {
            Some(receiver) => {
                write!(f, "{receiver} does not understand `{}`", self.selector)
            }
            None => write!(f, "null does not understand `{}`", self.selector),
        }
    }
}

impl std::error::Error for NotUnderstood {}
