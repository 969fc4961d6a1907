//! A prototype object runtime.
//!
//! Objects are made by cloning other objects, carry their behavior in named
//! slots, and answer messages by searching their own slots and then their
//! parent chain. Every object serializes access to its own slots; a lookup
//! that crosses several ancestors takes one confined step per ancestor.

mod dispatch;
mod error;
mod interning;
mod lookup;
mod object;
mod runtime;
mod slots;

pub mod unary;

pub use dispatch::*;
pub use error::NotUnderstood;
pub use interning::{SymbolId, Symbols};
pub use lookup::{LookupResult, Selector, lookup};
pub use object::{Context, Object, ObjectId};
pub use runtime::{
    DispatchStats, Output, OutputBuffer, Runtime, RuntimeCreateInfo, RuntimeShared, WellKnown,
    intern, object, runtime,
};
pub use slots::{Action, SlotStore};
