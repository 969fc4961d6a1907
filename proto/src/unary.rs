//! Unary-encoded naturals built purely from sends.
//!
//! `zero` is a clone of some base object; `n + 1` is a clone of `n`. Printing a
//! number emits one [`HOP`] per step back to zero and then [`ZERO`].

use crate::{Object, ObjectId, send};

pub const HOP: &str = "S";
pub const ZERO: &str = "0";

/// Create the zero of a new unary number system under `base`.
pub fn zero(base: &Object) -> Object {
    let zero = base.clone_child();
    // identify zero by id so its own slot does not keep it alive
    let zero_id: ObjectId = zero.id();

    zero.define("inc", |this, _| Some(this.clone_child()));
    zero.define("print", move |this, _| {
        let runtime = this.runtime();
        let mut current = Some(this.clone());
        while let Some(number) = current {
            if number.id() == zero_id {
                runtime.emit(ZERO);
                runtime.emit("\n");
                break;
            }
            runtime.emit(HOP);
            current = send(&number, "parent", None);
        }
        Some(this.clone())
    });
    zero
}

/// Apply `inc` to `zero` `n` times.
pub fn nth(zero: &Object, n: usize) -> Option<Object> {
    let mut number = Some(zero.clone());
    for _ in 0..n {
        number = send(number.as_ref(), "inc", None);
    }
    number
}

/// Count the steps from `number` back to `zero` by asking for parents.
pub fn value(zero: &Object, number: &Object) -> Option<usize> {
    let mut steps = 0;
    let mut current = Some(number.clone());
    while let Some(object) = current {
        if object == *zero {
            return Some(steps);
        }
        steps += 1;
        current = send(&object, "parent", None);
    }
    None
}
