//! The environment: a stack of frames holding runtime variable slots,
//! pushed and popped around each block.

use std::collections::HashMap;

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::{TypeTag, Value, TYPE_BOOL, TYPE_INT, TYPE_RATIONAL};

#[derive(Debug, Clone)]
pub struct VariableSlot {
    pub value: Value,
    pub declared_type: TypeTag,
    pub is_const: bool,
    nonlocal: bool,
}

impl VariableSlot {
    fn nonlocal() -> Self {
        VariableSlot {
            value: Value::Undefined,
            declared_type: TypeTag::Undefined,
            is_const: false,
            nonlocal: true,
        }
    }
}

pub type Frame = HashMap<String, VariableSlot>;

fn root_frame() -> Frame {
    let mut frame = Frame::new();
    frame.insert(
        "int".to_string(),
        VariableSlot {
            value: TYPE_INT.clone(),
            declared_type: TypeTag::Type,
            is_const: true,
            nonlocal: false,
        },
    );
    frame.insert(
        "rational".to_string(),
        VariableSlot {
            value: TYPE_RATIONAL.clone(),
            declared_type: TypeTag::Type,
            is_const: true,
            nonlocal: false,
        },
    );
    frame.insert(
        "bool".to_string(),
        VariableSlot {
            value: TYPE_BOOL.clone(),
            declared_type: TypeTag::Type,
            is_const: true,
            nonlocal: false,
        },
    );
    frame
}

/// The stack of frames threaded through evaluation. The bottom frame is
/// the root (host-seeded types); the top frame is the innermost scope.
#[derive(Debug)]
pub struct Context {
    stack: Vec<Frame>,
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            stack: vec![root_frame()],
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self) {
        self.stack.push(Frame::new());
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Runs `body` with a fresh frame pushed, popping it on every exit
    /// path including an `Err` return, so a failed statement never leaks a
    /// frame. Done here with an explicit push/pop pair rather than a guard
    /// object since there is nothing to drop early.
    pub fn scoped<T>(&mut self, body: impl FnOnce(&mut Context) -> RuntimeResult<T>) -> RuntimeResult<T> {
        self.push();
        let result = body(self);
        self.pop();
        result
    }

    /// Declares `name` in the **top** frame, overwriting any existing slot
    /// there.
    pub fn declare(&mut self, name: &str, declared_type: TypeTag, value: Value, is_const: bool) {
        let top = self.stack.last_mut().expect("context always has a frame");
        top.insert(
            name.to_string(),
            VariableSlot {
                value,
                declared_type,
                is_const,
                nonlocal: false,
            },
        );
    }

    /// Marks `name` as nonlocal in the top frame: a lookup for `name` in
    /// this frame now falls through to the frames below.
    pub fn declare_nonlocal(&mut self, name: &str) {
        let top = self.stack.last_mut().expect("context always has a frame");
        top.insert(name.to_string(), VariableSlot::nonlocal());
    }

    /// Top-to-bottom search for the first slot whose value is not
    /// `undefined` — a slot holding `undefined` does not stop the search,
    /// it falls through to the next frame down. Fails with `NameError` if
    /// the whole stack is exhausted without finding one.
    pub fn get(&self, name: &str) -> RuntimeResult<Value> {
        for frame in self.stack.iter().rev() {
            match frame.get(name) {
                Some(slot) if slot.nonlocal => continue,
                Some(slot) if slot.value != Value::Undefined => return Ok(slot.value.clone()),
                Some(_) => continue,
                None => continue,
            }
        }
        Err(RuntimeError::name(format!("name '{name}' is not defined")))
    }

    /// Top-to-bottom search returning the first matching slot's value
    /// regardless of whether it's `undefined`.
    pub fn get_variable(&self, name: &str) -> RuntimeResult<Value> {
        for frame in self.stack.iter().rev() {
            match frame.get(name) {
                Some(slot) if slot.nonlocal => continue,
                Some(slot) => return Ok(slot.value.clone()),
                None => continue,
            }
        }
        Err(RuntimeError::name(format!("name '{name}' is not defined")))
    }

    /// Resolves a bare `VarRef`: the **top** frame is checked first and,
    /// if it doesn't hold `name`, digit-only names and the
    /// `true`/`false`/`null`/`undefined` keywords are recognised before
    /// falling through to outer frames.
    pub fn resolve_var_ref(&self, name: &str) -> RuntimeResult<Value> {
        if let Some(top) = self.stack.last() {
            if let Some(slot) = top.get(name) {
                if !slot.nonlocal {
                    return Ok(slot.value.clone());
                }
            } else if is_all_digits(name) {
                return Ok(Value::integer_from_lexeme(name));
            } else if let Some(singleton) = singleton_for(name) {
                return Ok(singleton);
            }
        }
        self.get(name)
    }

    /// Searches top-to-bottom for a frame holding `name`; sets it if the
    /// new value's type matches the slot's declared type and the slot
    /// isn't `const`. Const is checked first, so a const slot can never be
    /// overwritten regardless of the new value's type.
    pub fn set(&mut self, name: &str, value: Value) -> RuntimeResult<Value> {
        for frame in self.stack.iter_mut().rev() {
            if let Some(slot) = frame.get_mut(name) {
                if slot.nonlocal {
                    continue;
                }
                if slot.is_const {
                    return Err(RuntimeError::name(format!(
                        "'{name}' is declared const and cannot be reassigned"
                    )));
                }
                if !value.matches_type(slot.declared_type) {
                    return Err(RuntimeError::name(format!(
                        "'{name}' is declared as {} and cannot hold a {}",
                        slot.declared_type,
                        value.type_tag()
                    )));
                }
                slot.value = value.clone();
                return Ok(value);
            }
        }
        Err(RuntimeError::name(format!(
            "'{name}' is not declared or is declared constant"
        )))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stack.iter().rev().any(|frame| frame.contains_key(name))
    }
}

fn is_all_digits(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

fn singleton_for(name: &str) -> Option<Value> {
    match name {
        "true" => Some(Value::Boolean(true)),
        "false" => Some(Value::Boolean(false)),
        "null" => Some(Value::Null),
        "undefined" => Some(Value::Undefined),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_and_get_roundtrip() {
        let mut ctx = Context::new();
        ctx.declare("x", TypeTag::Integer, Value::integer(3), false);
        assert_eq!(ctx.get("x").unwrap(), Value::integer(3));
    }

    #[test]
    fn scoped_pops_frame_on_error() {
        let mut ctx = Context::new();
        let depth_before = ctx.depth();
        let result: RuntimeResult<()> = ctx.scoped(|inner| {
            inner.declare("x", TypeTag::Integer, Value::integer(1), false);
            Err(RuntimeError::name("boom"))
        });
        assert!(result.is_err());
        assert_eq!(ctx.depth(), depth_before);
    }

    #[test]
    fn top_frame_shadows_digit_identifier() {
        let mut ctx = Context::new();
        ctx.declare("3", TypeTag::Integer, Value::integer(0), false);
        ctx.scoped(|inner| {
            // no declaration of "3" in the inner frame: resolves to the
            // integer literal 3, not the outer variable.
            assert_eq!(inner.resolve_var_ref("3").unwrap(), Value::integer(3));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn nonlocal_marker_falls_through() {
        let mut ctx = Context::new();
        ctx.declare("3", TypeTag::Integer, Value::integer(0), false);
        ctx.scoped(|inner| {
            inner.declare_nonlocal("3");
            assert_eq!(inner.resolve_var_ref("3").unwrap(), Value::integer(0));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn const_reassignment_fails() {
        let mut ctx = Context::new();
        ctx.declare("x", TypeTag::Integer, Value::integer(1), true);
        let err = ctx.set("x", Value::integer(2)).unwrap_err();
        assert!(err.to_string().contains("const"));
    }

    #[test]
    fn set_checks_declared_type() {
        let mut ctx = Context::new();
        ctx.declare("x", TypeTag::Integer, Value::integer(1), false);
        let err = ctx
            .set("x", Value::rational(1, 2).unwrap())
            .unwrap_err();
        assert!(err.to_string().starts_with("NameError"));
    }

    #[test]
    fn get_skips_undefined_slot_in_nearer_frame() {
        let mut ctx = Context::new();
        ctx.declare("x", TypeTag::Integer, Value::integer(5), false);
        ctx.scoped(|inner| {
            inner.declare("x", TypeTag::Integer, Value::Undefined, false);
            assert_eq!(inner.get("x").unwrap(), Value::integer(5));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn root_types_are_seeded() {
        let ctx = Context::new();
        assert_eq!(ctx.get("int").unwrap(), *TYPE_INT);
        assert_eq!(ctx.get("rational").unwrap(), *TYPE_RATIONAL);
        assert_eq!(ctx.get("bool").unwrap(), *TYPE_BOOL);
    }
}
