// ABOUTME: Atom builtins: atom, atom?, deref, reset!, swap!

//! Mutable reference cells: `atom`, `atom?`, `deref`, `reset!`, `swap!`
//!
//! The only mutable storage in the language — everything else is
//! persistent/shared-by-value. `@a` in the reader expands to `(deref a)`.
//!
//! - `atom`: wrap a value in a new mutable cell
//! - `atom?`: test for the `Atom` variant
//! - `deref`: read the current value
//! - `reset!`: overwrite the value, returning it
//! - `swap!`: read-modify-write through a function

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::apply_value;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// `(atom x)`: wraps `x` in a new mutable cell.
fn builtin_atom(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("atom", "1", args.len()));
    }
    Ok(Value::Atom(Rc::new(RefCell::new(args[0].clone()))))
}

/// `(atom? x)`: true only for the `Atom` variant.
fn builtin_atom_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("atom?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Atom(_))))
}

fn as_atom<'a>(func: &str, v: &'a Value, position: usize) -> Result<&'a Rc<RefCell<Value>>, EvalError> {
    match v {
        Value::Atom(cell) => Ok(cell),
        other => Err(EvalError::type_error(func, "atom", other, position)),
    }
}

/// `(deref a)`: reads the atom's current value.
fn builtin_deref(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("deref", "1", args.len()));
    }
    let cell = as_atom("deref", &args[0], 0)?;
    Ok(cell.borrow().clone())
}

/// `(reset! a x)`: overwrites the atom's value with `x`, returning it.
fn builtin_reset(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("reset!", "2", args.len()));
    }
    let cell = as_atom("reset!", &args[0], 0)?;
    *cell.borrow_mut() = args[1].clone();
    Ok(args[1].clone())
}

/// `(swap! atom f args...)`: reads the current value, applies `f` to it plus
/// the extra arguments, then writes and returns the result. `f` must be
/// read and applied before the write, so nested `swap!` on the same atom
/// observes the outer write ordering.
fn builtin_swap(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("swap!", "at least 2", args.len()));
    }
    let cell = as_atom("swap!", &args[0], 0)?;
    let current = cell.borrow().clone();
    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(current);
    call_args.extend_from_slice(&args[2..]);
    let result = apply_value(&args[1], &call_args)?;
    *cell.borrow_mut() = result.clone();
    Ok(result)
}

pub fn register(env: &Rc<Environment>) {
    env.define(Rc::from("atom"), Value::builtin("atom", Rc::new(builtin_atom)));
    env.define(Rc::from("atom?"), Value::builtin("atom?", Rc::new(builtin_atom_p)));
    env.define(Rc::from("deref"), Value::builtin("deref", Rc::new(builtin_deref)));
    env.define(Rc::from("reset!"), Value::builtin("reset!", Rc::new(builtin_reset)));
    env.define(Rc::from("swap!"), Value::builtin("swap!", Rc::new(builtin_swap)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_then_deref() {
        let a = builtin_atom(&[Value::Int(1)]).unwrap();
        builtin_reset(&[a.clone(), Value::Int(5)]).unwrap();
        assert!(matches!(builtin_deref(&[a]), Ok(Value::Int(5))));
    }

    #[test]
    fn test_swap_applies_extra_args() {
        let add = Value::builtin(
            "+",
            Rc::new(|args: &[Value]| {
                let sum: i64 = args
                    .iter()
                    .map(|v| match v {
                        Value::Int(n) => *n,
                        _ => 0,
                    })
                    .sum();
                Ok(Value::Int(sum))
            }),
        );
        let a = builtin_atom(&[Value::Int(1)]).unwrap();
        let result = builtin_swap(&[a.clone(), add, Value::Int(2), Value::Int(3)]).unwrap();
        assert!(matches!(result, Value::Int(6)));
        assert!(matches!(builtin_deref(&[a]), Ok(Value::Int(6))));
    }
}
