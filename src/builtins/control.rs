// ABOUTME: Control builtins: throw, apply, map

//! Control-flow primitives that route through the evaluator's callable path
//!
//! These are the non-arithmetic builtins that need `eval::apply_value`
//! rather than being pure data operations.
//!
//! - `throw`: raise an in-language error carrying a value
//! - `apply`: call a function with a flattened final argument list
//! - `map`: apply a function across a sequence, collecting a new `List`

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::apply_value;
use crate::value::Value;
use std::rc::Rc;

/// `(throw v)`: raises an in-language error carrying `v`, caught by the
/// nearest enclosing `try*`/`catch*`.
fn builtin_throw(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("throw", "1", args.len()));
    }
    Err(EvalError::Throw(args[0].clone()))
}

/// `(apply f a b ... args)`: calls `f` with `a b ...` plus the elements of
/// the final argument (which must be a sequence), flattening one level.
fn builtin_apply(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("apply", "at least 2", args.len()));
    }
    let f = &args[0];
    let last = args.last().unwrap();
    let tail = last
        .as_seq()
        .ok_or_else(|| EvalError::type_error("apply", "list or vector", last, args.len() - 1))?;
    let mut call_args = args[1..args.len() - 1].to_vec();
    call_args.extend_from_slice(tail);
    apply_value(f, &call_args)
}

/// `(map f coll)`: applies `f` to every element, producing a new `List`.
fn builtin_map(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("map", "2", args.len()));
    }
    let f = &args[0];
    let items = args[1]
        .as_seq()
        .ok_or_else(|| EvalError::type_error("map", "list or vector", &args[1], 1))?;
    let mapped = items
        .iter()
        .map(|v| apply_value(f, std::slice::from_ref(v)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::list(mapped))
}

pub fn register(env: &Rc<Environment>) {
    env.define(Rc::from("throw"), Value::builtin("throw", Rc::new(builtin_throw)));
    env.define(Rc::from("apply"), Value::builtin("apply", Rc::new(builtin_apply)));
    env.define(Rc::from("map"), Value::builtin("map", Rc::new(builtin_map)));
}
