// ABOUTME: Comparison builtins: = < <= > >=, variadic chained over adjacent pairs

//! Comparison operations: `=`, `<`, `<=`, `>`, `>=`
//!
//! Relational operators over `Int` (the ordering family) and structural
//! equality (`=`) over any value, chained across all adjacent pairs rather
//! than fixed at two arguments.
//!
//! - `=`: structural equality, every adjacent pair must be equal
//! - `<`: each argument strictly less than the next
//! - `<=`: each argument less than or equal to the next
//! - `>`: each argument strictly greater than the next
//! - `>=`: each argument greater than or equal to the next

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{values_equal, Value};
use std::rc::Rc;

fn as_int(func: &str, v: &Value, position: usize) -> Result<i64, EvalError> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(EvalError::type_error(func, "int", other, position)),
    }
}

/// `(= a b c ...)`: structural equality, every adjacent pair must be equal.
fn builtin_eq(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(args.windows(2).all(|w| values_equal(&w[0], &w[1]))))
}

/// Shared chain logic for the ordering operators: requires at least two
/// `Int` arguments and checks `cmp` holds between every adjacent pair.
fn chained(func: &'static str, args: &[Value], cmp: fn(i64, i64) -> bool) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error(func, "at least 2", args.len()));
    }
    let ints = args
        .iter()
        .enumerate()
        .map(|(i, a)| as_int(func, a, i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Bool(ints.windows(2).all(|w| cmp(w[0], w[1]))))
}

/// `(< a b c ...)`: each argument strictly less than the next.
fn builtin_lt(args: &[Value]) -> Result<Value, EvalError> {
    chained("<", args, |a, b| a < b)
}

/// `(<= a b c ...)`: each argument less than or equal to the next.
fn builtin_le(args: &[Value]) -> Result<Value, EvalError> {
    chained("<=", args, |a, b| a <= b)
}

/// `(> a b c ...)`: each argument strictly greater than the next.
fn builtin_gt(args: &[Value]) -> Result<Value, EvalError> {
    chained(">", args, |a, b| a > b)
}

/// `(>= a b c ...)`: each argument greater than or equal to the next.
fn builtin_ge(args: &[Value]) -> Result<Value, EvalError> {
    chained(">=", args, |a, b| a >= b)
}

pub fn register(env: &Rc<Environment>) {
    env.define(Rc::from("="), Value::builtin("=", Rc::new(builtin_eq)));
    env.define(Rc::from("<"), Value::builtin("<", Rc::new(builtin_lt)));
    env.define(Rc::from("<="), Value::builtin("<=", Rc::new(builtin_le)));
    env.define(Rc::from(">"), Value::builtin(">", Rc::new(builtin_gt)));
    env.define(Rc::from(">="), Value::builtin(">=", Rc::new(builtin_ge)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_cross_variant_sequences() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let vec = Value::vector(vec![Value::Int(1), Value::Int(2)]);
        assert!(matches!(builtin_eq(&[list, vec]), Ok(Value::Bool(true))));
    }

    #[test]
    fn test_chained_lt() {
        assert!(matches!(
            builtin_lt(&[Value::Int(1), Value::Int(2), Value::Int(3)]),
            Ok(Value::Bool(true))
        ));
        assert!(matches!(
            builtin_lt(&[Value::Int(1), Value::Int(3), Value::Int(2)]),
            Ok(Value::Bool(false))
        ));
    }

    #[test]
    fn test_ge_requires_at_least_two_args() {
        assert!(builtin_ge(&[Value::Int(1)]).is_err());
    }
}
