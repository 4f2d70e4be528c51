// ABOUTME: Arithmetic builtins: + - * /, variadic left folds over Int

//! Arithmetic operations: `+`, `-`, `*`, `/`
//!
//! Variadic folds over `Int` only — there is no float tower.
//!
//! - `+`: sum of all arguments (identity: 0)
//! - `-`: subtract subsequent args from the first, or negate if given one
//! - `*`: product of all arguments (identity: 1)
//! - `/`: divide the first by subsequent args, or reciprocal if given one

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn as_int(func: &str, v: &Value, position: usize) -> Result<i64, EvalError> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(EvalError::type_error(func, "int", other, position)),
    }
}

/// `(+ a b c ...)`. Identity `0` when called with no arguments.
fn builtin_add(args: &[Value]) -> Result<Value, EvalError> {
    let mut sum = 0i64;
    for (i, a) in args.iter().enumerate() {
        sum += as_int("+", a, i)?;
    }
    Ok(Value::Int(sum))
}

/// `(- a b c ...)`. `(- a)` negates; at least one argument is required.
fn builtin_sub(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("-", "at least 1", 0));
    }
    let first = as_int("-", &args[0], 0)?;
    if args.len() == 1 {
        return Ok(Value::Int(-first));
    }
    let mut result = first;
    for (i, a) in args[1..].iter().enumerate() {
        result -= as_int("-", a, i + 1)?;
    }
    Ok(Value::Int(result))
}

/// `(* a b c ...)`. Identity `1` when called with no arguments.
fn builtin_mul(args: &[Value]) -> Result<Value, EvalError> {
    let mut product = 1i64;
    for (i, a) in args.iter().enumerate() {
        product *= as_int("*", a, i)?;
    }
    Ok(Value::Int(product))
}

/// `(/ a b c ...)`. Left fold, integer division truncated toward zero per
/// the host's native `/`. At least one argument is required.
fn builtin_div(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("/", "at least 1", 0));
    }
    let first = as_int("/", &args[0], 0)?;
    if args.len() == 1 {
        if first == 0 {
            return Err(EvalError::runtime_error("/", "division by zero"));
        }
        return Ok(Value::Int(1 / first));
    }
    let mut result = first;
    for (i, a) in args[1..].iter().enumerate() {
        let divisor = as_int("/", a, i + 1)?;
        if divisor == 0 {
            return Err(EvalError::runtime_error("/", "division by zero"));
        }
        result /= divisor;
    }
    Ok(Value::Int(result))
}

pub fn register(env: &Rc<Environment>) {
    env.define(Rc::from("+"), Value::builtin("+", Rc::new(builtin_add)));
    env.define(Rc::from("-"), Value::builtin("-", Rc::new(builtin_sub)));
    env.define(Rc::from("*"), Value::builtin("*", Rc::new(builtin_mul)));
    env.define(Rc::from("/"), Value::builtin("/", Rc::new(builtin_div)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_variadic() {
        assert!(matches!(
            builtin_add(&[Value::Int(1), Value::Int(2), Value::Int(3)]),
            Ok(Value::Int(6))
        ));
        assert!(matches!(builtin_add(&[]), Ok(Value::Int(0))));
    }

    #[test]
    fn test_sub_unary_negates() {
        assert!(matches!(builtin_sub(&[Value::Int(5)]), Ok(Value::Int(-5))));
    }

    #[test]
    fn test_div_truncates_toward_zero() {
        assert!(matches!(
            builtin_div(&[Value::Int(-7), Value::Int(2)]),
            Ok(Value::Int(-3))
        ));
    }

    #[test]
    fn test_div_by_zero_is_runtime_error() {
        assert!(builtin_div(&[Value::Int(1), Value::Int(0)]).is_err());
    }
}
