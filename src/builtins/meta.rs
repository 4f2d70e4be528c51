// ABOUTME: Metadata builtins: meta, with-meta

//! Metadata accessors: `meta`, `with-meta`
//!
//! Thin wrappers over `Value::meta`/`Value::with_meta` — see there for the
//! storage details.

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

/// `(meta x)`: `x`'s attached metadata, or `nil` if none.
fn builtin_meta(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("meta", "1", args.len()));
    }
    Ok(args[0].meta())
}

/// `(with-meta x m)`: a shallow copy of `x` with `m` as its new metadata.
fn builtin_with_meta(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("with-meta", "2", args.len()));
    }
    args[0].with_meta(args[1].clone())
}

pub fn register(env: &Rc<Environment>) {
    env.define(Rc::from("meta"), Value::builtin("meta", Rc::new(builtin_meta)));
    env.define(
        Rc::from("with-meta"),
        Value::builtin("with-meta", Rc::new(builtin_with_meta)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::values_equal;

    #[test]
    fn test_meta_defaults_to_nil() {
        let list = Value::list(vec![Value::Int(1)]);
        assert!(matches!(builtin_meta(&[list]), Ok(Value::Nil)));
    }

    #[test]
    fn test_with_meta_roundtrip() {
        let list = Value::list(vec![Value::Int(1)]);
        let tagged = builtin_with_meta(&[list, Value::kw("tag")]).unwrap();
        let m = builtin_meta(&[tagged]).unwrap();
        assert!(values_equal(&m, &Value::kw("tag")));
    }
}
