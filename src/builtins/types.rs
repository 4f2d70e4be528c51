// ABOUTME: Predicates and constructors: nil? true? false? symbol? keyword?
// ABOUTME: string? number? fn?, and the symbol/keyword constructors

//! Type predicates and the `symbol`/`keyword` constructors
//!
//! The fixed-arity predicates all share one `predicate` helper — each just
//! names itself and supplies a `Value -> bool` test.
//!
//! - `nil?`/`true?`/`false?`: test the corresponding singleton values
//! - `symbol?`/`keyword?`/`string?`/`number?`/`fn?`: test a value's variant
//! - `symbol`/`keyword`: build a `Sym`/`Kw` from a string (or, for
//!   `keyword`, idempotently from a keyword)

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

/// Builds a fixed-arity (exactly 1 argument) predicate builtin named `name`
/// from a plain `Value -> bool` test.
fn predicate(name: &'static str, test: fn(&Value) -> bool) -> Value {
    Value::builtin(
        name,
        Rc::new(move |args: &[Value]| {
            if args.len() != 1 {
                return Err(EvalError::arity_error(name, "1", args.len()));
            }
            Ok(Value::Bool(test(&args[0])))
        }),
    )
}

/// `(symbol s)`: string to symbol.
fn builtin_symbol(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("symbol", "1", args.len()));
    }
    match &args[0] {
        Value::Str(s) => Ok(Value::sym(s.as_ref())),
        other => Err(EvalError::type_error("symbol", "string", other, 0)),
    }
}

/// `(keyword s)`: string or keyword to keyword; idempotent on keyword.
fn builtin_keyword(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("keyword", "1", args.len()));
    }
    match &args[0] {
        Value::Str(s) => Ok(Value::kw(s.as_ref())),
        Value::Kw(_) => Ok(args[0].clone()),
        other => Err(EvalError::type_error("keyword", "string or keyword", other, 0)),
    }
}

pub fn register(env: &Rc<Environment>) {
    env.define(Rc::from("nil?"), predicate("nil?", |v| matches!(v, Value::Nil)));
    env.define(Rc::from("true?"), predicate("true?", |v| matches!(v, Value::Bool(true))));
    env.define(Rc::from("false?"), predicate("false?", |v| matches!(v, Value::Bool(false))));
    env.define(
        Rc::from("symbol?"),
        predicate("symbol?", |v| matches!(v, Value::Sym(_))),
    );
    env.define(
        Rc::from("keyword?"),
        predicate("keyword?", |v| matches!(v, Value::Kw(_))),
    );
    env.define(
        Rc::from("string?"),
        predicate("string?", |v| matches!(v, Value::Str(_))),
    );
    env.define(
        Rc::from("number?"),
        predicate("number?", |v| matches!(v, Value::Int(_))),
    );
    env.define(Rc::from("fn?"), predicate("fn?", |v| matches!(v, Value::Fn(_))));
    env.define(Rc::from("symbol"), Value::builtin("symbol", Rc::new(builtin_symbol)));
    env.define(Rc::from("keyword"), Value::builtin("keyword", Rc::new(builtin_keyword)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_and_keyword_mutually_exclusive() {
        assert!(!matches!(Value::kw("a"), Value::Sym(_)));
        assert!(!matches!(Value::sym("a"), Value::Kw(_)));
    }

    #[test]
    fn test_keyword_constructor_idempotent() {
        let kw = Value::kw("a");
        let result = builtin_keyword(&[kw.clone()]).unwrap();
        assert!(matches!(result, Value::Kw(s) if &*s == "a"));
    }

    #[test]
    fn test_symbol_constructor_from_string() {
        let result = builtin_symbol(&[Value::str("foo")]).unwrap();
        assert!(matches!(result, Value::Sym(s) if &*s == "foo"));
    }
}
