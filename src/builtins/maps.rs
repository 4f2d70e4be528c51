// ABOUTME: Map builtins: assoc, dissoc, get, contains?, keys, vals

//! Map operations: `assoc`, `dissoc`, `get`, `contains?`, `keys`, `vals`
//!
//! All mutators return a shallow copy; the argument map is never modified.
//!
//! - `assoc`: add or overwrite key/value pairs
//! - `dissoc`: remove keys
//! - `get`: look up a key, with an optional default
//! - `contains?`: test key presence
//! - `keys`/`vals`: list a map's keys / values

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{MapKey, Value};
use std::rc::Rc;

fn as_map<'a>(func: &str, v: &'a Value, position: usize) -> Result<&'a crate::value::MapData, EvalError> {
    match v {
        Value::Map(m, _) => Ok(m),
        other => Err(EvalError::type_error(func, "map", other, position)),
    }
}

/// `(assoc m k v ...)`: a shallow-copied map with the given pairs added or
/// overwritten.
fn builtin_assoc(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("assoc", "at least 1", 0));
    }
    let mut map = as_map("assoc", &args[0], 0)?.clone();
    if (args.len() - 1) % 2 != 0 {
        return Err(EvalError::runtime_error("assoc", "odd number of key/value arguments"));
    }
    let mut it = args[1..].iter();
    while let (Some(k), Some(v)) = (it.next(), it.next()) {
        map.insert(MapKey::from_value(k)?, v.clone());
    }
    Ok(Value::map(map))
}

/// `(dissoc m k ...)`: a shallow-copied map with the given keys removed.
fn builtin_dissoc(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("dissoc", "at least 1", 0));
    }
    let mut map = as_map("dissoc", &args[0], 0)?.clone();
    for k in &args[1..] {
        map.remove(&MapKey::from_value(k)?);
    }
    Ok(Value::map(map))
}

/// `(get m k)` / `(get m k default)`: nil if missing, nil-safe when `m` is
/// `Nil`.
fn builtin_get(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 || args.len() > 3 {
        return Err(EvalError::arity_error("get", "2-3", args.len()));
    }
    let default = args.get(2).cloned().unwrap_or(Value::Nil);
    if matches!(args[0], Value::Nil) {
        return Ok(default);
    }
    let map = as_map("get", &args[0], 0)?;
    let key = MapKey::from_value(&args[1])?;
    Ok(map.get(&key).cloned().unwrap_or(default))
}

/// `(contains? m k)`: false (not an error) when `m` is `Nil`.
fn builtin_contains_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("contains?", "2", args.len()));
    }
    if matches!(args[0], Value::Nil) {
        return Ok(Value::Bool(false));
    }
    let map = as_map("contains?", &args[0], 0)?;
    let key = MapKey::from_value(&args[1])?;
    Ok(Value::Bool(map.contains_key(&key)))
}

/// `(keys m)`: a `List` of the map's keys, in unspecified order.
fn builtin_keys(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("keys", "1", args.len()));
    }
    let map = as_map("keys", &args[0], 0)?;
    Ok(Value::list(map.keys().map(MapKey::to_value).collect()))
}

/// `(vals m)`: a `List` of the map's values, in unspecified order.
fn builtin_vals(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("vals", "1", args.len()));
    }
    let map = as_map("vals", &args[0], 0)?;
    Ok(Value::list(map.values().cloned().collect()))
}

pub fn register(env: &Rc<Environment>) {
    env.define(Rc::from("assoc"), Value::builtin("assoc", Rc::new(builtin_assoc)));
    env.define(Rc::from("dissoc"), Value::builtin("dissoc", Rc::new(builtin_dissoc)));
    env.define(Rc::from("get"), Value::builtin("get", Rc::new(builtin_get)));
    env.define(
        Rc::from("contains?"),
        Value::builtin("contains?", Rc::new(builtin_contains_p)),
    );
    env.define(Rc::from("keys"), Value::builtin("keys", Rc::new(builtin_keys)));
    env.define(Rc::from("vals"), Value::builtin("vals", Rc::new(builtin_vals)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(pairs: &[(Value, Value)]) -> Value {
        let mut m = crate::value::MapData::new();
        for (k, v) in pairs {
            m.insert(MapKey::from_value(k).unwrap(), v.clone());
        }
        Value::map(m)
    }

    #[test]
    fn test_get_missing_key_is_nil() {
        let m = map_of(&[(Value::kw("a"), Value::Int(1))]);
        assert!(matches!(builtin_get(&[m, Value::kw("b")]), Ok(Value::Nil)));
    }

    #[test]
    fn test_get_nil_map_is_nil_safe() {
        assert!(matches!(builtin_get(&[Value::Nil, Value::kw("a")]), Ok(Value::Nil)));
    }

    #[test]
    fn test_assoc_does_not_mutate_original() {
        let m = map_of(&[(Value::kw("a"), Value::Int(1))]);
        let m2 = builtin_assoc(&[m.clone(), Value::kw("b"), Value::Int(2)]).unwrap();
        assert!(matches!(builtin_get(&[m, Value::kw("b")]), Ok(Value::Nil)));
        assert!(matches!(builtin_get(&[m2, Value::kw("b")]), Ok(Value::Int(2))));
    }

    #[test]
    fn test_dissoc_removes_key() {
        let m = map_of(&[(Value::kw("a"), Value::Int(1)), (Value::kw("b"), Value::Int(2))]);
        let m2 = builtin_dissoc(&[m, Value::kw("a")]).unwrap();
        assert!(matches!(builtin_contains_p(&[m2, Value::kw("a")]), Ok(Value::Bool(false))));
    }
}
