// ABOUTME: Collection builtins: constructors, predicates, and sequence ops

//! Sequence operations: constructors, predicates, and `List`/`Vec` traversal
//!
//! Covers the two sequence variants (`List`, `Vec`) and the sequence-shaped
//! view over `Map`/`Nil`/`Str` that several of these operations accept.
//!
//! - `list`/`list?`: construct a list / test for one
//! - `vec`/`vector`/`vector?`: coerce a sequence to `Vec` / construct one
//!   from arguments / test for one
//! - `sequential?`/`map?`: test for `List`-or-`Vec` / `Map`
//! - `hash-map`: construct a `Map` from alternating key-value arguments
//! - `empty?`/`count`: emptiness and length, `Nil` counting as empty
//! - `nth`/`first`/`rest`: positional and head/tail access
//! - `cons`/`concat`/`seq`/`conj`: list construction, concatenation,
//!   coercion to a canonical sequence, and variant-aware append/prepend

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

/// `(list a b c ...)`: builds a `List` from its arguments directly.
fn builtin_list(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::list(args.to_vec()))
}

/// `(list? x)`: true only for the `List` variant, not `Vec`.
fn builtin_list_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("list?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::List(..))))
}

/// `(vec coll)` / `(vector ...)`: `vec` coerces a sequence, `vector` builds
/// from its arguments directly.
fn builtin_vec(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("vec", "1", args.len()));
    }
    let items = args[0]
        .as_seq()
        .ok_or_else(|| EvalError::type_error("vec", "list or vector", &args[0], 0))?;
    Ok(Value::vector(items.to_vec()))
}

fn builtin_vector(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::vector(args.to_vec()))
}

/// `(vector? x)`: true only for the `Vec` variant, not `List`.
fn builtin_vector_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("vector?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Vec(..))))
}

/// `(sequential? x)`: true for `List` or `Vec`, false otherwise (including
/// `Nil`, unlike `as_seq`'s treatment of `Nil` as the empty sequence).
fn builtin_sequential_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("sequential?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::List(..) | Value::Vec(..))))
}

/// `(hash-map k v ...)`: builds a `Map` from alternating key/value
/// arguments; the argument count must be even.
fn builtin_hash_map(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() % 2 != 0 {
        return Err(EvalError::runtime_error("hash-map", "odd number of arguments"));
    }
    let mut map = crate::value::MapData::new();
    let mut it = args.iter();
    while let (Some(k), Some(v)) = (it.next(), it.next()) {
        map.insert(crate::value::MapKey::from_value(k)?, v.clone());
    }
    Ok(Value::map(map))
}

/// `(map? x)`: true only for the `Map` variant.
fn builtin_map_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("map?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Map(..))))
}

/// `(empty? coll)`: length or 0 for `Nil`, per `count`'s rule.
fn builtin_empty_p(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("empty?", "1", args.len()));
    }
    match &args[0] {
        Value::Map(m, _) => Ok(Value::Bool(m.is_empty())),
        other => {
            let items = other
                .as_seq()
                .ok_or_else(|| EvalError::type_error("empty?", "sequence", other, 0))?;
            Ok(Value::Bool(items.is_empty()))
        }
    }
}

/// `(count coll)`: length, or `0` for `Nil`.
fn builtin_count(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("count", "1", args.len()));
    }
    let n = match &args[0] {
        Value::Nil => 0,
        Value::Map(m, _) => m.len(),
        other => other
            .as_seq()
            .ok_or_else(|| EvalError::type_error("count", "sequence", other, 0))?
            .len(),
    };
    Ok(Value::Int(n as i64))
}

/// `(nth coll i)`: fails on out-of-range.
fn builtin_nth(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("nth", "2", args.len()));
    }
    let items = args[0]
        .as_seq()
        .ok_or_else(|| EvalError::type_error("nth", "list or vector", &args[0], 0))?;
    let idx = match &args[1] {
        Value::Int(n) => *n,
        other => return Err(EvalError::type_error("nth", "int", other, 1)),
    };
    if idx < 0 || idx as usize >= items.len() {
        return Err(EvalError::runtime_error("nth", "index out of range"));
    }
    Ok(items[idx as usize].clone())
}

/// `(first coll)`: nil if empty or nil.
fn builtin_first(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("first", "1", args.len()));
    }
    let items = args[0]
        .as_seq()
        .ok_or_else(|| EvalError::type_error("first", "list or vector", &args[0], 0))?;
    Ok(items.first().cloned().unwrap_or(Value::Nil))
}

/// `(rest coll)`: empty list if empty or nil.
fn builtin_rest(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("rest", "1", args.len()));
    }
    let items = args[0]
        .as_seq()
        .ok_or_else(|| EvalError::type_error("rest", "list or vector", &args[0], 0))?;
    Ok(Value::list(items.iter().skip(1).cloned().collect()))
}

/// `(cons x coll)`: prepends `x` to `coll`, always yielding a `List`.
fn builtin_cons(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("cons", "2", args.len()));
    }
    let items = args[1]
        .as_seq()
        .ok_or_else(|| EvalError::type_error("cons", "list or vector", &args[1], 1))?;
    let mut result = Vec::with_capacity(items.len() + 1);
    result.push(args[0].clone());
    result.extend_from_slice(items);
    Ok(Value::list(result))
}

/// `(concat coll ...)`: appends every sequence argument into one `List`.
fn builtin_concat(args: &[Value]) -> Result<Value, EvalError> {
    let mut result = Vec::new();
    for (i, a) in args.iter().enumerate() {
        let items = a
            .as_seq()
            .ok_or_else(|| EvalError::type_error("concat", "list or vector", a, i))?;
        result.extend_from_slice(items);
    }
    Ok(Value::list(result))
}

/// `(seq coll)`: coerce to list; nil for empty; a string splits into
/// single-character strings.
fn builtin_seq(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("seq", "1", args.len()));
    }
    match &args[0] {
        Value::Nil => Ok(Value::Nil),
        Value::Str(s) => {
            if s.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(Value::list(s.chars().map(Value::str).collect()))
            }
        }
        other => {
            let items = other
                .as_seq()
                .ok_or_else(|| EvalError::type_error("seq", "list, vector, or string", other, 0))?;
            if items.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(Value::list(items.to_vec()))
            }
        }
    }
}

/// `(conj coll x ...)`: prepends to a `List`, appends to a `Vec`.
fn builtin_conj(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("conj", "at least 1", 0));
    }
    match &args[0] {
        Value::List(items, _) => {
            let mut result: Vec<Value> = args[1..].iter().rev().cloned().collect();
            result.extend((**items).clone());
            Ok(Value::list(result))
        }
        Value::Vec(items, _) => {
            let mut result = (**items).clone();
            result.extend_from_slice(&args[1..]);
            Ok(Value::vector(result))
        }
        other => Err(EvalError::type_error("conj", "list or vector", other, 0)),
    }
}

pub fn register(env: &Rc<Environment>) {
    env.define(Rc::from("list"), Value::builtin("list", Rc::new(builtin_list)));
    env.define(Rc::from("list?"), Value::builtin("list?", Rc::new(builtin_list_p)));
    env.define(Rc::from("vec"), Value::builtin("vec", Rc::new(builtin_vec)));
    env.define(Rc::from("vector"), Value::builtin("vector", Rc::new(builtin_vector)));
    env.define(
        Rc::from("vector?"),
        Value::builtin("vector?", Rc::new(builtin_vector_p)),
    );
    env.define(
        Rc::from("sequential?"),
        Value::builtin("sequential?", Rc::new(builtin_sequential_p)),
    );
    env.define(
        Rc::from("hash-map"),
        Value::builtin("hash-map", Rc::new(builtin_hash_map)),
    );
    env.define(Rc::from("map?"), Value::builtin("map?", Rc::new(builtin_map_p)));
    env.define(Rc::from("empty?"), Value::builtin("empty?", Rc::new(builtin_empty_p)));
    env.define(Rc::from("count"), Value::builtin("count", Rc::new(builtin_count)));
    env.define(Rc::from("nth"), Value::builtin("nth", Rc::new(builtin_nth)));
    env.define(Rc::from("first"), Value::builtin("first", Rc::new(builtin_first)));
    env.define(Rc::from("rest"), Value::builtin("rest", Rc::new(builtin_rest)));
    env.define(Rc::from("cons"), Value::builtin("cons", Rc::new(builtin_cons)));
    env.define(Rc::from("concat"), Value::builtin("concat", Rc::new(builtin_concat)));
    env.define(Rc::from("seq"), Value::builtin("seq", Rc::new(builtin_seq)));
    env.define(Rc::from("conj"), Value::builtin("conj", Rc::new(builtin_conj)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::values_equal;

    #[test]
    fn test_count_nil_is_zero() {
        assert!(matches!(builtin_count(&[Value::Nil]), Ok(Value::Int(0))));
    }

    #[test]
    fn test_nth_out_of_range_errors() {
        let list = Value::list(vec![Value::Int(1)]);
        assert!(builtin_nth(&[list, Value::Int(5)]).is_err());
    }

    #[test]
    fn test_first_and_rest_on_empty() {
        assert!(matches!(builtin_first(&[Value::Nil]), Ok(Value::Nil)));
        let rest = builtin_rest(&[Value::Nil]).unwrap();
        assert!(values_equal(&rest, &Value::list(vec![])));
    }

    #[test]
    fn test_conj_prepends_list_appends_vec() {
        let list = builtin_conj(&[Value::list(vec![Value::Int(1)]), Value::Int(2)]).unwrap();
        assert!(values_equal(&list, &Value::list(vec![Value::Int(2), Value::Int(1)])));
        let vec = builtin_conj(&[Value::vector(vec![Value::Int(1)]), Value::Int(2)]).unwrap();
        assert!(values_equal(&vec, &Value::vector(vec![Value::Int(1), Value::Int(2)])));
    }

    #[test]
    fn test_seq_splits_string_into_chars() {
        let result = builtin_seq(&[Value::str("ab")]).unwrap();
        assert!(values_equal(
            &result,
            &Value::list(vec![Value::str("a"), Value::str("b")])
        ));
    }
}
