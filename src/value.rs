// ABOUTME: Value types representing Lisp data structures and expressions

use crate::env::Environment;
use crate::error::EvalError;
use crate::printer;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A host-implemented primitive. Boxed behind `Rc` rather than a bare `fn`
/// pointer so that a handful of builtins (`eval`, for instance) can close
/// over the root environment instead of only ever seeing their call-site
/// arguments.
pub type BuiltinFn = Rc<dyn Fn(&[Value]) -> Result<Value, EvalError>>;

/// Optional metadata slot carried by `List`, `Vec`, `Map`, and `Fn`.
pub type Meta = Option<Rc<Value>>;

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Str(Rc<str>),
    Sym(Rc<str>),
    Kw(Rc<str>),
    List(Rc<Vec<Value>>, Meta),
    Vec(Rc<Vec<Value>>, Meta),
    Map(Rc<MapData>, Meta),
    Atom(Rc<RefCell<Value>>),
    Fn(Rc<Callable>),
}

/// Map keys are restricted to the hashable value variants named in the data
/// model: strings, keywords, symbols, ints, and nil/bool.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Nil,
    Bool(bool),
    Int(i64),
    Str(Rc<str>),
    Sym(Rc<str>),
    Kw(Rc<str>),
}

impl MapKey {
    pub fn from_value(v: &Value) -> Result<MapKey, EvalError> {
        match v {
            Value::Nil => Ok(MapKey::Nil),
            Value::Bool(b) => Ok(MapKey::Bool(*b)),
            Value::Int(n) => Ok(MapKey::Int(*n)),
            Value::Str(s) => Ok(MapKey::Str(s.clone())),
            Value::Sym(s) => Ok(MapKey::Sym(s.clone())),
            Value::Kw(s) => Ok(MapKey::Kw(s.clone())),
            other => Err(EvalError::type_error(
                "map key",
                "string, keyword, symbol, int, nil, or bool",
                other,
                0,
            )),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Nil => Value::Nil,
            MapKey::Bool(b) => Value::Bool(*b),
            MapKey::Int(n) => Value::Int(*n),
            MapKey::Str(s) => Value::Str(s.clone()),
            MapKey::Sym(s) => Value::Sym(s.clone()),
            MapKey::Kw(s) => Value::Kw(s.clone()),
        }
    }
}

pub type MapData = HashMap<MapKey, Value>;

/// Either a host primitive or a user-defined closure. The macro flag lives
/// on the closure itself (a `Cell`, toggled exactly once by `defmacro!`)
/// rather than as a distinct value variant, per the design notes: macros are
/// ordinary closures with a flag.
pub enum Callable {
    Builtin {
        name: &'static str,
        func: BuiltinFn,
        meta: RefCell<Meta>,
    },
    Closure {
        /// Raw parameter list, possibly containing the literal symbol `&`
        /// followed by a rest-parameter name (see `Environment::new`).
        params: Vec<Rc<str>>,
        body: Value,
        env: Rc<Environment>,
        is_macro: Cell<bool>,
        meta: RefCell<Meta>,
    },
}

impl Callable {
    fn is_macro_flag(&self) -> bool {
        match self {
            Callable::Closure { is_macro, .. } => is_macro.get(),
            Callable::Builtin { .. } => false,
        }
    }
}

impl Value {
    pub fn sym(s: impl AsRef<str>) -> Value {
        Value::Sym(Rc::from(s.as_ref()))
    }

    pub fn str(s: impl AsRef<str>) -> Value {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn kw(s: impl AsRef<str>) -> Value {
        Value::Kw(Rc::from(s.as_ref()))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items), None)
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Vec(Rc::new(items), None)
    }

    pub fn map(data: MapData) -> Value {
        Value::Map(Rc::new(data), None)
    }

    pub fn builtin(name: &'static str, func: BuiltinFn) -> Value {
        Value::Fn(Rc::new(Callable::Builtin {
            name,
            func,
            meta: RefCell::new(None),
        }))
    }

    /// Items of a `List` or `Vec`; `Nil` counts as the empty sequence.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::List(items, _) | Value::Vec(items, _) => Some(items),
            Value::Nil => Some(&[]),
            _ => None,
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, Value::List(..) | Value::Vec(..) | Value::Nil)
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_macro_closure(&self) -> bool {
        match self {
            Value::Fn(f) => f.is_macro_flag(),
            _ => false,
        }
    }

    pub fn meta(&self) -> Value {
        let slot = match self {
            Value::List(_, m) | Value::Vec(_, m) | Value::Map(_, m) => m.clone(),
            Value::Fn(f) => match &**f {
                Callable::Closure { meta, .. } | Callable::Builtin { meta, .. } => {
                    meta.borrow().clone()
                }
            },
            _ => None,
        };
        slot.map(|m| (*m).clone()).unwrap_or(Value::Nil)
    }

    /// A shallow copy of `self` with `meta` attached as its new metadata
    /// slot. The original value is untouched.
    pub fn with_meta(&self, meta: Value) -> Result<Value, EvalError> {
        let meta = Rc::new(meta);
        match self {
            Value::List(items, _) => Ok(Value::List(items.clone(), Some(meta))),
            Value::Vec(items, _) => Ok(Value::Vec(items.clone(), Some(meta))),
            Value::Map(items, _) => Ok(Value::Map(items.clone(), Some(meta))),
            Value::Fn(f) => match &**f {
                Callable::Closure {
                    params, body, env, ..
                } => Ok(Value::Fn(Rc::new(Callable::Closure {
                    params: params.clone(),
                    body: body.clone(),
                    env: env.clone(),
                    is_macro: Cell::new(f.is_macro_flag()),
                    meta: RefCell::new(Some(meta)),
                }))),
                Callable::Builtin { name, func, .. } => Ok(Value::Fn(Rc::new(Callable::Builtin {
                    name: *name,
                    func: func.clone(),
                    meta: RefCell::new(Some(meta)),
                }))),
            },
            other => Err(EvalError::type_error(
                "with-meta",
                "list, vector, map, or function",
                other,
                0,
            )),
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Sym(_) => "symbol",
            Value::Kw(_) => "keyword",
            Value::List(..) => "list",
            Value::Vec(..) => "vector",
            Value::Map(..) => "map",
            Value::Atom(_) => "atom",
            Value::Fn(_) => "function",
        }
        .to_string()
    }
}

/// Structural equality per §3: `List`/`Vec` compare cross-variant by
/// pairwise element equality; `Map`s compare by keyset and pairwise value
/// equality; `Atom`s and `Fn`s compare by identity.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Sym(x), Value::Sym(y)) => x == y,
        (Value::Kw(x), Value::Kw(y)) => x == y,
        (Value::Atom(x), Value::Atom(y)) => Rc::ptr_eq(x, y),
        (Value::Fn(x), Value::Fn(y)) => Rc::ptr_eq(x, y),
        (Value::Map(x, _), Value::Map(y, _)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|v2| values_equal(v, v2)))
        }
        _ => match (a.as_seq(), b.as_seq()) {
            (Some(xs), Some(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| values_equal(x, y))
            }
            _ => false,
        },
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", printer::pr_str(self, true))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", printer::pr_str(self, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_and_bool_display() {
        assert_eq!(format!("{}", Value::Nil), "nil");
        assert_eq!(format!("{}", Value::Bool(true)), "true");
        assert_eq!(format!("{}", Value::Bool(false)), "false");
    }

    #[test]
    fn test_list_vs_vector_distinct_variants() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let vector = Value::vector(vec![Value::Int(1), Value::Int(2)]);
        assert!(matches!(list, Value::List(..)));
        assert!(matches!(vector, Value::Vec(..)));
    }

    #[test]
    fn test_list_vector_cross_equal() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let vector = Value::vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(values_equal(&list, &vector));
    }

    #[test]
    fn test_keyword_not_symbol_or_string() {
        let kw = Value::kw("foo");
        let sym = Value::sym("foo");
        let s = Value::str("foo");
        assert!(!values_equal(&kw, &sym));
        assert!(!values_equal(&kw, &s));
    }

    #[test]
    fn test_atom_identity_equality() {
        let a = Value::Atom(Rc::new(RefCell::new(Value::Int(1))));
        let b = Value::Atom(Rc::new(RefCell::new(Value::Int(1))));
        let c = a.clone();
        assert!(!values_equal(&a, &b));
        assert!(values_equal(&a, &c));
    }

    #[test]
    fn test_with_meta_does_not_mutate_original() {
        let list = Value::list(vec![Value::Int(1)]);
        let tagged = list.with_meta(Value::kw("tag")).unwrap();
        assert!(matches!(list.meta(), Value::Nil));
        assert!(values_equal(&tagged.meta(), &Value::kw("tag")));
    }
}
