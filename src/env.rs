// ABOUTME: Environment module for managing variable bindings and scopes

use crate::error::EvalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<Rc<str>, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Builds a fresh call frame. `binds` is the raw parameter list, which
    /// may contain the literal symbol `&` followed by a single rest-param
    /// name: everything from that point on in `exprs` binds as a `List` to
    /// that name, and binding stops (the variadic tail never itself appears
    /// in `binds` as an ordinary parameter).
    pub fn for_call(
        parent: Rc<Environment>,
        binds: &[Rc<str>],
        exprs: &[Value],
    ) -> Result<Rc<Self>, EvalError> {
        let env = Environment::with_parent(parent);
        let mut i = 0;
        while i < binds.len() {
            if &*binds[i] == "&" {
                let rest_name = binds.get(i + 1).ok_or_else(|| {
                    EvalError::runtime_error("fn*", "'&' must be followed by a parameter name")
                })?;
                let rest = exprs.get(i..).unwrap_or(&[]).to_vec();
                env.define(rest_name.clone(), Value::list(rest));
                return Ok(env);
            }
            let arg = exprs.get(i).cloned().ok_or_else(|| {
                EvalError::arity_error("fn*", binds.len().to_string(), exprs.len())
            })?;
            env.define(binds[i].clone(), arg);
            i += 1;
        }
        if exprs.len() > binds.len() {
            return Err(EvalError::arity_error(
                "fn*",
                binds.len().to_string(),
                exprs.len(),
            ));
        }
        Ok(env)
    }

    /// Defines a binding in THIS scope (doesn't walk parent chain)
    pub fn define(&self, name: Rc<str>, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Looks up a symbol in THIS scope and parent scopes recursively,
    /// returning `None` if unbound anywhere in the chain.
    pub fn find(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.find(name))
    }

    /// As `find`, but fails with `'<name>' not found` when unbound.
    pub fn get(&self, name: &str) -> Result<Value, EvalError> {
        self.find(name)
            .ok_or_else(|| EvalError::UndefinedSymbol(name.to_string()))
    }

    /// Stores in this frame, overwriting any existing binding of the same
    /// name in this frame only.
    pub fn set(&self, name: Rc<str>, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Walks to the topmost ancestor (or `self` if there is none) and
    /// stores there. Used by `def!` and `defmacro!`, which always write to
    /// the root environment regardless of the current frame.
    pub fn set_root(&self, name: Rc<str>, value: Value) {
        match &self.parent {
            Some(parent) => parent.set_root(name, value),
            None => self.set(name, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define(Rc::from("x"), Value::Int(42));
        assert!(matches!(env.get("x"), Ok(Value::Int(42))));
    }

    #[test]
    fn test_undefined_symbol() {
        let env = Environment::new();
        assert!(matches!(env.get("undefined"), Err(EvalError::UndefinedSymbol(_))));
    }

    #[test]
    fn test_shadowing() {
        let parent = Environment::new();
        parent.define(Rc::from("x"), Value::Int(42));
        let child = Environment::with_parent(parent);
        child.define(Rc::from("x"), Value::Int(100));
        assert!(matches!(child.get("x"), Ok(Value::Int(100))));
    }

    #[test]
    fn test_parent_lookup() {
        let parent = Environment::new();
        parent.define(Rc::from("x"), Value::Int(42));
        let child = Environment::with_parent(parent);
        assert!(matches!(child.get("x"), Ok(Value::Int(42))));
    }

    #[test]
    fn test_set_root_targets_topmost_frame() {
        let root = Environment::new();
        let child = Environment::with_parent(root.clone());
        let grandchild = Environment::with_parent(child.clone());

        grandchild.set_root(Rc::from("x"), Value::Int(1));

        assert!(matches!(root.find("x"), Some(Value::Int(1))));
        assert!(child.bindings.borrow().get("x").is_none());
    }

    #[test]
    fn test_variadic_binding() {
        let root = Environment::new();
        let binds: Vec<Rc<str>> = vec![Rc::from("&"), Rc::from("xs")];
        let exprs = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
        let env = Environment::for_call(root, &binds, &exprs).unwrap();
        match env.find("xs") {
            Some(Value::List(items, _)) => assert_eq!(items.len(), 3),
            _ => panic!("expected rest list"),
        }
    }

    #[test]
    fn test_arity_mismatch_on_too_few_args() {
        let root = Environment::new();
        let binds: Vec<Rc<str>> = vec![Rc::from("a"), Rc::from("b")];
        let exprs = vec![Value::Int(1)];
        assert!(Environment::for_call(root, &binds, &exprs).is_err());
    }
}
