// ABOUTME: Evaluator module for executing parsed Lisp expressions

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{Callable, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Entry point. A loop with trampoline: special forms that are in tail
/// position mutate `ast`/`env` and `continue` instead of recursing, so
/// neither deep non-macro tail recursion nor long `do`/`let*`/`if` chains
/// grow the host stack.
pub fn eval(mut ast: Value, mut env: Rc<Environment>) -> Result<Value, EvalError> {
    loop {
        ast = macroexpand(ast, &env)?;

        let items = match &ast {
            Value::List(items, _) if !items.is_empty() => items.clone(),
            Value::List(_, _) => return Ok(ast),
            _ => return eval_ast(&ast, &env),
        };

        if let Value::Sym(s) = &items[0] {
            match s.as_ref() {
                "def!" => {
                    if items.len() != 3 {
                        return Err(EvalError::arity_error("def!", "2", items.len() - 1));
                    }
                    let name = symbol_name("def!", &items[1], 1)?;
                    let val = eval(items[2].clone(), env.clone())?;
                    env.set_root(name, val.clone());
                    return Ok(val);
                }
                "let*" => {
                    if items.len() != 3 {
                        return Err(EvalError::arity_error("let*", "2", items.len() - 1));
                    }
                    let bindings = items[1]
                        .as_seq()
                        .ok_or_else(|| EvalError::type_error("let*", "list or vector", &items[1], 1))?
                        .to_vec();
                    if bindings.len() % 2 != 0 {
                        return Err(EvalError::runtime_error(
                            "let*",
                            "odd number of binding forms",
                        ));
                    }
                    let child = Environment::with_parent(env.clone());
                    let mut i = 0;
                    while i < bindings.len() {
                        let name = symbol_name("let*", &bindings[i], i)?;
                        let val = eval(bindings[i + 1].clone(), child.clone())?;
                        child.define(name, val);
                        i += 2;
                    }
                    ast = items[2].clone();
                    env = child;
                    continue;
                }
                "do" => {
                    if items.len() == 1 {
                        return Ok(Value::Nil);
                    }
                    for item in &items[1..items.len() - 1] {
                        eval(item.clone(), env.clone())?;
                    }
                    ast = items[items.len() - 1].clone();
                    continue;
                }
                "if" => {
                    if items.len() < 3 || items.len() > 4 {
                        return Err(EvalError::arity_error("if", "2-3", items.len() - 1));
                    }
                    let cond = eval(items[1].clone(), env.clone())?;
                    if cond.is_truthy() {
                        ast = items[2].clone();
                    } else if items.len() > 3 {
                        ast = items[3].clone();
                    } else {
                        return Ok(Value::Nil);
                    }
                    continue;
                }
                "fn*" => {
                    if items.len() != 3 {
                        return Err(EvalError::arity_error("fn*", "2", items.len() - 1));
                    }
                    let raw_params = items[1]
                        .as_seq()
                        .ok_or_else(|| EvalError::type_error("fn*", "list or vector", &items[1], 1))?;
                    let params = raw_params
                        .iter()
                        .enumerate()
                        .map(|(i, p)| symbol_name("fn*", p, i))
                        .collect::<Result<Vec<_>, _>>()?;
                    return Ok(Value::Fn(Rc::new(Callable::Closure {
                        params,
                        body: items[2].clone(),
                        env: env.clone(),
                        is_macro: Cell::new(false),
                        meta: RefCell::new(None),
                    })));
                }
                "quote" => {
                    if items.len() != 2 {
                        return Err(EvalError::arity_error("quote", "1", items.len() - 1));
                    }
                    return Ok(items[1].clone());
                }
                "quasiquote" => {
                    if items.len() != 2 {
                        return Err(EvalError::arity_error("quasiquote", "1", items.len() - 1));
                    }
                    ast = quasiquote_expand(&items[1]);
                    continue;
                }
                "quasiquoteexpand" => {
                    if items.len() != 2 {
                        return Err(EvalError::arity_error(
                            "quasiquoteexpand",
                            "1",
                            items.len() - 1,
                        ));
                    }
                    return Ok(quasiquote_expand(&items[1]));
                }
                "defmacro!" => {
                    if items.len() != 3 {
                        return Err(EvalError::arity_error("defmacro!", "2", items.len() - 1));
                    }
                    let name = symbol_name("defmacro!", &items[1], 1)?;
                    let val = eval(items[2].clone(), env.clone())?;
                    match &val {
                        Value::Fn(f) => match &**f {
                            Callable::Closure { is_macro, .. } => is_macro.set(true),
                            Callable::Builtin { .. } => {
                                return Err(EvalError::runtime_error(
                                    "defmacro!",
                                    "value is not a closure",
                                ))
                            }
                        },
                        other => return Err(EvalError::type_error("defmacro!", "closure", other, 2)),
                    }
                    env.set_root(name, val.clone());
                    return Ok(val);
                }
                "macroexpand" => {
                    if items.len() != 2 {
                        return Err(EvalError::arity_error("macroexpand", "1", items.len() - 1));
                    }
                    return macroexpand(items[1].clone(), &env);
                }
                "try*" => {
                    if items.len() < 2 || items.len() > 3 {
                        return Err(EvalError::arity_error("try*", "1-2", items.len() - 1));
                    }
                    return match eval(items[1].clone(), env.clone()) {
                        Ok(v) => Ok(v),
                        Err(e) => eval_catch(&items, e, &env),
                    };
                }
                _ => {}
            }
        }

        let f = eval(items[0].clone(), env.clone())?;
        let mut args = Vec::with_capacity(items.len() - 1);
        for a in &items[1..] {
            args.push(eval(a.clone(), env.clone())?);
        }

        match &f {
            Value::Fn(rc) => match &**rc {
                Callable::Builtin { func, .. } => return func(&args),
                Callable::Closure {
                    params,
                    body,
                    env: closure_env,
                    ..
                } => {
                    let new_env = Environment::for_call(closure_env.clone(), params, &args)?;
                    ast = body.clone();
                    env = new_env;
                    continue;
                }
            },
            _ => return Err(EvalError::NotCallable),
        }
    }
}

/// Evaluates `ast` once with no tail-call loop; used wherever a value must
/// be produced but not left in a position that can reuse the caller's
/// frame (argument evaluation, `def!`'s value, `let*` bindings, etc. all
/// call through here rather than through the trampoline directly).
fn eval_ast(ast: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match ast {
        Value::Sym(s) => env.get(s),
        Value::Vec(items, _) => {
            let evaled = items
                .iter()
                .map(|v| eval(v.clone(), env.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::vector(evaled))
        }
        Value::Map(data, _) => {
            let mut out = crate::value::MapData::new();
            for (k, v) in data.iter() {
                out.insert(k.clone(), eval(v.clone(), env.clone())?);
            }
            Ok(Value::map(out))
        }
        other => Ok(other.clone()),
    }
}

fn symbol_name(func: &str, v: &Value, position: usize) -> Result<Rc<str>, EvalError> {
    match v {
        Value::Sym(s) => Ok(s.clone()),
        other => Err(EvalError::type_error(func, "symbol", other, position)),
    }
}

/// `try*`'s error path: looks for a `(catch* sym body)` as the second
/// operand. A `throw`'d value reaches the handler unchanged; any other
/// host error reaches it as its display string.
fn eval_catch(items: &[Value], err: EvalError, env: &Rc<Environment>) -> Result<Value, EvalError> {
    if items.len() != 3 {
        return Err(err);
    }
    let clause = match items[2].as_seq() {
        Some(c) if c.len() == 3 => c,
        _ => return Err(err),
    };
    match &clause[0] {
        Value::Sym(s) if &**s == "catch*" => {}
        _ => return Err(err),
    }
    let sym = symbol_name("catch*", &clause[1], 1)?;
    let payload = match err {
        EvalError::Throw(v) => v,
        other => Value::str(other.to_string()),
    };
    let catch_env = Environment::with_parent(env.clone());
    catch_env.define(sym, payload);
    eval(clause[2].clone(), catch_env)
}

/// Calls a callable value (builtin or closure) with already-evaluated
/// arguments. Used both by macro expansion (applying the macro closure to
/// its unevaluated call-site arguments) and by higher-order builtins
/// (`apply`, `map`, `swap!`) that must invoke a first-class function value.
pub fn apply_value(f: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match f {
        Value::Fn(rc) => match &**rc {
            Callable::Builtin { func, .. } => func(args),
            Callable::Closure { params, body, env, .. } => {
                let call_env = Environment::for_call(env.clone(), params, args)?;
                eval(body.clone(), call_env)
            }
        },
        _ => Err(EvalError::NotCallable),
    }
}

/// `macroexpand(ast, env)`: while `ast` is a non-empty list whose head is a
/// symbol bound to a closure with the macro flag set, replace `ast` with
/// the result of calling that closure on the unevaluated tail.
pub fn macroexpand(mut ast: Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    loop {
        let items = match &ast {
            Value::List(items, _) if !items.is_empty() => items.clone(),
            _ => return Ok(ast),
        };
        let head = match &items[0] {
            Value::Sym(s) => s,
            _ => return Ok(ast),
        };
        match env.find(head) {
            Some(val) if val.is_macro_closure() => {
                ast = apply_value(&val, &items[1..])?;
            }
            _ => return Ok(ast),
        }
    }
}

/// Pure AST-to-AST rewrite of a quasiquoted form (see design notes: `Vec`
/// passes through unchanged rather than being rewritten to `(vec ...)`).
pub fn quasiquote_expand(ast: &Value) -> Value {
    match ast {
        Value::List(items, _) => {
            if items.is_empty() {
                return ast.clone();
            }
            if let Value::Sym(s) = &items[0] {
                if &**s == "unquote" && items.len() >= 2 {
                    return items[1].clone();
                }
            }
            let elt = &items[0];
            let rest = Value::list(items[1..].to_vec());
            let rest_expanded = quasiquote_expand(&rest);

            if let Value::List(elt_items, _) = elt {
                if !elt_items.is_empty() {
                    if let Value::Sym(s) = &elt_items[0] {
                        if &**s == "splice-unquote" && elt_items.len() >= 2 {
                            return Value::list(vec![
                                Value::sym("concat"),
                                elt_items[1].clone(),
                                rest_expanded,
                            ]);
                        }
                    }
                }
            }

            Value::list(vec![Value::sym("cons"), quasiquote_expand(elt), rest_expanded])
        }
        Value::Map(..) | Value::Sym(_) => Value::list(vec![Value::sym("quote"), ast.clone()]),
        _ => ast.clone(),
    }
}
