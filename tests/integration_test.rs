// ABOUTME: End-to-end tests over the full tokenizer -> reader -> eval -> printer pipeline

use lispcore::env::Environment;
use lispcore::eval::eval;
use lispcore::printer::pr_str;
use lispcore::reader::read_str;
use lispcore::value::{values_equal, Value};
use std::rc::Rc;

fn setup() -> Rc<Environment> {
    let env = Environment::new();
    lispcore::builtins::register(&env, &[]);
    for form in lispcore::reader::read_all(include_str!("../stdlib/core.lisp")).unwrap() {
        eval(form, env.clone()).unwrap();
    }
    env
}

fn run(src: &str, env: &Rc<Environment>) -> Value {
    eval(read_str(src).unwrap(), env.clone()).unwrap_or_else(|e| panic!("eval error for {src:?}: {e}"))
}

fn run_all(src: &str, env: &Rc<Environment>) -> Value {
    let mut result = Value::Nil;
    for form in lispcore::reader::read_all(src).unwrap() {
        result = eval(form, env.clone()).unwrap_or_else(|e| panic!("eval error: {e}"));
    }
    result
}

#[test]
fn test_end_to_end_arithmetic() {
    let env = setup();
    assert!(matches!(run("(+ 1 2 3)", &env), Value::Int(6)));
}

#[test]
fn test_end_to_end_let_sees_outer_def() {
    let env = setup();
    let result = run_all("(def! x 10) (let* (x 20 y (+ x 1)) (+ x y))", &env);
    assert!(matches!(result, Value::Int(41)));
}

#[test]
fn test_end_to_end_variadic_closure() {
    let env = setup();
    let result = run("((fn* (& xs) (count xs)) 1 2 3 4)", &env);
    assert!(matches!(result, Value::Int(4)));
}

#[test]
fn test_end_to_end_map_over_list() {
    let env = setup();
    let result = run("(map (fn* (n) (* n n)) (list 1 2 3))", &env);
    assert!(values_equal(
        &result,
        &Value::list(vec![Value::Int(1), Value::Int(4), Value::Int(9)])
    ));
}

#[test]
fn test_end_to_end_macro_unless() {
    let env = setup();
    let result = run_all(
        "(defmacro! unless (fn* (p a b) `(if ~p ~b ~a))) (unless false 1 2)",
        &env,
    );
    assert!(matches!(result, Value::Int(1)));
}

#[test]
fn test_end_to_end_swap_sequence() {
    let env = setup();
    let result = run_all(
        "(def! a (atom 0)) (swap! a (fn* (v) (+ v 1))) (swap! a (fn* (v) (+ v 1))) @a",
        &env,
    );
    assert!(matches!(result, Value::Int(2)));
}

#[test]
fn test_reader_printer_round_trip_readable() {
    let env = setup();
    for src in [
        "nil", "true", "false", "42", "-7", "\"a\\nb\"", ":kw", "(1 2 3)", "[1 2 3]",
    ] {
        let v = run(src, &env);
        let printed = pr_str(&v, true);
        let reparsed = read_str(&printed).unwrap();
        assert!(values_equal(&v, &reparsed), "round trip failed for {src}");
    }
}

#[test]
fn test_tokenizer_totality_unclosed_is_eof() {
    assert!(read_str("(1 2").is_err());
    assert!(read_str("\"abc").is_err());
}

#[test]
fn test_tail_call_safety_deep_recursion() {
    let env = setup();
    run("(def! f (fn* (n acc) (if (= n 0) acc (f (- n 1) (+ acc 1)))))", &env);
    let result = run("(f 100000 0)", &env);
    assert!(matches!(result, Value::Int(100000)));
}

#[test]
fn test_closure_captures_let_binding() {
    let env = setup();
    let result = run("((let* (a 1) (fn* () a)))", &env);
    assert!(matches!(result, Value::Int(1)));
}

#[test]
fn test_macro_hygiene_global_binding_caller_env() {
    let env = setup();
    run_all("(defmacro! unless (fn* (p a b) `(if ~p ~b ~a)))", &env);
    let result = run("(let* (p false) (unless p 1 2))", &env);
    assert!(matches!(result, Value::Int(1)));
}

#[test]
fn test_quasiquote_laws() {
    let env = setup();
    assert!(values_equal(
        &run("`(1 ~(+ 1 1) 3)", &env),
        &Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    ));
    assert!(values_equal(
        &run("`(1 ~@(list 2 3) 4)", &env),
        &Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)])
    ));
    assert!(values_equal(&run("`a", &env), &Value::list(vec![Value::sym("quote"), Value::sym("a")])));
}

#[test]
fn test_equality_across_sequence_variants() {
    let env = setup();
    assert!(matches!(run("(= (list 1 2 3) [1 2 3])", &env), Value::Bool(true)));
}

#[test]
fn test_try_catch_throw_round_trip() {
    let env = setup();
    let result = run("(try* (throw {:k 1}) (catch* e (get e :k)))", &env);
    assert!(matches!(result, Value::Int(1)));
}

#[test]
fn test_cond_stdlib_macro() {
    let env = setup();
    let result = run("(cond false 1 true 2)", &env);
    assert!(matches!(result, Value::Int(2)));
}

#[test]
fn test_not_stdlib_fn() {
    let env = setup();
    assert!(matches!(run("(not false)", &env), Value::Bool(true)));
    assert!(matches!(run("(not nil)", &env), Value::Bool(true)));
    assert!(matches!(run("(not 0)", &env), Value::Bool(false)));
}

#[test]
fn test_undefined_symbol_error_message() {
    let env = setup();
    let err = eval(read_str("undefined-sym").unwrap(), env).unwrap_err();
    assert_eq!(err.to_string(), "'undefined-sym' not found");
}
