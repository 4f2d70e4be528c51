// ABOUTME: Printing builtins: prn, println, pr-str, str

//! Output and string-rendering: `prn`, `println`, `pr-str`, `str`
//!
//! All four share the printer (`crate::printer::pr_str`) in readable or
//! non-readable mode; the difference between them is whether they print to
//! stdout or build a `Str`, and whether a trailing newline is added.
//!
//! - `prn`: print readably, space-separated, with a trailing newline
//! - `println`: print non-readably, space-separated, with a trailing newline
//! - `pr-str`: build a readable, space-separated string
//! - `str`: build a non-readable, unseparated (concatenated) string

use crate::env::Environment;
use crate::error::EvalError;
use crate::printer::pr_str;
use crate::value::Value;
use std::rc::Rc;

/// `(prn a b ...)`: readable, space-joined, newline-terminated. Returns nil.
fn builtin_prn(args: &[Value]) -> Result<Value, EvalError> {
    let parts: Vec<String> = args.iter().map(|v| pr_str(v, true)).collect();
    println!("{}", parts.join(" "));
    Ok(Value::Nil)
}

/// `(println a b ...)`: non-readable, space-joined, newline-terminated.
fn builtin_println(args: &[Value]) -> Result<Value, EvalError> {
    let parts: Vec<String> = args.iter().map(|v| pr_str(v, false)).collect();
    println!("{}", parts.join(" "));
    Ok(Value::Nil)
}

/// `(pr-str a b ...)`: readable, space-joined string, no trailing newline.
fn builtin_pr_str(args: &[Value]) -> Result<Value, EvalError> {
    let parts: Vec<String> = args.iter().map(|v| pr_str(v, true)).collect();
    Ok(Value::str(parts.join(" ")))
}

/// `(str a b ...)`: non-readable representations concatenated with no separator.
fn builtin_str(args: &[Value]) -> Result<Value, EvalError> {
    let parts: Vec<String> = args.iter().map(|v| pr_str(v, false)).collect();
    Ok(Value::str(parts.concat()))
}

pub fn register(env: &Rc<Environment>) {
    env.define(Rc::from("prn"), Value::builtin("prn", Rc::new(builtin_prn)));
    env.define(
        Rc::from("println"),
        Value::builtin("println", Rc::new(builtin_println)),
    );
    env.define(
        Rc::from("pr-str"),
        Value::builtin("pr-str", Rc::new(builtin_pr_str)),
    );
    env.define(Rc::from("str"), Value::builtin("str", Rc::new(builtin_str)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pr_str_readable_joined() {
        let result = builtin_pr_str(&[Value::str("a"), Value::Int(1)]).unwrap();
        assert!(matches!(result, Value::Str(s) if &*s == "\"a\" 1"));
    }

    #[test]
    fn test_str_concatenates_without_separator() {
        let result = builtin_str(&[Value::str("a"), Value::Int(1)]).unwrap();
        assert!(matches!(result, Value::Str(s) if &*s == "a1"));
    }
}
