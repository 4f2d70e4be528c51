// ABOUTME: Reader bridge and misc builtins: read-string, slurp, eval,
// ABOUTME: load-file, readline, time-ms, *host-language*, *ARGV*

//! Reader bridge and host-interaction builtins
//!
//! Everything that crosses from the language back into the reader, the
//! filesystem, stdin, or the wall clock.
//!
//! - `read-string`: parse a string into one `Value`, without evaluating it
//! - `slurp`: read a file's contents as a string
//! - `eval`: evaluate a `Value` at the root environment
//! - `load-file`: read, wrap, and evaluate a whole file at the root
//! - `readline`: print an optional prompt and read one line of stdin
//! - `time-ms`: milliseconds since the Unix epoch
//! - `*host-language*`/`*ARGV*`: host identity and CLI argument list

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::eval;
use crate::reader::read_str;
use crate::value::Value;
use std::io::Write;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// `(read-string s)`: parses `s` into one `Value`, without evaluating it.
fn builtin_read_string(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("read-string", "1", args.len()));
    }
    match &args[0] {
        Value::Str(s) => read_str(s),
        other => Err(EvalError::type_error("read-string", "string", other, 0)),
    }
}

/// `(slurp path)`: reads the whole file at `path` as a string.
fn builtin_slurp(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("slurp", "1", args.len()));
    }
    let path = match &args[0] {
        Value::Str(s) => s,
        other => return Err(EvalError::type_error("slurp", "string", other, 0)),
    };
    std::fs::read_to_string(path.as_ref())
        .map(Value::str)
        .map_err(|e| EvalError::runtime_error("slurp", e.to_string()))
}

/// `(time-ms)`: milliseconds since the Unix epoch.
fn builtin_time_ms(args: &[Value]) -> Result<Value, EvalError> {
    if !args.is_empty() {
        return Err(EvalError::arity_error("time-ms", "0", args.len()));
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| EvalError::runtime_error("time-ms", e.to_string()))?;
    Ok(Value::Int(now.as_millis() as i64))
}

/// `(readline)` / `(readline prompt)`: prints `prompt` (if given) without a
/// trailing newline, then reads one line of stdin. Returns `nil` on EOF.
fn builtin_readline(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() > 1 {
        return Err(EvalError::arity_error("readline", "0-1", args.len()));
    }
    if let Some(Value::Str(prompt)) = args.first() {
        print!("{prompt}");
        let _ = std::io::stdout().flush();
    }
    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) => Ok(Value::Nil),
        Ok(_) => {
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            Ok(Value::str(line))
        }
        Err(e) => Err(EvalError::runtime_error("readline", e.to_string())),
    }
}

pub fn register(env: &Rc<Environment>, argv: &[String]) {
    env.define(
        Rc::from("read-string"),
        Value::builtin("read-string", Rc::new(builtin_read_string)),
    );
    env.define(Rc::from("slurp"), Value::builtin("slurp", Rc::new(builtin_slurp)));
    env.define(Rc::from("time-ms"), Value::builtin("time-ms", Rc::new(builtin_time_ms)));
    env.define(
        Rc::from("readline"),
        Value::builtin("readline", Rc::new(builtin_readline)),
    );

    // `eval` and `load-file` close over the root environment: both must
    // evaluate at the root regardless of the frame they're called from.
    let root = env.clone();
    env.define(
        Rc::from("eval"),
        Value::builtin(
            "eval",
            Rc::new(move |args: &[Value]| {
                if args.len() != 1 {
                    return Err(EvalError::arity_error("eval", "1", args.len()));
                }
                eval(args[0].clone(), root.clone())
            }),
        ),
    );

    let root = env.clone();
    env.define(
        Rc::from("load-file"),
        Value::builtin(
            "load-file",
            Rc::new(move |args: &[Value]| {
                if args.len() != 1 {
                    return Err(EvalError::arity_error("load-file", "1", args.len()));
                }
                let path = match &args[0] {
                    Value::Str(s) => s,
                    other => return Err(EvalError::type_error("load-file", "string", other, 0)),
                };
                let contents = std::fs::read_to_string(path.as_ref())
                    .map_err(|e| EvalError::runtime_error("load-file", e.to_string()))?;
                let wrapped = format!("(do {contents}\nnil)");
                let ast = read_str(&wrapped)?;
                eval(ast, root.clone())
            }),
        ),
    );

    env.define(Rc::from("*host-language*"), Value::str("rust"));
    env.define(
        Rc::from("*ARGV*"),
        Value::list(argv.iter().map(Value::str).collect()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_string_round_trips() {
        let result = builtin_read_string(&[Value::str("(1 2 3)")]).unwrap();
        assert!(matches!(result, Value::List(..)));
    }

    #[test]
    fn test_time_ms_returns_int() {
        assert!(matches!(builtin_time_ms(&[]), Ok(Value::Int(_))));
    }
}
