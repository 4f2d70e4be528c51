mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod printer;
mod reader;
mod value;

use clap::Parser;
use env::Environment;
use error::EvalError;
use eval::eval;
use printer::pr_str;
use reader::{read_all, read_str};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use value::Value;

/// `lispcore [FILE] [ARGS...]`. With no `FILE`, starts the REPL; otherwise
/// loads `FILE` through `load-file` and exits. Anything after `FILE`
/// populates `*ARGV*`.
#[derive(Parser, Debug)]
#[command(name = "lispcore", version = config::VERSION)]
#[command(about = "A small Lisp-family interpreter in the Make-A-Lisp lineage")]
struct Cli {
    /// Source file to run through `load-file` instead of starting the REPL
    file: Option<PathBuf>,

    /// Remaining arguments, exposed to the program as `*ARGV*`
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

const STDLIB_CORE: &str = include_str!("../stdlib/core.lisp");

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env = Environment::new();
    builtins::register(&env, &cli.args);

    if let Err(e) = load_stdlib(&env) {
        eprintln!("Failed to load standard library: {e}");
        return ExitCode::FAILURE;
    }

    match cli.file {
        Some(path) => run_file(&path, &env),
        None => {
            run_repl(&env);
            ExitCode::SUCCESS
        }
    }
}

/// Loads `stdlib/core.lisp` through the same evaluator used for everything
/// else, one top-level form at a time.
fn load_stdlib(env: &Rc<Environment>) -> Result<(), EvalError> {
    for form in read_all(STDLIB_CORE)? {
        eval(form, env.clone())?;
    }
    Ok(())
}

/// Loads `path` through `load-file` and exits. A nonzero status is returned
/// on any unhandled error, per the batch-execution error contract.
fn run_file(path: &PathBuf, env: &Rc<Environment>) -> ExitCode {
    let call = Value::list(vec![Value::sym("load-file"), Value::str(path.display().to_string())]);
    match eval(call, env.clone()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Runtime error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prompt `user> `; each line is read, evaluated, and printed in readable
/// mode. Errors print a one-line diagnostic and return to the prompt. EOF
/// terminates. Forms that span multiple lines (an unclosed collection or
/// string) keep accumulating input until they read cleanly or stdin ends.
fn run_repl(env: &Rc<Environment>) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialize REPL: {e}");
            return;
        }
    };
    let history_path = ".lispcore_history";
    let _ = rl.load_history(history_path);

    println!("{} {}", config::WELCOME_MESSAGE, config::WELCOME_SUBTITLE);

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { config::REPL_PROMPT } else { "" };
        match rl.readline(prompt) {
            Ok(line) => {
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(&line);
                let _ = rl.add_history_entry(line.as_str());

                match read_str(&buffer) {
                    Ok(ast) => {
                        buffer.clear();
                        match eval(ast, env.clone()) {
                            Ok(result) => println!("{}", pr_str(&result, true)),
                            Err(e) => eprintln!("Runtime error: {e}"),
                        }
                    }
                    Err(_) if !buffer.trim().is_empty() => {
                        // Unclosed form: keep reading more lines.
                    }
                    Err(_) => buffer.clear(),
                }
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Runtime error: {e}");
                break;
            }
        }
    }

    let _ = rl.save_history(history_path);
}
