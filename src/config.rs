// ABOUTME: Version, REPL prompt, and welcome banner constants

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const REPL_PROMPT: &str = "user> ";

pub const WELCOME_MESSAGE: &str = "lispcore";
pub const WELCOME_SUBTITLE: &str = "A Make-A-Lisp-family interpreter in Rust";
