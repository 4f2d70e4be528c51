// ABOUTME: Renders values back to text, in readable or display mode

use crate::value::Value;

/// Render `v` to text. In readable mode, strings are quoted and escaped so
/// the result re-parses to an equal value; in non-readable mode, strings
/// are emitted raw. Both modes recurse with the same flag throughout,
/// including into nested collections.
pub fn pr_str(v: &Value, readable: bool) -> String {
    match v {
        Value::Nil => "nil".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Sym(s) => s.to_string(),
        Value::Kw(s) => format!(":{s}"),
        Value::Str(s) => {
            if readable {
                escape_str(s)
            } else {
                s.to_string()
            }
        }
        Value::List(items, _) => {
            format!("({})", join(items, readable))
        }
        Value::Vec(items, _) => {
            format!("[{}]", join(items, readable))
        }
        Value::Map(data, _) => {
            let parts: Vec<String> = data
                .iter()
                .flat_map(|(k, v)| [pr_str(&k.to_value(), readable), pr_str(v, readable)])
                .collect();
            format!("{{{}}}", parts.join(" "))
        }
        Value::Atom(cell) => format!("(atom {})", pr_str(&cell.borrow(), readable)),
        Value::Fn(_) => "#<function>".to_string(),
    }
}

fn join(items: &[Value], readable: bool) -> String {
    items
        .iter()
        .map(|v| pr_str(v, readable))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
