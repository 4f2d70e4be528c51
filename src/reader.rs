// ABOUTME: Tokenizer and recursive-descent reader producing AST values from source text

use crate::error::{EvalError, ReaderError};
use crate::value::{MapKey, Value};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::none_of;
use nom::combinator::recognize;
use nom::multi::many0;
use nom::IResult;
use std::rc::Rc;

/// Splits source text into the fixed lexical grammar: the `~@` digraph, the
/// single-character bracket/quote/deref/meta tokens, quoted strings
/// (unterminated strings are emitted as-is and rejected later by the
/// reader), `;` comments, and maximal runs of everything else. Whitespace
/// and commas are separators, never tokens.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        match token(rest) {
            Ok((next, Some(tok))) => {
                tokens.push(tok);
                rest = next;
            }
            Ok((next, None)) => rest = next,
            Err(_) => break,
        }
    }
    tokens
}

fn token(input: &str) -> IResult<&str, Option<String>> {
    let (input, _) = many0(alt((tag(" "), tag("\t"), tag("\n"), tag("\r"), tag(","))))(input)?;
    if input.is_empty() {
        return Ok((input, None));
    }
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("~@")(input) {
        return Ok((rest, Some("~@".to_string())));
    }
    if let Some(c) = input.chars().next() {
        if "[]{}()'`~^@".contains(c) {
            return Ok((&input[c.len_utf8()..], Some(c.to_string())));
        }
        if c == '"' {
            return string_token(input);
        }
        if c == ';' {
            let (rest, comment) = recognize(many0(none_of("\n")))(input)?;
            let _ = comment;
            return Ok((rest, None));
        }
    }
    let (rest, atom) = take_while1(|c: char| !" \t\n\r,[]{}()'`~^@;".contains(c))(input)?;
    Ok((rest, Some(atom.to_string())))
}

/// A quoted string token: `"` followed by escaped characters up to a
/// closing `"`. An unterminated string is returned as a single token
/// spanning the rest of the input; the reader reports `EOF` for it.
fn string_token(input: &str) -> IResult<&str, Option<String>> {
    let mut chars = input.char_indices().skip(1);
    let mut escaped = false;
    for (i, c) in &mut chars {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return Ok((&input[i + 1..], Some(input[..i + 1].to_string()))),
            _ => {}
        }
    }
    Ok(("", Some(input.to_string())))
}

struct Reader {
    tokens: Vec<String>,
    pos: usize,
}

impl Reader {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<String> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn read_form(&mut self) -> Result<Value, ReaderError> {
        match self.peek().ok_or(ReaderError)? {
            "(" => self.read_seq(")", Value::list as fn(Vec<Value>) -> Value),
            "[" => self.read_seq("]", Value::vector as fn(Vec<Value>) -> Value),
            "{" => self.read_map(),
            ")" | "]" | "}" => Err(ReaderError),
            "'" => self.read_wrapped("quote"),
            "`" => self.read_wrapped("quasiquote"),
            "~" => self.read_wrapped("unquote"),
            "~@" => self.read_wrapped("splice-unquote"),
            "^" => self.read_with_meta(),
            "@" => self.read_deref(),
            _ => self.read_atom(),
        }
    }

    fn read_wrapped(&mut self, head: &str) -> Result<Value, ReaderError> {
        self.next();
        let inner = self.read_form()?;
        Ok(Value::list(vec![Value::sym(head), inner]))
    }

    fn read_deref(&mut self) -> Result<Value, ReaderError> {
        self.next();
        let inner = self.read_form()?;
        Ok(Value::list(vec![Value::sym("deref"), inner]))
    }

    /// `^` reads a metadata form then a value form; the expansion reverses
    /// the source order so the value appears first in `with-meta`.
    fn read_with_meta(&mut self) -> Result<Value, ReaderError> {
        self.next();
        let meta = self.read_form()?;
        let value = self.read_form()?;
        Ok(Value::list(vec![Value::sym("with-meta"), value, meta]))
    }

    fn read_seq(
        &mut self,
        close: &str,
        build: fn(Vec<Value>) -> Value,
    ) -> Result<Value, ReaderError> {
        self.next();
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(ReaderError),
                Some(t) if t == close => {
                    self.next();
                    return Ok(build(items));
                }
                _ => items.push(self.read_form()?),
            }
        }
    }

    fn read_map(&mut self) -> Result<Value, ReaderError> {
        self.next();
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(ReaderError),
                Some("}") => {
                    self.next();
                    break;
                }
                _ => items.push(self.read_form()?),
            }
        }
        if items.len() % 2 != 0 {
            return Err(ReaderError);
        }
        let mut map = crate::value::MapData::new();
        let mut it = items.into_iter();
        while let (Some(k), Some(v)) = (it.next(), it.next()) {
            let key = MapKey::from_value(&k).map_err(|_| ReaderError)?;
            map.insert(key, v);
        }
        Ok(Value::map(map))
    }

    fn read_atom(&mut self) -> Result<Value, ReaderError> {
        let tok = self.next().ok_or(ReaderError)?;
        Ok(parse_atom(&tok)?)
    }
}

fn parse_atom(tok: &str) -> Result<Value, ReaderError> {
    if tok.starts_with('"') {
        return parse_string(tok).map(Value::Str);
    }
    match tok {
        "nil" => return Ok(Value::Nil),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    if let Some(kw) = tok.strip_prefix(':') {
        return Ok(Value::kw(kw));
    }
    if is_integer_token(tok) {
        return Ok(Value::Int(tok.parse().map_err(|_| ReaderError)?));
    }
    Ok(Value::sym(tok))
}

fn is_integer_token(tok: &str) -> bool {
    tok.parse::<i64>()
        .map(|n| n.to_string() == tok)
        .unwrap_or(false)
}

fn parse_string(tok: &str) -> Result<Rc<str>, ReaderError> {
    if !tok.ends_with('"') || tok.len() < 2 {
        return Err(ReaderError);
    }
    let body = &tok[1..tok.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                _ => return Err(ReaderError),
            }
        } else {
            out.push(c);
        }
    }
    Ok(Rc::from(out))
}

/// Parses a single top-level form from `input`, ignoring leading comments
/// and whitespace. Fails with `EOF` on an unclosed collection or string, or
/// if the input contains no form at all.
pub fn read_str(input: &str) -> Result<Value, EvalError> {
    let tokens = tokenize(input);
    let mut reader = Reader { tokens, pos: 0 };
    Ok(reader.read_form()?)
}

/// Parses every top-level form in `input` in order. Used by the standard
/// library loader and `load-file`, which must evaluate a whole file of
/// forms rather than just the first one.
pub fn read_all(input: &str) -> Result<Vec<Value>, EvalError> {
    let tokens = tokenize(input);
    let mut reader = Reader { tokens, pos: 0 };
    let mut forms = Vec::new();
    while reader.peek().is_some() {
        forms.push(reader.read_form()?);
    }
    Ok(forms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let toks = tokenize("(+ 1 2)");
        assert_eq!(toks, vec!["(", "+", "1", "2", ")"]);
    }

    #[test]
    fn test_tokenize_splice_unquote_digraph() {
        let toks = tokenize("~@xs");
        assert_eq!(toks, vec!["~@", "xs"]);
    }

    #[test]
    fn test_tokenize_string_with_escapes() {
        let toks = tokenize(r#""a\"b""#);
        assert_eq!(toks, vec![r#""a\"b""#]);
    }

    #[test]
    fn test_tokenize_comment_is_discarded() {
        let toks = tokenize("1 ; a comment\n2");
        assert_eq!(toks, vec!["1", "2"]);
    }

    #[test]
    fn test_read_int_and_symbol() {
        assert!(matches!(read_str("42").unwrap(), Value::Int(42)));
        assert!(matches!(read_str("-7").unwrap(), Value::Int(-7)));
        assert!(matches!(read_str("foo").unwrap(), Value::Sym(_)));
    }

    #[test]
    fn test_read_keyword() {
        assert!(matches!(read_str(":foo").unwrap(), Value::Kw(_)));
    }

    #[test]
    fn test_read_list_and_vector() {
        let list = read_str("(1 2 3)").unwrap();
        assert!(matches!(list, Value::List(..)));
        let vec = read_str("[1 2 3]").unwrap();
        assert!(matches!(vec, Value::Vec(..)));
    }

    #[test]
    fn test_read_quote_family() {
        let q = read_str("'a").unwrap();
        match &q {
            Value::List(items, _) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(&items[0], Value::Sym(s) if &**s == "quote"));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_read_meta_order() {
        let form = read_str("^{:a 1} [1 2]").unwrap();
        match &form {
            Value::List(items, _) => {
                assert_eq!(items.len(), 3);
                assert!(matches!(&items[0], Value::Sym(s) if &**s == "with-meta"));
                assert!(matches!(items[1], Value::Vec(..)));
                assert!(matches!(items[2], Value::Map(..)));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_unclosed_list_is_eof() {
        assert!(read_str("(1 2").is_err());
    }

    #[test]
    fn test_unclosed_string_is_eof() {
        assert!(read_str("\"abc").is_err());
    }

    #[test]
    fn test_read_all_multiple_forms() {
        let forms = read_all("1 2 (+ 1 2)").unwrap();
        assert_eq!(forms.len(), 3);
    }
}
