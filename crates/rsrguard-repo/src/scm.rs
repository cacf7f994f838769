//! Reader for the RSR metadata documents (`STATE.scm`, `META.scm`,
//! `ECOSYSTEM.scm`).
//!
//! The documents use a restricted S-expression grammar: lists, symbols,
//! double-quoted strings, integers, and `;` line comments. The reader is
//! bounded (nesting depth, input handled as-is with no lookahead buffers) and
//! never panics on any input — malformed text comes back as a typed error
//! with a line number, which the checker downgrades to a single critical
//! violation for that file.

use rsrguard_domain::model::{ScmValue, StructuredDocument};
use std::collections::BTreeMap;

const MAX_DEPTH: usize = 64;

/// Syntax error with the 1-based line it was detected on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScmError {
    pub line: u32,
    pub message: String,
}

impl std::fmt::Display for ScmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScmError {}

/// Parse every top-level form in the input.
pub fn parse(text: &str) -> Result<Vec<ScmValue>, ScmError> {
    let mut reader = Reader::new(text);
    let mut forms = Vec::new();
    loop {
        reader.skip_trivia();
        if reader.at_end() {
            return Ok(forms);
        }
        forms.push(reader.value(0)?);
    }
}

/// Parse a metadata document: exactly one top-level form of the shape
/// `(kind (key value...) ...)`.
///
/// Entry lists with a single value collapse to that value; multi-value
/// entries keep the tail as a list. Duplicate keys keep the last occurrence.
pub fn parse_document(text: &str) -> Result<StructuredDocument, ScmError> {
    let forms = parse(text)?;
    let mut iter = forms.into_iter();
    let Some(form) = iter.next() else {
        return Err(ScmError {
            line: 1,
            message: "document is empty".to_string(),
        });
    };
    if iter.next().is_some() {
        return Err(ScmError {
            line: 1,
            message: "document must contain exactly one top-level form".to_string(),
        });
    }

    let ScmValue::List(items) = form else {
        return Err(ScmError {
            line: 1,
            message: "top-level form must be a list".to_string(),
        });
    };
    let mut items = items.into_iter();
    let Some(ScmValue::Symbol(kind)) = items.next() else {
        return Err(ScmError {
            line: 1,
            message: "top-level form must be headed by a kind symbol".to_string(),
        });
    };

    let mut entries = BTreeMap::new();
    for item in items {
        let ScmValue::List(mut pair) = item else {
            // Bare values at the top level carry no key; ignore them.
            continue;
        };
        if pair.is_empty() {
            continue;
        }
        let ScmValue::Symbol(key) = pair.remove(0) else {
            continue;
        };
        let value = match pair.len() {
            0 => ScmValue::List(Vec::new()),
            1 => pair.remove(0),
            _ => ScmValue::List(pair),
        };
        entries.insert(key, value);
    }

    Ok(StructuredDocument { kind, entries })
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Reader {
            bytes: text.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> ScmError {
        ScmError {
            line: self.line,
            message: message.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.bump();
                }
                b';' => {
                    while let Some(b) = self.bump() {
                        if b == b'\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    fn value(&mut self, depth: usize) -> Result<ScmValue, ScmError> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'(') => self.list(depth),
            Some(b')') => Err(self.error("unexpected ')'")),
            Some(b'"') => self.string(),
            Some(_) => self.atom(),
        }
    }

    fn list(&mut self, depth: usize) -> Result<ScmValue, ScmError> {
        self.bump(); // consume '('
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(self.error("unterminated list")),
                Some(b')') => {
                    self.bump();
                    return Ok(ScmValue::List(items));
                }
                Some(_) => items.push(self.value(depth + 1)?),
            }
        }
    }

    fn string(&mut self) -> Result<ScmValue, ScmError> {
        self.bump(); // consume opening quote
        let mut out = String::new();
        let mut chunk_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some(b'"') => {
                    out.push_str(self.slice(chunk_start, self.pos)?);
                    self.bump();
                    return Ok(ScmValue::Str(out));
                }
                Some(b'\\') => {
                    out.push_str(self.slice(chunk_start, self.pos)?);
                    self.bump();
                    match self.bump() {
                        Some(b'"') => out.push('"'),
                        Some(b'\\') => out.push('\\'),
                        Some(b'n') => out.push('\n'),
                        Some(b't') => out.push('\t'),
                        Some(other) => {
                            return Err(self.error(format!(
                                "unknown escape: \\{}",
                                char::from(other)
                            )))
                        }
                        None => return Err(self.error("unterminated string")),
                    }
                    chunk_start = self.pos;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn slice(&self, start: usize, end: usize) -> Result<&'a str, ScmError> {
        std::str::from_utf8(&self.bytes[start..end])
            .map_err(|_| self.error("invalid UTF-8 in string"))
    }

    fn atom(&mut self) -> Result<ScmValue, ScmError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'(' | b')' | b'"' | b';') {
                break;
            }
            self.bump();
        }
        let raw = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| self.error("invalid UTF-8 in atom"))?;
        if raw.is_empty() {
            return Err(self.error("empty atom"));
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Ok(ScmValue::Int(n));
        }
        Ok(ScmValue::Symbol(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_a_state_document() {
        let doc = parse_document(
            r#";; Project state
(state
  (version "1.4.0")
  (status "active")
  (milestones (m1 m2) 3))
"#,
        )
        .expect("parse");

        assert_eq!(doc.kind, "state");
        assert_eq!(doc.entries["version"].as_str(), Some("1.4.0"));
        assert_eq!(doc.entries["status"].as_str(), Some("active"));
        match &doc.entries["milestones"] {
            ScmValue::List(items) => assert_eq!(items.len(), 2),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn string_escapes_round_trip() {
        let doc = parse_document(r#"(meta (note "a \"quoted\" line\nand a tab\t"))"#)
            .expect("parse");
        assert_eq!(
            doc.entries["note"].as_str(),
            Some("a \"quoted\" line\nand a tab\t")
        );
    }

    #[test]
    fn integers_and_symbols_are_distinguished() {
        let forms = parse("(x 42 -7 4.2 forty-two)").expect("parse");
        let ScmValue::List(items) = &forms[0] else {
            panic!("expected list")
        };
        assert_eq!(items[1], ScmValue::Int(42));
        assert_eq!(items[2], ScmValue::Int(-7));
        assert_eq!(items[3], ScmValue::Symbol("4.2".to_string()));
        assert_eq!(items[4], ScmValue::Symbol("forty-two".to_string()));
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = parse_document("(state\n  (version \"1.0.0\"\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("unterminated"));

        let err = parse_document("(state))\n").unwrap_err();
        assert!(err.message.contains("unexpected ')'"));
    }

    #[test]
    fn rejects_non_document_shapes() {
        assert!(parse_document("").is_err());
        assert!(parse_document("\"just a string\"").is_err());
        assert!(parse_document("(\"no-kind\" (a 1))").is_err());
        assert!(parse_document("(a 1) (b 2)").is_err());
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let mut text = String::new();
        for _ in 0..200 {
            text.push('(');
        }
        let err = parse(&text).unwrap_err();
        assert!(err.message.contains("nesting too deep"));
    }

    #[test]
    fn duplicate_keys_keep_the_last_occurrence() {
        let doc = parse_document("(state (version \"1.0.0\") (version \"2.0.0\"))").expect("parse");
        assert_eq!(doc.entries["version"].as_str(), Some("2.0.0"));
    }

    proptest! {
        #[test]
        fn parser_never_panics(input in ".*") {
            let _ = parse(&input);
            let _ = parse_document(&input);
        }

        #[test]
        fn parser_never_panics_on_paren_soup(input in "[()\"; a-z0-9\\\\\n]{0,256}") {
            let _ = parse_document(&input);
        }
    }
}
