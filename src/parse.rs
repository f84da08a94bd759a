//! Single-line pragma parser.
//!
//! Each annotation line is parsed independently; no cross-line state is
//! consulted here (that is the validator's job). The input is untrusted
//! text: every branch reports a precise [`ParseError`] and nothing panics.
//!
//! Grammar:
//!
//! ```text
//! directive := kind payload
//! payload   := path [ '[' count ']' ] [ ':' 'range' '(' bound '..' bound ')' ]
//!              [ '=' literal ] [ '(' opt (',' opt)* ')' ]
//!            | ('uniform' | 'sampler') [ '(' opt (',' opt)* ')' ]   -- default
//!            | string                                               -- label
//! opt       := ident '=' literal
//! ```

use std::num::NonZeroU32;

use crate::directive::{
    Bounds, Category, Declaration, DefaultScope, Directive, Kind, Label, Literal, OptionMap, Path,
};
use crate::error::ParseError;

/// Parses one annotation line (the text after `#pragma`) into a directive.
///
/// `line` is the 1-based source line, carried into every error.
pub fn parse_directive(line: u32, text: &str) -> Result<Directive, ParseError> {
    let mut cur = Cursor::new(line, text);

    let Some(word) = cur.ident() else {
        return Err(ParseError::UnknownKind {
            line,
            word: cur.next_word().to_string(),
        });
    };
    let kind = Kind::from_token(word).ok_or_else(|| ParseError::UnknownKind {
        line,
        word: word.to_string(),
    })?;

    let raw_text = text.trim().to_string();
    match kind {
        Kind::Label => parse_label(cur, raw_text),
        Kind::Default => parse_default(cur, raw_text),
        _ => parse_declaration(kind, cur, raw_text),
    }
}

fn parse_label(mut cur: Cursor<'_>, raw_text: String) -> Result<Directive, ParseError> {
    cur.skip_ws();
    if cur.peek() != Some('"') {
        return Err(ParseError::ExpectedString { line: cur.line });
    }
    let text = parse_string(&mut cur)?;
    expect_end(&mut cur)?;
    Ok(Directive::Label(Label {
        text,
        line: cur.line,
        raw_text,
    }))
}

fn parse_default(mut cur: Cursor<'_>, raw_text: String) -> Result<Directive, ParseError> {
    let word = cur.ident().map(str::to_string).unwrap_or_else(|| cur.next_word().to_string());
    let category = Category::from_token(&word).ok_or_else(|| ParseError::ExpectedCategory {
        line: cur.line,
        word,
    })?;

    let mut options = OptionMap::new();
    if cur.eat('(') {
        parse_options(&mut cur, &mut options)?;
    }
    expect_end(&mut cur)?;
    Ok(Directive::DefaultScope(DefaultScope {
        category,
        options,
        line: cur.line,
        raw_text,
    }))
}

fn parse_declaration(
    kind: Kind,
    mut cur: Cursor<'_>,
    raw_text: String,
) -> Result<Directive, ParseError> {
    let line = cur.line;
    let path_text = cur.path_text();
    let path = Path::from_dotted(path_text).ok_or_else(|| ParseError::InvalidPath {
        line,
        path: path_text.to_string(),
    })?;

    let mut array_count = None;
    if cur.eat('[') {
        array_count = Some(parse_array_count(&mut cur)?);
    }

    let mut range = None;
    if cur.eat(':') {
        if !kind.is_ranged() {
            return Err(ParseError::RangeNotAllowed { line, kind });
        }
        range = Some(parse_range(&mut cur, kind)?);
    }

    let mut default = None;
    if cur.eat('=') {
        if !kind.is_value() {
            return Err(ParseError::DefaultNotAllowed { line, kind });
        }
        let lit = parse_literal(&mut cur)?;
        default = Some(coerce_default(kind, lit, line)?);
    }

    let mut options = OptionMap::new();
    if cur.eat('(') {
        parse_options(&mut cur, &mut options)?;
    }

    expect_end(&mut cur)?;
    Ok(Directive::Declaration(Declaration {
        kind,
        path,
        array_count,
        range,
        default,
        options,
        label: None,
        line,
        raw_text,
    }))
}

fn parse_array_count(cur: &mut Cursor<'_>) -> Result<NonZeroU32, ParseError> {
    cur.skip_ws();
    let start = cur.pos;
    while cur.peek().is_some_and(|c| c != ']') {
        cur.bump();
    }
    let raw = cur.text[start..cur.pos].trim();
    cur.expect(']', "closing `]` after array count")?;
    raw.parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| ParseError::InvalidArrayCount {
            line: cur.line,
            count: raw.to_string(),
        })
}

fn parse_range(cur: &mut Cursor<'_>, kind: Kind) -> Result<Bounds, ParseError> {
    if cur.ident() != Some("range") {
        return Err(ParseError::Expected {
            line: cur.line,
            what: "`range(` after `:`",
        });
    }
    cur.expect('(', "`(` after `range`")?;
    let lo = parse_bound(cur, kind)?;
    if !cur.eat_range_dots() {
        return Err(ParseError::Expected {
            line: cur.line,
            what: "`..` between range bounds",
        });
    }
    let hi = parse_bound(cur, kind)?;
    cur.expect(')', "closing `)` of range")?;
    Ok(Bounds { lo, hi })
}

fn parse_bound(cur: &mut Cursor<'_>, kind: Kind) -> Result<Literal, ParseError> {
    let line = cur.line;
    let lit = parse_literal(cur)?;

    let class_err = |expected: &'static str, found: &Literal| ParseError::RangeTypeMismatch {
        line,
        kind,
        expected,
        found: found.type_name(),
    };
    let lit = match kind {
        Kind::Float | Kind::Vec2 | Kind::Vec3 | Kind::Vec4 => match lit {
            Literal::Int(v) => Literal::Float(v as f32),
            Literal::Float(_) | Literal::Vector(_) => lit,
            other => return Err(class_err("a number", &other)),
        },
        Kind::Int => match lit {
            Literal::Int(_) => lit,
            other => return Err(class_err("an integer", &other)),
        },
        Kind::Uint => match lit {
            Literal::Int(v) if v >= 0 => Literal::Int(v),
            other => return Err(class_err("a non-negative integer", &other)),
        },
        // parse_declaration rejects ranges on every other kind first
        _ => lit,
    };

    let expected = kind.arity().unwrap_or(1);
    let found = lit.arity();
    if found != expected {
        return Err(ParseError::RangeArityMismatch {
            line,
            kind,
            expected,
            found,
        });
    }
    Ok(lit)
}

fn coerce_default(kind: Kind, lit: Literal, line: u32) -> Result<Literal, ParseError> {
    let mismatch = |expected: &'static str, found: &Literal| ParseError::DefaultTypeMismatch {
        line,
        kind,
        expected,
        found: found.type_name(),
    };
    match kind {
        Kind::Float => match lit {
            Literal::Float(_) => Ok(lit),
            Literal::Int(v) => Ok(Literal::Float(v as f32)),
            other => Err(mismatch("a float", &other)),
        },
        Kind::Int => match lit {
            Literal::Int(_) => Ok(lit),
            other => Err(mismatch("an integer", &other)),
        },
        Kind::Uint => match lit {
            Literal::Int(v) if v >= 0 => Ok(Literal::Int(v)),
            other => Err(mismatch("a non-negative integer", &other)),
        },
        Kind::Bool => match lit {
            Literal::Bool(_) => Ok(lit),
            other => Err(mismatch("a boolean", &other)),
        },
        Kind::Vec2 => expect_vector(lit, 2, "a 2-component vector", mismatch),
        Kind::Vec3 => expect_vector(lit, 3, "a 3-component vector", mismatch),
        Kind::Vec4 => expect_vector(lit, 4, "a 4-component vector", mismatch),
        Kind::Color => expect_vector(lit, 4, "a 4-component color", mismatch),
        // parse_declaration rejects defaults on every other kind first
        _ => Ok(lit),
    }
}

fn expect_vector(
    lit: Literal,
    arity: u32,
    expected: &'static str,
    mismatch: impl Fn(&'static str, &Literal) -> ParseError,
) -> Result<Literal, ParseError> {
    match lit {
        Literal::Vector(ref v) if v.len() as u32 == arity => Ok(lit),
        other => Err(mismatch(expected, &other)),
    }
}

fn parse_options(cur: &mut Cursor<'_>, options: &mut OptionMap) -> Result<(), ParseError> {
    if cur.eat(')') {
        return Ok(());
    }
    loop {
        let name = cur
            .ident()
            .ok_or(ParseError::Expected {
                line: cur.line,
                what: "an option name",
            })?
            .to_string();
        cur.expect('=', "`=` after option name")?;
        let value = parse_literal(cur)?;
        if options.insert(name.clone(), value).is_some() {
            return Err(ParseError::DuplicateOption {
                line: cur.line,
                name,
            });
        }
        if cur.eat(',') {
            continue;
        }
        cur.expect(')', "closing `)` of option list")?;
        return Ok(());
    }
}

fn parse_literal(cur: &mut Cursor<'_>) -> Result<Literal, ParseError> {
    cur.skip_ws();
    match cur.peek() {
        Some('"') => Ok(Literal::Str(parse_string(cur)?)),
        Some('[') => parse_vector(cur),
        Some(c) if c.is_ascii_digit() || c == '-' => parse_number(cur),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            // `ident()` cannot fail here: we just peeked an identifier start.
            let word = cur.ident().unwrap_or("");
            Ok(match word {
                "true" => Literal::Bool(true),
                "false" => Literal::Bool(false),
                _ => Literal::Token(word.to_string()),
            })
        }
        _ => Err(ParseError::ExpectedLiteral {
            line: cur.line,
            found: cur.next_word().to_string(),
        }),
    }
}

fn parse_number(cur: &mut Cursor<'_>) -> Result<Literal, ParseError> {
    let line = cur.line;
    let start = cur.pos;
    if cur.peek() == Some('-') {
        cur.bump();
    }
    let digits_start = cur.pos;
    while cur.peek().is_some_and(|c| c.is_ascii_digit()) {
        cur.bump();
    }
    if cur.pos == digits_start {
        return Err(ParseError::ExpectedLiteral {
            line,
            found: cur.next_word().to_string(),
        });
    }

    let mut is_float = false;
    // `..` is the range separator, never part of a float: `0..1` lexes as
    // `0`, `..`, `1`.
    if cur.peek() == Some('.') && cur.peek_at(1) != Some('.') {
        is_float = true;
        cur.bump();
        while cur.peek().is_some_and(|c| c.is_ascii_digit()) {
            cur.bump();
        }
    }
    if matches!(cur.peek(), Some('e' | 'E')) {
        is_float = true;
        cur.bump();
        if matches!(cur.peek(), Some('+' | '-')) {
            cur.bump();
        }
        while cur.peek().is_some_and(|c| c.is_ascii_digit()) {
            cur.bump();
        }
    }

    let s = &cur.text[start..cur.pos];
    let lit = if is_float {
        // An overflowing literal parses to infinity; reject it rather than
        // carry a value the source never wrote.
        s.parse::<f32>().ok().filter(|v| v.is_finite()).map(Literal::Float)
    } else {
        s.parse::<i64>().ok().map(Literal::Int)
    };
    lit.ok_or_else(|| ParseError::ExpectedLiteral {
        line,
        found: s.to_string(),
    })
}

fn parse_vector(cur: &mut Cursor<'_>) -> Result<Literal, ParseError> {
    cur.bump(); // opening `[`
    let mut components = Vec::new();
    if cur.eat(']') {
        return Ok(Literal::Vector(components));
    }
    loop {
        cur.skip_ws();
        let component = match parse_number(cur)? {
            Literal::Float(v) => v,
            Literal::Int(v) => v as f32,
            _ => unreachable!("parse_number yields only numeric literals"),
        };
        components.push(component);
        if cur.eat(',') {
            continue;
        }
        cur.expect(']', "closing `]` of vector")?;
        return Ok(Literal::Vector(components));
    }
}

fn parse_string(cur: &mut Cursor<'_>) -> Result<String, ParseError> {
    cur.bump(); // opening quote
    let mut out = String::new();
    loop {
        match cur.bump() {
            None => {
                return Err(ParseError::Expected {
                    line: cur.line,
                    what: "closing `\"`",
                })
            }
            Some('"') => return Ok(out),
            Some('\\') => match cur.bump() {
                Some(c @ ('"' | '\\')) => out.push(c),
                Some(c) => {
                    // Unknown escapes pass through verbatim.
                    out.push('\\');
                    out.push(c);
                }
                None => {
                    return Err(ParseError::Expected {
                        line: cur.line,
                        what: "closing `\"`",
                    })
                }
            },
            Some(c) => out.push(c),
        }
    }
}

fn expect_end(cur: &mut Cursor<'_>) -> Result<(), ParseError> {
    cur.skip_ws();
    if cur.peek().is_some() {
        return Err(ParseError::TrailingInput {
            line: cur.line,
            rest: cur.rest().to_string(),
        });
    }
    Ok(())
}

/// Character cursor over one annotation line.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    line: u32,
}

impl<'a> Cursor<'a> {
    fn new(line: u32, text: &'a str) -> Cursor<'a> {
        Cursor { text, pos: 0, line }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Skips whitespace, then consumes `c` if it is next.
    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.bump();
            return true;
        }
        false
    }

    fn expect(&mut self, c: char, what: &'static str) -> Result<(), ParseError> {
        if self.eat(c) {
            return Ok(());
        }
        Err(ParseError::Expected {
            line: self.line,
            what,
        })
    }

    fn eat_range_dots(&mut self) -> bool {
        self.skip_ws();
        if self.text[self.pos..].starts_with("..") {
            self.pos += 2;
            return true;
        }
        false
    }

    /// Consumes an identifier (`[A-Za-z_][A-Za-z0-9_]*`), if one is next.
    fn ident(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                self.bump();
            }
            _ => return None,
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }
        Some(&self.text[start..self.pos])
    }

    /// Consumes a run of path characters (identifier characters and dots).
    /// Validation happens in [`Path::from_dotted`], so malformed shapes like
    /// `a..b` are captured whole for the error message.
    fn path_text(&mut self) -> &'a str {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            self.bump();
        }
        &self.text[start..self.pos]
    }

    /// The next whitespace-delimited word, without consuming it. Used for
    /// error messages only.
    fn next_word(&mut self) -> &'a str {
        self.skip_ws();
        let rest = &self.text[self.pos..];
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace())
            .map_or(rest.len(), |(i, _)| i);
        &rest[..end]
    }

    fn rest(&self) -> &'a str {
        self.text[self.pos..].trim()
    }
}
