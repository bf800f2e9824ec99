//! Character-class state machine that turns HLL source into a flat token
//! list, plus a cursor over that list exposing the
//! `read_token`/`peek_token`/`read_until_separator` shape the parser
//! drives.

use crate::error::LexError;

const SYMBOL_CHARS: &str = "#+-*/=(){}";
const LONG_SYMBOLS: &[&str] = &["++", "+="];
const SEPARATORS: &str = ";\n";

fn is_separator_char(c: char) -> bool {
    SEPARATORS.contains(c)
}

/// Scans `source` into an ordered list of tokens: alphabetic runs,
/// numeric runs, single/compound symbols, and separators (`;`/`\n`
/// each emitted as their own one-character token). Whitespace is
/// consumed and never emitted. A `#` comment swallows everything up to
/// (not including) the next separator.
pub fn tokenize(source: &str) -> Result<Vec<String>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        if is_separator_char(c) {
            chars.next();
            tokens.push(c.to_string());
        } else if c.is_whitespace() {
            chars.next();
        } else if c == '#' {
            let mut comment = String::new();
            while let Some(&next) = chars.peek() {
                if is_separator_char(next) {
                    break;
                }
                comment.push(next);
                chars.next();
            }
            tokens.push(comment);
        } else if c.is_alphabetic() {
            let mut word = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_alphabetic() {
                    word.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(word);
        } else if c.is_ascii_digit() {
            let mut number = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_digit() {
                    number.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(number);
        } else if SYMBOL_CHARS.contains(c) {
            chars.next();
            let mut symbol = c.to_string();
            if let Some(&next) = chars.peek() {
                let mut candidate = symbol.clone();
                candidate.push(next);
                if LONG_SYMBOLS.contains(&candidate.as_str()) {
                    symbol = candidate;
                    chars.next();
                }
            }
            tokens.push(symbol);
        } else {
            return Err(LexError::IllegalChar(c));
        }
    }

    Ok(tokens)
}

pub fn is_separator(token: &str) -> bool {
    token.len() == 1 && is_separator_char(token.chars().next().unwrap())
}

/// A cursor over an eagerly tokenized source.
pub struct Lexer {
    tokens: Vec<String>,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Result<Self, LexError> {
        Ok(Lexer {
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    /// Reads the next token, advancing the cursor. With
    /// `skip_separators`, separator tokens are silently consumed and
    /// never returned. `None` signals end of input.
    pub fn read_token(&mut self, skip_separators: bool) -> Option<String> {
        loop {
            let token = self.tokens.get(self.pos)?.clone();
            self.pos += 1;
            if skip_separators && is_separator(&token) {
                continue;
            }
            return Some(token);
        }
    }

    /// Like `read_token`, but does not advance the cursor.
    pub fn peek_token(&mut self, skip_separators: bool) -> Option<String> {
        let saved = self.pos;
        let token = self.read_token(skip_separators);
        self.pos = saved;
        token
    }

    /// Reads tokens (including separators) up to but not including the
    /// next separator, which is consumed and discarded.
    pub fn read_until_separator(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(token) = self.read_token(false) {
            if is_separator(&token) {
                break;
            }
            out.push(token);
        }
        out
    }

    pub fn at_end(&mut self) -> bool {
        self.peek_token(true).is_none()
    }
}
