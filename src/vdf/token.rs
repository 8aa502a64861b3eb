//! KeyValues tokenizer
//!
//! Turns source text into a lazy stream of strings and braces. Whitespace and
//! `//` line comments are skipped between tokens.

use std::iter::FusedIterator;

use super::VdfError;

/// The kind of a lexed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Quoted (unescaped) or bare string
    String(String),
    OpenBlock,
    CloseBlock,
}

impl TokenKind {
    /// Short description used in parse errors
    pub fn describe(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::OpenBlock => "'{'",
            Self::CloseBlock => "'}'",
        }
    }
}

/// A token and the byte offset where it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Lazy tokenizer over a KeyValues document
///
/// Yields `Err` at most once; the stream ends after an error.
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            failed: false,
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = &self.src[self.pos..];
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if !trimmed.starts_with("//") {
                return;
            }
            self.pos = match trimmed.find('\n') {
                Some(newline) => self.pos + newline + 1,
                None => self.src.len(),
            };
        }
    }

    /// Scan a quoted string; `self.pos` points at the opening quote.
    fn quoted(&mut self) -> Result<String, VdfError> {
        let start = self.pos;
        let body = &self.src[start + 1..];
        let mut out = String::new();
        let mut chars = body.char_indices();

        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos = start + 1 + i + 1;
                    return Ok(out);
                }
                '\\' => {
                    let Some((_, escaped)) = chars.next() else {
                        break;
                    };
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        '\\' | '"' | '\'' => out.push(escaped),
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }

        Err(VdfError::MalformedQuote { offset: start })
    }

    fn bareword(&mut self) -> String {
        let rest = &self.src[self.pos..];
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '{' || c == '}')
            .unwrap_or(rest.len());
        self.pos += end;
        rest[..end].to_string()
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, VdfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.skip_trivia();
        let offset = self.pos;
        let c = self.src[offset..].chars().next()?;

        let kind = match c {
            '{' => {
                self.pos += 1;
                TokenKind::OpenBlock
            }
            '}' => {
                self.pos += 1;
                TokenKind::CloseBlock
            }
            '"' => match self.quoted() {
                Ok(s) => TokenKind::String(s),
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            },
            _ => TokenKind::String(self.bareword()),
        };

        Some(Ok(Token { kind, offset }))
    }
}

impl FusedIterator for Tokenizer<'_> {}
