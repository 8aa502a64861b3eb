//! KeyValues tree parser
//!
//! Recursive descent over [`Tokenizer`] output. The document root is a block
//! body without enclosing braces.

use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::Path;

use super::token::{Token, TokenKind, Tokenizer};
use super::VdfError;

/// A parsed value: either a string leaf or a nested block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Value(String),
    Block(Block),
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(s) => Some(s),
            Self::Block(_) => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Self::Block(b) => Some(b),
            Self::Value(_) => None,
        }
    }
}

/// An ordered block of key/value pairs
///
/// Duplicate keys are allowed by the format. Inserting an existing key keeps
/// its original position and replaces the value, so the last occurrence in
/// the source wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Block(IndexMap<String, Node>);

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        self.0.insert(key.into(), node)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    /// String value under `key`, if present and not a block
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_str)
    }

    /// Nested block under `key`, if present and not a string
    pub fn get_block(&self, key: &str) -> Option<&Block> {
        self.get(key).and_then(Node::as_block)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parse a KeyValues document into its root block
pub fn parse(src: &str) -> Result<Block, VdfError> {
    let mut parser = Parser {
        tokens: Tokenizer::new(src),
        end: src.len(),
    };
    parser.block(false)
}

/// Read and parse a KeyValues file
///
/// Invalid UTF-8 is replaced rather than rejected; Steam occasionally writes
/// names in legacy encodings. Error offsets then count bytes of the decoded
/// text, where each replaced sequence is three bytes (U+FFFD), not bytes of
/// the file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Block, VdfError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| VdfError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&String::from_utf8_lossy(&bytes))
}

struct Parser<'a> {
    tokens: Tokenizer<'a>,
    end: usize,
}

impl Parser<'_> {
    fn next_token(&mut self) -> Result<Option<Token>, VdfError> {
        self.tokens.next().transpose()
    }

    /// Parse a block body. End of input closes any block; `}` only closes a
    /// nested one.
    fn block(&mut self, nested: bool) -> Result<Block, VdfError> {
        let mut block = Block::new();

        loop {
            let key = match self.next_token()? {
                None => return Ok(block),
                Some(Token {
                    kind: TokenKind::String(key),
                    ..
                }) => key,
                Some(Token {
                    kind: TokenKind::CloseBlock,
                    ..
                }) if nested => return Ok(block),
                Some(token) => return Err(unexpected(token)),
            };

            match self.next_token()? {
                Some(Token {
                    kind: TokenKind::String(value),
                    ..
                }) => {
                    block.insert(key, Node::Value(value));
                }
                Some(Token {
                    kind: TokenKind::OpenBlock,
                    ..
                }) => {
                    let child = self.block(true)?;
                    block.insert(key, Node::Block(child));
                }
                Some(token) => return Err(unexpected(token)),
                None => return Err(VdfError::UnexpectedEndOfInput { offset: self.end }),
            }
        }
    }
}

fn unexpected(token: Token) -> VdfError {
    VdfError::UnexpectedToken {
        offset: token.offset,
        found: token.kind.describe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(s: &str) -> Node {
        Node::Value(s.to_string())
    }

    #[test]
    fn test_flat_block_in_source_order() {
        let root = parse(r#""b" "2" "a" "1" "c" "3""#).unwrap();
        let pairs: Vec<(&str, &str)> = root
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str().unwrap()))
            .collect();
        assert_eq!(pairs, vec![("b", "2"), ("a", "1"), ("c", "3")]);
    }

    #[test]
    fn test_nested_block() {
        let root = parse(r#""a" "1" "b" { "c" "2" }"#).unwrap();
        assert_eq!(root.get_str("a"), Some("1"));
        let b = root.get_block("b").unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(b.get("c"), Some(&value("2")));
    }

    #[test]
    fn test_duplicate_key_last_wins_first_position() {
        let root = parse(r#""x" "1" "y" "0" "x" "2""#).unwrap();
        assert_eq!(root.get_str("x"), Some("2"));
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_duplicate_key_block_replaces_value() {
        let root = parse(r#""x" "1" "x" { "k" "v" }"#).unwrap();
        assert!(root.get_str("x").is_none());
        assert_eq!(root.get_block("x").unwrap().get_str("k"), Some("v"));
    }

    #[test]
    fn test_manifest_shape() {
        let src = r#"
"AppState"
{
	"appid"		"570"
	"name"		"Dota 2"
	"UserConfig"
	{
		"language"		"english"
	}
}
"#;
        let root = parse(src).unwrap();
        let state = root.get_block("AppState").unwrap();
        assert_eq!(state.get_str("appid"), Some("570"));
        assert_eq!(state.get_str("name"), Some("Dota 2"));
        assert_eq!(
            state.get_block("UserConfig").unwrap().get_str("language"),
            Some("english")
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("// just a comment").unwrap().is_empty());
    }

    #[test]
    fn test_empty_nested_block() {
        let root = parse(r#""a" {}"#).unwrap();
        assert!(root.get_block("a").unwrap().is_empty());
    }

    #[test]
    fn test_unclosed_nested_block_is_tolerated() {
        let root = parse(r#""a" { "b" "1""#).unwrap();
        assert_eq!(root.get_block("a").unwrap().get_str("b"), Some("1"));
    }

    #[test]
    fn test_key_followed_by_close() {
        let err = parse(r#""a" { "b" }"#).unwrap_err();
        assert!(matches!(err, VdfError::UnexpectedToken { offset: 10, .. }));
    }

    #[test]
    fn test_key_at_end_of_input() {
        let err = parse(r#""a" "1" "b""#).unwrap_err();
        assert!(matches!(err, VdfError::UnexpectedEndOfInput { offset: 11 }));
    }

    #[test]
    fn test_open_where_key_expected() {
        let err = parse(r#"{ "a" "1" }"#).unwrap_err();
        assert!(matches!(err, VdfError::UnexpectedToken { offset: 0, .. }));
    }

    #[test]
    fn test_stray_close_at_top_level() {
        let err = parse(r#""a" "1" }"#).unwrap_err();
        assert!(matches!(err, VdfError::UnexpectedToken { offset: 8, .. }));
    }

    #[test]
    fn test_tokenizer_error_propagates() {
        let err = parse(r#""a" "unterminated"#).unwrap_err();
        assert!(matches!(err, VdfError::MalformedQuote { offset: 4 }));
    }

    #[test]
    fn test_serializes_in_order() {
        let root = parse(r#""z" "1" "a" { "k" "v" }"#).unwrap();
        let json = serde_json::to_string(&root).unwrap();
        assert_eq!(json, r#"{"z":"1","a":{"k":"v"}}"#);
    }

    #[test]
    fn test_load_file_replaces_invalid_utf8() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("appmanifest_1.acf");
        fs::write(&path, b"\"AppState\" { \"name\" \"Caf\xe9\" }").unwrap();

        let root = load_file(&path).unwrap();
        let name = root.get_block("AppState").unwrap().get_str("name");
        assert_eq!(name, Some("Caf\u{FFFD}"));
    }

    #[test]
    fn test_load_file_offsets_after_replacement() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("bad.vdf");
        // One invalid byte decodes to three, so the quote at byte 2 is reported at 4
        fs::write(&path, b"\xff \"open").unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, VdfError::MalformedQuote { offset: 4 }));
    }

    #[test]
    fn test_load_file_missing() {
        let err = load_file("/nonexistent/libraryfolders.vdf").unwrap_err();
        assert!(matches!(err, VdfError::Io { .. }));
    }
}
