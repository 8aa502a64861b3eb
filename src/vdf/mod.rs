//! Valve KeyValues text format (VDF/ACF)
//!
//! Steam keeps app manifests (`appmanifest_<appid>.acf`) and the library
//! descriptor (`libraryfolders.vdf`) in this format:
//!
//! ```text
//! "AppState"
//! {
//!     "appid"     "570"
//!     "name"      "Dota 2"
//! }
//! ```
//!
//! Every leaf is a string and every node is either a string or a block.
//! Binary VDF and `#include`/`#base` directives are not supported.

pub mod token;
pub mod tree;

use std::path::PathBuf;

pub use token::{Token, TokenKind, Tokenizer};
pub use tree::{load_file, parse, Block, Node};

/// Errors produced while reading a KeyValues document
///
/// Offsets are byte offsets into the source text.
#[derive(Debug, thiserror::Error)]
pub enum VdfError {
    #[error("unterminated quoted string starting at offset {offset}")]
    MalformedQuote { offset: usize },

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { offset: usize, found: &'static str },

    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEndOfInput { offset: usize },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
