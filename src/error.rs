use std::fmt::Display;
use std::str;

/// Errors raised while parsing a querystring.
///
/// All variants are fatal: the parse is aborted and no partial tree is
/// returned. Duplicate keys and duplicate indices are *not* errors; they are
/// coalesced into lists and reported through `tracing` warnings instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token sequence violates the key/value grammar.
    #[error("unexpected {token} at byte {position}")]
    Syntax { token: String, position: usize },

    /// An explicit index left a gap in a sequence that was never backfilled
    /// by the end of the input.
    #[error("sequence at {path} skips ahead of its length (pair at byte {position})")]
    SkipAdd { path: String, position: usize },

    /// A key was used where an index was structurally required (or vice
    /// versa) in a way not covered by the documented coercions.
    #[error("{message} at byte {position}")]
    TypeConflict { message: String, position: usize },

    /// A percent escape was malformed (`%` not followed by two hex digits).
    #[error("malformed percent-encoding at byte {position}")]
    Decode { position: usize },

    /// Decoded text was not valid UTF-8.
    #[error("decoded text is not valid utf-8: {0}")]
    Utf8(#[from] str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn syntax<T: Display>(token: T, position: usize) -> Self {
        Error::Syntax {
            token: token.to_string(),
            position,
        }
    }

    pub(crate) fn skip_add(path: String, position: usize) -> Self {
        Error::SkipAdd { path, position }
    }

    pub(crate) fn type_conflict<T: Display>(message: T, position: usize) -> Self {
        Error::TypeConflict {
            message: message.to_string(),
            position,
        }
    }
}
