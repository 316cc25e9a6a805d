//! Nested querystring parsing into an ordered value tree.
//!
//! Querystrings are not formally defined and loosely take the form of
//! _nested_ urlencoded queries: the same semantic structure can be written
//! with bracketed indices (`a[0]=x`), empty-bracket append markers
//! (`a[]=x`), comma-joined lists (`a=x,y`), or repeated keys (`a=x&a=y`).
//! This crate picks one deterministic interpretation for any input under a
//! selectable [`ArrayFormat`] mode and parses it into a tree of
//! insertion-ordered maps, sequences, and opaque text scalars.
//!
//! Every leaf is text (or null): there is no notion of numbers or booleans,
//! and no schema. When a key is used inconsistently -- once as a map key,
//! once as a sequence index -- the parser applies a small set of documented
//! coercions, and fails with a positioned error for everything else.
//!
//! ## Usage
//!
//! ```
//! let tree = qs_tree::parse_str("user[name]=Acme&user[ids][0]=1&user[ids][1]=2").unwrap();
//!
//! let user = tree["user"].as_object().unwrap();
//! assert_eq!(user["name"].as_str(), Some("Acme"));
//! let ids = user["ids"].as_array().unwrap();
//! assert_eq!(ids[1].as_str(), Some("2"));
//! ```
//!
//! Array recognition and the nesting-depth limit are configured through
//! [`ParseOptions`]:
//!
//! ```
//! use qs_tree::{ArrayFormat, ParseOptions, QsValue};
//!
//! let options = ParseOptions::new().array_format(ArrayFormat::Comma);
//! let tree = options.parse_str("tags=a,b,c").unwrap();
//! assert_eq!(tree["tags"].as_array().unwrap().len(), 3);
//!
//! // a solitary value does not force array shape
//! let tree = options.parse_str("tags=a").unwrap();
//! assert_eq!(tree["tags"], QsValue::from("a"));
//! ```
//!
//! Trees can be rendered back out: [`encode`] produces the wire form under
//! a chosen mode, and [`format`] produces an indented display rendering.

mod config;
mod encode;
mod error;
mod format;
mod parse;
mod value;

pub use config::{ArrayFormat, ParseOptions};
pub use encode::encode;
pub use error::{Error, Result};
pub use format::format;
pub use value::{QsArray, QsObject, QsValue};

/// Parses a querystring from a `&str` with default options
/// ([`ArrayFormat::Indices`], `max_depth = 5`).
///
/// ```
/// let tree = qs_tree::parse_str("a[0]=x&a[1]=y").unwrap();
/// assert_eq!(tree["a"].as_array().unwrap().len(), 2);
/// ```
pub fn parse_str(input: &str) -> Result<QsObject<'_>> {
    ParseOptions::new().parse_str(input)
}

/// Parses a querystring from a `&[u8]` with default options.
pub fn parse_bytes(input: &[u8]) -> Result<QsObject<'_>> {
    ParseOptions::new().parse_bytes(input)
}
