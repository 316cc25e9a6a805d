use crate::error::Result;
use crate::value::QsObject;

/// How array-like repetition is recognized in the input (and rendered on
/// encode). Exactly one mode applies to a whole parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArrayFormat {
    /// `a[0]=x&a[1]=y` -- bracket contents are literal indices.
    #[default]
    Indices,
    /// `a[]=x&a[]=y` -- an empty bracket pair always appends.
    Brackets,
    /// `a=x,y` -- a single pair's value splits into an ordered scalar list.
    Comma,
    /// `a=x&a=y` -- every occurrence of the same full key path contributes
    /// one more element. Occurrences may be non-adjacent.
    Repeat,
}

/// Options that affect parsing behavior.
///
/// ## Nesting depth
///
/// `max_depth` bounds how deeply bracketed keys may nest, protecting against
/// maliciously deep inputs. Segments beyond the limit are folded into a
/// single literal key rather than rejected:
///
/// ```
/// use qs_tree::ParseOptions;
///
/// let tree = ParseOptions::new().max_depth(1).parse_str("a[b][c][d]=x").unwrap();
/// let a = tree["a"].as_object().unwrap();
/// let b = a["b"].as_object().unwrap();
/// assert_eq!(b["[c][d]"].as_str(), Some("x"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    pub(crate) array_format: ArrayFormat,
    pub(crate) max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseOptions {
    pub const fn new() -> Self {
        Self {
            array_format: ArrayFormat::Indices,
            max_depth: 5,
        }
    }

    /// Selects the array repetition mode. Default is [`ArrayFormat::Indices`].
    pub const fn array_format(mut self, array_format: ArrayFormat) -> Self {
        self.array_format = array_format;
        self
    }

    /// Sets the maximum key nesting depth. Default is 5.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses a querystring from a `&[u8]` using these options.
    pub fn parse_bytes<'qs>(&self, input: &'qs [u8]) -> Result<QsObject<'qs>> {
        crate::parse::parse_bytes_with(input, *self)
    }

    /// Parses a querystring from a `&str` using these options.
    pub fn parse_str<'qs>(&self, input: &'qs str) -> Result<QsObject<'qs>> {
        self.parse_bytes(input.as_bytes())
    }

    /// Renders a tree back to wire form using these options.
    pub fn encode(&self, tree: &QsObject<'_>) -> String {
        crate::encode::encode(tree, self)
    }
}
