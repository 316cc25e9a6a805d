use std::borrow::Cow;
use std::str;

use crate::error::Result;
use crate::parse::decode::decode;

/// One segment of the address a pair's value belongs at.
///
/// The tag is fixed at lex time: a text run that is all ASCII digits becomes
/// an `Index`, an empty bracket pair becomes the `Append` sentinel ("next
/// position"), everything else is a `Key`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum PathSegment<'qs> {
    Key(Cow<'qs, str>),
    Index(usize),
    Append,
}

impl<'qs> PathSegment<'qs> {
    /// Classifies a raw value token. Classification looks at the raw bytes
    /// (digits are never percent-encoded); key text is then decoded. A digit
    /// run too large for `usize` falls back to being a key.
    pub(crate) fn classify(raw: &'qs [u8], position: usize) -> Result<Self> {
        if !raw.is_empty() && raw.iter().all(u8::is_ascii_digit) {
            let digits = str::from_utf8(raw)?;
            if let Ok(index) = digits.parse::<usize>() {
                return Ok(PathSegment::Index(index));
            }
        }
        Ok(PathSegment::Key(decode(raw, position)?))
    }
}

/// Collapses path segments beyond `max_depth` into a single literal key
/// holding the bracketed remainder, so attacker-supplied input cannot induce
/// unbounded tree depth. `a[b][c][d]` at depth 1 becomes `a[b]["[c][d]"]`.
pub(crate) fn fold_depth<'p, 'qs>(
    path: &'p [PathSegment<'qs>],
    max_depth: usize,
) -> Cow<'p, [PathSegment<'qs>]> {
    let child_depth = path.len().saturating_sub(1);
    if child_depth <= max_depth {
        return Cow::Borrowed(path);
    }
    let keep = path.len() - (child_depth - max_depth);
    let mut folded = path[..keep].to_vec();
    let mut merged = String::new();
    for segment in &path[keep..] {
        merged.push('[');
        match segment {
            PathSegment::Key(key) => merged.push_str(key),
            PathSegment::Index(index) => merged.push_str(itoa::Buffer::new().format(*index)),
            PathSegment::Append => {}
        }
        merged.push(']');
    }
    folded.push(PathSegment::Key(Cow::Owned(merged)));
    Cow::Owned(folded)
}

/// Renders a path for diagnostics, e.g. `a[b][0]`.
pub(crate) fn render_path(path: &[PathSegment<'_>]) -> String {
    let mut out = String::new();
    for (i, segment) in path.iter().enumerate() {
        let bracketed = i > 0;
        if bracketed {
            out.push('[');
        }
        match segment {
            PathSegment::Key(key) => out.push_str(key),
            PathSegment::Index(index) => out.push_str(itoa::Buffer::new().format(*index)),
            PathSegment::Append => {}
        }
        if bracketed {
            out.push(']');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::{PathSegment, fold_depth, render_path};
    use pretty_assertions::assert_eq;

    fn key(s: &str) -> PathSegment<'_> {
        PathSegment::Key(Cow::Borrowed(s))
    }

    #[test]
    fn classify_digits_as_index() {
        assert_eq!(PathSegment::classify(b"0", 0).unwrap(), PathSegment::Index(0));
        assert_eq!(
            PathSegment::classify(b"42", 0).unwrap(),
            PathSegment::Index(42)
        );
    }

    #[test]
    fn classify_text_as_key() {
        assert_eq!(PathSegment::classify(b"abc", 0).unwrap(), key("abc"));
        // mixed digits and text are a key
        assert_eq!(PathSegment::classify(b"1a", 0).unwrap(), key("1a"));
    }

    #[test]
    fn classify_decodes_key_text() {
        assert_eq!(
            PathSegment::classify(b"a%20b", 0).unwrap(),
            PathSegment::Key(Cow::Owned("a b".to_string()))
        );
    }

    #[test]
    fn oversized_digit_run_falls_back_to_key() {
        let raw = b"99999999999999999999999999999999";
        assert_eq!(
            PathSegment::classify(raw, 0).unwrap(),
            key("99999999999999999999999999999999")
        );
    }

    #[test]
    fn fold_within_limit_borrows() {
        let path = vec![key("a"), key("b")];
        let folded = fold_depth(&path, 5);
        assert_eq!(folded.as_ref(), path.as_slice());
        assert!(matches!(folded, Cow::Borrowed(_)));
    }

    #[test]
    fn fold_merges_excess_segments() {
        let path = vec![key("a"), key("b"), key("c"), key("d")];
        let folded = fold_depth(&path, 1);
        assert_eq!(folded.as_ref(), &[key("a"), key("b"), key("[c][d]")]);
    }

    #[test]
    fn fold_merges_indices_and_append() {
        let path = vec![key("a"), key("b"), PathSegment::Index(3), PathSegment::Append];
        let folded = fold_depth(&path, 1);
        assert_eq!(folded.as_ref(), &[key("a"), key("b"), key("[3][]")]);
    }

    #[test]
    fn render_path_brackets_tail_segments() {
        let path = vec![key("a"), PathSegment::Index(0), key("b"), PathSegment::Append];
        assert_eq!(render_path(&path), "a[0][b][]");
    }
}
