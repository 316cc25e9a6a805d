//! Rendering a tree back to wire form.
//!
//! The inverse direction of the parser: walks the tree emitting `&`-joined
//! `key=value` pairs, with nested keys in bracket notation and arrays
//! rendered according to the configured [`ArrayFormat`]. Re-parsing the
//! output with the same options yields an equivalent tree.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

use crate::config::{ArrayFormat, ParseOptions};
use crate::value::{QsArray, QsObject, QsValue};

/// The application/x-www-form-urlencoded percent-encode set: everything but
/// ASCII alphanumerics, `*`, `-`, `.`, and `_`. Spaces never reach the set;
/// they are rewritten to `+` by [`encode_component`].
const QS_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

fn encode_component(input: &str) -> Cow<'_, str> {
    if !input.contains(' ') {
        return percent_encode(input.as_bytes(), QS_ENCODE_SET).into();
    }
    let pieces: Vec<String> = input
        .split(' ')
        .map(|piece| percent_encode(piece.as_bytes(), QS_ENCODE_SET).collect())
        .collect();
    Cow::Owned(pieces.join("+"))
}

/// Encodes a tree as a querystring using the options' array-format mode.
///
/// ```
/// use qs_tree::{ParseOptions, encode};
///
/// let options = ParseOptions::new();
/// let tree = options.parse_str("a[b][0]=x&a[b][1]=y").unwrap();
/// assert_eq!(encode(&tree, &options), "a[b][0]=x&a[b][1]=y");
/// ```
pub fn encode(tree: &QsObject<'_>, options: &ParseOptions) -> String {
    let mut pairs: Vec<String> = Vec::with_capacity(tree.len());
    for (key, value) in tree {
        encode_value(&encode_component(key), value, options, &mut pairs);
    }
    pairs.join("&")
}

fn encode_value(prefix: &str, value: &QsValue<'_>, options: &ParseOptions, pairs: &mut Vec<String>) {
    match value {
        QsValue::Null => pairs.push(format!("{prefix}=")),
        QsValue::String(s) => pairs.push(format!("{prefix}={}", encode_component(s))),
        QsValue::Object(map) => {
            for (key, child) in map {
                encode_value(
                    &format!("{prefix}[{}]", encode_component(key)),
                    child,
                    options,
                    pairs,
                );
            }
        }
        QsValue::Array(items) => encode_array(prefix, items, options, pairs),
    }
}

fn encode_array(
    prefix: &str,
    items: &QsArray<'_>,
    options: &ParseOptions,
    pairs: &mut Vec<String>,
) {
    let all_scalars = items
        .iter()
        .all(|item| matches!(item, QsValue::Null | QsValue::String(_)));
    let all_strings = items.iter().all(|item| matches!(item, QsValue::String(_)));
    match options.array_format {
        // comma syntax cannot express a null element, so those lists are
        // rendered indexed instead
        ArrayFormat::Comma if all_strings && items.len() > 1 => {
            let joined = items
                .iter()
                .filter_map(|item| match item {
                    QsValue::String(s) => Some(encode_component(s)),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(format!("{prefix}={joined}"));
        }
        // a single bare pair would read back as a scalar, so one-element
        // lists are rendered indexed instead
        ArrayFormat::Repeat if all_scalars && items.len() > 1 => {
            for item in items {
                encode_value(prefix, item, options, pairs);
            }
        }
        ArrayFormat::Brackets => {
            for item in items {
                encode_value(&format!("{prefix}[]"), item, options, pairs);
            }
        }
        // Indices, plus the shapes Comma and Repeat cannot round-trip
        _ => {
            let mut index = itoa::Buffer::new();
            for (i, item) in items.iter().enumerate() {
                encode_value(
                    &format!("{prefix}[{}]", index.format(i)),
                    item,
                    options,
                    pairs,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::encode;
    use crate::{ArrayFormat, ParseOptions};
    use pretty_assertions::assert_eq;

    #[test]
    fn encode_flat_and_nested() {
        let options = ParseOptions::new();
        let tree = options.parse_str("a=1&b[c]=2&b[d]=").unwrap();
        assert_eq!(encode(&tree, &options), "a=1&b[c]=2&b[d]=");
    }

    #[test]
    fn encode_percent_escapes_and_spaces() {
        let options = ParseOptions::new();
        let tree = options.parse_str("a+b=c%26d").unwrap();
        assert_eq!(encode(&tree, &options), "a+b=c%26d");
    }

    #[test]
    fn encode_array_per_mode() {
        let options = ParseOptions::new();
        let tree = options.parse_str("a[0]=x&a[1]=y").unwrap();
        assert_eq!(encode(&tree, &options), "a[0]=x&a[1]=y");
        assert_eq!(
            encode(&tree, &options.array_format(ArrayFormat::Brackets)),
            "a[]=x&a[]=y"
        );
        assert_eq!(
            encode(&tree, &options.array_format(ArrayFormat::Comma)),
            "a=x,y"
        );
        assert_eq!(
            encode(&tree, &options.array_format(ArrayFormat::Repeat)),
            "a=x&a=y"
        );
    }

    #[test]
    fn comma_mode_escapes_literal_commas() {
        let options = ParseOptions::new().array_format(ArrayFormat::Comma);
        let tree = options.parse_str("a=x%2Cy").unwrap();
        // the scalar's comma stays percent-encoded so it cannot re-split
        assert_eq!(encode(&tree, &options), "a=x%2Cy");
    }

    #[test]
    fn repeat_mode_renders_single_element_arrays_indexed() {
        // a solitary `a=x` would read back as a scalar
        let repeat = ParseOptions::new().array_format(ArrayFormat::Repeat);
        let tree = ParseOptions::new().parse_str("a[0]=x").unwrap();
        assert_eq!(encode(&tree, &repeat), "a[0]=x");
    }

    #[test]
    fn comma_mode_renders_null_elements_indexed() {
        let options = ParseOptions::new().array_format(ArrayFormat::Comma);
        let tree = options.parse_str("a[0]=&a[1]=x").unwrap();
        assert_eq!(encode(&tree, &options), "a[0]=&a[1]=x");
    }

    #[test]
    fn nested_arrays_fall_back_to_indices_in_comma_mode() {
        let options = ParseOptions::new().array_format(ArrayFormat::Comma);
        let indexed = ParseOptions::new();
        let tree = indexed.parse_str("a[0][b]=1&a[1][b]=2").unwrap();
        assert_eq!(encode(&tree, &options), "a[0][b]=1&a[1][b]=2");
    }
}
