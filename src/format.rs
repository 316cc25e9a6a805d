//! Indented textual rendering of a parsed tree.
//!
//! A pure tree-walk for debugging and display. This is not the inverse of
//! the wire grammar -- see [`encode`](crate::encode) for that.

use crate::value::{QsArray, QsObject, QsValue};

/// Renders a tree as an indented, brace/bracket-delimited block, one entry
/// per line with tab indentation:
///
/// ```
/// let tree = qs_tree::parse_str("a[b]=1&a[c]=2").unwrap();
/// assert_eq!(qs_tree::format(&tree), "{\n\ta:{\n\t\tb: 1,\n\t\tc: 2\n\t}\n}");
/// ```
pub fn format(tree: &QsObject<'_>) -> String {
    let mut out = String::with_capacity(tree.len() * 16);
    format_object("", true, tree, 0, &mut out);
    out
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push('\t');
    }
}

fn scalar_text<'a>(value: &'a QsValue<'_>) -> &'a str {
    match value {
        QsValue::String(s) => s,
        _ => "null",
    }
}

fn format_object(key: &str, last: bool, object: &QsObject<'_>, level: usize, out: &mut String) {
    indent(out, level);
    out.push_str(key);
    if !key.is_empty() {
        out.push(':');
    }
    out.push_str("{\n");
    let len = object.len();
    for (i, (entry_key, value)) in object.iter().enumerate() {
        let last_entry = i == len - 1;
        match value {
            QsValue::Object(map) => format_object(entry_key, last_entry, map, level + 1, out),
            QsValue::Array(items) => format_array(entry_key, last_entry, items, level + 1, out),
            scalar => {
                indent(out, level + 1);
                out.push_str(entry_key);
                out.push_str(": ");
                out.push_str(scalar_text(scalar));
                if !last_entry {
                    out.push_str(",\n");
                }
            }
        }
    }
    out.push('\n');
    indent(out, level);
    out.push('}');
    if !last {
        out.push_str(",\n");
    }
}

fn format_array(key: &str, last: bool, items: &QsArray<'_>, level: usize, out: &mut String) {
    indent(out, level);
    out.push_str(key);
    if !key.is_empty() {
        out.push(':');
    }
    out.push_str("[\n");
    let len = items.len();
    for (i, value) in items.iter().enumerate() {
        let last_entry = i == len - 1;
        match value {
            QsValue::Object(map) => format_object("", last_entry, map, level + 1, out),
            QsValue::Array(nested) => format_array("", last_entry, nested, level + 1, out),
            scalar => {
                indent(out, level + 1);
                out.push_str(scalar_text(scalar));
                if !last_entry {
                    out.push_str(",\n");
                }
            }
        }
    }
    out.push('\n');
    indent(out, level);
    out.push(']');
    if !last {
        out.push_str(",\n");
    }
}

#[cfg(test)]
mod tests {
    use super::format;
    use crate::parse_str;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_flat_pairs() {
        let tree = parse_str("a=1&b=2").unwrap();
        assert_eq!(format(&tree), "{\n\ta: 1,\n\tb: 2\n}");
    }

    #[test]
    fn format_nested_object() {
        let tree = parse_str("a[b]=1").unwrap();
        assert_eq!(format(&tree), "{\n\ta:{\n\t\tb: 1\n\t}\n}");
    }

    #[test]
    fn format_array_of_scalars() {
        let tree = parse_str("a[0]=x&a[1]=y").unwrap();
        assert_eq!(format(&tree), "{\n\ta:[\n\t\tx,\n\t\ty\n\t]\n}");
    }

    #[test]
    fn format_null_scalar() {
        let tree = parse_str("a=").unwrap();
        assert_eq!(format(&tree), "{\n\ta: null\n}");
    }

    #[test]
    fn format_empty_tree() {
        let tree = parse_str("").unwrap();
        assert_eq!(format(&tree), "{\n\n}");
    }
}
