//! The path-resolution engine: grafts each completed (path, value) pair onto
//! the shared result tree, creating intermediate maps and sequences on
//! demand and resolving the two documented structural conflicts
//! (array-to-map coercion, and wrapping a map into a sequence).
//!
//! Explicit indices may arrive out of order; a sequence slot addressed ahead
//! of the current length is held open with a [`ParsedValue::Hole`] and must
//! be backfilled by the end of the input. Finalization converts the working
//! tree into the public [`QsValue`] tree, failing on any surviving hole.

use std::borrow::Cow;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::{Error, Result};
use crate::parse::path::{PathSegment, fold_depth, render_path};
use crate::value::{QsObject, QsValue};

pub(crate) type ParsedMap<'qs> = IndexMap<Cow<'qs, str>, ParsedValue<'qs>>;

/// Working representation of the tree while pairs are still being grafted.
///
/// `Hole` is a placeholder for a sequence slot that was skipped over by a
/// larger explicit index. It records the offset and rendered path of the
/// pair that created it so the eventual error can point at the culprit.
#[derive(Debug, PartialEq)]
pub(crate) enum ParsedValue<'qs> {
    Null,
    String(Cow<'qs, str>),
    Sequence(Vec<ParsedValue<'qs>>),
    Map(ParsedMap<'qs>),
    Hole { path: String, position: usize },
}

/// Grafts one (path, value) pair onto the root map. `position` is the byte
/// offset of the pair, carried into any error it provokes.
pub(crate) fn graft<'qs>(
    root: &mut ParsedMap<'qs>,
    path: &[PathSegment<'qs>],
    value: ParsedValue<'qs>,
    max_depth: usize,
    position: usize,
) -> Result<()> {
    let path = fold_depth(path, max_depth);
    let Some((first, rest)) = path.split_first() else {
        return Ok(());
    };
    // the root is always a map, so a numeric first segment is a string key
    let key = match first {
        PathSegment::Key(key) => key.clone(),
        PathSegment::Index(index) => Cow::Owned(index.to_string()),
        PathSegment::Append => {
            return Err(Error::type_conflict(
                "cannot append at the top level",
                position,
            ));
        }
    };
    if rest.is_empty() {
        place_in_map(root, key, value);
        Ok(())
    } else {
        let child = root
            .entry(key)
            .or_insert_with(|| empty_node_for(&rest[0]));
        graft_into(child, &rest[0], &rest[1..], value, &path, position)
    }
}

/// Converts the finished working tree into the public tree, rejecting any
/// sequence gap that was never backfilled.
pub(crate) fn finish(map: ParsedMap<'_>) -> Result<QsObject<'_>> {
    map.into_iter()
        .map(|(key, value)| Ok((key, finish_value(value)?)))
        .collect()
}

fn finish_value(value: ParsedValue<'_>) -> Result<QsValue<'_>> {
    match value {
        ParsedValue::Null => Ok(QsValue::Null),
        ParsedValue::String(s) => Ok(QsValue::String(s)),
        ParsedValue::Sequence(items) => Ok(QsValue::Array(
            items.into_iter().map(finish_value).collect::<Result<_>>()?,
        )),
        ParsedValue::Map(map) => Ok(QsValue::Object(finish(map)?)),
        ParsedValue::Hole { path, position } => Err(Error::skip_add(path, position)),
    }
}

/// Kind of node to create for a not-yet-existing child: the following
/// segment decides whether it must be a sequence or a map.
fn empty_node_for<'qs>(next: &PathSegment<'qs>) -> ParsedValue<'qs> {
    match next {
        PathSegment::Index(_) | PathSegment::Append => ParsedValue::Sequence(vec![]),
        PathSegment::Key(_) => ParsedValue::Map(ParsedMap::new()),
    }
}

fn sequence_to_map(items: Vec<ParsedValue<'_>>) -> ParsedMap<'_> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, value)| (Cow::Owned(index.to_string()), value))
        .collect()
}

fn fill_holes<'qs>(
    items: &mut Vec<ParsedValue<'qs>>,
    index: usize,
    full_path: &[PathSegment<'qs>],
    position: usize,
) {
    while items.len() < index {
        items.push(ParsedValue::Hole {
            path: render_path(full_path),
            position,
        });
    }
}

fn graft_into<'qs>(
    node: &mut ParsedValue<'qs>,
    segment: &PathSegment<'qs>,
    rest: &[PathSegment<'qs>],
    value: ParsedValue<'qs>,
    full_path: &[PathSegment<'qs>],
    position: usize,
) -> Result<()> {
    let Some((next, tail)) = rest.split_first() else {
        return place(node, segment, value, full_path, position);
    };
    match node {
        ParsedValue::Map(map) => match segment {
            PathSegment::Key(key) => {
                let child = map
                    .entry(key.clone())
                    .or_insert_with(|| empty_node_for(next));
                graft_into(child, next, tail, value, full_path, position)
            }
            PathSegment::Index(_) | PathSegment::Append => {
                // a sequence index arrived where a map already lives: build
                // the new branch first, then relink both under a fresh
                // two-element sequence at the old location
                let mut branch = empty_node_for(next);
                graft_into(&mut branch, next, tail, value, full_path, position)?;
                let old = std::mem::replace(node, ParsedValue::Null);
                *node = ParsedValue::Sequence(vec![old, branch]);
                Ok(())
            }
        },
        ParsedValue::Sequence(items) => match segment {
            PathSegment::Append => {
                let end = items.len();
                items.push(empty_node_for(next));
                graft_into(&mut items[end], next, tail, value, full_path, position)
            }
            PathSegment::Index(index) => {
                if *index < items.len() {
                    if matches!(items[*index], ParsedValue::Hole { .. }) {
                        items[*index] = empty_node_for(next);
                    }
                    graft_into(&mut items[*index], next, tail, value, full_path, position)
                } else {
                    fill_holes(items, *index, full_path, position);
                    items.push(empty_node_for(next));
                    graft_into(&mut items[*index], next, tail, value, full_path, position)
                }
            }
            PathSegment::Key(key) => {
                // array-to-map coercion: reindex the sequence under its
                // stringified positions and relink the map in place
                let mut map = sequence_to_map(std::mem::take(items));
                let child = map
                    .entry(key.clone())
                    .or_insert_with(|| empty_node_for(next));
                graft_into(child, next, tail, value, full_path, position)?;
                *node = ParsedValue::Map(map);
                Ok(())
            }
        },
        ParsedValue::Null | ParsedValue::String(_) | ParsedValue::Hole { .. } => {
            Err(Error::type_conflict(
                format!(
                    "cannot nest under the scalar value at {}",
                    render_path(full_path)
                ),
                position,
            ))
        }
    }
}

/// Applies the value-placement rules at the last path segment.
fn place<'qs>(
    node: &mut ParsedValue<'qs>,
    segment: &PathSegment<'qs>,
    value: ParsedValue<'qs>,
    full_path: &[PathSegment<'qs>],
    position: usize,
) -> Result<()> {
    match node {
        ParsedValue::Map(map) => {
            let key = match segment {
                PathSegment::Key(key) => key.clone(),
                PathSegment::Index(index) => Cow::Owned(index.to_string()),
                PathSegment::Append => {
                    return Err(Error::type_conflict(
                        format!("cannot append to the map at {}", render_path(full_path)),
                        position,
                    ));
                }
            };
            place_in_map(map, key, value);
            Ok(())
        }
        ParsedValue::Sequence(items) => match segment {
            PathSegment::Append => {
                items.push(value);
                Ok(())
            }
            PathSegment::Index(index) => {
                if *index == items.len() {
                    items.push(value);
                } else if *index < items.len() {
                    let slot = &mut items[*index];
                    if matches!(slot, ParsedValue::Hole { .. }) {
                        // backfilling a previously skipped slot
                        *slot = value;
                    } else if let ParsedValue::Sequence(existing) = slot {
                        tracing::warn!(
                            index = *index,
                            "index appears more than once, coalescing values into a list"
                        );
                        existing.push(value);
                    } else {
                        tracing::warn!(
                            index = *index,
                            "index appears more than once, coalescing values into a list"
                        );
                        let old = std::mem::replace(slot, ParsedValue::Null);
                        *slot = ParsedValue::Sequence(vec![old, value]);
                    }
                } else {
                    fill_holes(items, *index, full_path, position);
                    items.push(value);
                }
                Ok(())
            }
            PathSegment::Key(key) => {
                let mut map = sequence_to_map(std::mem::take(items));
                place_in_map(&mut map, key.clone(), value);
                *node = ParsedValue::Map(map);
                Ok(())
            }
        },
        ParsedValue::Null | ParsedValue::String(_) | ParsedValue::Hole { .. } => {
            Err(Error::type_conflict(
                format!(
                    "the value at {} cannot hold nested entries",
                    render_path(full_path)
                ),
                position,
            ))
        }
    }
}

fn place_in_map<'qs>(map: &mut ParsedMap<'qs>, key: Cow<'qs, str>, value: ParsedValue<'qs>) {
    match map.entry(key) {
        Entry::Occupied(mut occupied) => {
            tracing::warn!(
                key = %occupied.key(),
                "key appears more than once, coalescing values into a list"
            );
            let existing = occupied.get_mut();
            match existing {
                ParsedValue::Sequence(items) => match value {
                    // comma-split values merge element-wise
                    ParsedValue::Sequence(new_items) => items.extend(new_items),
                    value => items.push(value),
                },
                _ => {
                    let old = std::mem::replace(existing, ParsedValue::Null);
                    *existing = ParsedValue::Sequence(vec![old, value]);
                }
            }
        }
        Entry::Vacant(vacant) => {
            vacant.insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::{ParsedMap, ParsedValue, finish, graft};
    use crate::error::Error;
    use crate::parse::path::PathSegment;
    use crate::value::QsValue;
    use pretty_assertions::assert_eq;

    fn key(s: &str) -> PathSegment<'_> {
        PathSegment::Key(Cow::Borrowed(s))
    }

    fn string(s: &str) -> ParsedValue<'_> {
        ParsedValue::String(Cow::Borrowed(s))
    }

    #[test]
    fn graft_scalar_at_root() {
        let mut root = ParsedMap::new();
        graft(&mut root, &[key("a")], string("x"), 5, 0).unwrap();
        let tree = finish(root).unwrap();
        assert_eq!(tree["a"].as_str(), Some("x"));
    }

    #[test]
    fn graft_creates_intermediate_kinds_on_demand() {
        let mut root = ParsedMap::new();
        graft(
            &mut root,
            &[key("a"), key("b"), PathSegment::Index(0)],
            string("x"),
            5,
            0,
        )
        .unwrap();
        let tree = finish(root).unwrap();
        let b = tree["a"].as_object().unwrap()["b"].as_array().unwrap();
        assert_eq!(b[0].as_str(), Some("x"));
    }

    #[test]
    fn out_of_order_indices_backfill_holes() {
        let mut root = ParsedMap::new();
        graft(&mut root, &[key("a"), PathSegment::Index(1)], string("y"), 5, 0).unwrap();
        graft(&mut root, &[key("a"), PathSegment::Index(0)], string("x"), 5, 7).unwrap();
        let tree = finish(root).unwrap();
        assert_eq!(
            tree["a"],
            QsValue::Array(vec!["x".into(), "y".into()])
        );
    }

    #[test]
    fn unfilled_hole_is_a_skip_add_error() {
        let mut root = ParsedMap::new();
        graft(&mut root, &[key("a"), PathSegment::Index(0)], string("x"), 5, 0).unwrap();
        graft(&mut root, &[key("a"), PathSegment::Index(2)], string("y"), 5, 7).unwrap();
        let err = finish(root).unwrap_err();
        match err {
            Error::SkipAdd { path, position } => {
                assert_eq!(path, "a[2]");
                assert_eq!(position, 7);
            }
            other => panic!("expected SkipAdd, got {other:?}"),
        }
    }

    #[test]
    fn key_into_sequence_coerces_array_to_map() {
        let mut root = ParsedMap::new();
        graft(&mut root, &[key("a"), PathSegment::Index(0)], string("x"), 5, 0).unwrap();
        graft(&mut root, &[key("a"), key("b")], string("y"), 5, 7).unwrap();
        let tree = finish(root).unwrap();
        let a = tree["a"].as_object().unwrap();
        assert_eq!(a["0"].as_str(), Some("x"));
        assert_eq!(a["b"].as_str(), Some("y"));
    }

    #[test]
    fn index_into_map_wraps_into_sequence() {
        let mut root = ParsedMap::new();
        graft(&mut root, &[key("a"), key("b")], string("1"), 5, 0).unwrap();
        graft(
            &mut root,
            &[key("a"), PathSegment::Index(0), key("c")],
            string("2"),
            5,
            7,
        )
        .unwrap();
        let tree = finish(root).unwrap();
        let a = tree["a"].as_array().unwrap();
        assert_eq!(a[0].as_object().unwrap()["b"].as_str(), Some("1"));
        assert_eq!(a[1].as_object().unwrap()["c"].as_str(), Some("2"));
    }

    #[test]
    fn repeated_leaf_key_coalesces() {
        let mut root = ParsedMap::new();
        graft(&mut root, &[key("a")], string("1"), 5, 0).unwrap();
        graft(&mut root, &[key("a")], string("2"), 5, 4).unwrap();
        graft(&mut root, &[key("a")], string("3"), 5, 8).unwrap();
        let tree = finish(root).unwrap();
        assert_eq!(
            tree["a"],
            QsValue::Array(vec!["1".into(), "2".into(), "3".into()])
        );
    }

    #[test]
    fn comma_list_extends_existing_sequence() {
        let mut root = ParsedMap::new();
        graft(
            &mut root,
            &[key("a")],
            ParsedValue::Sequence(vec![string("1"), string("2")]),
            5,
            0,
        )
        .unwrap();
        graft(
            &mut root,
            &[key("a")],
            ParsedValue::Sequence(vec![string("3"), string("4")]),
            5,
            8,
        )
        .unwrap();
        let tree = finish(root).unwrap();
        assert_eq!(
            tree["a"],
            QsValue::Array(vec!["1".into(), "2".into(), "3".into(), "4".into()])
        );
    }

    #[test]
    fn nesting_under_a_scalar_is_a_type_conflict() {
        let mut root = ParsedMap::new();
        graft(&mut root, &[key("a")], string("1"), 5, 0).unwrap();
        let err = graft(&mut root, &[key("a"), key("b")], string("2"), 5, 4).unwrap_err();
        assert!(matches!(err, Error::TypeConflict { .. }), "got {err:?}");
    }

    #[test]
    fn append_into_map_is_a_type_conflict() {
        let mut root = ParsedMap::new();
        graft(&mut root, &[key("a"), key("b")], string("1"), 5, 0).unwrap();
        let err = graft(
            &mut root,
            &[key("a"), PathSegment::Append],
            string("2"),
            5,
            7,
        )
        .unwrap_err();
        assert!(matches!(err, Error::TypeConflict { .. }), "got {err:?}");
    }

    #[test]
    fn numeric_root_key_is_a_string_key() {
        let mut root = ParsedMap::new();
        graft(&mut root, &[PathSegment::Index(0)], string("x"), 5, 0).unwrap();
        let tree = finish(root).unwrap();
        assert_eq!(tree["0"].as_str(), Some("x"));
    }

    #[test]
    fn depth_fold_applies_before_walking() {
        let mut root = ParsedMap::new();
        graft(
            &mut root,
            &[key("a"), key("b"), key("c"), key("d")],
            string("x"),
            1,
            0,
        )
        .unwrap();
        let tree = finish(root).unwrap();
        let b = tree["a"].as_object().unwrap()["b"].as_object().unwrap();
        assert_eq!(b["[c][d]"].as_str(), Some("x"));
    }

    #[test]
    fn numeric_leaf_into_map_uses_string_key() {
        let mut root = ParsedMap::new();
        graft(&mut root, &[key("a"), key("b")], string("1"), 5, 0).unwrap();
        graft(&mut root, &[key("a"), PathSegment::Index(0)], string("2"), 5, 7).unwrap();
        let tree = finish(root).unwrap();
        let a = tree["a"].as_object().unwrap();
        assert_eq!(a["b"].as_str(), Some("1"));
        assert_eq!(a["0"].as_str(), Some("2"));
    }
}
