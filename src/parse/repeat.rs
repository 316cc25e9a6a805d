use indexmap::IndexMap;

use crate::parse::path::PathSegment;
use crate::parse::resolve::ParsedValue;

/// Buffer for [`ArrayFormat::Repeat`](crate::ArrayFormat::Repeat) parses.
///
/// Repeated occurrences of the same full key path may be separated by
/// unrelated pairs, so nothing can be grafted until the whole input has been
/// tokenized. Pairs are grouped by path; groups keep first-seen order and
/// each group keeps encounter order, so draining the buffer preserves the
/// input's relative ordering while repeats end up adjacent.
///
/// Scoped to a single parse call: the buffer is owned by the parser instance
/// and consumed when the parse finishes.
#[derive(Default)]
pub(crate) struct RepeatBuffer<'qs> {
    records: IndexMap<Vec<PathSegment<'qs>>, Vec<(ParsedValue<'qs>, usize)>>,
}

impl<'qs> RepeatBuffer<'qs> {
    pub(crate) fn record(
        &mut self,
        path: Vec<PathSegment<'qs>>,
        value: ParsedValue<'qs>,
        position: usize,
    ) {
        self.records
            .entry(path)
            .or_default()
            .push((value, position));
    }

    pub(crate) fn drain(
        self,
    ) -> impl Iterator<Item = (Vec<PathSegment<'qs>>, ParsedValue<'qs>, usize)> {
        self.records.into_iter().flat_map(|(path, entries)| {
            entries
                .into_iter()
                .map(move |(value, position)| (path.clone(), value, position))
        })
    }
}
