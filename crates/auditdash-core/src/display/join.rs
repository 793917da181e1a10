//! Record joiner: reconciles run entries with benchmark evaluations
//!
//! Benchmark pages are evaluation-centric: every evaluation produces a row,
//! in the evaluation map's enumeration order, and the matching entry is
//! looked up by item id. Run pages are driven by the entry list itself.

use std::fmt;

use serde::Serialize;

use crate::models::{EntrySummary, Evaluation, EvaluationMap, non_empty};

/// Title for a run entry whose item has no title
pub const UNTITLED_ENTRY: &str = "Untitled Entry";

/// Title for an evaluation row without a matching, titled entry
pub fn fallback_title(item_id: &str) -> String {
    format!("Item {item_id}")
}

/// One evaluation merged with its entry, if the run has one
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedView<'a> {
    pub item_id: &'a str,
    pub title: String,
    pub entry: Option<&'a EntrySummary>,
    pub evaluation: &'a Evaluation,
}

/// Join evaluations to entries, one row per evaluation.
///
/// The first entry whose `results.id` equals the key wins. Ids are expected
/// to be unique; duplicates are not reported.
pub fn join_evaluations<'a>(
    entries: &'a [EntrySummary],
    evaluations: &'a EvaluationMap,
) -> Vec<JoinedView<'a>> {
    evaluations
        .iter()
        .map(|(item_id, evaluation)| {
            let entry = entries.iter().find(|e| e.results.id == item_id);
            let title = entry
                .and_then(|e| non_empty(Some(e.results.title.as_str())))
                .map(str::to_string)
                .unwrap_or_else(|| fallback_title(item_id));
            JoinedView {
                item_id,
                title,
                entry,
                evaluation,
            }
        })
        .collect()
}

/// Stable identity for a run-page row; tolerates duplicate and missing ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RowKey {
    pub id: Option<String>,
    pub index: usize,
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}-{}", id, self.index),
            None => write!(f, "{}", self.index),
        }
    }
}

/// A run-page row, in entry-list order
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRow<'a> {
    pub key: RowKey,
    pub title: String,
    pub entry: &'a EntrySummary,
}

pub fn entry_rows(entries: &[EntrySummary]) -> Vec<EntryRow<'_>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| EntryRow {
            key: RowKey {
                id: non_empty(Some(entry.results.id.as_str())).map(str::to_string),
                index,
            },
            title: non_empty(Some(entry.results.title.as_str()))
                .unwrap_or(UNTITLED_ENTRY)
                .to_string(),
            entry,
        })
        .collect()
}
