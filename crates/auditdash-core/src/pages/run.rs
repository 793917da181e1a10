//! Run pages: the latest run and a run by id

use serde::Serialize;
use tracing::{debug, warn};

use crate::client::RunSource;
use crate::display::{RowKey, TruncatableText, entry_rows};
use crate::models::{KeyDevelopment, RunRecord};

use super::{ItemDetails, MetadataCard, PageLimits, PageState, PersonaSection, optional_entry_blocks};

/// A rendered run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPage {
    pub metadata: MetadataCard,
    pub persona: PersonaSection,
    /// Empty when the run has no overall summary; the section is then omitted
    pub key_developments: Vec<KeyDevelopment>,
    pub entries: Vec<EntryView>,
}

/// One accordion row on a run page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub key: RowKey,
    pub title: String,
    pub details: ItemDetails,
    pub blocks: Vec<TruncatableText>,
}

/// Build the view model for a run shown under `run_id`
pub fn build_run_page(run_id: &str, run: &RunRecord, limits: &PageLimits) -> RunPage {
    let entries = entry_rows(&run.entry_summaries)
        .into_iter()
        .map(|row| {
            let entry = row.entry;
            let mut blocks = vec![
                TruncatableText::new("Raw Input", Some(entry.raw_input.as_str()), limits.standard),
                TruncatableText::new("Summary", Some(entry.results.summary.as_str()), limits.entry),
            ];
            blocks.extend(optional_entry_blocks(entry, limits.entry));

            EntryView {
                details: ItemDetails::new(&entry.results.id, entry),
                key: row.key,
                title: row.title,
                blocks,
            }
        })
        .collect();

    RunPage {
        metadata: MetadataCard::from_run(run_id, run),
        persona: PersonaSection::from(&run.persona),
        key_developments: run.key_developments().to_vec(),
        entries,
    }
}

/// Load the home page: the most recent run
pub async fn load_latest_page(source: &dyn RunSource, limits: &PageLimits) -> PageState<RunPage> {
    match source.fetch_latest_run().await {
        Ok(run) => {
            debug!(run_id = %run.run_id, entries = run.entry_summaries.len(), "Loaded latest run");
            PageState::Ready(build_run_page(&run.run_id, &run, limits))
        }
        Err(e) => {
            warn!(error = %e, "Failed to load latest run");
            PageState::LoadFailed {
                heading: "Error Loading Data".to_string(),
                message: "Failed to load latest run data. Please check if the service is running or try again later.".to_string(),
                detail: e.to_string(),
            }
        }
    }
}

/// Load a run by id. The card shows the requested id.
pub async fn load_run_page(
    source: &dyn RunSource,
    run_id: &str,
    limits: &PageLimits,
) -> PageState<RunPage> {
    match source.fetch_run(run_id).await {
        Ok(run) => {
            debug!(run_id, entries = run.entry_summaries.len(), "Loaded run");
            PageState::Ready(build_run_page(run_id, &run, limits))
        }
        Err(e) => {
            warn!(run_id, error = %e, "Failed to load run");
            PageState::LoadFailed {
                heading: "Error Loading Run Data".to_string(),
                message: format!(
                    "Failed to load run data for ID: {}. Please check if the run exists or try again later.",
                    run_id
                ),
                detail: e.to_string(),
            }
        }
    }
}
