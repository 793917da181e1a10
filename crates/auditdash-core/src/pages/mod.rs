//! Page view models
//!
//! A page is loaded from a [`RunSource`](crate::client::RunSource) in one go
//! and then rendered. Loading either yields a complete view model or a
//! terminal failure state; nothing is rendered from half a dataset.
//!
//! - [`load_latest_page`] / [`load_run_page`]: run metadata, persona,
//!   key developments and one accordion row per entry
//! - [`load_benchmark_page`]: run and benchmark fetched together, one row
//!   per evaluation
//! - [`BenchmarkControls`]: client-side guard for starting a benchmark

mod benchmark;
mod controls;
mod run;

pub use benchmark::{BenchmarkPage, BenchmarkSummary, EvaluationView, build_benchmark_page, load_benchmark_page};
pub use controls::BenchmarkControls;
pub use run::{EntryView, RunPage, build_run_page, load_latest_page, load_run_page};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::DisplayConfig;
use crate::display::{DisplayLimits, TruncatableText, yes_no};
use crate::models::{EntrySummary, Persona, RunRecord, non_empty};

/// Fallback for absent item details
pub const NOT_APPLICABLE: &str = "N/A";

/// Fallback for absent persona fields
pub const NOT_AVAILABLE: &str = "Not available";

/// Outcome of loading a page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PageState<T> {
    Ready(T),
    /// Transport or decoding failure
    LoadFailed {
        heading: String,
        message: String,
        detail: String,
    },
    /// The service reported that producing the record failed
    ProcessingFailed {
        heading: String,
        message: String,
        reason: String,
    },
}

impl<T> PageState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(page) => Some(page),
            _ => None,
        }
    }

    pub fn heading(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::LoadFailed { heading, .. } | Self::ProcessingFailed { heading, .. } => {
                Some(heading)
            }
        }
    }
}

/// Collapsed limits for each kind of text block on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLimits {
    /// Raw input and other blocks using the defaults
    pub standard: DisplayLimits,
    /// Entry text on run pages
    pub entry: DisplayLimits,
    /// Entry text and explanations on benchmark pages
    pub evaluation: DisplayLimits,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for PageLimits {
    fn from(display: &DisplayConfig) -> Self {
        Self {
            standard: display.limits(),
            entry: display.entry_limits(),
            evaluation: display.evaluation_limits(),
        }
    }
}

/// Run metadata card. Absent models and times are left out when rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataCard {
    pub run_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub overall_model: Option<String>,
    pub image_model: Option<String>,
    pub web_content_model: Option<String>,
    pub total_processing_time_ms: Option<u64>,
}

impl MetadataCard {
    pub fn from_run(run_id: &str, run: &RunRecord) -> Self {
        let model = |name: &str| non_empty(Some(name)).map(str::to_string);
        Self {
            run_id: run_id.to_string(),
            timestamp: run.run_date,
            overall_model: model(run.overall_model_used.as_str()),
            image_model: model(run.image_model_used.as_str()),
            web_content_model: model(run.web_content_model_used.as_str()),
            total_processing_time_ms: run.total_processing_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaSection {
    pub name: String,
    pub identity: String,
    pub focus_areas: String,
    pub exclusion_criteria: String,
}

impl From<&Persona> for PersonaSection {
    fn from(persona: &Persona) -> Self {
        Self {
            name: persona.name.clone(),
            identity: non_empty(Some(persona.base_prompt_task.as_str()))
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            focus_areas: join_or_unavailable(persona.focus_areas.as_deref()),
            exclusion_criteria: join_or_unavailable(persona.exclusion_criteria.as_deref()),
        }
    }
}

/// Join a list for display. An absent list is "Not available"; an empty
/// one renders as an empty string.
fn join_or_unavailable(values: Option<&[String]>) -> String {
    values
        .map(|values| values.join(", "))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// The detail grid shown at the top of an entry row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub id: String,
    pub relevant: String,
    pub processing_time: String,
    pub link: String,
}

impl ItemDetails {
    pub(crate) fn new(id: &str, entry: &EntrySummary) -> Self {
        Self {
            id: non_empty(Some(id)).unwrap_or(NOT_APPLICABLE).to_string(),
            relevant: yes_no(entry.results.is_relevant).to_string(),
            processing_time: entry
                .processing_time_ms
                .map(|ms| format!("{} ms", ms))
                .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            link: non_empty(entry.results.link.as_deref())
                .unwrap_or(NOT_APPLICABLE)
                .to_string(),
        }
    }
}

/// Text blocks for an entry's optional item fields, present only when non-empty
pub(crate) fn optional_entry_blocks(
    entry: &EntrySummary,
    limits: DisplayLimits,
) -> Vec<TruncatableText> {
    let item = &entry.results;
    [
        ("Comment Summary", item.comment_summary.as_deref()),
        ("Relevance to Criteria", item.relevance_to_criteria.as_deref()),
        ("Image Description", item.image_description.as_deref()),
        ("Web Content Summary", item.web_content_summary.as_deref()),
    ]
    .into_iter()
    .filter_map(|(title, content)| {
        non_empty(content).map(|content| TruncatableText::new(title, Some(content), limits))
    })
    .collect()
}
