//! Canonical schema for documents served by the auditability service
//!
//! One type per entity, camelCase on the wire. Optional fields decode as
//! absent rather than failing the whole document; older document shapes are
//! upgraded in [`compat`] before they reach these types.

pub mod benchmark;
pub mod compat;
pub mod run;

pub use benchmark::{
    ApiErrorBody, BenchmarkRecord, BenchmarkResponse, BenchmarkStatus, Evaluation, EvaluationMap,
    LogEntry, LogProgress, QualityRating,
};
pub use compat::{CompatReport, upgrade_run_document};
pub use run::{
    EntryComment, EntrySummary, FeedEntry, ImageSummary, Item, KeyDevelopment, Link,
    MediaThumbnail, Persona, RunMetadata, RunRecord, SummaryResponse, WebContentSummary,
};

use serde::{Deserialize, Deserializer};

/// Decode `null` as the type's default. The service emits `null` for empty
/// collections.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat empty strings as absent, matching how the pages decide whether to
/// show an optional field.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
