//! Benchmark page: a run's evaluations joined to its entries

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::RunSource;
use crate::display::{
    Tone, TruncatableText, join_evaluations, quality_tone, relevance_label, relevance_tone,
};
use crate::models::{BenchmarkRecord, RunRecord};

use super::{ItemDetails, MetadataCard, PageLimits, PageState, optional_entry_blocks};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkPage {
    pub metadata: MetadataCard,
    pub summary: BenchmarkSummary,
    pub rows: Vec<EvaluationView>,
}

/// Aggregate scores and persona details of a benchmark
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSummary {
    pub total_items: u64,
    /// Already a percentage, e.g. `87.5%`
    pub quality_score: String,
    /// Fraction scaled to a percentage
    pub relevance_accuracy: String,
    pub persona_name: String,
    pub focus_areas: String,
    pub completed: Option<DateTime<Utc>>,
    pub missing_items: Vec<String>,
}

impl From<&BenchmarkRecord> for BenchmarkSummary {
    fn from(benchmark: &BenchmarkRecord) -> Self {
        Self {
            total_items: benchmark.total_items,
            quality_score: format!("{:.1}%", benchmark.quality_score),
            relevance_accuracy: format!("{:.1}%", benchmark.relevance_accuracy * 100.0),
            persona_name: benchmark.persona_name.clone(),
            focus_areas: benchmark.persona_focus_areas.join(", "),
            completed: benchmark.timestamp,
            missing_items: benchmark.missing_items.clone(),
        }
    }
}

/// One accordion row per evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationView {
    pub item_id: String,
    pub title: String,
    /// Present only when the run has a matching entry
    pub details: Option<ItemDetails>,
    pub quality_rating: String,
    pub quality_tone: Tone,
    pub relevance: String,
    pub relevance_tone: Tone,
    pub explanations: Vec<TruncatableText>,
    /// The entry's own text, when the run has a matching entry
    pub original_content: Vec<TruncatableText>,
}

pub fn build_benchmark_page(
    run_id: &str,
    run: &RunRecord,
    benchmark: &BenchmarkRecord,
    limits: &PageLimits,
) -> BenchmarkPage {
    let limits = limits.evaluation;
    let rows = join_evaluations(&run.entry_summaries, &benchmark.detailed_evaluations)
        .into_iter()
        .map(|joined| {
            let evaluation = joined.evaluation;
            let explanations = vec![
                TruncatableText::new(
                    "Quality Explanation",
                    Some(evaluation.quality_explanation.as_str()),
                    limits,
                ),
                TruncatableText::new(
                    "Relevance Explanation",
                    Some(evaluation.relevance_explanation.as_str()),
                    limits,
                ),
            ];

            let original_content = joined
                .entry
                .map(|entry| {
                    let mut blocks = vec![TruncatableText::new(
                        "Original Summary",
                        Some(entry.results.summary.as_str()),
                        limits,
                    )];
                    blocks.extend(optional_entry_blocks(entry, limits));
                    blocks
                })
                .unwrap_or_default();

            EvaluationView {
                item_id: joined.item_id.to_string(),
                title: joined.title,
                details: joined.entry.map(|entry| ItemDetails::new(joined.item_id, entry)),
                quality_rating: evaluation.quality_rating.to_string(),
                quality_tone: quality_tone(&evaluation.quality_rating),
                relevance: relevance_label(evaluation.relevance_correct).to_string(),
                relevance_tone: relevance_tone(evaluation.relevance_correct),
                explanations,
                original_content,
            }
        })
        .collect();

    BenchmarkPage {
        metadata: MetadataCard::from_run(run_id, run),
        summary: BenchmarkSummary::from(benchmark),
        rows,
    }
}

/// Load the benchmark page for a run.
///
/// The benchmark and the run are fetched concurrently. Either failing fails
/// the page; a benchmark carrying a failure reason is shown as failed
/// processing instead of being rendered.
pub async fn load_benchmark_page(
    source: &dyn RunSource,
    run_id: &str,
    limits: &PageLimits,
) -> PageState<BenchmarkPage> {
    let (benchmark, run) =
        match tokio::try_join!(source.fetch_benchmark(run_id), source.fetch_run(run_id)) {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(run_id, error = %e, "Failed to load benchmark");
                return PageState::LoadFailed {
                    heading: "Error Loading Benchmark Data".to_string(),
                    message: format!(
                        "Failed to load benchmark data for run ID: {}. Please check if the benchmark exists or try again later.",
                        run_id
                    ),
                    detail: e.to_string(),
                };
            }
        };

    if let Some(reason) = benchmark.failure() {
        warn!(run_id, reason, "Benchmark reported failure");
        return PageState::ProcessingFailed {
            heading: "Benchmark Failed".to_string(),
            message: format!("The benchmark for run ID {} failed to complete.", run_id),
            reason: reason.to_string(),
        };
    }

    debug!(
        run_id,
        evaluations = benchmark.detailed_evaluations.len(),
        "Loaded benchmark"
    );
    PageState::Ready(build_benchmark_page(run_id, &run, &benchmark, limits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntrySummary, Evaluation, Item, QualityRating};

    fn run_with_entry() -> RunRecord {
        RunRecord {
            run_id: "r1".to_string(),
            entry_summaries: vec![EntrySummary {
                raw_input: "raw".to_string(),
                results: Item {
                    id: "a".to_string(),
                    title: "Alpha".to_string(),
                    summary: "summary".to_string(),
                    relevance_to_criteria: Some("matches focus".to_string()),
                    ..Item::default()
                },
                processing_time_ms: Some(5),
            }],
            ..RunRecord::default()
        }
    }

    fn benchmark() -> BenchmarkRecord {
        BenchmarkRecord {
            total_items: 2,
            quality_score: 87.5,
            relevance_accuracy: 0.5,
            persona_name: "LocalLLaMA".to_string(),
            persona_focus_areas: vec!["models".to_string(), "tooling".to_string()],
            detailed_evaluations: vec![
                (
                    "a",
                    Evaluation {
                        quality_rating: QualityRating::Excellent,
                        quality_explanation: "clear".to_string(),
                        relevance_correct: true,
                        relevance_explanation: "on topic".to_string(),
                    },
                ),
                (
                    "b",
                    Evaluation {
                        quality_rating: QualityRating::Other("Unrated".to_string()),
                        ..Evaluation::default()
                    },
                ),
            ]
            .into_iter()
            .collect(),
            ..BenchmarkRecord::default()
        }
    }

    #[test]
    fn test_summary_formatting() {
        let summary = BenchmarkSummary::from(&benchmark());
        assert_eq!(summary.quality_score, "87.5%");
        assert_eq!(summary.relevance_accuracy, "50.0%");
        assert_eq!(summary.focus_areas, "models, tooling");
    }

    #[test]
    fn test_rows_follow_evaluations() {
        let page = build_benchmark_page("r1", &run_with_entry(), &benchmark(), &PageLimits::default());
        assert_eq!(page.rows.len(), 2);

        let matched = &page.rows[0];
        assert_eq!(matched.title, "Alpha");
        assert_eq!(matched.quality_tone, Tone::Positive);
        assert_eq!(matched.relevance, "Correct");
        assert_eq!(matched.details.as_ref().unwrap().processing_time, "5 ms");
        let titles: Vec<&str> = matched.original_content.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Original Summary", "Relevance to Criteria"]);

        let unmatched = &page.rows[1];
        assert_eq!(unmatched.title, "Item b");
        assert!(unmatched.details.is_none());
        assert!(unmatched.original_content.is_empty());
        assert_eq!(unmatched.quality_rating, "Unrated");
        assert_eq!(unmatched.quality_tone, Tone::Neutral);
        assert_eq!(unmatched.relevance_tone, Tone::Negative);
        assert_eq!(unmatched.explanations.len(), 2);
    }
}
