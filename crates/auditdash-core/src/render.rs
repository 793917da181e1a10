//! Plain-text rendering of pages for terminals and pipes

use chrono::{DateTime, Utc};

use crate::display::{ExpansionState, TruncatableText};
use crate::models::{BenchmarkStatus, LogEntry, RunMetadata};
use crate::pages::{
    BenchmarkPage, BenchmarkSummary, ItemDetails, MetadataCard, PageState, PersonaSection, RunPage,
};

/// Hint printed under a collapsed, truncated block
pub const SHOW_MORE_HINT: &str = "[Show More]";

const BLOCK_INDENT: &str = "    ";

/// Render a timestamp the same way everywhere
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// A page that can be rendered as text
pub trait RenderPage {
    fn render_lines(&self, renderer: &TextRenderer, lines: &mut Vec<String>);
}

/// Renders page states to plain text.
///
/// Accordion rows are printed open unless `rows_open` is off, in which case
/// only their titles are listed. Text blocks show their collapsed preview
/// unless `expand_all` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRenderer {
    pub expand_all: bool,
    pub rows_open: bool,
    /// Width of section rules
    pub width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            expand_all: false,
            rows_open: true,
            width: 80,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expand_all(mut self, expand_all: bool) -> Self {
        self.expand_all = expand_all;
        self
    }

    pub fn rows_open(mut self, rows_open: bool) -> Self {
        self.rows_open = rows_open;
        self
    }

    pub fn render<T: RenderPage>(&self, state: &PageState<T>) -> String {
        let mut lines = Vec::new();
        match state {
            PageState::Ready(page) => page.render_lines(self, &mut lines),
            PageState::LoadFailed {
                heading,
                message,
                detail,
            } => {
                lines.push(heading.clone());
                lines.push(message.clone());
                if !detail.is_empty() {
                    lines.push(String::new());
                    lines.push(detail.clone());
                }
            }
            PageState::ProcessingFailed {
                heading,
                message,
                reason,
            } => {
                lines.push(heading.clone());
                lines.push(message.clone());
                lines.push(String::new());
                lines.push("Failure Reason:".to_string());
                lines.push(reason.clone());
            }
        }
        finish(lines)
    }

    pub fn render_runs(&self, runs: &[RunMetadata]) -> String {
        if runs.is_empty() {
            return finish(vec!["No runs found.".to_string()]);
        }

        let mut lines = vec!["Runs:".to_string()];
        for run in runs {
            let mut line = format!(
                "  {} - {} ({})",
                run.id,
                run.persona_name,
                format_timestamp(run.run_date)
            );
            if let Some(total) = run.total_items {
                line.push_str(&format!(" {} items", total));
            }
            if run.has_benchmark == Some(true) {
                line.push_str(" [benchmarked]");
            }
            lines.push(line);
        }
        finish(lines)
    }

    pub fn render_status(&self, status: &BenchmarkStatus) -> String {
        let state = if status.is_running { "running" } else { "idle" };
        finish(vec![format!("Benchmark: {}", state)])
    }

    pub fn render_logs(&self, logs: &[LogEntry]) -> String {
        if logs.is_empty() {
            return finish(vec!["No benchmark logs available.".to_string()]);
        }

        let lines = logs
            .iter()
            .map(|entry| {
                let mut line = format!(
                    "{} [{}]",
                    format_timestamp(entry.timestamp),
                    entry.level.to_uppercase()
                );
                if let Some(progress) = entry.progress {
                    line.push_str(&format!(" ({}/{})", progress.current, progress.total));
                }
                if let Some(item_id) = &entry.item_id {
                    line.push_str(&format!(" {}:", item_id));
                }
                line.push(' ');
                line.push_str(&entry.message);
                line
            })
            .collect();
        finish(lines)
    }

    fn section(&self, lines: &mut Vec<String>, title: &str) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(title.to_string());
        lines.push("=".repeat(title.chars().count().min(self.width)));
    }

    fn row_marker(&self) -> &'static str {
        let state = if self.rows_open {
            ExpansionState::Expanded
        } else {
            ExpansionState::Collapsed
        };
        state.marker()
    }

    fn block(&self, lines: &mut Vec<String>, block: &TruncatableText) {
        let state = if self.expand_all {
            ExpansionState::Expanded
        } else {
            ExpansionState::Collapsed
        };

        lines.push(format!("  {}:", block.title));
        let displayed = block.displayed(state);
        if displayed.is_empty() {
            lines.push(format!("{}(empty)", BLOCK_INDENT));
        } else {
            lines.extend(displayed.split('\n').map(|line| format!("{}{}", BLOCK_INDENT, line)));
        }
        if !state.is_expanded() && block.shows_toggle() {
            lines.push(format!("{}{}", BLOCK_INDENT, SHOW_MORE_HINT));
        }
    }

    fn metadata(&self, lines: &mut Vec<String>, card: &MetadataCard) {
        self.section(lines, "Run Metadata");
        lines.push(format!("Run ID: {}", card.run_id));
        lines.push(format!("Timestamp: {}", format_timestamp(card.timestamp)));
        for (label, value) in [
            ("Overall Model", &card.overall_model),
            ("Image Model", &card.image_model),
            ("Web Content Model", &card.web_content_model),
        ] {
            if let Some(value) = value {
                lines.push(format!("{}: {}", label, value));
            }
        }
        if let Some(ms) = card.total_processing_time_ms {
            lines.push(format!("Total Processing Time: {} ms", ms));
        }
    }

    fn persona(&self, lines: &mut Vec<String>, persona: &PersonaSection) {
        self.section(lines, "Persona Details");
        lines.push(format!("Name: {}", persona.name));
        lines.push(format!("Identity / System Prompt: {}", persona.identity));
        lines.push(format!("Focus Areas: {}", persona.focus_areas));
        lines.push(format!("Exclusion Criteria: {}", persona.exclusion_criteria));
    }

    fn details(&self, lines: &mut Vec<String>, heading: &str, details: &ItemDetails) {
        lines.push(format!("  {}", heading));
        lines.push(format!("{}ID: {}", BLOCK_INDENT, details.id));
        lines.push(format!("{}Relevant: {}", BLOCK_INDENT, details.relevant));
        lines.push(format!("{}Processing Time: {}", BLOCK_INDENT, details.processing_time));
        lines.push(format!("{}Link: {}", BLOCK_INDENT, details.link));
    }

    fn benchmark_summary(&self, lines: &mut Vec<String>, summary: &BenchmarkSummary) {
        self.section(lines, "Benchmark Results");
        lines.push(format!("Total Items: {}", summary.total_items));
        lines.push(format!("Quality Score: {}", summary.quality_score));
        lines.push(format!("Relevance Accuracy: {}", summary.relevance_accuracy));
        lines.push(format!("Persona: {}", summary.persona_name));
        lines.push(format!("Focus Areas: {}", summary.focus_areas));
        lines.push(format!("Completed: {}", format_timestamp(summary.completed)));
        if !summary.missing_items.is_empty() {
            lines.push(format!("Missing Items: {}", summary.missing_items.join(", ")));
        }
    }
}

impl RenderPage for RunPage {
    fn render_lines(&self, renderer: &TextRenderer, lines: &mut Vec<String>) {
        renderer.metadata(lines, &self.metadata);
        renderer.persona(lines, &self.persona);

        if !self.key_developments.is_empty() {
            renderer.section(lines, "Overall Summary");
            lines.push("Key Developments:".to_string());
            for development in &self.key_developments {
                lines.push(format!("  - {}", development.text));
                if !development.item_id.is_empty() {
                    lines.push(format!("    Referenced Item ID: {}", development.item_id));
                }
            }
        }

        renderer.section(lines, "Entry Summaries");
        if self.entries.is_empty() {
            lines.push("No entry summaries available for this run.".to_string());
            return;
        }
        for entry in &self.entries {
            lines.push(format!("{} {}", renderer.row_marker(), entry.title));
            if !renderer.rows_open {
                continue;
            }
            renderer.details(lines, "Details", &entry.details);
            for block in &entry.blocks {
                renderer.block(lines, block);
            }
        }
    }
}

impl RenderPage for BenchmarkPage {
    fn render_lines(&self, renderer: &TextRenderer, lines: &mut Vec<String>) {
        renderer.metadata(lines, &self.metadata);
        renderer.benchmark_summary(lines, &self.summary);

        renderer.section(lines, "Detailed Evaluations");
        if self.rows.is_empty() {
            lines.push("No detailed evaluations available for this benchmark.".to_string());
            return;
        }
        for row in &self.rows {
            lines.push(format!("{} {}", renderer.row_marker(), row.title));
            if !renderer.rows_open {
                continue;
            }
            if let Some(details) = &row.details {
                renderer.details(lines, "Item Details", details);
            }
            lines.push(format!("  Quality Rating: {}", row.quality_rating));
            lines.push(format!("  Relevance Assessment: {}", row.relevance));
            for block in row.explanations.iter().chain(&row.original_content) {
                renderer.block(lines, block);
            }
        }
    }
}

/// Join lines; every rendering ends with exactly one newline
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayLimits;
    use crate::models::{EntrySummary, Item, RunRecord};
    use crate::pages::{PageLimits, build_run_page};

    fn run_page() -> PageState<RunPage> {
        let run = RunRecord {
            run_id: "r1".to_string(),
            entry_summaries: vec![EntrySummary {
                raw_input: "1\n2\n3\n4".to_string(),
                results: Item {
                    id: "a".to_string(),
                    title: "Alpha".to_string(),
                    summary: "short".to_string(),
                    ..Item::default()
                },
                processing_time_ms: None,
            }],
            ..RunRecord::default()
        };
        PageState::Ready(build_run_page("r1", &run, &PageLimits::default()))
    }

    #[test]
    fn test_format_timestamp() {
        let ts = DateTime::parse_from_rfc3339("2025-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(Some(ts)), "2025-05-01 10:00:00 UTC");
        assert_eq!(format_timestamp(None), "Unknown");
    }

    #[test]
    fn test_collapsed_block_has_hint() {
        let out = TextRenderer::new().render(&run_page());
        assert!(out.contains("Run ID: r1"));
        assert!(out.contains("▼ Alpha"));
        assert!(out.contains("    3..."));
        assert!(!out.contains("    4"));
        assert!(out.contains(SHOW_MORE_HINT));
        assert!(out.contains("Processing Time: N/A"));
    }

    #[test]
    fn test_expand_all_shows_full_text() {
        let out = TextRenderer::new().expand_all(true).render(&run_page());
        assert!(out.contains("    4"));
        assert!(!out.contains(SHOW_MORE_HINT));
    }

    #[test]
    fn test_closed_rows_list_titles_only() {
        let out = TextRenderer::new().rows_open(false).render(&run_page());
        assert!(out.contains("▶ Alpha"));
        assert!(!out.contains("Raw Input"));
    }

    #[test]
    fn test_failure_states() {
        let failed: PageState<RunPage> = PageState::LoadFailed {
            heading: "Error Loading Run Data".to_string(),
            message: "Failed to load run data for ID: x.".to_string(),
            detail: "Failed to fetch run data: 404 Not Found. Body: missing".to_string(),
        };
        let out = TextRenderer::new().render(&failed);
        assert!(out.starts_with("Error Loading Run Data\n"));
        assert!(out.contains("404 Not Found"));

        let processing: PageState<BenchmarkPage> = PageState::ProcessingFailed {
            heading: "Benchmark Failed".to_string(),
            message: "The benchmark for run ID x failed to complete.".to_string(),
            reason: "judge timed out".to_string(),
        };
        let out = TextRenderer::new().render(&processing);
        assert!(out.contains("Failure Reason:\njudge timed out"));
    }

    #[test]
    fn test_empty_block_marker() {
        let block = TruncatableText::new("Summary", None, DisplayLimits::default());
        let mut lines = Vec::new();
        TextRenderer::new().block(&mut lines, &block);
        assert_eq!(lines, vec!["  Summary:".to_string(), "    (empty)".to_string()]);
    }

    #[test]
    fn test_runs_listing() {
        let runs = vec![RunMetadata {
            id: "r1".to_string(),
            persona_name: "LocalLLaMA".to_string(),
            total_items: Some(3),
            has_benchmark: Some(true),
            ..RunMetadata::default()
        }];
        let out = TextRenderer::new().render_runs(&runs);
        assert!(out.contains("r1 - LocalLLaMA (Unknown) 3 items [benchmarked]"));
        assert_eq!(TextRenderer::new().render_runs(&[]), "No runs found.\n");
    }

    #[test]
    fn test_status_and_logs_end_with_one_newline() {
        let renderer = TextRenderer::new();
        assert_eq!(
            renderer.render_status(&BenchmarkStatus { is_running: true }),
            "Benchmark: running\n"
        );
        assert_eq!(renderer.render_logs(&[]), "No benchmark logs available.\n");
    }
}
