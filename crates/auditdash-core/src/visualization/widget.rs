//! Ratatui widgets for run and benchmark pages
//!
//! Provides a `TruncatableWidget` for expandable text blocks, a
//! `MetadataCardWidget` for the run card and a `ControlsBar` for the
//! benchmark start control.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::display::{ExpansionState, Tone, TruncatableText};
use crate::pages::{BenchmarkControls, MetadataCard};
use crate::render::format_timestamp;

/// Color scheme for page widgets
#[derive(Debug, Clone)]
pub struct ToneColors {
    pub positive: Color,
    pub info: Color,
    pub caution: Color,
    pub negative: Color,
    pub neutral: Color,
    /// Field labels and block titles
    pub label: Color,
    /// Field values and block bodies
    pub value: Color,
    /// Show More / Show Less hints
    pub hint: Color,
}

impl Default for ToneColors {
    fn default() -> Self {
        Self {
            positive: Color::Green,
            info: Color::Blue,
            caution: Color::Yellow,
            negative: Color::Red,
            neutral: Color::Gray,
            label: Color::Cyan,
            value: Color::White,
            hint: Color::DarkGray,
        }
    }
}

impl ToneColors {
    pub fn for_tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Positive => self.positive,
            Tone::Info => self.info,
            Tone::Caution => self.caution,
            Tone::Negative => self.negative,
            Tone::Neutral => self.neutral,
        }
    }
}

/// An expandable text block
pub struct TruncatableWidget<'a> {
    text: &'a TruncatableText,
    state: ExpansionState,
    focused: bool,
    colors: ToneColors,
    scroll_offset: usize,
}

impl<'a> TruncatableWidget<'a> {
    pub fn new(text: &'a TruncatableText) -> Self {
        Self {
            text,
            state: ExpansionState::default(),
            focused: false,
            colors: ToneColors::default(),
            scroll_offset: 0,
        }
    }

    pub fn state(mut self, state: ExpansionState) -> Self {
        self.state = state;
        self
    }

    /// Highlight the title; the focused block is the one `e` toggles
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn colors(mut self, colors: ToneColors) -> Self {
        self.colors = colors;
        self
    }

    /// Skip the first `offset` wrapped rows
    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    pub fn build_lines(&self) -> Vec<Line<'a>> {
        let mut title_style = Style::default()
            .fg(self.colors.label)
            .add_modifier(Modifier::BOLD);
        if self.focused {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }

        let mut lines = vec![Line::from(Span::styled(self.text.title.clone(), title_style))];
        let body_style = Style::default().fg(self.colors.value);
        lines.extend(
            self.text
                .displayed(self.state)
                .split('\n')
                .map(|line| Line::from(Span::styled(line.to_string(), body_style))),
        );

        if let Some(label) = self.text.toggle_label(self.state) {
            lines.push(Line::from(Span::styled(
                format!("[{}]", label),
                Style::default().fg(self.colors.hint),
            )));
        }
        lines
    }

    /// Lines hard-wrapped to `width` columns, one per screen row
    pub fn wrapped_lines(&self, width: u16) -> Vec<Line<'static>> {
        wrap_lines(&self.build_lines(), width)
    }

    /// Rows needed to show the whole block at `width` columns
    pub fn height(&self, width: u16) -> u16 {
        row_count(self.wrapped_lines(width).len())
    }
}

impl Widget for TruncatableWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible_lines: Vec<Line> = self
            .wrapped_lines(area.width)
            .into_iter()
            .skip(self.scroll_offset)
            .take(area.height as usize)
            .collect();

        Paragraph::new(visible_lines).render(area, buf);
    }
}

/// The run metadata card
pub struct MetadataCardWidget<'a> {
    card: &'a MetadataCard,
    colors: ToneColors,
    scroll_offset: usize,
}

impl<'a> MetadataCardWidget<'a> {
    pub fn new(card: &'a MetadataCard) -> Self {
        Self {
            card,
            colors: ToneColors::default(),
            scroll_offset: 0,
        }
    }

    pub fn colors(mut self, colors: ToneColors) -> Self {
        self.colors = colors;
        self
    }

    /// Skip the first `offset` wrapped rows
    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    fn field(&self, label: &str, value: String) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(self.colors.label)),
            Span::styled(value, Style::default().fg(self.colors.value)),
        ])
    }

    pub fn build_lines(&self) -> Vec<Line<'a>> {
        let card = self.card;
        let mut lines = vec![
            self.field("Run ID", card.run_id.clone()),
            self.field("Timestamp", format_timestamp(card.timestamp)),
        ];
        for (label, value) in [
            ("Overall Model", &card.overall_model),
            ("Image Model", &card.image_model),
            ("Web Content Model", &card.web_content_model),
        ] {
            if let Some(value) = value {
                lines.push(self.field(label, value.clone()));
            }
        }
        if let Some(ms) = card.total_processing_time_ms {
            lines.push(self.field("Total Processing Time", format_duration_ms(ms)));
        }
        lines
    }

    /// Rows needed to show the card at `width` columns
    pub fn height(&self, width: u16) -> u16 {
        row_count(wrap_lines(&self.build_lines(), width).len())
    }
}

impl Widget for MetadataCardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = wrap_lines(&self.build_lines(), area.width)
            .into_iter()
            .skip(self.scroll_offset)
            .collect();
        Paragraph::new(lines).render(area, buf);
    }
}

/// Single-line benchmark control: the button label and its key
pub struct ControlsBar<'a> {
    controls: &'a BenchmarkControls,
    run_id: &'a str,
    colors: ToneColors,
}

impl<'a> ControlsBar<'a> {
    pub fn new(controls: &'a BenchmarkControls, run_id: &'a str) -> Self {
        Self {
            controls,
            run_id,
            colors: ToneColors::default(),
        }
    }

}

impl Widget for ControlsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let button_color = if self.controls.can_start() {
            self.colors.positive
        } else {
            self.colors.neutral
        };

        let line = Line::from(vec![
            Span::styled("Run ", Style::default().fg(self.colors.hint)),
            Span::styled(self.run_id.to_string(), Style::default().fg(self.colors.value)),
            Span::styled(" | ", Style::default().fg(self.colors.hint)),
            Span::styled("[s] ", Style::default().fg(self.colors.label)),
            Span::styled(self.controls.label(), Style::default().fg(button_color)),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

/// Hard-wrap lines at `width` columns, keeping span styles.
///
/// Every returned line fills exactly one screen row, so the result length is
/// the height a `Paragraph` needs to show all of it.
pub fn wrap_lines(lines: &[Line<'_>], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut wrapped = Vec::with_capacity(lines.len());

    for line in lines {
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut row_width = 0;
        for span in &line.spans {
            let mut piece = String::new();
            for ch in span.content.chars() {
                let ch_width = Span::raw(ch.to_string()).width();
                if row_width > 0 && row_width + ch_width > width {
                    if !piece.is_empty() {
                        row.push(Span::styled(std::mem::take(&mut piece), span.style));
                    }
                    wrapped.push(Line::from(std::mem::take(&mut row)));
                    row_width = 0;
                }
                piece.push(ch);
                row_width += ch_width;
            }
            if !piece.is_empty() {
                row.push(Span::styled(piece, span.style));
            }
        }
        wrapped.push(Line::from(row));
    }
    wrapped
}

fn row_count(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Format a millisecond duration for display (e.g., 1500 -> "1.5s")
pub fn format_duration_ms(ms: u64) -> String {
    if ms < 1_000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1_000.0)
    } else {
        let secs = ms / 1_000;
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
