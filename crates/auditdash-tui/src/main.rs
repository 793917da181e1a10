//! Auditdash TUI - interactive run and benchmark dashboard
//!
//! Shows a run (the latest by default) with one accordion row per entry,
//! or the benchmark of that run with one row per evaluation. Text blocks
//! inside an open row start as previews and expand on demand.

mod app;

use std::io;
use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

use app::{Action, App, View};
use auditdash_core::client::{FixtureSource, HttpRunSource, RunSource};
use auditdash_core::config::Config;
use auditdash_core::pages::{BenchmarkPage, ItemDetails, PageLimits, PageState, RunPage};
use auditdash_core::visualization::{
    ControlsBar, MetadataCardWidget, ToneColors, TruncatableWidget, wrap_lines,
};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

#[derive(Parser)]
#[command(name = "auditdash-tui")]
#[command(author, version, about = "Interactive run and benchmark dashboard", long_about = None)]
struct Args {
    /// Open this run instead of the latest one
    #[arg(long, value_name = "ID")]
    run: Option<String>,

    /// Open the benchmark view for this run
    #[arg(long, value_name = "ID", conflicts_with = "run")]
    benchmark: Option<String>,

    /// Read documents from a fixture directory instead of the service
    #[arg(long, value_name = "DIR")]
    fixtures: Option<PathBuf>,

    /// Service base URL (overrides AUDITDASH_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs would draw over the alternate screen, so they are opt-in
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("auditdash=info".parse()?),
            )
            .init();
    }

    let args = Args::parse();
    let config = Config::load()?;
    let source = open_source(&args, &config)?;
    let limits = PageLimits::from(&config.display);

    let mut app = match (args.run, args.benchmark) {
        (_, Some(id)) => App::new(Some(id), View::Benchmark),
        (run, None) => App::new(run, View::Run),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app, source.as_ref(), &limits).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn open_source(args: &Args, config: &Config) -> anyhow::Result<Box<dyn RunSource>> {
    if let Some(dir) = &args.fixtures {
        if !dir.is_dir() {
            anyhow::bail!("Fixture directory not found: {}", dir.display());
        }
        return Ok(Box::new(FixtureSource::new(dir)));
    }

    let source = HttpRunSource::builder()
        .config(config.api.clone())
        .base_url(config.api.resolved_base_url(args.api_url.as_deref()))
        .build()?;
    Ok(Box::new(source))
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    source: &dyn RunSource,
    limits: &PageLimits,
) -> anyhow::Result<()> {
    terminal.draw(|frame| draw_loading(frame))?;
    app.load(source, limits).await;

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, app))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = action_for(key) {
                    if let Some(effect) = app.handle(action) {
                        terminal.draw(|frame| draw(frame, app))?;
                        app.perform(effect, source, limits).await;
                    }
                }
            }
        }
    }
    Ok(())
}

fn action_for(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Enter => Action::ToggleRow,
        KeyCode::Tab => Action::NextBlock,
        KeyCode::BackTab => Action::PrevBlock,
        KeyCode::Char('e') => Action::ToggleBlock,
        KeyCode::Char('s') => Action::StartBenchmark,
        KeyCode::Char('b') => Action::ShowBenchmark,
        KeyCode::Char('r') => Action::ShowRun,
        KeyCode::Char('R') => Action::Refresh,
        KeyCode::PageDown | KeyCode::Char('J') => Action::ScrollDown,
        KeyCode::PageUp | KeyCode::Char('K') => Action::ScrollUp,
        _ => return None,
    };
    Some(action)
}

// ============================================================================
// Drawing
// ============================================================================

fn draw_loading(frame: &mut Frame) {
    let loading = Paragraph::new("Loading...")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title("Auditdash"));
    frame.render_widget(loading, frame.area());
}

fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    let failure = match app.view {
        View::Run => app.run.as_ref().filter(|state| !state.is_ready()).map(failure_lines),
        View::Benchmark => app
            .benchmark
            .as_ref()
            .filter(|state| !state.is_ready())
            .map(failure_lines),
    };

    if let Some(lines) = failure {
        let panel = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Error"));
        frame.render_widget(panel, chunks[1]);
    } else {
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35), // Rows
                Constraint::Percentage(65), // Detail
            ])
            .split(chunks[1]);
        draw_rows(frame, app, main_chunks[0]);
        draw_detail(frame, app, main_chunks[1]);
    }

    draw_footer(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.view {
        View::Run => "Auditdash - Run",
        View::Benchmark => "Auditdash - Benchmark",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let run_id = app.run_id().unwrap_or("latest");
    frame.render_widget(ControlsBar::new(&app.controls, run_id), inner);
}

fn failure_lines<T>(state: &PageState<T>) -> Vec<Line<'static>> {
    let heading_style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
    match state {
        PageState::Ready(_) => Vec::new(),
        PageState::LoadFailed {
            heading,
            message,
            detail,
        } => vec![
            Line::from(Span::styled(heading.clone(), heading_style)),
            Line::from(message.clone()),
            Line::from(""),
            Line::from(Span::styled(detail.clone(), Style::default().fg(Color::DarkGray))),
        ],
        PageState::ProcessingFailed {
            heading,
            message,
            reason,
        } => vec![
            Line::from(Span::styled(heading.clone(), heading_style)),
            Line::from(message.clone()),
            Line::from(""),
            Line::from("Failure Reason:"),
            Line::from(reason.clone()),
        ],
    }
}

fn draw_rows(frame: &mut Frame, app: &App, area: Rect) {
    let titles = app.row_titles();
    let title = match app.view {
        View::Run => "Entry Summaries",
        View::Benchmark => "Detailed Evaluations",
    };

    let lines: Vec<Line> = if titles.is_empty() {
        let empty = match (app.view, app.run_page(), app.benchmark_page()) {
            (View::Run, Some(_), _) => "No entry summaries available for this run.",
            (View::Benchmark, _, Some(_)) => "No detailed evaluations available for this benchmark.",
            _ => "Loading...",
        };
        vec![Line::from(Span::styled(empty, Style::default().fg(Color::DarkGray)))]
    } else {
        titles
            .iter()
            .enumerate()
            .map(|(index, title)| {
                let mut style = Style::default();
                if index == app.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(
                    format!("{} {}", app.row_state(index).marker(), title),
                    style,
                ))
            })
            .collect()
    };

    // Keep the selection visible
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = app.selected.saturating_sub(visible.saturating_sub(1));
    let list = Paragraph::new(lines)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Details");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let colors = ToneColors::default();
    let card = match app.view {
        View::Run => app.run_page().map(|page| &page.metadata),
        View::Benchmark => app.benchmark_page().map(|page| &page.metadata),
    }
    .map(|metadata| MetadataCardWidget::new(metadata).colors(colors.clone()));

    let mut summary = Vec::new();
    match app.view {
        View::Run => {
            if let Some(page) = app.run_page() {
                summary.extend(run_summary_lines(page));
            }
            if app.selected_open() {
                if let Some(entry) = app.run_page().and_then(|page| page.entries.get(app.selected)) {
                    summary.extend(details_lines("Details", &entry.details, &colors));
                }
            }
        }
        View::Benchmark => {
            if let Some(page) = app.benchmark_page() {
                summary.extend(benchmark_summary_lines(
                    page,
                    app.selected,
                    app.selected_open(),
                    &colors,
                ));
            }
        }
    }
    let summary = wrap_lines(&summary, inner.width);

    let blocks = if app.selected_open() {
        app.selected_blocks()
    } else {
        Vec::new()
    };
    let widgets: Vec<TruncatableWidget> = blocks
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            TruncatableWidget::new(text)
                .state(app.block_state(index))
                .focused(index == app.focused_block)
                .colors(colors.clone())
        })
        .collect();

    // Row ranges of the stacked pane: card, summary, then one per block
    let card_rows = card.as_ref().map_or(0, |card| usize::from(card.height(inner.width)));
    let mut ranges = vec![0..card_rows, card_rows..card_rows + summary.len()];
    for widget in &widgets {
        let start = ranges.last().map_or(0, |range| range.end);
        ranges.push(start..start + usize::from(widget.height(inner.width)));
    }
    let total = ranges.last().map_or(0, |range| range.end);
    let focused = ranges
        .get(app.focused_block + 2)
        .cloned()
        .unwrap_or(0..0);
    let offset = pane_offset(focused, total, usize::from(inner.height), app.detail_scroll);

    if let Some(card) = card {
        if let Some((rect, skip)) = visible_rect(inner, &ranges[0], offset) {
            frame.render_widget(card.scroll(skip), rect);
        }
    }
    if let Some((rect, skip)) = visible_rect(inner, &ranges[1], offset) {
        let lines: Vec<Line> = summary.into_iter().skip(skip).collect();
        frame.render_widget(Paragraph::new(lines), rect);
    }
    for (widget, range) in widgets.into_iter().zip(ranges.iter().skip(2)) {
        if let Some((rect, skip)) = visible_rect(inner, range, offset) {
            frame.render_widget(widget.scroll(skip), rect);
        }
    }
}

/// First pane row to show. The focused block is kept in view when it fits;
/// a taller block starts at its top and `extra` scrolls through it.
fn pane_offset(focused: Range<usize>, total: usize, viewport: usize, extra: usize) -> usize {
    let max_offset = total.saturating_sub(viewport);
    let base = if focused.end <= viewport {
        0
    } else if focused.len() <= viewport {
        focused.end - viewport
    } else {
        focused.start
    };
    (base + extra).min(max_offset)
}

/// Screen area of pane rows `range` after scrolling by `offset`, and how many
/// of its leading rows are scrolled off
fn visible_rect(area: Rect, range: &Range<usize>, offset: usize) -> Option<(Rect, usize)> {
    let viewport = usize::from(area.height);
    let top = range.start.max(offset);
    let bottom = range.end.min(offset + viewport);
    if top >= bottom {
        return None;
    }

    let y = area.y + u16::try_from(top - offset).ok()?;
    let height = u16::try_from(bottom - top).ok()?;
    Some((Rect::new(area.x, y, area.width, height), top - range.start))
}

fn run_summary_lines(page: &RunPage) -> Vec<Line<'static>> {
    let persona = &page.persona;
    let mut lines = vec![
        Line::from(""),
        Line::from(format!("Persona: {}", persona.name)),
        Line::from(format!("Focus Areas: {}", persona.focus_areas)),
    ];
    if !page.key_developments.is_empty() {
        lines.push(Line::from(format!(
            "Key Developments: {}",
            page.key_developments.len()
        )));
    }
    lines.push(Line::from(""));
    lines
}

fn benchmark_summary_lines(
    page: &BenchmarkPage,
    selected: usize,
    open: bool,
    colors: &ToneColors,
) -> Vec<Line<'static>> {
    let summary = &page.summary;
    let mut lines = vec![
        Line::from(""),
        Line::from(format!(
            "Quality Score: {}  Relevance Accuracy: {}  Items: {}",
            summary.quality_score, summary.relevance_accuracy, summary.total_items
        )),
    ];
    if !summary.missing_items.is_empty() {
        lines.push(Line::from(format!(
            "Missing Items: {}",
            summary.missing_items.join(", ")
        )));
    }
    lines.push(Line::from(""));

    if let Some(row) = page.rows.get(selected).filter(|_| open) {
        if let Some(details) = &row.details {
            lines.extend(details_lines("Item Details", details, colors));
        }
        lines.push(Line::from(vec![
            Span::styled("Quality Rating: ", Style::default().fg(colors.label)),
            Span::styled(
                row.quality_rating.clone(),
                Style::default().fg(colors.for_tone(row.quality_tone)),
            ),
            Span::styled("  Relevance: ", Style::default().fg(colors.label)),
            Span::styled(
                row.relevance.clone(),
                Style::default().fg(colors.for_tone(row.relevance_tone)),
            ),
        ]));
        lines.push(Line::from(""));
    }
    lines
}

fn details_lines(heading: &str, details: &ItemDetails, colors: &ToneColors) -> Vec<Line<'static>> {
    let field = |label: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!("  {}: ", label), Style::default().fg(colors.label)),
            Span::styled(value.to_string(), Style::default().fg(colors.value)),
        ])
    };
    vec![
        Line::from(Span::styled(
            heading.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        field("ID", &details.id),
        field("Relevant", &details.relevant),
        field("Processing Time", &details.processing_time),
        field("Link", &details.link),
        Line::from(""),
    ]
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = "q: Quit | j/k: Select | Enter: Open | Tab: Block | e: Expand | J/K: Scroll | s: Start | b/r: View | R: Refresh";
    let text = match &app.message {
        Some(message) => format!("{} | {}", message, help),
        None => help.to_string(),
    };
    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
