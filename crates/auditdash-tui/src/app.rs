//! Dashboard state
//!
//! `App` holds everything the screen shows: the loaded pages, the selected
//! row, per-row accordion state, per-block expansion state and the benchmark
//! start guard. Key handling is pure; anything that needs the service is
//! returned as an [`Effect`] and carried out by [`App::perform`].

use auditdash_core::client::RunSource;
use auditdash_core::display::{AccordionState, ExpansionSet, ExpansionState, TruncatableText};
use auditdash_core::pages::{
    BenchmarkControls, BenchmarkPage, PageLimits, PageState, RunPage, load_benchmark_page,
    load_latest_page, load_run_page,
};
use tracing::{debug, warn};

/// Which page is on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Run,
    Benchmark,
}

/// User intents, decoupled from terminal key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    ToggleRow,
    NextBlock,
    PrevBlock,
    ToggleBlock,
    ScrollUp,
    ScrollDown,
    StartBenchmark,
    ShowBenchmark,
    ShowRun,
    Refresh,
    Quit,
}

/// Work that needs the run source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load whatever the current view is missing
    Load,
    StartBenchmark(String),
}

/// Rows moved per scroll key press
const SCROLL_STEP: usize = 5;

/// Accordion key: the view plus the row's stable key
pub type RowId = (View, String);

pub struct App {
    /// Run requested on the command line; `None` follows the latest run
    requested_run: Option<String>,
    pub view: View,
    pub run: Option<PageState<RunPage>>,
    pub benchmark: Option<PageState<BenchmarkPage>>,
    pub selected: usize,
    pub focused_block: usize,
    /// Extra rows the detail pane is scrolled past the focused block
    pub detail_scroll: usize,
    pub rows: ExpansionSet<RowId>,
    pub blocks: ExpansionSet<(RowId, usize)>,
    pub controls: BenchmarkControls,
    pub message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(requested_run: Option<String>, view: View) -> Self {
        Self {
            requested_run,
            view,
            run: None,
            benchmark: None,
            selected: 0,
            focused_block: 0,
            detail_scroll: 0,
            rows: ExpansionSet::new(),
            blocks: ExpansionSet::new(),
            controls: BenchmarkControls::new(),
            message: None,
            should_quit: false,
        }
    }

    /// Run id of the page being audited, once known
    pub fn run_id(&self) -> Option<&str> {
        if let Some(id) = self.requested_run.as_deref() {
            return Some(id);
        }
        self.run
            .as_ref()
            .and_then(PageState::ready)
            .map(|page| page.metadata.run_id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// Row titles of the current view
    pub fn row_titles(&self) -> Vec<&str> {
        match self.view {
            View::Run => self
                .run_page()
                .map(|page| page.entries.iter().map(|e| e.title.as_str()).collect())
                .unwrap_or_default(),
            View::Benchmark => self
                .benchmark_page()
                .map(|page| page.rows.iter().map(|r| r.title.as_str()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_titles().len()
    }

    pub fn run_page(&self) -> Option<&RunPage> {
        self.run.as_ref().and_then(PageState::ready)
    }

    pub fn benchmark_page(&self) -> Option<&BenchmarkPage> {
        self.benchmark.as_ref().and_then(PageState::ready)
    }

    /// Accordion key of row `index` in the current view
    pub fn row_id(&self, index: usize) -> Option<RowId> {
        let key = match self.view {
            View::Run => self.run_page()?.entries.get(index)?.key.to_string(),
            View::Benchmark => self.benchmark_page()?.rows.get(index)?.item_id.clone(),
        };
        Some((self.view, key))
    }

    pub fn row_state(&self, index: usize) -> AccordionState {
        self.row_id(index)
            .map(|id| self.rows.state(&id))
            .unwrap_or_default()
    }

    /// Whether the selected row is open
    pub fn selected_open(&self) -> bool {
        self.row_state(self.selected).is_expanded()
    }

    /// Text blocks of the selected row
    pub fn selected_blocks(&self) -> Vec<&TruncatableText> {
        match self.view {
            View::Run => self
                .run_page()
                .and_then(|page| page.entries.get(self.selected))
                .map(|entry| entry.blocks.iter().collect())
                .unwrap_or_default(),
            View::Benchmark => self
                .benchmark_page()
                .and_then(|page| page.rows.get(self.selected))
                .map(|row| row.explanations.iter().chain(&row.original_content).collect())
                .unwrap_or_default(),
        }
    }

    /// Expansion state of block `index` in the selected row
    pub fn block_state(&self, index: usize) -> ExpansionState {
        self.row_id(self.selected)
            .map(|row| self.blocks.state(&(row, index)))
            .unwrap_or_default()
    }

    /// Apply a user action. Returns work for the source, if any.
    pub fn handle(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Up => {
                if self.selected > 0 {
                    self.select(self.selected - 1);
                }
                None
            }
            Action::Down => {
                if self.selected + 1 < self.row_count() {
                    self.select(self.selected + 1);
                }
                None
            }
            Action::ToggleRow => {
                if let Some(id) = self.row_id(self.selected) {
                    self.rows.toggle(id);
                    self.focus_block(0);
                }
                None
            }
            Action::NextBlock => {
                let count = self.focusable_blocks();
                if count > 0 {
                    self.focus_block((self.focused_block + 1) % count);
                }
                None
            }
            Action::PrevBlock => {
                let count = self.focusable_blocks();
                if count > 0 {
                    self.focus_block((self.focused_block + count - 1) % count);
                }
                None
            }
            Action::ToggleBlock => {
                if self.focusable_blocks() > 0 {
                    if let Some(row) = self.row_id(self.selected) {
                        self.blocks.toggle((row, self.focused_block));
                        self.detail_scroll = 0;
                    }
                }
                None
            }
            Action::ScrollUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(SCROLL_STEP);
                None
            }
            Action::ScrollDown => {
                if self.selected_open() {
                    self.detail_scroll += SCROLL_STEP;
                }
                None
            }
            Action::StartBenchmark => self.request_start(),
            Action::ShowBenchmark => self.switch(View::Benchmark),
            Action::ShowRun => self.switch(View::Run),
            Action::Refresh => {
                self.reset();
                Some(Effect::Load)
            }
        }
    }

    /// Carry out an effect against the source
    pub async fn perform(&mut self, effect: Effect, source: &dyn RunSource, limits: &PageLimits) {
        match effect {
            Effect::Load => self.load(source, limits).await,
            Effect::StartBenchmark(run_id) => match self.controls.start(source, &run_id).await {
                Ok(response) => {
                    self.message = Some(response.message);
                }
                Err(e) => {
                    warn!(run_id = %run_id, error = %e, "Benchmark start failed");
                    self.message = Some(format!("Failed to start benchmark: {}", e));
                }
            },
        }
    }

    /// Load the run page (needed by both views) and the benchmark page when
    /// it is on screen, then re-check the benchmark status
    pub async fn load(&mut self, source: &dyn RunSource, limits: &PageLimits) {
        if self.run.is_none() {
            let state = match self.requested_run.as_deref() {
                Some(id) => load_run_page(source, id, limits).await,
                None => load_latest_page(source, limits).await,
            };
            self.run = Some(state);
        }

        if self.view == View::Benchmark && self.benchmark.is_none() {
            if let Some(run_id) = self.run_id().map(str::to_string) {
                debug!(run_id = %run_id, "Loading benchmark view");
                self.benchmark = Some(load_benchmark_page(source, &run_id, limits).await);
            }
        }

        self.controls.refresh(source).await;
    }

    /// Forget pages and every piece of view state, as a fresh mount would
    pub fn reset(&mut self) {
        self.run = None;
        self.benchmark = None;
        self.selected = 0;
        self.focus_block(0);
        self.rows.clear();
        self.blocks.clear();
        self.controls = BenchmarkControls::new();
        self.message = None;
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.focus_block(0);
    }

    fn focus_block(&mut self, index: usize) {
        self.focused_block = index;
        self.detail_scroll = 0;
    }

    /// Blocks that can take focus: only those of an open row
    fn focusable_blocks(&self) -> usize {
        if self.selected_open() {
            self.selected_blocks().len()
        } else {
            0
        }
    }

    fn switch(&mut self, view: View) -> Option<Effect> {
        if self.view == view {
            return None;
        }
        if view == View::Benchmark && self.run_id().is_none() {
            self.message = Some("No run loaded".to_string());
            return None;
        }

        self.view = view;
        self.select(0);
        let missing = match view {
            View::Run => self.run.is_none(),
            View::Benchmark => self.benchmark.is_none(),
        };
        missing.then_some(Effect::Load)
    }

    fn request_start(&mut self) -> Option<Effect> {
        let Some(run_id) = self.run_id().map(str::to_string) else {
            self.message = Some("No run loaded".to_string());
            return None;
        };
        if !self.controls.can_start() {
            self.message = Some(self.controls.label().to_string());
            return None;
        }
        Some(Effect::StartBenchmark(run_id))
    }
}
