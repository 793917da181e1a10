//! Ratatui widgets for the interactive dashboard
//!
//! # Features
//!
//! - **Text blocks**: `TruncatableWidget` renders a collapsed preview or the
//!   full text depending on its `ExpansionState`
//! - **Run card**: `MetadataCardWidget`
//! - **Controls**: `ControlsBar` shows the benchmark start control
//! - **Styling**: `ToneColors` maps display tones to terminal colors
//! - **Wrapping**: `wrap_lines` hard-wraps styled lines so callers can size
//!   and scroll panes by the rows actually drawn
//!
//! # Example
//!
//! ```ignore
//! use auditdash_core::visualization::{TruncatableWidget, ToneColors};
//!
//! let widget = TruncatableWidget::new(&text)
//!     .state(expansion.state(&key))
//!     .focused(true);
//! frame.render_widget(widget.scroll(rows_above), area);
//! ```

mod widget;

pub use widget::{
    ControlsBar, MetadataCardWidget, ToneColors, TruncatableWidget, format_duration_ms,
    wrap_lines,
};
