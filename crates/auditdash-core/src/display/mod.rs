//! Pure display logic shared by every renderer
//!
//! - **Truncation**: collapsed previews of long text blocks
//! - **Expansion**: per-instance expand/collapse state
//! - **Joining**: merging run entries with benchmark evaluations
//! - **Style**: tones for quality ratings and relevance verdicts
//!
//! Nothing here performs I/O.

pub mod expansion;
pub mod join;
pub mod style;
pub mod truncate;

pub use expansion::{AccordionState, ExpansionSet, ExpansionState};
pub use join::{EntryRow, JoinedView, RowKey, UNTITLED_ENTRY, entry_rows, fallback_title, join_evaluations};
pub use style::{Tone, quality_tone, relevance_label, relevance_tone, yes_no};
pub use truncate::{
    DEFAULT_CHAR_LIMIT, DEFAULT_LINE_LIMIT, DisplayLimits, ELLIPSIS, TruncatableText,
    TruncationResult, compute_preview, normalize,
};
