//! Auditdash Core Library
//!
//! This crate provides the core functionality for Auditdash, including:
//! - Canonical run and benchmark document models
//! - Truncation, expansion and record-joining display logic
//! - Data access over HTTP or from fixture directories
//! - Page view models and plain-text rendering
//! - Ratatui widgets for the interactive dashboard
//! - Configuration and error handling

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod pages;
pub mod render;
pub mod visualization;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::client::{FixtureSource, HttpRunSource, RunSource};
    pub use crate::config::Config;
    pub use crate::display::{DisplayLimits, ExpansionSet, ExpansionState};
    pub use crate::error::{Error, Result};
    pub use crate::pages::{PageLimits, PageState};
    pub use crate::render::TextRenderer;
}
