//! UI primitives for the Lending CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens and text styles
//! - **Render**: Tables, headers, receipts, hints
//! - **Format**: String utilities (truncate, dates, money)
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{header, receipt, UiContext};
//!
//! let ui = ctx.ui_context();
//! if ui.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! println!("{}", header(&ui, "loans", None));
//! println!("{}", receipt(&ui, "Issued TX4", &[("due", "2025-02-01")]));
//! ```

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

// Re-export core types at module level
pub use context::UiContext;
pub use theme::Badge;

// Re-export commonly used render functions
pub use render::{badge, header, hint, kv, print_error, receipt, simple_table, table, Column};

// Re-export commonly used format functions
pub use format::{format_date, format_datetime, format_fine, truncate};
