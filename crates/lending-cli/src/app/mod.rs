//! Application-level utilities for the Lending CLI.
//!
//! This module provides:
//! - Path resolution for config and store files
//! - The per-invocation context that opens the engine

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::resolve_config_path;
