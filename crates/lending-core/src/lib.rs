//! # Lending Core
//!
//! Core library for Lending - a circulation engine that lends a fixed catalog
//! of physical items to members under copy, time, and fairness constraints.
//!
//! This crate provides the domain model, the lending policy, storage
//! abstractions, and the engine that owns every circulation invariant,
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **storage**: Narrow store traits, the unit of work, and the SQLite and
//!   in-memory backends
//! - **engine**: Issue, return, reserve, and the read-only reports
//! - **policy**: Loan periods, borrow limits, and fines per member category
//! - **clock**: Wall-clock source (system or manually driven)
//!
//! ## Invariants
//!
//! For every item, `available_copies + open transactions == total_copies`.
//! Issue, return, and reserve each run as a single atomic unit of work.

pub mod clock;
pub mod engine;
pub mod error;
pub mod fs;
pub mod policy;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::LendingEngine;
pub use error::{LendingError, Result};
pub use policy::{Category, CategoryPolicy, LendingPolicy, FINE_PER_DAY};
pub use storage::{LendingStore, MemoryStore, SqliteStore, UnitOfWork};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
