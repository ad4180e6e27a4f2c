//! Command handlers, one module per command group.

pub mod catalog;
pub mod circulation;
pub mod init;
pub mod loans;
pub mod maintenance;
pub mod misc;
pub mod reports;
