//! tordork Core - Domain model for dork-based OSINT search
//!
//! This crate provides the pure, network-free primitives:
//! - Search engine selection and URL building
//! - Result link extraction and filtering
//! - Dork list parsing

pub mod search_engines;
pub mod links;
pub mod queries;

pub use search_engines::*;
pub use links::*;
pub use queries::*;

/// Number of query characters shown in per-query status lines
pub const QUERY_PREVIEW_CHARS: usize = 60;
