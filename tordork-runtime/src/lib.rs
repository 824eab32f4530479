//! tordork Runtime
//!
//! Drives a dork list through the Tor executor:
//! - **Retry**: per-query attempts with randomized delay
//! - **Dispatch**: bounded worker pool merging every query's links

pub mod retry;
pub mod dispatch;

pub use retry::*;
pub use dispatch::*;
