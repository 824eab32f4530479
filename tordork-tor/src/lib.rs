//! tordork Tor Layer
//!
//! Provides the anonymized transport for dork searches:
//! - SOCKS5h proxy client (DNS resolution via Tor)
//! - Exit verification against the Tor Project check endpoint
//! - Single-attempt search query execution

pub mod proxy;
pub mod executor;

pub use proxy::*;
pub use executor::*;
