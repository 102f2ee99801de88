//! Snapsheet Core
//!
//! Shared plumbing for the snapsheet crates: logging setup and profiling scopes.

pub mod logging;
pub mod profiling;
