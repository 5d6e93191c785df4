//! Ambient helpers shared by the workspace binaries and crates.

pub mod utils;

/// Default tracing directives when `RUST_LOG` is unset.
/// The API client traces every request/response at debug level.
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,client=debug";
