//! CLI command implementations.

mod config;
mod fetch;
mod serve;

pub use config::run_config;
pub use fetch::run_fetch;
pub use serve::run_serve;
