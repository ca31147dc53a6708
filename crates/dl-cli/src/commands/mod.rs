//! CLI subcommand implementations.

pub mod delete;
pub mod list;
pub mod log;
pub mod show;
pub mod status;
pub mod types;
pub mod util;
