//! Dog log CLI library.
//!
//! This crate provides the command-line front end for the dog log. It only
//! renders what `dl-core` computes; walk state and quick actions come from
//! the resolver, never from here.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
