//! Git operations module
//!
//! Provides work tree discovery and cloning on top of the system `git`.

mod commands;
mod runner;

pub use commands::*;
pub use runner::*;
