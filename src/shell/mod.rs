//! Shell integration module
//!
//! Emits the functions that let an interactive shell follow `osbs` into the
//! directories it resolves.

mod init;

pub use init::*;
