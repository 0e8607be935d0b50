//! Configuration module
//!
//! Resolves the home directory and the user's optional overrides.

mod user;

pub use user::*;
