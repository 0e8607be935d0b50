//! Repository commands
//!
//! Path resolution behind `osbs locate` and `osbs clone`. Nothing here
//! changes the process working directory; callers print the result for the
//! shell wrapper to enter.

mod base;
mod clone;
mod locate;

pub use base::*;
pub use clone::*;
pub use locate::*;
