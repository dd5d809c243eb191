//! Commit history traversal
//!
//! - `history`: lazy first-parent walk used by `log`, plus full ancestry used
//!   by `push` and remote transfers

pub mod history;
