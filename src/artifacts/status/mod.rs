//! Working directory status
//!
//! - `file_change`: change kinds and their rendering
//! - `inspector`: per-file checks against the head commit and the staging area
//! - `status_info`: the five `status` sections

pub mod file_change;
pub mod inspector;
pub mod status_info;
