//! Moving the working directory between snapshots
//!
//! Every change is planned and checked for untracked files in the way before
//! the first file is touched.

pub mod conflict;
pub mod migration;
