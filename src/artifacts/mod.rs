//! Data types and algorithms
//!
//! - `branch`: branch name validation
//! - `checkout`: working directory migrations and untracked-file conflicts
//! - `core`: shared utilities (pager writer)
//! - `log`: first-parent history and ancestry walks
//! - `merge`: split point search, file classification and conflict markers
//! - `objects`: blobs, commits and their ids
//! - `status`: working directory inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
