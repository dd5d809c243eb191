//! Command implementations
//!
//! Every user-facing command is an `impl Repository` block under `porcelain`.
//! Commands write their normal output to the repository writer and report
//! handled failures as `RepositoryError`s.

pub mod porcelain;
