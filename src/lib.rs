//! gitlet: a small content-addressed version-control engine
//!
//! - `areas`: persisted repository components (blob store, commit store, staging area, branches, workspace)
//! - `artifacts`: data types and algorithms (objects, history, checkout, status, merge)
//! - `commands`: one `impl Repository` block per user-facing command
//! - `config`: environment-driven settings
//! - `errors`: user-facing error taxonomy

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
