//! Persisted repository components
//!
//! - `database`: write-once object store backing blobs and commit records
//! - `commits`: commit records plus their mutable branch tags
//! - `index`: staging area of pending additions and removals
//! - `refs`: branch histories and the current branch
//! - `remote`: registered local remotes and history transfer
//! - `repository`: the context object owning all of the above
//! - `workspace`: working directory file operations

pub(crate) mod commits;
pub(crate) mod database;
pub(crate) mod index;
pub(crate) mod refs;
pub(crate) mod remote;
pub mod repository;
pub(crate) mod workspace;
