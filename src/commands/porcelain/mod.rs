//! Porcelain commands
//!
//! - `init`: create the repository layout and the root commit
//! - `add` / `rm`: stage additions and removals
//! - `commit`: snapshot the staged changes
//! - `log` / `global-log` / `find`: inspect commits
//! - `status`: branches, staged changes and working directory state
//! - `branch` / `rm-branch`: create and delete branches
//! - `checkout`: switch branches or restore single files
//! - `reset`: move the current branch onto any commit
//! - `merge`: three-way merge of another branch
//! - `add-remote` / `rm-remote` / `push` / `fetch` / `pull`: local remotes

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod remote;
pub mod reset;
pub mod rm;
pub mod status;
