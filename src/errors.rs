//! User-facing error taxonomy
//!
//! Every variant is a handled failure: the command stops, the message is printed
//! and the process exits successfully. Anything that is not a `RepositoryError`
//! (I/O failures, corrupt objects) travels as a plain `anyhow::Error` and is fatal.

use thiserror::Error;

/// Broad category of a handled failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad command syntax or arity, caught before any component runs
    Usage,
    /// Operation invalid given the current repository state
    State,
    /// Missing file, branch, commit, remote or digest
    NotFound,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Please enter a command.")]
    NoCommand,

    #[error("No command with that name exists.")]
    UnknownCommand,

    #[error("Incorrect operands.")]
    IncorrectOperands,

    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,

    #[error("Invalid branch name: {name}")]
    InvalidBranchName { name: String },

    #[error("Invalid remote name: {name}")]
    InvalidRemoteName { name: String },

    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No reason to remove the file.")]
    NothingToRemove,

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict,

    #[error("No need to checkout the current branch.")]
    AlreadyCurrent,

    #[error("Cannot remove the current branch.")]
    CannotDeleteCurrent,

    #[error("A branch with that name already exists.")]
    DuplicateBranch,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("A remote with that name already exists.")]
    DuplicateRemote,

    #[error("Please pull down remote changes before pushing.")]
    PushRejected,

    #[error("File does not exist.")]
    FileNotFound,

    #[error("File does not exist in that commit.")]
    FileNotInCommit,

    #[error("A branch with that name does not exist.")]
    BranchNotFound,

    #[error("No commit with that id exists.")]
    AmbiguousOrNotFound,

    #[error("Found no commit with that message.")]
    NoCommitWithMessage,

    #[error("No object with id {oid} exists.")]
    ObjectNotFound { oid: String },

    #[error("A remote with that name does not exist.")]
    RemoteNotFound,

    #[error("Remote directory not found.")]
    RemoteDirectoryNotFound,

    #[error("That remote does not have that branch.")]
    RemoteBranchNotFound,
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::NoCommand
            | RepositoryError::UnknownCommand
            | RepositoryError::IncorrectOperands
            | RepositoryError::NotInitialized
            | RepositoryError::InvalidBranchName { .. }
            | RepositoryError::InvalidRemoteName { .. } => ErrorKind::Usage,
            RepositoryError::AlreadyInitialized
            | RepositoryError::NothingToCommit
            | RepositoryError::EmptyMessage
            | RepositoryError::NothingToRemove
            | RepositoryError::UncommittedChanges
            | RepositoryError::UntrackedFileConflict
            | RepositoryError::AlreadyCurrent
            | RepositoryError::CannotDeleteCurrent
            | RepositoryError::DuplicateBranch
            | RepositoryError::SelfMerge
            | RepositoryError::DuplicateRemote
            | RepositoryError::PushRejected => ErrorKind::State,
            RepositoryError::FileNotFound
            | RepositoryError::FileNotInCommit
            | RepositoryError::BranchNotFound
            | RepositoryError::AmbiguousOrNotFound
            | RepositoryError::NoCommitWithMessage
            | RepositoryError::ObjectNotFound { .. }
            | RepositoryError::RemoteNotFound
            | RepositoryError::RemoteDirectoryNotFound
            | RepositoryError::RemoteBranchNotFound => ErrorKind::NotFound,
        }
    }
}
