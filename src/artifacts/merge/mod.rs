//! Three-way merge
//!
//! - `bca_finder`: split point (best common ancestor) search over the commit graph
//! - `resolution`: per-file classification against the split point
//! - `conflict_markers`: conflict file rendering

pub mod bca_finder;
pub mod conflict_markers;
pub mod resolution;

/// How a merge ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The given branch head is already in the current history; nothing changed
    AlreadyAncestor,
    /// The current branch was moved onto the given head, no commit was created
    FastForwarded,
    /// A merge commit was created
    Merged { conflicted: bool },
}

impl MergeOutcome {
    /// Message reported to the user, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            MergeOutcome::AlreadyAncestor => {
                Some("Given branch is an ancestor of the current branch.")
            }
            MergeOutcome::FastForwarded => Some("Current branch fast-forwarded."),
            MergeOutcome::Merged { conflicted: true } => Some("Encountered a merge conflict."),
            MergeOutcome::Merged { conflicted: false } => None,
        }
    }
}
