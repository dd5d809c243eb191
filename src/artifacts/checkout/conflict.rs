/// Why a working file blocks a checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictType {
    /// An untracked file would be replaced with different content
    UntrackedOverwritten,
    /// A file has to become a directory, or a directory a file, and untracked files are in the way
    StaleDirectory,
}

impl ConflictType {
    pub fn describe(&self) -> &'static str {
        match self {
            ConflictType::UntrackedOverwritten => {
                "untracked working tree files would be overwritten"
            }
            ConflictType::StaleDirectory => {
                "untracked files are in the way of a file or directory"
            }
        }
    }
}
