use colored::Colorize;

/// How a tracked or staged file differs from its working copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkspaceChangeType {
    Modified,
    Deleted,
}

impl From<&WorkspaceChangeType> for &str {
    fn from(change: &WorkspaceChangeType) -> Self {
        match change {
            WorkspaceChangeType::Modified => "modified",
            WorkspaceChangeType::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for WorkspaceChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label: &str = self.into();
        write!(f, "{}", label)
    }
}

/// Section a file is listed under in `status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChangeType {
    Staged,
    Removed,
    Workspace(WorkspaceChangeType),
    Untracked,
}

impl FileChangeType {
    /// Status line for `name`, colored when colors are enabled
    pub fn render(&self, name: &str) -> String {
        match self {
            FileChangeType::Staged => name.green().to_string(),
            FileChangeType::Removed => name.red().to_string(),
            FileChangeType::Workspace(change) => format!("{} ({})", name, change).red().to_string(),
            FileChangeType::Untracked => name.red().to_string(),
        }
    }
}
