use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) current_branch: BranchName,
    pub(crate) branches: Vec<BranchName>,
    pub(crate) staged_files: BTreeSet<String>,
    pub(crate) removed_files: BTreeSet<String>,
    pub(crate) workspace_changeset: BTreeMap<String, WorkspaceChangeType>,
    pub(crate) untracked_files: BTreeSet<String>,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let refs = self.repository.refs();
        let current_branch = refs.current_branch()?;
        let branches = refs.list_branches()?;
        let (_, head) = self.repository.head_commit()?;

        let inspector = Inspector::new(self.repository);
        let workspace_changeset = self.check_tracked_files(&head, index, &inspector)?;
        let untracked_files = self.collect_untracked_files(&head, index, &inspector)?;

        Ok(StatusInfo {
            current_branch,
            branches,
            staged_files: index.pending_files().keys().cloned().collect(),
            removed_files: index.pending_removals().clone(),
            workspace_changeset,
            untracked_files,
        })
    }

    /// Staged files compare against their staged blob, other head files against the head
    fn check_tracked_files(
        &self,
        head: &Commit,
        index: &Index,
        inspector: &Inspector<'_>,
    ) -> anyhow::Result<BTreeMap<String, WorkspaceChangeType>> {
        let mut changes = BTreeMap::new();

        for (name, oid) in index.pending_files() {
            if let Some(change) = inspector.check_against_workspace(name, oid)? {
                changes.insert(name.clone(), change);
            }
        }

        for (name, oid) in head.files() {
            if index.is_staged_for_addition(name) || index.is_staged_for_removal(name) {
                continue;
            }
            if let Some(change) = inspector.check_against_workspace(name, oid)? {
                changes.insert(name.clone(), change);
            }
        }

        Ok(changes)
    }

    fn collect_untracked_files(
        &self,
        head: &Commit,
        index: &Index,
        inspector: &Inspector<'_>,
    ) -> anyhow::Result<BTreeSet<String>> {
        Ok(self
            .repository
            .workspace()
            .list_files()?
            .into_iter()
            .filter(|name| {
                inspector.is_untracked(name, head, index) || index.is_staged_for_removal(name)
            })
            .collect())
    }
}
