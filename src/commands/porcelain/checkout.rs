use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::errors::RepositoryError;

impl Repository {
    /// Switch to another branch, rewriting the working directory to its head
    pub async fn checkout_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let target = BranchName::try_parse(name.to_string())
            .map_err(|_| RepositoryError::BranchNotFound)?;
        if !self.refs().exists(&target) {
            return Err(RepositoryError::BranchNotFound.into());
        }
        if self.refs().is_current_branch(&target)? {
            return Err(RepositoryError::AlreadyCurrent.into());
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, current) = self.head_commit()?;
        let target_oid = self.refs().head_of(&target)?;
        let target_commit = self.commits().restore(&target_oid)?;

        Migration::new(self, &index, &current, target_commit.files()).apply_changes()?;

        index.clear();
        index.write_updates()?;
        self.refs().set_current_branch(&target)?;

        Ok(())
    }

    /// Restore one file from the head, or from the commit `commit` abbreviates
    ///
    /// The staging area is left untouched.
    pub fn checkout_file(&self, commit: Option<&str>, name: &str) -> anyhow::Result<()> {
        let name = Workspace::normalize(name).map_err(|_| RepositoryError::FileNotInCommit)?;
        let name = name.as_str();
        let commit_oid = match commit {
            Some(prefix) => self.commits().resolve_prefix(prefix)?,
            None => self.refs().read_head()?,
        };
        let commit = self.commits().restore(&commit_oid)?;

        let blob_oid = commit
            .file(name)
            .ok_or(RepositoryError::FileNotInCommit)?;
        let data = self.database().get(blob_oid)?;
        self.workspace().write_file(name, &data)?;
        tracing::debug!(file = name, commit = %commit_oid, "restored file");

        Ok(())
    }
}
