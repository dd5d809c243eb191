use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        if index.is_empty() {
            return Err(RepositoryError::NothingToCommit.into());
        }
        if message.trim().is_empty() {
            return Err(RepositoryError::EmptyMessage.into());
        }

        let (head_oid, _) = self.head_commit()?;
        let commit_oid = self.write_commit(&mut index, vec![head_oid], message)?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            self.refs().current_branch()?,
            commit_oid.to_short_oid(),
            message
        )?;

        Ok(())
    }

    /// Snapshot the head overlaid with the staged changes onto the current branch
    ///
    /// The new commit is tagged with the current branch, the branch advances to
    /// it and the staging area is cleared.
    pub(crate) fn write_commit(
        &self,
        index: &mut Index,
        parents: Vec<ObjectId>,
        message: &str,
    ) -> anyhow::Result<ObjectId> {
        let branch = self.refs().current_branch()?;
        let (_, head) = self.head_commit()?;

        let files = index.apply_to(head.files());
        let commit = Commit::new(
            parents,
            self.config().commit_timestamp(),
            message.to_string(),
            files,
        );

        let commit_oid = self.commits().store(&commit)?;
        self.refs().advance(&branch, commit_oid.clone())?;
        self.commits().tag(&commit_oid, &branch)?;

        index.clear();
        index.write_updates()?;

        Ok(commit_oid)
    }
}
