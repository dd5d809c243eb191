use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;

impl Repository {
    /// Move the current branch onto any commit and check it out
    pub async fn reset(&mut self, commit: &str) -> anyhow::Result<()> {
        let target_oid = self.commits().resolve_prefix(commit)?;
        let target = self.commits().restore(&target_oid)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (head_oid, current) = self.head_commit()?;
        Migration::new(self, &index, &current, target.files()).apply_changes()?;

        index.clear();
        index.write_updates()?;

        let branch = self.refs().current_branch()?;
        if head_oid != target_oid {
            self.refs().advance(&branch, target_oid.clone())?;
        }
        self.commits().tag(&target_oid, &branch)?;

        Ok(())
    }
}
