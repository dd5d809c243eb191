use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;

impl Repository {
    /// Create a branch pointing at the current head; the current branch does not change
    pub fn branch(&self, name: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(name.to_string())?;
        let head_oid = self.refs().read_head()?;

        self.refs().create_branch(&branch, head_oid.clone())?;
        self.commits().tag(&head_oid, &branch)?;

        Ok(())
    }

    pub fn rm_branch(&self, name: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(name.to_string())?;

        let mut history = self.refs().delete_branch(&branch)?;
        history.sort();
        history.dedup();
        for commit_oid in &history {
            self.commits().untag(commit_oid, &branch)?;
        }

        Ok(())
    }
}
