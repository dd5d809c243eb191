use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(RepositoryError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/blobs directory")?;

        fs::create_dir_all(self.commits().path())
            .context("Failed to create .gitlet/commits directory")?;

        fs::create_dir_all(self.refs().branches_path())
            .context("Failed to create .gitlet/branches directory")?;

        // every repository starts from the same root commit
        let root_oid = self.commits().store(&Commit::root())?;
        let master = BranchName::default_branch();

        self.refs()
            .create_branch(&master, root_oid.clone())
            .context("Failed to create the default branch")?;
        self.refs()
            .set_current_branch(&master)
            .context("Failed to create initial HEAD reference")?;
        self.commits().tag(&root_oid, &master)?;

        let index = self.index();
        let mut index = index.lock().await;
        // an empty staging area
        index.write_updates()?;

        writeln!(
            self.writer(),
            "Initialized empty Gitlet repository in {}",
            self.metadata_path().display()
        )?;

        Ok(())
    }
}
