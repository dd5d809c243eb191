use crate::areas::remote::{RemoteRepository, transfer_history};
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::log::history::ancestry;
use crate::errors::RepositoryError;
use std::path::Path;

impl Repository {
    pub fn add_remote(&self, name: &str, location: &str) -> anyhow::Result<()> {
        self.remotes().add(name, location)
    }

    pub fn rm_remote(&self, name: &str) -> anyhow::Result<()> {
        self.remotes().remove(name)
    }

    fn open_remote(&self, name: &str) -> anyhow::Result<RemoteRepository> {
        let location = self.remotes().location(name)?;
        let location = Path::new(&location);
        let location = if location.is_absolute() {
            location.to_path_buf()
        } else {
            self.path().join(location)
        };

        RemoteRepository::open(&location)
    }

    /// Append the current head to `branch` on the remote, copying missing history
    pub fn push(&self, remote: &str, branch: &str) -> anyhow::Result<()> {
        let remote_repository = self.open_remote(remote)?;
        let branch = BranchName::try_parse(branch.to_string())?;
        let head_oid = self.refs().read_head()?;

        let remote_refs = remote_repository.refs();
        let remote_head = if remote_refs.exists(&branch) {
            Some(remote_refs.head_of(&branch)?)
        } else {
            None
        };

        if let Some(remote_head) = &remote_head {
            if remote_head == &head_oid {
                tracing::debug!(remote, branch = %branch, "remote branch already up to date");
                return Ok(());
            }
            if !ancestry(self.commits(), &head_oid)?.contains(remote_head) {
                return Err(RepositoryError::PushRejected.into());
            }
        }

        transfer_history(
            (self.database(), self.commits()),
            (remote_repository.database(), remote_repository.commits()),
            &head_oid,
        )?;

        match remote_head {
            Some(_) => remote_refs.advance(&branch, head_oid.clone())?,
            None => remote_refs.create_branch(&branch, head_oid.clone())?,
        }
        remote_repository.commits().tag(&head_oid, &branch)?;

        Ok(())
    }

    pub fn fetch(&self, remote: &str, branch: &str) -> anyhow::Result<()> {
        self.fetch_branch(remote, branch).map(|_| ())
    }

    /// Copy a remote branch into the local branch `<remote>/<branch>` and return its name
    fn fetch_branch(&self, remote: &str, branch: &str) -> anyhow::Result<BranchName> {
        let remote_repository = self.open_remote(remote)?;
        let branch = BranchName::try_parse(branch.to_string())
            .map_err(|_| RepositoryError::RemoteBranchNotFound)?;
        if !remote_repository.refs().exists(&branch) {
            return Err(RepositoryError::RemoteBranchNotFound.into());
        }
        let remote_head = remote_repository.refs().head_of(&branch)?;

        transfer_history(
            (remote_repository.database(), remote_repository.commits()),
            (self.database(), self.commits()),
            &remote_head,
        )?;

        let tracking = BranchName::remote_tracking(remote, &branch)?;
        if !self.refs().exists(&tracking) {
            self.refs().create_branch(&tracking, remote_head.clone())?;
        } else if self.refs().head_of(&tracking)? != remote_head {
            self.refs().advance(&tracking, remote_head.clone())?;
        }
        self.commits().tag(&remote_head, &tracking)?;

        Ok(tracking)
    }

    /// Fetch `branch` from the remote, then merge `<remote>/<branch>`
    pub async fn pull(&mut self, remote: &str, branch: &str) -> anyhow::Result<()> {
        let tracking = self.fetch_branch(remote, branch)?;
        let outcome = self.merge_branch(tracking.as_ref()).await?;

        self.report_merge(&outcome)
    }
}
