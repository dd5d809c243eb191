use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::merge::conflict_markers::write_conflict;
use crate::artifacts::merge::resolution::{MergeAction, MergePlan};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::io::Write;

impl Repository {
    pub async fn merge(&mut self, name: &str) -> anyhow::Result<()> {
        let outcome = self.merge_branch(name).await?;
        self.report_merge(&outcome)
    }

    pub(crate) fn report_merge(&self, outcome: &MergeOutcome) -> anyhow::Result<()> {
        if let Some(message) = outcome.message() {
            writeln!(self.writer(), "{message}")?;
        }

        Ok(())
    }

    /// Merge the branch `name` into the current branch
    ///
    /// Every check runs before the working directory, the staging area or any
    /// branch is touched. Conflicts do not stop the merge commit.
    pub async fn merge_branch(&mut self, name: &str) -> anyhow::Result<MergeOutcome> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if !index.is_empty() {
            return Err(RepositoryError::UncommittedChanges.into());
        }

        let given = BranchName::try_parse(name.to_string())
            .map_err(|_| RepositoryError::BranchNotFound)?;
        if !self.refs().exists(&given) {
            return Err(RepositoryError::BranchNotFound.into());
        }
        let current = self.refs().current_branch()?;
        if given == current {
            return Err(RepositoryError::SelfMerge.into());
        }

        let (current_oid, current_commit) = self.head_commit()?;
        let given_oid = self.refs().head_of(&given)?;
        let given_commit = self.commits().restore(&given_oid)?;

        let split_oid = self.find_split_point(&current_oid, &given_oid)?;
        tracing::debug!(split = %split_oid, current = %current_oid, given = %given_oid, "found split point");

        if split_oid == given_oid {
            return Ok(MergeOutcome::AlreadyAncestor);
        }

        if split_oid == current_oid {
            Migration::new(self, &index, &current_commit, given_commit.files()).apply_changes()?;

            let history = self.refs().history(&given)?;
            self.refs().replace_history(&current, &history)?;
            self.commits().tag(&given_oid, &current)?;

            return Ok(MergeOutcome::FastForwarded);
        }

        let split_commit = self.commits().restore(&split_oid)?;
        let plan = MergePlan::new(
            split_commit.files(),
            current_commit.files(),
            given_commit.files(),
        );

        let mut conflict_blobs = Vec::new();
        for (name, current_blob, given_blob) in plan.conflicts() {
            tracing::debug!(file = %name, "merge conflict");
            let current_content = self.load_optional_blob(current_blob)?;
            let given_content = self.load_optional_blob(given_blob)?;
            let content = write_conflict(current_content.as_deref(), given_content.as_deref());

            conflict_blobs.push(Blob::new(name.clone(), content));
        }

        let mut target = current_commit.files().clone();
        for (name, action) in plan.actions() {
            match action {
                MergeAction::TakeGiven(oid) => {
                    target.insert(name.clone(), oid.clone());
                }
                MergeAction::Remove => {
                    target.remove(name);
                }
                MergeAction::KeepCurrent | MergeAction::Conflict { .. } => {}
            }
        }
        let mut conflict_files = Vec::with_capacity(conflict_blobs.len());
        for blob in &conflict_blobs {
            let blob_oid = blob.object_id()?;
            target.insert(blob.name().to_string(), blob_oid.clone());
            conflict_files.push((blob.name().to_string(), blob_oid));
        }

        {
            let mut migration = Migration::new(self, &index, &current_commit, &target);
            migration.plan_changes()?;

            for blob in &conflict_blobs {
                self.database().store(blob)?;
            }
            migration.update_workspace()?;
        }

        for (name, action) in plan.actions() {
            match action {
                MergeAction::TakeGiven(oid) => index.stage_addition(name, oid.clone()),
                MergeAction::Remove => index.stage_removal(name),
                MergeAction::KeepCurrent | MergeAction::Conflict { .. } => {}
            }
        }
        for (name, blob_oid) in conflict_files {
            index.stage_addition(&name, blob_oid);
        }

        let message = format!("Merged {given} into {current}.");
        self.write_commit(&mut index, vec![current_oid, given_oid], &message)?;

        Ok(MergeOutcome::Merged {
            conflicted: plan.has_conflicts(),
        })
    }

    fn load_optional_blob(&self, oid: &Option<ObjectId>) -> anyhow::Result<Option<bytes::Bytes>> {
        oid.as_ref().map(|oid| self.database().get(oid)).transpose()
    }

    fn find_split_point(&self, current: &ObjectId, given: &ObjectId) -> anyhow::Result<ObjectId> {
        let bca_finder = BCAFinder::new(|oid: &ObjectId| self.commits().slim(oid));

        bca_finder
            .find_best_common_ancestor(current, given)?
            .with_context(|| format!("commits {current} and {given} share no history"))
    }
}
