//! Commit store
//!
//! Commit records are immutable objects kept in their own object database
//! under `.gitlet/commits`. The branch names a commit is tagged with are
//! mutable, so they live in a side file next to the record
//! (`<2 hex>/<38 hex>.branches`, one name per line) and never take part in the
//! commit id. Side files are not valid object ids and are skipped by prefix
//! lookups.

use crate::areas::database::Database;
use crate::areas::refs::write_locked_file;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::path::{Path, PathBuf};

const TAGS_EXTENSION: &str = "branches";

#[derive(Debug)]
pub struct CommitStore {
    database: Database,
}

impl CommitStore {
    pub fn new(path: Box<Path>) -> Self {
        CommitStore {
            database: Database::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.database.objects_path()
    }

    pub fn store(&self, commit: &Commit) -> anyhow::Result<ObjectId> {
        self.database.store(commit)
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.database.contains(oid)
    }

    /// Rehydrate a commit, checking that its fields still hash to `oid`
    pub fn restore(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        let commit: Commit = self
            .database
            .load(oid, ObjectType::Commit)
            .with_context(|| format!("failed to load commit {oid}"))?;

        let actual = commit.object_id()?;
        if &actual != oid {
            anyhow::bail!("corrupt commit {oid}: record hashes to {actual}");
        }

        Ok(commit)
    }

    pub fn slim(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        let commit = self.restore(oid)?;

        Ok(SlimCommit {
            oid: oid.clone(),
            parents: commit.parents().to_vec(),
            timestamp: commit.timestamp(),
        })
    }

    /// Expand an abbreviated commit id; unknown or ambiguous prefixes are rejected
    pub fn resolve_prefix(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        if prefix.is_empty() {
            return Err(RepositoryError::AmbiguousOrNotFound.into());
        }

        let mut candidates = self.database.find_objects_by_prefix(prefix)?;
        match candidates.len() {
            1 => Ok(candidates.remove(0)),
            count => {
                tracing::debug!(prefix, candidates = count, "commit id did not resolve");
                Err(RepositoryError::AmbiguousOrNotFound.into())
            }
        }
    }

    /// Every commit id in the store, sorted
    pub fn list(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut oids = self.database.list_objects()?;
        oids.sort();

        Ok(oids)
    }

    pub fn find_by_message(&self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();
        for oid in self.list()? {
            if self.restore(&oid)?.message() == message {
                matches.push(oid);
            }
        }

        Ok(matches)
    }

    fn tags_path(&self, oid: &ObjectId) -> PathBuf {
        self.path()
            .join(oid.to_path())
            .with_extension(TAGS_EXTENSION)
    }

    /// Branch names the commit is tagged with, in tagging order
    pub fn branch_tags(&self, oid: &ObjectId) -> anyhow::Result<Vec<BranchName>> {
        let tags_path = self.tags_path(oid);
        if !tags_path.is_file() {
            return Ok(Vec::new());
        }

        std::fs::read_to_string(&tags_path)
            .with_context(|| format!("failed to read branch tags at {:?}", tags_path))?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| BranchName::try_parse(line.trim().to_string()))
            .collect()
    }

    pub fn tag(&self, oid: &ObjectId, branch: &BranchName) -> anyhow::Result<()> {
        let mut tags = self.branch_tags(oid)?;
        if tags.contains(branch) {
            return Ok(());
        }
        tags.push(branch.clone());
        tracing::trace!(oid = %oid, branch = %branch, "tagged commit");

        self.write_tags(oid, &tags)
    }

    pub fn untag(&self, oid: &ObjectId, branch: &BranchName) -> anyhow::Result<()> {
        let mut tags = self.branch_tags(oid)?;
        let before = tags.len();
        tags.retain(|tag| tag != branch);
        if tags.len() == before {
            return Ok(());
        }

        self.write_tags(oid, &tags)
    }

    fn write_tags(&self, oid: &ObjectId, tags: &[BranchName]) -> anyhow::Result<()> {
        let content = tags
            .iter()
            .map(|tag| format!("{tag}\n"))
            .collect::<String>();

        write_locked_file(&self.tags_path(oid), &content)
    }

    /// Copy a commit record into another store; tags stay behind
    pub fn copy_to(&self, oid: &ObjectId, other: &CommitStore) -> anyhow::Result<bool> {
        self.database.copy_to(oid, &other.database)
    }
}
