//! Local remotes
//!
//! A remote is another gitlet repository reachable through the filesystem.
//! `.gitlet/remotes/<name>` holds the location exactly as it was given, which
//! may point either at the other repository's `.gitlet` directory or at its
//! working directory. Relative locations are resolved against the local
//! working directory.

use crate::areas::commits::CommitStore;
use crate::areas::database::Database;
use crate::areas::refs::{HEAD_REF_NAME, Refs, write_locked_file};
use crate::areas::workspace::METADATA_DIR;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use derive_new::new;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, new)]
pub struct Remotes {
    /// Path to `.gitlet/remotes`
    path: Box<Path>,
}

impl Remotes {
    fn remote_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Remote names follow the branch name rules and cannot contain `/`
    pub fn validate_name(name: &str) -> anyhow::Result<()> {
        let invalid = || RepositoryError::InvalidRemoteName {
            name: name.to_string(),
        };

        if name.contains('/') || BranchName::try_parse(name.to_string()).is_err() {
            return Err(invalid().into());
        }

        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.remote_path(name).is_file()
    }

    pub fn add(&self, name: &str, location: &str) -> anyhow::Result<()> {
        Self::validate_name(name)?;
        if self.exists(name) {
            return Err(RepositoryError::DuplicateRemote.into());
        }

        write_locked_file(&self.remote_path(name), location)?;
        tracing::debug!(remote = name, location, "registered remote");

        Ok(())
    }

    pub fn remove(&self, name: &str) -> anyhow::Result<()> {
        if !self.exists(name) {
            return Err(RepositoryError::RemoteNotFound.into());
        }

        let remote_path = self.remote_path(name);
        std::fs::remove_file(&remote_path)
            .with_context(|| format!("failed to delete remote file at {:?}", remote_path))?;
        tracing::debug!(remote = name, "removed remote");

        Ok(())
    }

    /// Location the remote was registered with
    pub fn location(&self, name: &str) -> anyhow::Result<String> {
        if !self.exists(name) {
            return Err(RepositoryError::RemoteNotFound.into());
        }

        let remote_path = self.remote_path(name);
        let location = std::fs::read_to_string(&remote_path)
            .with_context(|| format!("failed to read remote file at {:?}", remote_path))?;

        Ok(location.trim().to_string())
    }
}

/// The stores of another repository on the local filesystem
#[derive(Debug)]
pub struct RemoteRepository {
    database: Database,
    commits: CommitStore,
    refs: Refs,
}

impl RemoteRepository {
    /// Open the repository at `location`, either a `.gitlet` directory or the directory holding one
    pub fn open(location: &Path) -> anyhow::Result<Self> {
        let metadata_path = if Self::is_metadata_dir(location) {
            location.to_path_buf()
        } else if Self::is_metadata_dir(&location.join(METADATA_DIR)) {
            location.join(METADATA_DIR)
        } else {
            tracing::debug!(location = ?location, "no repository at remote location");
            return Err(RepositoryError::RemoteDirectoryNotFound.into());
        };

        Ok(RemoteRepository {
            database: Database::new(metadata_path.join("blobs").into_boxed_path()),
            commits: CommitStore::new(metadata_path.join("commits").into_boxed_path()),
            refs: Refs::new(metadata_path.into_boxed_path()),
        })
    }

    fn is_metadata_dir(path: &Path) -> bool {
        path.is_dir() && path.join(HEAD_REF_NAME).is_file()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn commits(&self) -> &CommitStore {
        &self.commits
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}

/// Copy every commit reachable from `head` that `target_commits` lacks, with its blobs
///
/// Commits already present on the target are assumed to come with their whole
/// history, so the walk does not descend past them. Records are copied oldest
/// first and each commit's blobs before the commit itself. Returns the number
/// of commits copied.
pub fn transfer_history(
    (source_blobs, source_commits): (&Database, &CommitStore),
    (target_blobs, target_commits): (&Database, &CommitStore),
    head: &ObjectId,
) -> anyhow::Result<usize> {
    let mut missing = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![head.clone()];

    while let Some(oid) = stack.pop() {
        if target_commits.contains(&oid) || !seen.insert(oid.clone()) {
            continue;
        }
        let commit = source_commits.restore(&oid)?;
        stack.extend(commit.parents().iter().cloned());
        missing.push((oid, commit));
    }

    // parents were discovered after their children
    missing.sort_by_key(|(_, commit)| commit.timestamp());
    for (oid, commit) in &missing {
        for blob_oid in commit.files().values() {
            source_blobs.copy_to(blob_oid, target_blobs)?;
        }
        source_commits.copy_to(oid, target_commits)?;
    }
    tracing::debug!(head = %head, copied = missing.len(), "transferred history");

    Ok(missing.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::{Commit, FileSet};
    use assert_fs::TempDir;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    fn error_of(result: anyhow::Result<()>) -> RepositoryError {
        result.unwrap_err().downcast::<RepositoryError>().unwrap()
    }

    #[test]
    fn remotes_are_registered_once() {
        let dir = TempDir::new().unwrap();
        let remotes = Remotes::new(dir.path().join("remotes").into_boxed_path());

        remotes.add("origin", "../other/.gitlet").unwrap();

        assert_eq!(remotes.location("origin").unwrap(), "../other/.gitlet");
        assert!(remotes.exists("origin"));
        assert_eq!(
            error_of(remotes.add("origin", "elsewhere")),
            RepositoryError::DuplicateRemote
        );

        remotes.remove("origin").unwrap();
        assert_eq!(
            error_of(remotes.remove("origin")),
            RepositoryError::RemoteNotFound
        );
    }

    #[test]
    fn remote_names_cannot_nest() {
        assert!(matches!(
            Remotes::validate_name("origin/main").unwrap_err().downcast::<RepositoryError>(),
            Ok(RepositoryError::InvalidRemoteName { .. })
        ));
        assert!(Remotes::validate_name("has space").is_err());
        assert!(Remotes::validate_name("upstream").is_ok());
    }

    #[test]
    fn missing_locations_are_reported() {
        let dir = TempDir::new().unwrap();

        let error = RemoteRepository::open(&dir.path().join("nowhere")).unwrap_err();
        assert_eq!(
            error.downcast::<RepositoryError>().unwrap(),
            RepositoryError::RemoteDirectoryNotFound
        );
    }

    #[test]
    fn transfers_only_what_the_target_lacks() {
        let dir = TempDir::new().unwrap();
        let source_blobs = Database::new(dir.path().join("a/blobs").into_boxed_path());
        let source_commits = CommitStore::new(dir.path().join("a/commits").into_boxed_path());
        let target_blobs = Database::new(dir.path().join("b/blobs").into_boxed_path());
        let target_commits = CommitStore::new(dir.path().join("b/commits").into_boxed_path());

        let root = source_commits.store(&Commit::root()).unwrap();
        target_commits.store(&Commit::root()).unwrap();

        let blob = source_blobs.put("a.txt", Bytes::from_static(b"hello")).unwrap();
        let later = Commit::root().timestamp() + chrono::Duration::seconds(1);
        let child = Commit::new(
            vec![root],
            later,
            "first".to_string(),
            FileSet::from([("a.txt".to_string(), blob.clone())]),
        );
        let child_id = source_commits.store(&child).unwrap();

        let copied = transfer_history(
            (&source_blobs, &source_commits),
            (&target_blobs, &target_commits),
            &child_id,
        )
        .unwrap();

        assert_eq!(copied, 1);
        assert_eq!(target_commits.restore(&child_id).unwrap(), child);
        assert_eq!(target_blobs.get(&blob).unwrap(), Bytes::from_static(b"hello"));
    }
}
