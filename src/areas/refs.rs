//! Branch table
//!
//! Each branch is a file under `.gitlet/branches/` holding the ordered list of
//! commit ids the branch has pointed to, one per line, oldest first. The head
//! of a branch is the last line. `.gitlet/HEAD` holds the name of the branch
//! that is currently checked out.
//!
//! Histories only grow: commits, merges and resets append, a fast-forward
//! replaces the list with a copy of the given branch's history.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Name of the file holding the current branch
pub const HEAD_REF_NAME: &str = "HEAD";

/// Directory holding one history file per branch
pub const BRANCHES_DIR: &str = "branches";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository metadata directory (typically `.gitlet`)
    path: Box<Path>,
}

/// Replace a small metadata file under an exclusive lock, creating parent directories
pub(crate) fn write_locked_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(path.parent().with_context(|| {
        format!("failed to create parent directories for file at {:?}", path)
    })?)?;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("failed to open file at {:?}", path))?;
    let mut lock = file_guard::lock(&mut file, Lock::Exclusive, 0, 1)?;
    lock.deref_mut().write_all(content.as_bytes())?;

    Ok(())
}

impl Refs {
    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn branches_path(&self) -> Box<Path> {
        self.path.join(BRANCHES_DIR).into_boxed_path()
    }

    fn branch_path(&self, name: &BranchName) -> Box<Path> {
        self.branches_path().join(name.as_ref()).into_boxed_path()
    }

    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;

        BranchName::try_parse(content.trim().to_string())
    }

    pub fn set_current_branch(&self, name: &BranchName) -> anyhow::Result<()> {
        write_locked_file(&self.head_path(), name.as_ref())?;
        tracing::debug!(branch = %name, "switched current branch");

        Ok(())
    }

    pub fn is_current_branch(&self, name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == name)
    }

    pub fn exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_file()
    }

    /// Every commit id the branch has pointed to, oldest first
    pub fn history(&self, name: &BranchName) -> anyhow::Result<Vec<ObjectId>> {
        let branch_path = self.branch_path(name);
        if !branch_path.is_file() {
            return Err(RepositoryError::BranchNotFound.into());
        }

        std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read branch file at {:?}", branch_path))?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| ObjectId::try_parse(line.trim().to_string()))
            .collect()
    }

    pub fn head_of(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        self.history(name)?
            .pop()
            .with_context(|| format!("branch {name} has an empty history"))
    }

    /// Head commit of the current branch
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        self.head_of(&self.current_branch()?)
    }

    pub fn create_branch(&self, name: &BranchName, head: ObjectId) -> anyhow::Result<()> {
        // check whether another branch with the same name already exists
        if self.exists(name) {
            return Err(RepositoryError::DuplicateBranch.into());
        }

        self.write_history(name, &[head])?;
        tracing::debug!(branch = %name, "created branch");

        Ok(())
    }

    /// Delete a branch that is not checked out and return its history
    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<Vec<ObjectId>> {
        let history = self.history(name)?;
        if self.is_current_branch(name)? {
            return Err(RepositoryError::CannotDeleteCurrent.into());
        }

        let branch_path = self.branch_path(name);
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;
        tracing::debug!(branch = %name, "deleted branch");

        Ok(history)
    }

    /// Append a commit to the branch history, making it the new head
    pub fn advance(&self, name: &BranchName, oid: ObjectId) -> anyhow::Result<()> {
        let mut history = self.history(name)?;
        tracing::debug!(branch = %name, from = ?history.last(), to = %oid, "advancing branch");
        history.push(oid);

        self.write_history(name, &history)
    }

    pub fn replace_history(&self, name: &BranchName, history: &[ObjectId]) -> anyhow::Result<()> {
        if history.is_empty() {
            anyhow::bail!("refusing to write an empty history for branch {name}");
        }

        self.write_history(name, history)
    }

    fn write_history(&self, name: &BranchName, history: &[ObjectId]) -> anyhow::Result<()> {
        let content = history
            .iter()
            .map(|oid| format!("{oid}\n"))
            .collect::<String>();

        write_locked_file(&self.branch_path(name), &content)
    }

    /// All branch names in lexicographic order
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let branches_path = self.branches_path();

        let mut branches = WalkDir::new(&branches_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&branches_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.branches_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}
