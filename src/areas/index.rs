//! Staging area
//!
//! The index records what the next commit will change relative to the head
//! commit: pending additions (file name -> blob id) and pending removals.
//!
//! ## Index File Format
//!
//! ```text
//! add <blob-sha> <name>
//! rm <name>
//! checksum <sha1 of all preceding bytes>
//! ```
//!
//! Additions come first, each section sorted by name. An absent or empty
//! file is an empty staging area.

use crate::artifacts::objects::commit::FileSet;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use sha1::{Digest, Sha1};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;

const CHECKSUM_PREFIX: &str = "checksum ";

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.gitlet/index`)
    path: Box<Path>,
    additions: BTreeMap<String, ObjectId>,
    removals: BTreeSet<String>,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Load the index from disk, under a shared lock
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        self.changed = false;

        if !self.path().exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(self.path())
            .with_context(|| format!("failed to open index at {:?}", self.path()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut content = String::new();
        lock.deref_mut().read_to_string(&mut content)?;
        if content.is_empty() {
            return Ok(());
        }

        let body = Self::verify(&content)?;
        for line in body.lines() {
            self.parse_line(line)?;
        }
        tracing::trace!(
            additions = self.additions.len(),
            removals = self.removals.len(),
            "loaded index"
        );

        Ok(())
    }

    /// Split off the trailing checksum line and check it against the body
    fn verify(content: &str) -> anyhow::Result<&str> {
        let trimmed = content.strip_suffix('\n').unwrap_or(content);
        let (body, checksum_line) = match trimmed.rsplit_once('\n') {
            Some((body, last)) => (&content[..body.len() + 1], last),
            None => ("", trimmed),
        };

        let expected = checksum_line
            .strip_prefix(CHECKSUM_PREFIX)
            .ok_or_else(|| anyhow!("Invalid index file: missing checksum"))?;
        let actual = Self::checksum(body);
        if expected != actual {
            return Err(anyhow!(
                "Invalid index file: checksum mismatch (expected {expected}, got {actual})"
            ));
        }

        Ok(body)
    }

    fn checksum(body: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(body.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn parse_line(&mut self, line: &str) -> anyhow::Result<()> {
        if let Some(rest) = line.strip_prefix("add ") {
            let (oid, name) = rest
                .split_once(' ')
                .ok_or_else(|| anyhow!("Invalid index entry: {line:?}"))?;
            self.additions
                .insert(name.to_string(), ObjectId::try_parse(oid.to_string())?);
        } else if let Some(name) = line.strip_prefix("rm ") {
            self.removals.insert(name.to_string());
        } else {
            anyhow::bail!("Invalid index entry: {line:?}");
        }

        Ok(())
    }

    /// Persist the index, under an exclusive lock
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut body = String::new();
        for (name, oid) in &self.additions {
            body.push_str(&format!("add {oid} {name}\n"));
        }
        for name in &self.removals {
            body.push_str(&format!("rm {name}\n"));
        }
        let content = format!("{body}{CHECKSUM_PREFIX}{}\n", Self::checksum(&body));

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())
            .with_context(|| format!("failed to open index at {:?}", self.path()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(content.as_bytes())?;

        self.changed = false;

        Ok(())
    }

    /// Record a pending addition, cancelling any pending removal of the name
    pub fn stage_addition(&mut self, name: &str, oid: ObjectId) {
        self.removals.remove(name);
        self.additions.insert(name.to_string(), oid);
        self.changed = true;
    }

    /// Record a pending removal, dropping any pending addition of the name
    pub fn stage_removal(&mut self, name: &str) {
        self.additions.remove(name);
        self.removals.insert(name.to_string());
        self.changed = true;
    }

    /// Forget everything pending for `name`; true if anything was dropped
    pub fn unstage(&mut self, name: &str) -> bool {
        let dropped = self.additions.remove(name).is_some() | self.removals.remove(name);
        self.changed |= dropped;
        dropped
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.changed = true;
        }
        self.additions.clear();
        self.removals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn is_staged_for_addition(&self, name: &str) -> bool {
        self.additions.contains_key(name)
    }

    pub fn is_staged_for_removal(&self, name: &str) -> bool {
        self.removals.contains(name)
    }

    pub fn pending_files(&self) -> &BTreeMap<String, ObjectId> {
        &self.additions
    }

    pub fn pending_removals(&self) -> &BTreeSet<String> {
        &self.removals
    }

    /// Snapshot of the next commit given its parent's snapshot
    pub fn apply_to(&self, parent_files: &FileSet) -> FileSet {
        let mut files = parent_files.clone();
        files.extend(
            self.additions
                .iter()
                .map(|(name, oid)| (name.clone(), oid.clone())),
        );
        files.retain(|name, _| !self.removals.contains(name));

        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn index(dir: &TempDir) -> Index {
        Index::new(dir.path().join("index").into_boxed_path())
    }

    #[test]
    fn missing_index_file_is_an_empty_staging_area() {
        let dir = TempDir::new().unwrap();
        let mut index = index(&dir);

        index.rehydrate().unwrap();

        assert!(index.is_empty());
        assert!(!index.is_changed());
    }

    #[test]
    fn pending_entries_survive_a_reload() {
        let dir = TempDir::new().unwrap();
        let mut index = index(&dir);
        index.stage_addition("a.txt", oid('a'));
        index.stage_addition("dir/with space.txt", oid('b'));
        index.stage_removal("gone.txt");
        index.write_updates().unwrap();

        let mut reloaded = self::index(&dir);
        reloaded.rehydrate().unwrap();

        assert_eq!(reloaded.pending_files(), index.pending_files());
        assert_eq!(reloaded.pending_removals(), index.pending_removals());
        assert_eq!(reloaded.pending_files().get("dir/with space.txt"), Some(&oid('b')));
    }

    #[test]
    fn tampered_index_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut index = index(&dir);
        index.stage_addition("a.txt", oid('a'));
        index.write_updates().unwrap();

        let content = std::fs::read_to_string(index.path()).unwrap();
        std::fs::write(index.path(), content.replace("a.txt", "b.txt")).unwrap();

        assert!(self::index(&dir).rehydrate().is_err());
    }

    #[test]
    fn addition_and_removal_of_a_name_are_exclusive() {
        let dir = TempDir::new().unwrap();
        let mut index = index(&dir);

        index.stage_addition("a.txt", oid('a'));
        index.stage_removal("a.txt");
        assert!(!index.is_staged_for_addition("a.txt"));
        assert!(index.is_staged_for_removal("a.txt"));

        index.stage_addition("a.txt", oid('a'));
        assert!(index.is_staged_for_addition("a.txt"));
        assert!(!index.is_staged_for_removal("a.txt"));

        assert!(index.unstage("a.txt"));
        assert!(!index.unstage("a.txt"));
        assert!(index.is_empty());
    }

    #[test]
    fn next_snapshot_overlays_additions_and_drops_removals() {
        let dir = TempDir::new().unwrap();
        let mut index = index(&dir);
        let parent = FileSet::from([
            ("keep.txt".to_string(), oid('1')),
            ("change.txt".to_string(), oid('2')),
            ("drop.txt".to_string(), oid('3')),
        ]);

        index.stage_addition("change.txt", oid('4'));
        index.stage_addition("new.txt", oid('5'));
        index.stage_removal("drop.txt");

        assert_eq!(
            index.apply_to(&parent),
            FileSet::from([
                ("change.txt".to_string(), oid('4')),
                ("keep.txt".to_string(), oid('1')),
                ("new.txt".to_string(), oid('5')),
            ])
        );
    }
}
