use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Repository metadata directory, never part of the working files
pub const METADATA_DIR: &str = ".gitlet";

const IGNORED_PATHS: [&str; 3] = [METADATA_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Path of a file that is about to be read, written or deleted
    fn checked_path(&self, name: &str) -> anyhow::Result<PathBuf> {
        Ok(self.file_path(&Self::normalize(name)?))
    }

    /// The working file name `name` refers to, in the form `list_files` produces
    ///
    /// Names must stay below the root and outside `.gitlet`; `.` components are dropped.
    pub fn normalize(name: &str) -> anyhow::Result<String> {
        let mut parts = Vec::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(RepositoryError::FileNotFound.into());
                }
            }
        }

        match parts.first() {
            Some(first) if first != METADATA_DIR => Ok(parts.join("/")),
            _ => Err(RepositoryError::FileNotFound.into()),
        }
    }

    /// Read a working file as a blob named after it
    pub fn parse_blob(&self, name: &str) -> anyhow::Result<Blob> {
        let name = Self::normalize(name)?;
        let data = self.read_file(&name)?;
        Ok(Blob::new(name, data))
    }

    /// Every working file, `/` separated and relative to the root, in name order
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.to_file_name(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    fn to_file_name(&self, path: &Path) -> Option<String> {
        let relative_path = path.strip_prefix(self.path.as_ref()).ok()?;

        Some(
            relative_path
                .components()
                .filter_map(|component| match component {
                    Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/"),
        )
    }

    pub fn exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }

    pub fn is_dir(&self, name: &str) -> bool {
        self.file_path(name).is_dir()
    }

    pub fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        let file_path = self.checked_path(name)?;
        if !file_path.is_file() {
            return Err(RepositoryError::FileNotFound.into());
        }

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    /// Files below the directory `name`, as working file names
    pub fn files_under(&self, name: &str) -> Vec<String> {
        WalkDir::new(self.file_path(name))
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.to_file_name(entry.path()))
            .collect()
    }

    pub fn write_file(&self, name: &str, data: &[u8]) -> anyhow::Result<()> {
        let path = self.checked_path(name)?;

        if let Some(parent) = path.parent() {
            self.make_directory(parent)?;
        }

        // a directory in the way has already been cleared of untracked files
        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove existing directory: {:?}", name))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", name))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", name))?;

        Ok(())
    }

    /// Delete a working file if present, then drop directories it leaves empty
    pub fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        let path = self.checked_path(name)?;

        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {:?}", name))?;
        }
        self.prune_empty_parent_dirs(&path)
    }

    // Deletions go first so that a file can be replaced by a directory of the
    // same name, then modified and added files are written.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        self.apply_migration_action_set(migration, ActionType::Delete)?;
        self.apply_migration_action_set(migration, ActionType::Modify)?;
        self.apply_migration_action_set(migration, ActionType::Add)?;

        Ok(())
    }

    fn apply_migration_action_set(
        &self,
        migration: &Migration,
        action: ActionType,
    ) -> anyhow::Result<()> {
        migration
            .actions()
            .get(&action)
            .ok_or_else(|| anyhow::anyhow!("Invalid action type"))?
            .iter()
            .map(|(name, oid)| match (&action, oid) {
                (ActionType::Delete, None) => self.remove_file(name),
                (ActionType::Add | ActionType::Modify, Some(oid)) => {
                    let data = migration.load_blob_data(oid)?;
                    self.write_file(name, &data)
                }
                _ => Err(anyhow::anyhow!("Invalid action and entry combination")),
            })
            .collect::<Result<Vec<()>, _>>()?;

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        // a file in the way of a directory is replaced
        for ancestor in dir_path
            .ancestors()
            .take_while(|ancestor| *ancestor != self.path.as_ref())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
        {
            if ancestor.is_file() {
                std::fs::remove_file(ancestor)?;
            }
        }

        std::fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {:?}", dir_path))?;

        Ok(())
    }
}
