//! Checkout migration
//!
//! A migration moves the working directory from the snapshot it currently
//! tracks to a target snapshot:
//!
//! 1. Plan: files of the target whose working copy differs are written
//!    (`Add`/`Modify`), files tracked now but absent from the target are
//!    deleted (`Delete`).
//! 2. Check: an untracked working file (not in the current snapshot, not
//!    staged for addition) that the plan would replace blocks the whole
//!    migration with `UntrackedFileConflict`.
//! 3. Apply: the workspace executes the plan.
//!
//! The staging area is only read here; callers decide whether to clear it.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::conflict::ConflictType;
use crate::artifacts::objects::commit::{Commit, FileSet};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::inspector::Inspector;
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::collections::HashMap;

/// Type of file system action required for checkout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Overwrite existing file
    Modify,
}

/// Set of planned actions grouped by type
pub type ActionsSet = HashMap<ActionType, Vec<(String, Option<ObjectId>)>>;

/// Set of detected conflicts grouped by type
pub type ConflictsSet = HashMap<ConflictType, Vec<String>>;

pub struct Migration<'r> {
    repository: &'r Repository,
    index: &'r Index,
    /// Snapshot the working directory currently tracks
    current: &'r Commit,
    target: &'r FileSet,
    inspector: Inspector<'r>,
    actions: ActionsSet,
    conflicts: ConflictsSet,
}

impl<'r> Migration<'r> {
    pub fn new(
        repository: &'r Repository,
        index: &'r Index,
        current: &'r Commit,
        target: &'r FileSet,
    ) -> Self {
        let actions = HashMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        Self {
            repository,
            index,
            current,
            target,
            inspector: Inspector::new(repository),
            actions,
            conflicts: HashMap::new(),
        }
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.plan_changes()?;
        self.update_workspace()
    }

    /// Plan every file operation; fails without touching anything on conflicts
    pub fn plan_changes(&mut self) -> anyhow::Result<()> {
        let (current, target) = (self.current, self.target);
        for (name, oid) in target {
            self.check_for_conflict(name)?;
            self.record_write(name, oid)?;
        }

        for name in current.files().keys() {
            if !target.contains_key(name) && self.repository.workspace().exists(name) {
                self.push_action(ActionType::Delete, name, None);
            }
        }

        if self.conflicts.values().any(|names| !names.is_empty()) {
            for (conflict_type, names) in &self.conflicts {
                tracing::debug!(files = ?names, "{}", conflict_type.describe());
            }
            return Err(RepositoryError::UntrackedFileConflict.into());
        }

        let count = |action: ActionType| self.actions.get(&action).map_or(0, Vec::len);
        tracing::debug!(
            add = count(ActionType::Add),
            modify = count(ActionType::Modify),
            delete = count(ActionType::Delete),
            "planned checkout"
        );

        Ok(())
    }

    fn check_for_conflict(&mut self, name: &str) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();

        if workspace.is_dir(name) {
            let blocked = workspace
                .files_under(name)
                .iter()
                .any(|file| self.inspector.is_untracked(file, self.current, self.index));
            if blocked {
                self.push_conflict(ConflictType::StaleDirectory, name);
            }
            return Ok(());
        }

        // a parent directory of `name` may exist as a plain file
        let parent_in_the_way = name
            .match_indices('/')
            .map(|(position, _)| &name[..position])
            .find(|parent| workspace.exists(parent));
        if let Some(parent) = parent_in_the_way
            && self.inspector.is_untracked(parent, self.current, self.index)
        {
            self.push_conflict(ConflictType::StaleDirectory, parent);
        }

        if self.inspector.is_untracked(name, self.current, self.index) {
            let target_oid = self.target.get(name);
            if self.inspector.working_oid(name)?.as_ref() != target_oid {
                self.push_conflict(ConflictType::UntrackedOverwritten, name);
            }
        }

        Ok(())
    }

    fn record_write(&mut self, name: &str, oid: &ObjectId) -> anyhow::Result<()> {
        match self.inspector.working_oid(name)? {
            Some(working_oid) if &working_oid == oid => {}
            Some(_) => self.push_action(ActionType::Modify, name, Some(oid.clone())),
            None => self.push_action(ActionType::Add, name, Some(oid.clone())),
        }

        Ok(())
    }

    fn push_action(&mut self, action: ActionType, name: &str, oid: Option<ObjectId>) {
        self.actions
            .entry(action)
            .or_default()
            .push((name.to_string(), oid));
    }

    fn push_conflict(&mut self, conflict_type: ConflictType, name: &str) {
        self.conflicts
            .entry(conflict_type)
            .or_default()
            .push(name.to_string());
    }

    pub fn update_workspace(&self) -> anyhow::Result<()> {
        self.repository.workspace().apply_migration(self)
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.repository.database().get(object_id)
    }
}
