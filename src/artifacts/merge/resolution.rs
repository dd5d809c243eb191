//! Three-way file classification
//!
//! Each file name present in the split point, the current head or the given
//! head is compared against the split point on both sides:
//!
//! | current vs split | given vs split | action                         |
//! |------------------|----------------|--------------------------------|
//! | any              | unchanged      | keep current                   |
//! | unchanged        | changed        | take given (or remove)         |
//! | changed          | changed        | keep if both agree, else conflict |
//!
//! "Changed" covers modification, addition and deletion alike.

use crate::artifacts::objects::commit::FileSet;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// Leave the current version (or its absence) as it is
    KeepCurrent,
    /// Check out and stage the given branch's blob
    TakeGiven(ObjectId),
    /// Delete the file and stage its removal
    Remove,
    /// Both sides changed the file differently
    Conflict {
        current: Option<ObjectId>,
        given: Option<ObjectId>,
    },
}

/// Planned action per file name, only for names that need one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    actions: BTreeMap<String, MergeAction>,
}

impl MergePlan {
    pub fn new(split: &FileSet, current: &FileSet, given: &FileSet) -> Self {
        let names = split
            .keys()
            .chain(current.keys())
            .chain(given.keys())
            .collect::<BTreeSet<_>>();

        let actions = names
            .into_iter()
            .filter_map(|name| {
                let action = classify(split.get(name), current.get(name), given.get(name));
                tracing::trace!(file = %name, ?action, "classified file");

                (action != MergeAction::KeepCurrent).then(|| (name.clone(), action))
            })
            .collect();

        MergePlan { actions }
    }

    pub fn actions(&self) -> &BTreeMap<String, MergeAction> {
        &self.actions
    }

    pub fn has_conflicts(&self) -> bool {
        self.conflicts().next().is_some()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = (&String, &Option<ObjectId>, &Option<ObjectId>)> {
        self.actions.iter().filter_map(|(name, action)| match action {
            MergeAction::Conflict { current, given } => Some((name, current, given)),
            _ => None,
        })
    }
}

pub fn classify(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    given: Option<&ObjectId>,
) -> MergeAction {
    let current_changed = current != split;
    let given_changed = given != split;

    match (current_changed, given_changed) {
        (_, false) => MergeAction::KeepCurrent,
        (false, true) => match given {
            Some(oid) => MergeAction::TakeGiven(oid.clone()),
            None => MergeAction::Remove,
        },
        (true, true) if current == given => MergeAction::KeepCurrent,
        (true, true) => MergeAction::Conflict {
            current: current.cloned(),
            given: given.cloned(),
        },
    }
}
