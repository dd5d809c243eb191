//! Best common ancestor (merge base) search
//!
//! The split point of a merge is a best common ancestor of the two branch
//! heads: a commit reachable from both heads that is not itself an ancestor of
//! another such commit. Both parents of merge commits are followed.
//!
//! ## Algorithm
//!
//! ### Phase 1: common ancestors
//!
//! A single traversal starts from both commits at once, newest commits first
//! (max heap on timestamp). Every commit inherits the visit flags of the
//! commits that reached it; a commit carrying both flags is a common
//! ancestor, and everything below it is marked `STALE` so the search does not
//! report ancestors of a common ancestor.
//!
//! ### Phase 2: redundancy filter
//!
//! Timestamps are not a topological order (clock skew, identical timestamps),
//! so phase 1 may still report a common ancestor that is reachable from
//! another. Each candidate is therefore searched against the remaining ones
//! and dropped if it is reachable from any of them.
//!
//! When several best common ancestors remain (criss-cross histories) the
//! newest one is chosen, ties broken by the smallest id, so the result is
//! deterministic.
//!
//! ## Debug Logging
//!
//! Building with the `debug_merge` feature adds `trace` events for every
//! visited commit and its visit state.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            tracing::trace!($($arg)*);
        }
    };
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
        const STALE = 0b100;
        const RESULT = 0b1000;
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if self.contains(VisitState::STALE) {
            flags.push("STALE");
        }
        if self.contains(VisitState::RESULT) {
            flags.push("RESULT");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Finds the best common ancestor of two commits
///
/// The loader turns a commit id into the parents and timestamp of that
/// commit, so the search works the same over the on-disk commit store and
/// over in-memory graphs.
pub struct BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Visit states of every commit reached from `source` and `targets`,
    /// restricted to the common ancestors that were not staled
    fn find_common_ancestors(
        &self,
        source_commit_id: &ObjectId,
        target_commit_ids: &HashSet<&ObjectId>,
    ) -> anyhow::Result<HashMap<ObjectId, VisitState>> {
        if target_commit_ids.contains(source_commit_id) {
            return Ok(HashMap::from([(
                source_commit_id.clone(),
                VisitState::RESULT | VisitState::VISITED_FROM_BOTH,
            )]));
        }

        let mut ancestors_states = HashMap::<ObjectId, VisitState>::new();
        let mut priority_queue = BinaryHeap::new();

        let source_commit = (self.commit_loader)(source_commit_id)?;
        ancestors_states.insert(source_commit.oid.clone(), VisitState::VISITED_FROM_SOURCE);
        priority_queue.push((source_commit.timestamp, source_commit.oid));

        for &target_commit_id in target_commit_ids {
            let target_commit = (self.commit_loader)(target_commit_id)?;
            ancestors_states.insert(target_commit.oid.clone(), VisitState::VISITED_FROM_TARGET);
            priority_queue.push((target_commit.timestamp, target_commit.oid));
        }

        while let Some((_, commit_id)) = priority_queue.pop() {
            let current_state = ancestors_states
                .get(&commit_id)
                .copied()
                .unwrap_or(VisitState::NONE);

            debug_log!(commit = %commit_id, state = %current_state, "visiting commit");

            if current_state.contains(VisitState::STALE) {
                continue;
            }

            let is_common_ancestor = current_state.contains(VisitState::VISITED_FROM_BOTH);
            if is_common_ancestor {
                ancestors_states.insert(commit_id.clone(), current_state | VisitState::RESULT);
            }

            let current_commit = (self.commit_loader)(&commit_id)?;
            for parent_id in current_commit.parents {
                let parent_state = ancestors_states
                    .get(&parent_id)
                    .copied()
                    .unwrap_or(VisitState::NONE);

                let mut new_state = parent_state | (current_state & VisitState::VISITED_FROM_BOTH);
                if is_common_ancestor {
                    new_state |= VisitState::STALE;
                }

                // requeue only when the parent learns something new
                if new_state != parent_state {
                    let parent_commit = (self.commit_loader)(&parent_id)?;
                    ancestors_states.insert(parent_id.clone(), new_state);
                    priority_queue.push((parent_commit.timestamp, parent_id));
                }
            }
        }

        Ok(ancestors_states
            .into_iter()
            .filter(|(_, state)| {
                !state.contains(VisitState::STALE) && state.contains(VisitState::RESULT)
            })
            .collect())
    }

    /// One best common ancestor of the two commits, `None` if their histories are disjoint
    pub fn find_best_common_ancestor(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let common_ancestors = self
            .find_common_ancestors(source_commit_id, &HashSet::from([target_commit_id]))?
            .into_keys()
            .collect::<HashSet<_>>();

        if common_ancestors.is_empty() {
            return Ok(None);
        }

        let mut redundant_ancestors = HashSet::<ObjectId>::new();
        for commit in &common_ancestors {
            if redundant_ancestors.contains(commit) {
                continue;
            }

            let others = common_ancestors
                .iter()
                .filter(|other| *other != commit && !redundant_ancestors.contains(*other))
                .collect::<HashSet<_>>();
            if others.is_empty() {
                continue;
            }
            let common_states = self.reachability(commit, &others)?;

            // reached from another candidate: `commit` is below it
            if common_states
                .get(commit)
                .is_some_and(|state| state.contains(VisitState::VISITED_FROM_TARGET))
            {
                redundant_ancestors.insert(commit.clone());
            }

            for other in others {
                if common_states
                    .get(other)
                    .is_some_and(|state| state.contains(VisitState::VISITED_FROM_SOURCE))
                {
                    redundant_ancestors.insert(other.clone());
                }
            }
        }

        let mut best_common_ancestors = Vec::new();
        for commit in common_ancestors {
            if !redundant_ancestors.contains(&commit) {
                let timestamp = (self.commit_loader)(&commit)?.timestamp;
                best_common_ancestors.push((timestamp, commit));
            }
        }
        best_common_ancestors
            .sort_by(|(a_time, a_oid), (b_time, b_oid)| b_time.cmp(a_time).then(a_oid.cmp(b_oid)));

        let best = best_common_ancestors.into_iter().next().map(|(_, oid)| oid);
        tracing::debug!(
            source = %source_commit_id,
            target = %target_commit_id,
            base = ?best,
            "found merge base"
        );

        Ok(best)
    }

    /// Plain flag propagation from `source` and `targets` without staling
    fn reachability(
        &self,
        source_commit_id: &ObjectId,
        target_commit_ids: &HashSet<&ObjectId>,
    ) -> anyhow::Result<HashMap<ObjectId, VisitState>> {
        let mut states = HashMap::<ObjectId, VisitState>::new();
        let mut stack = Vec::new();

        // the start commits only count as reached when a path leads back to them
        let starts = std::iter::once((source_commit_id, VisitState::VISITED_FROM_SOURCE)).chain(
            target_commit_ids
                .iter()
                .map(|&oid| (oid, VisitState::VISITED_FROM_TARGET)),
        );
        for (start, flag) in starts {
            for parent_id in (self.commit_loader)(start)?.parents {
                stack.push((parent_id, flag));
            }
        }

        while let Some((commit_id, flag)) = stack.pop() {
            let state = states.get(&commit_id).copied().unwrap_or(VisitState::NONE);
            if state.contains(flag) {
                continue;
            }
            states.insert(commit_id.clone(), state | flag);

            for parent_id in (self.commit_loader)(&commit_id)?.parents {
                stack.push((parent_id, flag));
            }
        }

        Ok(states)
    }
}
