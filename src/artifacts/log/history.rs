use crate::areas::commits::CommitStore;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::{BTreeSet, VecDeque};

/// First-parent history, newest first
///
/// The second parent of a merge commit is never followed. A commit that fails
/// to load ends the walk with that error.
#[derive(new)]
pub struct History<'r> {
    commits: &'r CommitStore,
    #[new(into)]
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for History<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.commits.restore(&commit_oid) {
            Ok(commit) => {
                // move to the first parent for the next iteration
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok((commit_oid, commit)))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

/// Every commit reachable from `start` through any parent, `start` included
pub fn ancestry(commits: &CommitStore, start: &ObjectId) -> anyhow::Result<BTreeSet<ObjectId>> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(oid) = queue.pop_front() {
        if seen.contains(&oid) {
            continue;
        }
        let commit = commits.restore(&oid)?;
        queue.extend(commit.parents().iter().cloned());
        seen.insert(oid);
    }

    Ok(seen)
}
