use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;

#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    /// Present in the working directory, neither tracked by `head` nor staged for addition
    pub fn is_untracked(&self, name: &str, head: &Commit, index: &Index) -> bool {
        self.repository.workspace().exists(name)
            && !head.tracks(name)
            && !index.is_staged_for_addition(name)
    }

    /// Blob id the working file would get if it were staged now
    pub fn working_oid(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        if !self.repository.workspace().exists(name) {
            return Ok(None);
        }

        let blob = self.repository.workspace().parse_blob(name)?;
        Ok(Some(blob.object_id()?))
    }

    pub fn check_against_workspace(
        &self,
        name: &str,
        expected: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        match self.working_oid(name)? {
            None => Ok(Some(WorkspaceChangeType::Deleted)),
            Some(oid) if &oid != expected => Ok(Some(WorkspaceChangeType::Modified)),
            Some(_) => Ok(None),
        }
    }
}
