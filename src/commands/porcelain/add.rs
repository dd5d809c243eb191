use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Object;

impl Repository {
    pub async fn add(&mut self, name: &str) -> anyhow::Result<()> {
        let name = Workspace::normalize(name)?;
        let name = name.as_str();
        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        let blob = self.workspace().parse_blob(name)?;
        let blob_id = blob.object_id()?;
        let (_, head) = self.head_commit()?;

        if head.file(name) == Some(&blob_id) {
            // identical to the committed version: nothing to stage, nothing to remove
            tracing::debug!(file = name, "file matches head, unstaging");
            index.unstage(name);
        } else {
            self.database().store(&blob)?;
            index.stage_addition(name, blob_id);
        }

        if index.is_changed() {
            index.write_updates()?;
        }

        Ok(())
    }
}
