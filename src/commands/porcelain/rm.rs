use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::errors::RepositoryError;

impl Repository {
    pub async fn rm(&mut self, name: &str) -> anyhow::Result<()> {
        // nothing outside the working files can be staged or tracked
        let name = Workspace::normalize(name).map_err(|_| RepositoryError::NothingToRemove)?;
        let name = name.as_str();
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        let (_, head) = self.head_commit()?;
        let is_staged = index.is_staged_for_addition(name);
        let is_tracked = head.tracks(name);

        if !is_staged && !is_tracked {
            return Err(RepositoryError::NothingToRemove.into());
        }

        index.unstage(name);
        if is_tracked {
            self.workspace().remove_file(name)?;
            index.stage_removal(name);
        }

        if index.is_changed() {
            index.write_updates()?;
        }

        Ok(())
    }
}
