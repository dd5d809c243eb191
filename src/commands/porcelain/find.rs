use crate::areas::repository::Repository;
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    /// Print the id of every commit whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        let matches = self.commits().find_by_message(message)?;
        if matches.is_empty() {
            return Err(RepositoryError::NoCommitWithMessage.into());
        }

        for commit_oid in matches {
            writeln!(self.writer(), "{commit_oid}")?;
        }

        Ok(())
    }
}
