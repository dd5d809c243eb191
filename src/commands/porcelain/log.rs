use crate::areas::repository::Repository;
use crate::artifacts::log::history::History;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// First-parent history of the current head, newest first
    pub fn log(&self) -> anyhow::Result<()> {
        let head_oid = self.refs().read_head()?;

        for entry in History::new(self.commits(), head_oid) {
            let (commit_oid, commit) = entry?;
            self.display_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    /// Every commit ever made, newest first
    pub fn global_log(&self) -> anyhow::Result<()> {
        let mut commits = self
            .commits()
            .list()?
            .into_iter()
            .map(|oid| {
                let commit = self.commits().restore(&oid)?;
                Ok((oid, commit))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        commits.sort_by(|(a_oid, a), (b_oid, b)| {
            b.timestamp()
                .cmp(&a.timestamp())
                .then_with(|| a_oid.cmp(b_oid))
        });

        for (commit_oid, commit) in &commits {
            self.display_commit(commit_oid, commit)?;
        }

        Ok(())
    }

    fn display_commit(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "===")?;
        writeln!(
            self.writer(),
            "{}{}",
            format!("commit {commit_oid}").yellow(),
            self.commit_decoration(commit_oid)?
        )?;
        if let [first, second, ..] = commit.parents() {
            writeln!(
                self.writer(),
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(self.writer(), "Date: {}", commit.readable_timestamp())?;
        writeln!(self.writer(), "{}", commit.message())?;
        writeln!(self.writer())?;

        Ok(())
    }

    fn commit_decoration(&self, commit_oid: &ObjectId) -> anyhow::Result<String> {
        let tags = self.commits().branch_tags(commit_oid)?;
        if tags.is_empty() {
            return Ok(String::new());
        }

        let current_branch = self.refs().current_branch()?;
        let names = tags
            .iter()
            .map(|tag| {
                if tag == &current_branch {
                    tag.as_ref().cyan().bold().to_string()
                } else {
                    tag.as_ref().green().bold().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(" ({names})"))
    }
}
