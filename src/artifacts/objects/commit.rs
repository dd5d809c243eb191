//! Commit object
//!
//! A commit is an immutable snapshot of the whole working directory: it records
//! every tracked file name with its blob id, not a diff against its parent. It
//! also carries zero (root), one, or two (merge) parents, a timestamp and a
//! message. The id is computed over exactly these fields; branch tags are
//! stored beside the commit and never take part in its identity.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! date <unix-seconds> <timezone>
//! file <blob-sha> <name>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::io::{BufRead, Read};

/// Message of the sentinel root commit every repository starts from
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// File name -> blob id of a snapshot
pub type FileSet = BTreeMap<String, ObjectId>;

/// Slim representation of a commit
///
/// Contains only what the merge base search needs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for the root commit, two for merge commits)
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    message: String,
    files: FileSet,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        message: String,
        files: FileSet,
    ) -> Self {
        Commit {
            parents,
            timestamp,
            message,
            files,
        }
    }

    /// The sentinel root commit: no parents, epoch timestamp, fixed message
    pub fn root() -> Self {
        let epoch = DateTime::UNIX_EPOCH.fixed_offset();

        Commit::new(vec![], epoch, ROOT_COMMIT_MESSAGE.to_string(), FileSet::new())
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// First parent, the one `log` follows
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn file(&self, name: &str) -> Option<&ObjectId> {
        self.files.get(name)
    }

    pub fn tracks(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Format timestamp in human-readable form, like "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    fn parse_date(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        let (seconds, timezone) = value
            .split_once(' ')
            .context("Invalid commit object: malformed date line")?;
        let seconds = seconds
            .parse::<i64>()
            .context("Invalid commit object: invalid timestamp")?;
        let offset = DateTime::parse_from_str(
            &format!("1970-01-01 00:00:00 {timezone}"),
            "%Y-%m-%d %H:%M:%S %z",
        )
        .context("Invalid commit object: invalid timezone")?
        .offset()
        .to_owned();

        DateTime::from_timestamp(seconds, 0)
            .map(|utc| utc.with_timezone(&offset))
            .context("Invalid commit object: timestamp out of range")
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        for parent in &self.parents {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        object_content.push(format!(
            "date {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (name, oid) in &self.files {
            object_content.push(format!("file {} {}", oid.as_ref(), name));
        }
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let object_content = object_content.join("\n");

        Ok(frame(self.object_type(), object_content.as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (header, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut files = FileSet::new();

        for line in header.lines() {
            let (field, value) = line
                .split_once(' ')
                .with_context(|| format!("Invalid commit object: malformed line {line:?}"))?;

            match field {
                "parent" => parents.push(ObjectId::try_parse(value.to_string())?),
                "date" => timestamp = Some(Self::parse_date(value)?),
                "file" => {
                    let (oid, name) = value
                        .split_once(' ')
                        .context("Invalid commit object: malformed file line")?;
                    files.insert(name.to_string(), ObjectId::try_parse(oid.to_string())?);
                }
                _ => anyhow::bail!("Invalid commit object: unknown field {field}"),
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing date line")?;

        Ok(Self::new(parents, timestamp, message.to_string(), files))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn restore(commit: &Commit) -> Commit {
        let mut reader = Cursor::new(commit.serialize().unwrap());
        ObjectType::parse_object_type(&mut reader).unwrap();
        Commit::deserialize(reader).unwrap()
    }

    #[test]
    fn root_commit_is_the_same_in_every_repository() {
        let root = Commit::root();

        assert!(root.parents().is_empty());
        assert_eq!(root.timestamp().timestamp(), 0);
        assert_eq!(root.message(), ROOT_COMMIT_MESSAGE);
        assert_eq!(
            root.object_id().unwrap(),
            Commit::root().object_id().unwrap()
        );
    }

    #[test]
    fn rehydrated_commit_keeps_its_identity() {
        let timestamp =
            DateTime::parse_from_str("2023-01-01 12:00:00 +0200", "%Y-%m-%d %H:%M:%S %z").unwrap();
        let files = FileSet::from([
            ("a.txt".to_string(), oid('a')),
            ("dir/with space.txt".to_string(), oid('b')),
        ]);
        let commit = Commit::new(
            vec![oid('1'), oid('2')],
            timestamp,
            "multi\nline message\n\nwith blank line".to_string(),
            files,
        );

        let restored = restore(&commit);

        assert_eq!(restored, commit);
        assert_eq!(restored.object_id().unwrap(), commit.object_id().unwrap());
        assert_eq!(restored.parents().len(), 2);
        assert_eq!(restored.parent(), Some(&oid('1')));
    }

    #[test]
    fn identity_changes_with_any_identity_field() {
        let epoch = Commit::root().timestamp();
        let base = Commit::new(vec![oid('1')], epoch, "m".into(), FileSet::new());
        let other_message = Commit::new(vec![oid('1')], epoch, "n".into(), FileSet::new());
        let other_files = Commit::new(
            vec![oid('1')],
            base.timestamp(),
            "m".into(),
            FileSet::from([("a".to_string(), oid('a'))]),
        );

        let base_id = base.object_id().unwrap();
        assert_ne!(base_id, other_message.object_id().unwrap());
        assert_ne!(base_id, other_files.object_id().unwrap());
    }

    #[test]
    fn readable_timestamp_uses_log_format() {
        assert_eq!(
            Commit::root().readable_timestamp(),
            "Thu Jan 1 00:00:00 1970 +0000"
        );
    }
}
