//! Blob object
//!
//! A blob is a file name together with the file's bytes. Both take part in the
//! digest, so the same content staged under two names yields two blobs, while
//! restaging an unchanged file always yields the blob that already exists.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<name>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Read};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// Working-directory relative file name, `/` separated
    name: String,
    content: Bytes,
}

impl Blob {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut payload = Vec::with_capacity(self.name.len() + 1 + self.content.len());
        payload.extend_from_slice(self.name.as_bytes());
        payload.push(b'\0');
        payload.extend_from_slice(&self.content);

        Ok(frame(self.object_type(), &payload))
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut name = Vec::new();
        reader
            .read_until(b'\0', &mut name)
            .context("Invalid blob object: missing name")?;
        if name.pop() != Some(b'\0') {
            anyhow::bail!("Invalid blob object: unterminated name");
        }

        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(String::from_utf8(name)?, Bytes::from(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn identity_depends_on_name_and_content() {
        let hello = Blob::new("a.txt".into(), Bytes::from_static(b"hello"));
        let same = Blob::new("a.txt".into(), Bytes::from_static(b"hello"));
        let renamed = Blob::new("b.txt".into(), Bytes::from_static(b"hello"));

        assert_eq!(hello.object_id().unwrap(), same.object_id().unwrap());
        assert_ne!(hello.object_id().unwrap(), renamed.object_id().unwrap());
    }

    #[test]
    fn binary_content_survives_serialization() {
        let blob = Blob::new("bin.dat".into(), Bytes::from_static(b"\0\x01\xff\0tail"));
        let mut reader = Cursor::new(blob.serialize().unwrap());

        let object_type = ObjectType::parse_object_type(&mut reader).unwrap();
        let parsed = Blob::deserialize(reader).unwrap();

        assert_eq!(object_type, ObjectType::Blob);
        assert_eq!(parsed, blob);
    }
}
