use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    // TODO: Cache the object serialization and ID to avoid recomputing them
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        let oid = hasher.finalize();
        ObjectId::try_parse(format!("{oid:x}"))
    }
}

/// Frame a payload as `<type> <size>\0<payload>`
pub fn frame(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), payload.len());

    let mut object_bytes = Vec::with_capacity(header.len() + payload.len());
    object_bytes.extend_from_slice(header.as_bytes());
    object_bytes.extend_from_slice(payload);

    Bytes::from(object_bytes)
}
