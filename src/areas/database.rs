//! Write-once object database
//!
//! Objects are addressed by the SHA-1 digest of their framed bytes and stored
//! zlib-compressed at `<root>/<first-2-hex>/<remaining-38-hex>`. A write goes
//! to a temporary file in the same directory and is renamed into place, so an
//! object file is either absent or complete. There is no update or delete.
//!
//! The same layout backs both the blob store (`.gitlet/blobs`) and the
//! immutable commit records (`.gitlet/commits`).

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store `content` under `name` and return the blob id
    ///
    /// Idempotent: the same (name, content) pair always yields the same id and
    /// is written at most once.
    pub fn put(&self, name: &str, content: Bytes) -> anyhow::Result<ObjectId> {
        self.store(&Blob::new(name.to_string(), content))
    }

    /// Content of the blob with the given id
    pub fn get(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        Ok(self.load_blob(object_id)?.content().clone())
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if object_path.exists() {
            tracing::trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, object.serialize()?)?;
        tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Blob::deserialize(object_reader),
            other => anyhow::bail!("object {object_id} is a {other}, not a blob"),
        }
    }

    /// Read and deserialize an object of a known type
    pub fn load<T: Unpackable>(
        &self,
        object_id: &ObjectId,
        expected: ObjectType,
    ) -> anyhow::Result<T> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        if object_type != expected {
            anyhow::bail!("object {object_id} is a {object_type}, not a {expected}");
        }

        T::deserialize(object_reader)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.is_file() {
            return Err(RepositoryError::ObjectNotFound {
                oid: object_id.to_string(),
            }
            .into());
        }

        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    /// Copy the stored (compressed) object file into another database unless it is already there
    pub fn copy_to(&self, object_id: &ObjectId, other: &Database) -> anyhow::Result<bool> {
        if other.contains(object_id) {
            return Ok(false);
        }

        let source = self.path.join(object_id.to_path());
        let target = other.path.join(object_id.to_path());
        let target_dir = target
            .parent()
            .context(format!("Invalid object path {}", target.display()))?;
        std::fs::create_dir_all(target_dir)
            .context(format!("Unable to create object directory {}", target_dir.display()))?;

        let temp_path = target_dir.join(Self::generate_temp_name());
        std::fs::copy(&source, &temp_path)
            .context(format!("Unable to copy object file {}", source.display()))?;
        std::fs::rename(&temp_path, &target)
            .context(format!("Unable to rename object file to {}", target.display()))?;

        Ok(true)
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Every object id in the database, in no particular order
    pub fn list_objects(&self) -> anyhow::Result<Vec<ObjectId>> {
        self.find_objects_by_prefix("")
    }

    /// Find all objects whose id starts with the given prefix.
    ///
    /// For prefixes of 2+ characters only the matching shard directory is
    /// scanned. Non-object files (temporaries, side files) are skipped.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.len() > OBJECT_ID_LENGTH || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }

        let shard_dirs = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8)
                .map(|i| format!("{:02x}", i))
                .filter(|dir_name| dir_name.starts_with(&prefix))
                .collect()
        };

        let mut matches = Vec::new();
        for dir_name in shard_dirs {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let full_oid = format!("{}{}", dir_name, entry.file_name().to_string_lossy());

                if full_oid.starts_with(&prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }
        }

        Ok(matches)
    }
}
