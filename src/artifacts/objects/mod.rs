//! Stored object types
//!
//! Everything the repository persists by digest is an object:
//!
//! - **Blob**: a file name together with its content
//! - **Commit**: a full snapshot (file name -> blob id) with parents, timestamp and message
//!
//! All objects share the framing `<type> <size>\0<payload>` and their id is the
//! SHA-1 digest of exactly those bytes.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated form used in human-facing output
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
