#![allow(dead_code)]

pub mod command;
pub mod file;

/// Number of commit records stored in a repository, tag side files excluded
pub fn count_commit_records(dir: &std::path::Path) -> usize {
    count_objects(&dir.join(".gitlet").join("commits"))
}

/// Number of blobs stored in a repository
pub fn count_blobs(dir: &std::path::Path) -> usize {
    count_objects(&dir.join(".gitlet").join("blobs"))
}

fn count_objects(store: &std::path::Path) -> usize {
    walkdir::WalkDir::new(store)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_none())
        .count()
}
