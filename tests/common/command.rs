use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// Timestamp every test commit is made with, `%Y-%m-%d %H:%M:%S %z`
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

/// How `COMMIT_DATE` reads in `log`
pub const LOG_DATE: &str = "Sun Jan 1 12:00:00 2023 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository on `master` with `a.txt` ("hello") committed as "first"
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("a.txt"),
        "hello\n".to_string(),
    ));
    run_gitlet_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    gitlet_commit(repository_dir.path(), "first")
        .assert()
        .success();

    repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.envs(vec![("NO_PAGER", "1"), ("GITLET_COMMIT_DATE", COMMIT_DATE)]);
    cmd.env_remove("GITLET_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitlet_commit(dir: &Path, message: &str) -> Command {
    run_gitlet_command(dir, &["commit", message])
}

/// Write `content` to `name` and stage it
pub fn stage_file(dir: &Path, name: &str, content: &str) {
    write_file(FileSpec::new(dir.join(name), content.to_string()));
    run_gitlet_command(dir, &["add", name]).assert().success();
}

/// Write, stage and commit a single file
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    stage_file(dir, name, content);
    gitlet_commit(dir, message).assert().success();
}

pub fn stdout_of(mut cmd: Command) -> String {
    let output = cmd.output().expect("Failed to run gitlet");
    String::from_utf8(output.stdout).expect("stdout is not utf-8")
}

/// Every commit id a branch has pointed to, oldest first
pub fn branch_history(dir: &Path, branch: &str) -> Vec<String> {
    let branch_path = dir.join(".gitlet").join("branches").join(branch);
    std::fs::read_to_string(branch_path)
        .expect("Failed to read branch file")
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn branch_head(dir: &Path, branch: &str) -> String {
    branch_history(dir, branch)
        .pop()
        .expect("branch history is empty")
}

pub fn current_branch(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".gitlet").join("HEAD"))
        .expect("Failed to read HEAD")
        .trim()
        .to_string()
}

pub fn head_commit_id(dir: &Path) -> String {
    branch_head(dir, &current_branch(dir))
}
