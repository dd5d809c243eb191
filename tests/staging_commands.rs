use crate::common::command::{
    commit_file, gitlet_commit, init_repository_dir, repository_dir, run_gitlet_command,
    stage_file, stdout_of,
};
use crate::common::file::{FileSpec, write_file, write_generated_files};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

#[rstest]
fn adding_a_missing_file_is_reported(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["add", "missing.txt"])
        .assert()
        .success()
        .stdout("File does not exist.\n");
}

#[rstest]
fn identical_content_is_stored_once(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let blobs_before = common::count_blobs(dir);

    stage_file(dir, "b.txt", "same\n");
    stage_file(dir, "b.txt", "same\n");

    assert_eq!(common::count_blobs(dir), blobs_before + 1);
}

#[rstest]
fn restaging_the_committed_version_unstages_the_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    stage_file(dir, "a.txt", "changed\n");
    stage_file(dir, "a.txt", "hello\n");

    gitlet_commit(dir, "nothing really")
        .assert()
        .success()
        .stdout("No changes added to the commit.\n");
}

#[rstest]
fn removing_an_unknown_file_stages_nothing(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("loose.txt"), "loose\n".to_string()));

    run_gitlet_command(dir, &["rm", "loose.txt"])
        .assert()
        .success()
        .stdout("No reason to remove the file.\n");

    assert!(dir.join("loose.txt").exists());
    gitlet_commit(dir, "after rm")
        .assert()
        .success()
        .stdout("No changes added to the commit.\n");
}

#[rstest]
fn removing_a_staged_file_only_unstages_it(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    stage_file(dir, "b.txt", "new\n");

    run_gitlet_command(dir, &["rm", "b.txt"]).assert().success();

    assert!(dir.join("b.txt").exists());
    gitlet_commit(dir, "after rm")
        .assert()
        .success()
        .stdout("No changes added to the commit.\n");
}

#[rstest]
fn removing_a_tracked_file_deletes_it_and_the_next_commit_drops_it(
    init_repository_dir: TempDir,
) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["rm", "a.txt"]).assert().success();
    assert!(!dir.join("a.txt").exists());

    gitlet_commit(dir, "remove a")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master [0-9a-f]{7}\] remove a\n$").unwrap());

    // a.txt is no longer tracked, so it cannot be removed again
    run_gitlet_command(dir, &["rm", "a.txt"])
        .assert()
        .success()
        .stdout("No reason to remove the file.\n");
}

#[rstest]
fn re_adding_a_removed_file_cancels_the_removal(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["rm", "a.txt"]).assert().success();
    stage_file(dir, "a.txt", "hello\n");

    gitlet_commit(dir, "nothing")
        .assert()
        .success()
        .stdout("No changes added to the commit.\n");
}

#[rstest]
fn blank_messages_are_rejected(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    stage_file(dir, "b.txt", "b\n");

    gitlet_commit(dir, "   ")
        .assert()
        .success()
        .stdout("Please enter a commit message.\n");
}

#[rstest]
fn commits_snapshot_every_staged_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let files = write_generated_files(dir, 3);
    for file in &files {
        let name = file.path.file_name().unwrap().to_string_lossy().to_string();
        run_gitlet_command(dir, &["add", &name]).assert().success();
    }
    gitlet_commit(dir, "generated").assert().success();

    // every generated file is now tracked and unchanged
    let status = stdout_of(run_gitlet_command(dir, &["status"]));
    assert!(status.ends_with(
        "=== Modifications Not Staged For Commit ===\n\n=== Untracked Files ===\n\n"
    ));

    // deleting them all is reported file by file
    for file in &files {
        std::fs::remove_file(&file.path).unwrap();
    }
    let status = stdout_of(run_gitlet_command(dir, &["status"]));
    for file in &files {
        let name = file.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(status.contains(&format!("{name} (deleted)\n")));
    }
}

#[rstest]
fn files_in_subdirectories_are_tracked_by_relative_name(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    commit_file(dir, "nested/deeper/c.txt", "nested\n", "nested file");
    std::fs::remove_dir_all(dir.join("nested")).unwrap();

    run_gitlet_command(dir, &["checkout", "--", "nested/deeper/c.txt"])
        .assert()
        .success();
    assert_eq!(
        std::fs::read_to_string(dir.join("nested").join("deeper").join("c.txt")).unwrap(),
        "nested\n"
    );
}

#[rstest]
fn repository_metadata_cannot_be_staged(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = common::command::head_commit_id(dir);

    run_gitlet_command(dir, &["add", ".gitlet/HEAD"])
        .assert()
        .success()
        .stdout("File does not exist.\n");
    gitlet_commit(dir, "meta")
        .assert()
        .success()
        .stdout("No changes added to the commit.\n");

    commit_file(dir, "b.txt", "b\n", "second");
    run_gitlet_command(dir, &["reset", &first]).assert().success();

    assert!(dir.join(".gitlet").join("HEAD").is_file());
    run_gitlet_command(dir, &["log"]).assert().success();
}

#[rstest]
fn names_outside_the_working_directory_are_rejected(repository_dir: TempDir) {
    let repo = repository_dir.path().join("repo");
    std::fs::create_dir(&repo).unwrap();
    run_gitlet_command(&repo, &["init"]).assert().success();
    write_file(FileSpec::new(
        repository_dir.path().join("victim.txt"),
        "keep\n".to_string(),
    ));

    run_gitlet_command(&repo, &["add", "../victim.txt"])
        .assert()
        .success()
        .stdout("File does not exist.\n");
    run_gitlet_command(&repo, &["rm", "../victim.txt"])
        .assert()
        .success()
        .stdout("No reason to remove the file.\n");
    run_gitlet_command(&repo, &["checkout", "--", "../victim.txt"])
        .assert()
        .success()
        .stdout("File does not exist in that commit.\n");

    assert_eq!(
        std::fs::read_to_string(repository_dir.path().join("victim.txt")).unwrap(),
        "keep\n"
    );
}

#[rstest]
fn dotted_names_are_staged_as_listed(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    commit_file(dir, "./b.txt", "b\n", "add b");

    let status = stdout_of(run_gitlet_command(dir, &["status"]));
    assert!(status.ends_with(
        "=== Modifications Not Staged For Commit ===\n\n=== Untracked Files ===\n\n"
    ));

    run_gitlet_command(dir, &["rm", "./b.txt"]).assert().success();
    assert!(!dir.join("b.txt").exists());
}
