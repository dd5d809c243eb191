use crate::common::command::{
    branch_head, commit_file, current_branch, init_repository_dir, run_gitlet_command,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use rstest::rstest;

mod common;

#[rstest]
fn new_branches_point_at_the_current_head(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["branch", "other"]).assert().success().stdout("");

    assert_eq!(branch_head(dir, "other"), branch_head(dir, "master"));
    assert_eq!(current_branch(dir), "master");
}

#[rstest]
fn duplicate_branches_are_rejected(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["branch", "other"]).assert().success();

    run_gitlet_command(dir, &["branch", "other"])
        .assert()
        .success()
        .stdout("A branch with that name already exists.\n");
}

#[rstest]
#[case::double_dot("a..b")]
#[case::leading_dot(".hidden")]
#[case::lock_suffix("topic.lock")]
#[case::trailing_slash("topic/")]
fn invalid_branch_names_are_rejected(init_repository_dir: TempDir, #[case] name: &str) {
    run_gitlet_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .success()
        .stdout(format!("Invalid branch name: {name}\n"));
}

#[rstest]
fn branches_can_be_removed_except_the_current_one(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["branch", "b1"]).assert().success();

    run_gitlet_command(dir, &["rm-branch", "b1"]).assert().success().stdout("");
    assert!(!dir.join(".gitlet").join("branches").join("b1").exists());

    run_gitlet_command(dir, &["rm-branch", "master"])
        .assert()
        .success()
        .stdout("Cannot remove the current branch.\n");
    run_gitlet_command(dir, &["rm-branch", "b1"])
        .assert()
        .success()
        .stdout("A branch with that name does not exist.\n");

    let log = common::command::stdout_of(run_gitlet_command(dir, &["log"]));
    assert!(!log.contains("b1"));
}

#[rstest]
fn checkout_rewrites_the_working_directory(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["branch", "other"]).assert().success();
    commit_file(dir, "a.txt", "master version\n", "edit a");
    commit_file(dir, "only_master.txt", "m\n", "add file");

    run_gitlet_command(dir, &["checkout", "other"]).assert().success().stdout("");

    assert_eq!(current_branch(dir), "other");
    assert_eq!(read_file(&dir.join("a.txt")), "hello\n");
    assert!(!dir.join("only_master.txt").exists());

    run_gitlet_command(dir, &["checkout", "master"]).assert().success();
    assert_eq!(read_file(&dir.join("a.txt")), "master version\n");
    assert_eq!(read_file(&dir.join("only_master.txt")), "m\n");
}

#[rstest]
fn checking_out_the_current_branch_changes_nothing(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("a.txt"), "dirty\n".to_string()));

    run_gitlet_command(dir, &["checkout", "master"])
        .assert()
        .success()
        .stdout("No need to checkout the current branch.\n");
    run_gitlet_command(dir, &["checkout", "master"])
        .assert()
        .success()
        .stdout("No need to checkout the current branch.\n");

    assert_eq!(read_file(&dir.join("a.txt")), "dirty\n");
}

#[rstest]
fn checking_out_a_missing_branch_is_reported(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["checkout", "nowhere"])
        .assert()
        .success()
        .stdout("A branch with that name does not exist.\n");
}

#[rstest]
fn untracked_files_block_checkout(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["branch", "other"]).assert().success();
    run_gitlet_command(dir, &["checkout", "other"]).assert().success();
    commit_file(dir, "n.txt", "from other\n", "add n");
    run_gitlet_command(dir, &["checkout", "master"]).assert().success();
    assert!(!dir.join("n.txt").exists());

    write_file(FileSpec::new(dir.join("n.txt"), "precious\n".to_string()));

    run_gitlet_command(dir, &["checkout", "other"])
        .assert()
        .success()
        .stdout(
            "There is an untracked file in the way; delete it, or add and commit it first.\n",
        );

    assert_eq!(current_branch(dir), "master");
    assert_eq!(read_file(&dir.join("n.txt")), "precious\n");
}

#[rstest]
fn checkout_clears_the_staging_area(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["branch", "other"]).assert().success();
    common::command::stage_file(dir, "s.txt", "staged\n");

    run_gitlet_command(dir, &["checkout", "other"]).assert().success();

    let status = common::command::stdout_of(run_gitlet_command(dir, &["status"]));
    assert!(status.contains("=== Staged Files ===\n\n"));
    assert!(status.ends_with("=== Untracked Files ===\ns.txt\n\n"));
}
