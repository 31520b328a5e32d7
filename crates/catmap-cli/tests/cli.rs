//! End-to-end smoke tests for the `cm` binary against a temp project dir.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn cm(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cm").expect("cm binary builds");
    cmd.current_dir(dir).env("FORMAT", "text");
    cmd
}

#[test]
fn init_creates_skeleton() {
    let dir = tempfile::tempdir().unwrap();

    cm(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized catmap project"));

    assert!(dir.path().join(".catmap/config.toml").exists());
    assert!(dir.path().join(".catmap/catmap.db").exists());

    // Re-running without --force refuses.
    cm(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn import_assign_status_flow() {
    let dir = tempfile::tempdir().unwrap();
    cm(dir.path()).arg("init").assert().success();

    let list = dir.path().join("categories.txt");
    std::fs::write(&list, "Coffee Shops\nBakeries\nRent\n\nCoffee Shops\n").unwrap();

    cm(dir.path())
        .args(["import", "categories.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 new raw categories"));

    cm(dir.path())
        .args(["target", "add", "Food"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added target category Food"));

    cm(dir.path())
        .args(["assign", "Coffee Shops", "Bakeries", "--target", "Food"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 categories linked to Food"));

    cm(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Food").and(predicate::str::contains("Rent")));

    // Assigning again is idempotent at the board level.
    cm(dir.path())
        .args(["assign", "Coffee Shops", "--target", "Food"])
        .assert()
        .success();
}

#[test]
fn assign_rejects_unknown_raw_category() {
    let dir = tempfile::tempdir().unwrap();
    cm(dir.path()).arg("init").assert().success();
    cm(dir.path())
        .args(["target", "add", "Food"])
        .assert()
        .success();

    cm(dir.path())
        .args(["assign", "Ghost", "--target", "Food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown raw categories: Ghost"));
}

#[test]
fn status_json_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    cm(dir.path()).arg("init").assert().success();

    let list = dir.path().join("cats.txt");
    std::fs::write(&list, "Coffee\n").unwrap();
    cm(dir.path()).args(["import", "cats.txt"]).assert().success();

    let output = cm(dir.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["unmapped"][0], "Coffee");
    assert!(parsed["targets"].as_array().unwrap().is_empty());
}

#[test]
fn target_remove_frees_mappings() {
    let dir = tempfile::tempdir().unwrap();
    cm(dir.path()).arg("init").assert().success();

    let list = dir.path().join("cats.txt");
    std::fs::write(&list, "Coffee\n").unwrap();
    cm(dir.path()).args(["import", "cats.txt"]).assert().success();
    cm(dir.path())
        .args(["target", "add", "Food"])
        .assert()
        .success();
    cm(dir.path())
        .args(["assign", "Coffee", "--target", "Food"])
        .assert()
        .success();

    cm(dir.path())
        .args(["target", "remove", "Food"])
        .assert()
        .success();

    // The raw category is back in the unmapped pool.
    cm(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coffee"));

    cm(dir.path())
        .args(["target", "remove", "Food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no target category named 'Food'"));
}
