// Regression tests for the combinatoria binary.
// Requires: assert_cmd, predicates, tempfile crates in [dev-dependencies]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const SIZES: &str = r#"
combinations:
  - name: Size
    values: [Small, Medium, Large]
  - name: Color
    values:
      - Red
      - { value: Green, filter: "Size==0" }
tests:
  Caret:
    combinations:
      - name: Direction
        values: [Left, Right]
"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn combinatoria() -> Command {
    let mut cmd = Command::cargo_bin("combinatoria").unwrap();
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_counts_accepted_combinations() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "sizes.yaml", SIZES);

    combinatoria()
        .arg("count")
        .arg(&file)
        .assert()
        .success()
        .stdout("4\n");

    combinatoria()
        .args(["count", "--test", "Caret"])
        .arg(&file)
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn cli_lists_combinations_as_text() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "sizes.yaml", SIZES);

    combinatoria()
        .arg("list")
        .arg(&file)
        .assert()
        .success()
        .stdout(
            contains("Combination 4")
                .and(contains("Size: [Small]\nColor: [Green]"))
                .and(contains("Combination 5").not()),
        );
}

#[test]
fn cli_lists_combinations_as_json() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "sizes.yaml", SIZES);

    let output = combinatoria()
        .args(["list", "--format", "json"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[3]["Color"], "Green");
    assert_eq!(items[3]["Size"], "Small");
}

#[test]
fn cli_reports_miette_diagnostics_on_bad_filter() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "bad.yaml",
        "combinations:\n  - name: A\n    values:\n      - { value: x, filter: \"A==0 AND\" }\n",
    );

    combinatoria()
        .arg("list")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("combinatoria::syntax").and(contains("right-hand operand")));
}

#[test]
fn cli_check_walks_directories() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "good.yaml", SIZES);
    fs::create_dir(dir.path().join("nested")).unwrap();
    write_file(
        &dir,
        "nested/unknown.yml",
        "tests:\n  T:\n    combinations:\n      - name: A\n        values:\n          - { value: x, filter: \"Z==0\" }\n",
    );
    write_file(&dir, "notes.txt", "not a combination file");

    combinatoria()
        .arg("check")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(
            contains("combinatoria::unknown_dimension")
                .and(contains("unknown.yml"))
                .and(contains("2 files checked, 1 failed")),
        );

    combinatoria()
        .arg("check")
        .arg(dir.path().join("good.yaml"))
        .assert()
        .success()
        .stderr(contains("1 files checked, 0 failed"));
}

#[test]
fn cli_missing_test_block_is_load_error() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "sizes.yaml", SIZES);

    combinatoria()
        .args(["count", "--test", "Nope"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("combinatoria::load").and(contains("declared tests: Caret")));
}
