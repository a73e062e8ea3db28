use assert_cmd::Command;
use assert_fs::prelude::*;

use predicates::prelude::*;
use predicates::str::contains;
use serial_test::serial;

const LIBRARY_YAML: &str = r#"books:
  - title: Dune
    author: Frank Herbert
  - title: Middlemarch
    author: George Eliot
notes:
  - content: Fear is the mind-killer
"#;

/// `marginalia` with a temporary home so no real config or library leaks in
fn marginalia_cmd(home: &assert_fs::TempDir) -> Command {
  let mut cmd = Command::cargo_bin("marginalia").expect("binary exists");
  cmd.env("HOME", home.path());
  cmd.env_remove("MARGINALIA_LIBRARY");
  cmd.env_remove("MARGINALIA_CONFIG");
  cmd.env_remove("RUST_LOG");
  cmd.env("NO_COLOR", "1");
  cmd.current_dir(home.path());
  cmd
}

fn write_library(home: &assert_fs::TempDir) -> assert_fs::fixture::ChildPath {
  let library = home.child("library.yaml");
  library.write_str(LIBRARY_YAML).unwrap();
  library
}

#[test]
#[serial]
fn test_classify_note_and_add_book() {
  let home = assert_fs::TempDir::new().unwrap();

  marginalia_cmd(&home)
    .args(["classify", "note:", "buy", "milk"])
    .assert()
    .success()
    .stdout(contains("create_note").and(contains("buy milk")));

  marginalia_cmd(&home)
    .args(["classify", "--json", "add book Dune"])
    .assert()
    .success()
    .stdout(contains(r#""kind": "add_book""#).and(contains(r#""query": "Dune""#)));

  home.close().unwrap();
}

#[test]
#[serial]
fn test_classify_against_library_file() {
  let home = assert_fs::TempDir::new().unwrap();
  let library = write_library(&home);

  marginalia_cmd(&home)
    .args(["classify", "--library"])
    .arg(library.path())
    .args(["--json", "middlemarch"])
    .assert()
    .success()
    .stdout(contains(r#""kind": "existing_book""#).and(contains("George Eliot")));

  home.close().unwrap();
}

#[test]
#[serial]
fn test_library_env_var() {
  let home = assert_fs::TempDir::new().unwrap();
  let library = write_library(&home);

  marginalia_cmd(&home)
    .env("MARGINALIA_LIBRARY", library.path())
    .args(["classify", "find", "mind-killer"])
    .assert()
    .success()
    .stdout(contains("existing_note"));

  home.close().unwrap();
}

#[test]
#[serial]
fn test_unknown_and_missing_library() {
  let home = assert_fs::TempDir::new().unwrap();

  marginalia_cmd(&home)
    .args(["classify", "zzz"])
    .assert()
    .success()
    .stdout(contains("No recognizable command"));

  marginalia_cmd(&home)
    .args(["classify", "--library", "missing.yaml", "zzz"])
    .assert()
    .failure()
    .stderr(contains("Failed to load library snapshot"));

  home.close().unwrap();
}

#[test]
#[serial]
fn test_quote_command() {
  let home = assert_fs::TempDir::new().unwrap();

  marginalia_cmd(&home)
    .args(["quote", r#""Hello world" - Jane Doe, My Book, p. 42"#])
    .assert()
    .success()
    .stdout(
      contains("Hello world")
        .and(contains("Jane Doe"))
        .and(contains("author=Jane Doe|||book=My Book|||page=42")),
    );

  marginalia_cmd(&home)
    .args(["quote", "--json", "\"Unterminated quote"])
    .assert()
    .success()
    .stdout(contains(r#""content": "Unterminated quote""#).and(contains("attribution").not()));

  home.close().unwrap();
}

#[test]
#[serial]
fn test_attribution_encode_decode() {
  let home = assert_fs::TempDir::new().unwrap();

  marginalia_cmd(&home)
    .args(["attribution", "encode", "--author", "Jane Doe", "--page", "42"])
    .assert()
    .success()
    .stdout(contains("author=Jane Doe|||page=42"));

  marginalia_cmd(&home)
    .args(["attribution", "decode", "--json", "author=Jane Doe|||book=My Book|||page=42"])
    .assert()
    .success()
    .stdout(contains(r#""book": "My Book""#).and(contains(r#""page": 42"#)));

  marginalia_cmd(&home).args(["attribution", "encode"]).assert().failure();

  home.close().unwrap();
}

#[test]
#[serial]
fn test_watch_streams_json_lines() {
  let home = assert_fs::TempDir::new().unwrap();
  let library = write_library(&home);

  let output = marginalia_cmd(&home)
    .args(["watch", "--library"])
    .arg(library.path())
    .write_stdin("Du\nDun\nDune\nnote: spice\n")
    .output()
    .unwrap();

  assert!(output.status.success());
  let stdout = String::from_utf8(output.stdout).unwrap();
  let lines: Vec<&str> = stdout.lines().collect();
  assert_eq!(lines.len(), 4);
  assert!(lines[..3].iter().all(|line| line.contains(r#""kind":"existing_book""#)));
  assert!(lines[3].contains(r#""kind":"create_note""#));

  home.close().unwrap();
}

#[test]
#[serial]
fn test_prefixes_from_config_file() {
  let home = assert_fs::TempDir::new().unwrap();
  home.child(".marginalia.yaml").write_str("note_prefixes:\n  - \"notiz:\"\n").unwrap();

  marginalia_cmd(&home)
    .args(["prefixes"])
    .assert()
    .success()
    .stdout(contains("\"notiz:\"").and(contains("\"add book \"")));

  marginalia_cmd(&home)
    .args(["classify", "notiz: Kapitel drei"])
    .assert()
    .success()
    .stdout(contains("create_note"));

  home.close().unwrap();
}

#[test]
#[serial]
fn test_prefixes_write_and_invalid_config() {
  let home = assert_fs::TempDir::new().unwrap();
  let written = home.child("out").child("config.json");

  marginalia_cmd(&home)
    .args(["prefixes", "--write"])
    .arg(written.path())
    .assert()
    .success();
  written.assert(predicate::str::contains("note_prefixes"));

  let bad = home.child("bad.yaml");
  bad.write_str("search_prefixes:\n  - \"\"\n").unwrap();
  marginalia_cmd(&home)
    .args(["classify", "--config"])
    .arg(bad.path())
    .arg("search x")
    .assert()
    .failure()
    .stderr(contains("search_prefixes[0] is empty"));

  home.close().unwrap();
}

#[test]
#[serial]
fn test_library_listing() {
  let home = assert_fs::TempDir::new().unwrap();

  marginalia_cmd(&home)
    .args(["library"])
    .assert()
    .success()
    .stdout(contains("Library is empty"));

  let library = write_library(&home);
  marginalia_cmd(&home)
    .args(["library", "--library"])
    .arg(library.path())
    .assert()
    .success()
    .stdout(contains("Dune").and(contains("Notes (1)")));

  home.close().unwrap();
}
