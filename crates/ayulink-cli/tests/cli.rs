use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn ayulink(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ayulink").unwrap();
    cmd.current_dir(dir.path());
    cmd.arg("-c").arg(dir.path().join("config.json"));
    cmd
}

fn init_config(dir: &tempfile::TempDir) {
    ayulink(dir).args(["config", "init"]).assert().success();
}

#[test]
fn test_process_with_mock_engine() {
    let dir = tempfile::tempdir().unwrap();
    init_config(&dir);
    fs::write(dir.path().join("visit.jpg"), b"jpeg bytes").unwrap();

    ayulink(&dir)
        .args(["process", "visit.jpg", "--mock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"file_name\": \"visit.jpg\""))
        .stdout(predicate::str::contains("\"value\": \"Routine Checkup\""));
}

#[test]
fn test_process_csv_output() {
    let dir = tempfile::tempdir().unwrap();
    init_config(&dir);
    fs::write(dir.path().join("visit.jpg"), b"jpeg bytes").unwrap();

    ayulink(&dir)
        .args(["process", "visit.jpg", "--mock", "-f", "csv", "-o", "fields.csv"])
        .assert()
        .success();

    let csv = fs::read_to_string(dir.path().join("fields.csv")).unwrap();
    assert!(csv.starts_with("key,value\n"));
    assert!(csv.contains("Patient Name,John Doe\n"));
    assert!(csv.contains("Prescription,Vitamin D 1000 IU daily\n"));
}

#[test]
fn test_process_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    init_config(&dir);

    ayulink(&dir)
        .args(["process", "nothing.jpg", "--mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_writes_results() {
    let dir = tempfile::tempdir().unwrap();
    init_config(&dir);
    fs::create_dir(dir.path().join("scans")).unwrap();
    fs::write(dir.path().join("scans/a.jpg"), b"a").unwrap();
    fs::write(dir.path().join("scans/b.pdf"), b"b").unwrap();
    fs::write(dir.path().join("scans/notes.docx"), b"c").unwrap();

    ayulink(&dir)
        .args(["batch", "scans/*", "--mock", "-o", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    assert!(dir.path().join("out/a_ocr.json").is_file());
    assert!(dir.path().join("out/b_ocr.json").is_file());
    assert!(!dir.path().join("out/notes_ocr.json").exists());
}

#[test]
fn test_batch_without_matches() {
    let dir = tempfile::tempdir().unwrap();
    init_config(&dir);

    ayulink(&dir)
        .args(["batch", "scans/*.jpg", "--mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_config_get_and_set() {
    let dir = tempfile::tempdir().unwrap();
    init_config(&dir);

    ayulink(&dir)
        .args(["config", "get", "ocr.language"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"eng\""));

    ayulink(&dir)
        .args(["config", "set", "server.port", "8080"])
        .assert()
        .success();

    ayulink(&dir)
        .args(["config", "get", "server.port"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8080"));

    ayulink(&dir)
        .args(["config", "set", "server.nonsense", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key: server.nonsense"));

    ayulink(&dir)
        .args(["config", "set", "server.port", "eighty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for server.port"));

    let saved = fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(saved.contains("\"port\": 8080"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    init_config(&dir);

    ayulink(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
