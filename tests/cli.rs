mod common;

use assert_cmd::Command;
use common::Scenario;
use predicates::prelude::*;

fn write_config(scenario: &Scenario) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), scenario.config_toml()).unwrap();
    file
}

#[test]
fn test_json_output() {
    let scenario = Scenario::build();
    let config = write_config(&scenario);

    let output = Command::cargo_bin("gitstat")
        .unwrap()
        .arg("--repo")
        .arg(scenario.repo.path())
        .arg("--config")
        .arg(config.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["name"], "Alice");
    assert_eq!(json[0]["by_window"][0]["lines_inserted"], 3);
    assert_eq!(json[0]["by_window"][1]["window"], "aggregate");
    assert_eq!(json[0]["deliverables"][1], true);
    assert_eq!(json[1]["summary"]["words_inserted"], 50);
}

#[test]
fn test_csv_output() {
    let scenario = Scenario::build();
    let config = write_config(&scenario);

    Command::cargo_bin("gitstat")
        .unwrap()
        .arg("--repo")
        .arg(scenario.repo.path())
        .arg("--config")
        .arg(config.path())
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "name,labels,window,since,until,lines_inserted,lines_deleted,words_inserted,words_deleted,deliverable",
        ))
        .stdout(predicate::str::contains(
            "Alice,team-a,0,2021-03-01T00:00:00+09:00,2021-03-10T00:00:00+09:00,3,0,6,0,false",
        ))
        .stdout(predicate::str::contains("Bob,,1,"));
}

#[test]
fn test_unsupported_format_fails() {
    let scenario = Scenario::build();
    let config = write_config(&scenario);

    Command::cargo_bin("gitstat")
        .unwrap()
        .arg("--repo")
        .arg(scenario.repo.path())
        .arg("--config")
        .arg(config.path())
        .args(["--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported output format"));
}

#[test]
fn test_missing_config_fails() {
    let scenario = Scenario::build();

    Command::cargo_bin("gitstat")
        .unwrap()
        .arg("--repo")
        .arg(scenario.repo.path())
        .arg("--config")
        .arg(scenario.repo.path().join("nope.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
