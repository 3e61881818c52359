#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("anwesenheiten-cli").unwrap();
    cmd.env_remove("ANWESENHEITEN_TOKEN");
    cmd
}

#[test]
fn export_without_token_fails_before_network() {
    cli()
        .args([
            "export",
            "--from",
            "2025-11-02",
            "--to",
            "2026-03-01",
            // adresse injoignable : l'erreur doit venir de la validation
            "--base-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing credential"));
}

#[test]
fn export_rejects_inverted_range() {
    cli()
        .args(["export", "--from", "2026-03-01", "--to", "2025-11-02"])
        .env("ANWESENHEITEN_TOKEN", "secret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date range"));
}

#[test]
fn columns_lists_default_layout() {
    cli()
        .arg("columns")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Date\nEvent\nPredigt\nLobpreisleitung\nModeration\n"))
        .stdout(predicate::str::contains("Programm: Abendmahl abwaschen\nTechnik: Video\n"))
        .stdout(predicate::str::ends_with("Technik: Licht\n"));
}

#[test]
fn init_config_round_trips_through_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("anwesenheiten.json");

    cli()
        .args(["init-config", "--out"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    cli()
        .arg("--config")
        .arg(&path)
        .arg("columns")
        .assert()
        .success()
        .stdout(predicate::str::contains("Technik: Beamer"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{ "groups": [] }"#).unwrap();

    cli()
        .arg("--config")
        .arg(&path)
        .arg("columns")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one group"));
}
