use std::error::Error;
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Result<Command, Box<dyn Error>> {
    Ok(Command::cargo_bin("voltbill")?)
}

#[test]
fn language_defaults_to_english() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let state = dir.path().join("storage.json");
    cli()?
        .args(["--state", state.to_str().unwrap(), "language", "get"])
        .assert()
        .success()
        .stdout("en\n");
    assert!(!state.exists());
    Ok(())
}

#[test]
fn language_set_persists_choice() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let state = dir.path().join("storage.json");
    cli()?
        .args(["--state", state.to_str().unwrap(), "language", "set", "zh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from en to zh"));

    let stored = fs::read_to_string(&state)?;
    assert!(stored.contains("\"system-lang\": \"zh\""));

    cli()?
        .args(["--state", state.to_str().unwrap(), "language", "get"])
        .assert()
        .success()
        .stdout("zh\n");
    Ok(())
}

#[test]
fn unsupported_language_is_ignored() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let state = dir.path().join("storage.json");
    fs::write(&state, r#"{ "system-lang": "zh" }"#)?;

    cli()?
        .args(["--state", state.to_str().unwrap(), "language", "set", "fr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ignoring unsupported language 'fr'; keeping zh"));

    let stored = fs::read_to_string(&state)?;
    assert!(stored.contains("zh"));
    assert!(!stored.contains("fr"));
    Ok(())
}

#[test]
fn config_selects_storage_key() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let state = dir.path().join("storage.json");
    let config = dir.path().join("page.json");
    fs::write(&config, r#"{ "language_key": "bill-app-language" }"#)?;

    cli()?
        .args([
            "--state",
            state.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "language",
            "set",
            "zh",
        ])
        .assert()
        .success();
    assert!(fs::read_to_string(&state)?.contains("bill-app-language"));
    Ok(())
}
