#![allow(clippy::unwrap_used)]
//! CLI smoke tests to verify basic command functionality.
//!
//! These tests ensure that the CLI binary starts correctly and
//! responds to basic commands without crashing. Each test points
//! `XDG_CONFIG_HOME` at an empty directory so a local config file
//! cannot leak in.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(deprecated)]
fn charla(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("charla").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG")
        .env_remove("OPENAI_MODEL_NAME");
    cmd
}

#[test]
fn test_help_displays_usage() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Terminal chat client"))
        .stdout(predicate::str::contains("--persona"))
        .stdout(predicate::str::contains("--server"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_version_displays_version() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_personas_list_shows_presets() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .arg("personas")
        .assert()
        .success()
        .stdout(predicate::str::contains("Preset personas"))
        .stdout(predicate::str::contains("spanish"))
        .stdout(predicate::str::contains("english"))
        .stdout(predicate::str::contains("support"));
}

#[test]
fn test_personas_show_preset() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .args(["personas", "show", "spanish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Preset persona"))
        .stdout(predicate::str::contains("Prompt:"))
        .stdout(predicate::str::contains("Responde en español"));
}

#[test]
fn test_personas_show_custom() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("charla");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        "[personas.pirate]\ndescription = \"Arr\"\nprompt = \"Answer like a pirate.\"\n",
    )
    .unwrap();

    charla(&home)
        .args(["personas", "show", "pirate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Custom persona"))
        .stdout(predicate::str::contains("Answer like a pirate."));
}

#[test]
fn test_personas_show_nonexistent() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .args(["personas", "show", "nonexistent_persona_xyz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_providers_lists_builtin_without_config() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("openai"))
        .stdout(predicate::str::contains("https://api.openai.com"));
}

#[test]
fn test_providers_unknown() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .args(["providers", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Provider 'missing' not found"));
}

#[test]
fn test_broken_config_is_reported() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("charla");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[charla\nprovider = ").unwrap();

    charla(&home)
        .arg("providers")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_chat_help() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .args(["chat", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--provider"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--business-id"))
        .stdout(predicate::str::contains("--transcript"));
}

#[test]
fn test_ask_empty_input() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .args(["ask", "--server", "http://127.0.0.1:1"])
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input is empty"));
}

#[test]
fn test_ask_unreachable_relay_exits_unavailable() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .args(["ask", "--server", "http://127.0.0.1:1"])
        .write_stdin("Hola")
        .assert()
        .code(exitcode::UNAVAILABLE)
        .stderr(predicate::str::contains("Sorry, I couldn't get a response"));
}

#[test]
fn test_ask_unknown_provider() {
    let home = TempDir::new().unwrap();
    charla(&home)
        .args(["ask", "--provider", "nowhere"])
        .write_stdin("Hola")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Provider 'nowhere' not found"));
}

#[test]
fn test_serve_log_file_keeps_stderr() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("charla");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        "[providers.local]\nendpoint = \"http://127.0.0.1:9\"\nmodels = []\n",
    )
    .unwrap();
    let log_file = home.path().join("app.log");

    // Holding the port makes serve fail right after its startup logs.
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port().to_string();

    charla(&home)
        .args(["serve", "--provider", "local", "--port", &port, "--log-file"])
        .arg(&log_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Relaying to http://127.0.0.1:9"))
        .stderr(predicate::str::contains("Failed to bind"));

    let logged = std::fs::read_to_string(&log_file).unwrap();
    assert!(logged.contains("Relaying to http://127.0.0.1:9"));
}

#[test]
fn test_log_file_replaces_stderr_outside_serve() {
    let home = TempDir::new().unwrap();
    let log_file = home.path().join("app.log");

    charla(&home)
        .args(["-vvv", "ask", "--server", "http://127.0.0.1:9", "--log-file"])
        .arg(&log_file)
        .write_stdin("Hola")
        .assert()
        .code(exitcode::UNAVAILABLE)
        .stderr(predicate::str::contains("WARN").not());

    let logged = std::fs::read_to_string(&log_file).unwrap();
    assert!(logged.contains("WARN"));
}
