use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Config pointing the journal into the temp dir
fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("mallcoord.yml");
    let yaml = format!(
        "storage:\n  journal-dir: {}\n  journal-enabled: true\n{}",
        dir.join("journal").display(),
        extra
    );
    fs::write(&path, yaml).unwrap();
    path
}

fn mc(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mc");
    cmd.env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("NO_COLOR", "1")
        .current_dir(home.path());
    cmd
}

#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    mc(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("agents"))
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn test_cli_agents_lists_builtins() {
    let home = TempDir::new().unwrap();
    mc(&home)
        .arg("agents")
        .assert()
        .success()
        .stdout(predicate::str::contains("Atlas"))
        .stdout(predicate::str::contains("Aurora"))
        .stdout(predicate::str::contains("Mercury"))
        .stdout(predicate::str::contains("Sentinel"))
        .stdout(predicate::str::contains("security-compliance"));
}

#[test]
fn test_cli_submit_fall_festival() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), "");

    mc(&home)
        .arg("-c")
        .arg(&config)
        .args(["submit", "mall-event", "Fall Festival", "-C", "Aurora", "-C", "Ghost"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Atlas is coordinating the mall event: Fall Festival",
        ))
        .stdout(predicate::str::contains("→ Aurora"))
        .stdout(predicate::str::contains("Ghost: unknown collaborator"));

    mc(&home)
        .arg("-c")
        .arg(&config)
        .args(["history", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"agent\": \"Atlas\""));
}

#[test]
fn test_cli_submit_unhandled_category_fails() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), "");

    mc(&home)
        .arg("-c")
        .arg(&config)
        .args(["submit", "parking", "Lot C is full"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No agent registered for category 'parking'"));
}

#[test]
fn test_cli_history_matches_builtin_names_case_insensitively() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), "");

    mc(&home)
        .arg("-c")
        .arg(&config)
        .args(["submit", "retail-operations", "Restock coats", "-C", "Atlas"])
        .assert()
        .success();

    mc(&home)
        .arg("-c")
        .arg(&config)
        .args(["history", "-a", "atlas", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"agent\": \"Mercury\""))
        .stdout(predicate::str::contains("Restock coats"));
}

#[test]
fn test_cli_logs_shows_tail() {
    let home = TempDir::new().unwrap();

    mc(&home).arg("agents").assert().success();

    mc(&home)
        .args(["logs", "-n", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logging initialized"))
        .stdout(predicate::str::contains("No log file found").not());

    assert!(home.path().join("data/mallcoord/logs/mallcoord.log").exists());
}

#[test]
fn test_cli_custom_agent_json() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        home.path(),
        "agents:\n  custom:\n    - name: Concierge\n      category: guest-services\n      template: \"{{agent}} on it: {{payload}}\"\n",
    );

    mc(&home)
        .arg("-c")
        .arg(&config)
        .args(["submit", "guest-services", "lost umbrella", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Concierge on it: lost umbrella"));
}

#[test]
fn test_cli_run_script_continues_past_failures() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), "");
    let script = home.path().join("script.yml");
    fs::write(
        &script,
        "steps:\n  - category: valet\n    payload: nobody\n  - category: retail-operations\n    payload: Restock coats\n    collaborators: [Atlas]\n",
    )
    .unwrap();

    mc(&home)
        .arg("-c")
        .arg(&config)
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("valet"))
        .stdout(predicate::str::contains("Mercury"))
        .stdout(predicate::str::contains("Unhandled:       1"));
}

#[test]
fn test_cli_invalid_config_fails() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        home.path(),
        "agents:\n  custom:\n    - name: Atlas\n      category: somewhere-else\n      template: \"{{payload}}\"\n",
    );

    mc(&home)
        .arg("-c")
        .arg(&config)
        .arg("agents")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Atlas"));
}
