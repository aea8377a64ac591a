//! Integration tests for the run-with-env CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Creates a project directory anchored by a `.git` marker.
fn create_project() -> TempDir {
    let temp = TempDir::new().expect("create temp dir");
    std::fs::create_dir(temp.path().join(".git")).expect("create .git");
    temp
}

#[cfg(unix)]
/// Creates a project with a virtual environment whose activation exports a marker.
fn create_project_with_env() -> TempDir {
    let temp = create_project();
    let bin = temp.path().join("env").join("bin");
    std::fs::create_dir_all(&bin).expect("create env/bin");
    std::fs::write(
        bin.join("activate"),
        "RWE_ACTIVE=1\nexport RWE_ACTIVE\n",
    )
    .expect("write activate");
    temp
}

fn cli(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("run-with-env").unwrap();
    cmd.current_dir(project).env_remove("RUST_LOG");
    cmd
}

#[cfg(unix)]
fn activation_script(project: &Path) -> String {
    project
        .join("env")
        .join("bin")
        .join("activate")
        .display()
        .to_string()
}

#[test]
fn test_help() {
    Command::cargo_bin("run-with-env")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("virtual environment"));
}

#[test]
fn test_version() {
    Command::cargo_bin("run-with-env")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_command_is_usage_error() {
    let temp = create_project();

    cli(temp.path()).assert().failure().code(2);
}

#[test]
fn test_blank_command_is_rejected() {
    let temp = create_project();

    cli(temp.path())
        .arg("")
        .assert()
        .code(64)
        .stderr(predicate::str::contains("No command given"))
        .stderr(predicate::str::contains("hint:"));
}

// =============================================================================
// Planning (--dry-run)
// =============================================================================

#[cfg(unix)]
#[test]
fn test_dry_run_allow_listed_ignores_env() {
    let temp = create_project_with_env();

    cli(temp.path())
        .args(["-C"])
        .arg(temp.path())
        .args(["--dry-run", "eslint", "."])
        .assert()
        .success()
        .stdout("eslint .\n")
        .stderr(predicate::str::contains("allow-listed tool: eslint (built-in)"));
}

#[cfg(unix)]
#[test]
fn test_dry_run_wraps_when_env_present() {
    let temp = create_project_with_env();
    let expected = format!(". \"{}\" && pytest\n", activation_script(temp.path()));

    cli(temp.path())
        .arg("-C")
        .arg(temp.path())
        .args(["--dry-run", "pytest"])
        .assert()
        .success()
        .stdout(expected)
        .stderr(predicate::str::contains("found"));
}

#[test]
fn test_dry_run_without_env_runs_unmodified() {
    let temp = create_project();

    cli(temp.path())
        .args(["--dry-run", "pytest", "-x"])
        .assert()
        .success()
        .stdout("pytest -x\n")
        .stderr(predicate::str::contains("no virtual environment found"));
}

#[cfg(unix)]
#[test]
fn test_dry_run_json() {
    let temp = create_project_with_env();

    let output = cli(temp.path())
        .arg("-C")
        .arg(temp.path())
        .args(["--dry-run", "--format", "json", "pytest"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(plan["decision"]["kind"], "wrapped");
    assert_eq!(plan["env_present"], true);
    assert_eq!(plan["platform"], "posix");
    assert_eq!(plan["request"], "pytest");
}

#[cfg(unix)]
#[test]
fn test_discovers_root_from_subdirectory() {
    let temp = create_project_with_env();
    let nested = temp.path().join("tests").join("unit");
    std::fs::create_dir_all(&nested).expect("create nested");

    cli(&nested)
        .args(["--dry-run", "pytest"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("env/bin/activate\" && pytest\n"));
}

#[cfg(unix)]
#[test]
fn test_env_dir_override() {
    let temp = create_project_with_env();
    std::fs::rename(temp.path().join("env"), temp.path().join(".venv")).expect("rename env");

    cli(temp.path())
        .args(["--env-dir", ".venv", "--dry-run", "pytest"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".venv/bin/activate\" && pytest"));
}

// =============================================================================
// Execution
// =============================================================================

#[cfg(unix)]
#[test]
fn test_run_wrapped_command_sees_environment() {
    let temp = create_project_with_env();

    cli(temp.path())
        .args(["printenv", "RWE_ACTIVE"])
        .assert()
        .success()
        .stdout("1\n");
}

#[cfg(unix)]
#[test]
fn test_run_allow_listed_command_skips_environment() {
    let temp = create_project_with_env();
    std::fs::write(
        temp.path().join("run-with-env.toml"),
        "[allow_list]\nextra = [\"printenv\"]\n",
    )
    .expect("write config");

    cli(temp.path())
        .args(["printenv", "RWE_ACTIVE"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to run the command."))
        .stderr(predicate::str::contains("Command: printenv RWE_ACTIVE"));
}

#[cfg(unix)]
#[test]
fn test_run_passes_arguments_through() {
    let temp = create_project();

    cli(temp.path())
        .args(["echo", "--flag", "-v", "value"])
        .assert()
        .success()
        .stdout("--flag -v value\n");
}

#[cfg(unix)]
#[test]
fn test_run_inherits_stdin() {
    let temp = create_project();

    cli(temp.path())
        .arg("cat")
        .write_stdin("piped input")
        .assert()
        .success()
        .stdout("piped input");
}

#[cfg(unix)]
#[test]
fn test_failure_inside_env_exits_one() {
    let temp = create_project_with_env();
    let expected = format!(". \"{}\" && exit 5", activation_script(temp.path()));

    cli(temp.path())
        .arg("-C")
        .arg(temp.path())
        .args(["exit", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Failed to run the command inside the virtual environment.",
        ))
        .stderr(predicate::str::contains(format!("Command: {expected}")));
}

#[cfg(unix)]
#[test]
fn test_launch_failure_exits_one() {
    let temp = create_project();
    std::fs::write(
        temp.path().join("run-with-env.toml"),
        "[execution]\nshell = [\"definitely_not_a_real_shell_12345\", \"-c\"]\n",
    )
    .expect("write config");

    cli(temp.path())
        .arg("true")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Command: true"));
}

#[cfg(unix)]
#[test]
fn test_run_passes_non_utf8_arguments_through() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = create_project();

    cli(temp.path())
        .args(["printf", "%s"])
        .arg(OsStr::from_bytes(b"caf\xe9"))
        .assert()
        .success()
        .stdout(&b"caf\xe9"[..]);
}

#[cfg(unix)]
#[test]
fn test_configured_shell_argv_runs_wrapped_command() {
    let temp = create_project_with_env();
    std::fs::write(
        temp.path().join("run-with-env.toml"),
        "[execution]\nshell = [\"sh\", \"-e\", \"-c\"]\n",
    )
    .expect("write config");

    cli(temp.path())
        .args(["printenv", "RWE_ACTIVE"])
        .assert()
        .success()
        .stdout("1\n");
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_invalid_config_exits_78() {
    let temp = create_project();
    std::fs::write(
        temp.path().join("run-with-env.toml"),
        "[environment]\ndir = \"\"\n",
    )
    .expect("write config");

    cli(temp.path())
        .args(["--dry-run", "pytest"])
        .assert()
        .code(78)
        .stderr(predicate::str::contains("environment.dir"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn test_missing_explicit_config_exits_78() {
    let temp = create_project();

    cli(temp.path())
        .args(["--config", "nope.toml", "--dry-run", "pytest"])
        .assert()
        .code(78)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_shell_string_is_rejected() {
    let temp = create_project();
    std::fs::write(
        temp.path().join("run-with-env.toml"),
        "[execution]\nshell = \"bash\"\n",
    )
    .expect("write config");

    cli(temp.path())
        .args(["--dry-run", "pytest"])
        .assert()
        .code(78)
        .stderr(predicate::str::contains("Failed to parse configuration"));
}

#[test]
fn test_config_replaces_allow_list() {
    let temp = create_project();
    std::fs::write(
        temp.path().join("run-with-env.toml"),
        "[allow_list]\ntools = [\"ruff\"]\n",
    )
    .expect("write config");

    cli(temp.path())
        .args(["--dry-run", "ruff", "check"])
        .assert()
        .success()
        .stderr(predicate::str::contains("allow-listed tool: ruff"))
        .stderr(predicate::str::contains("built-in").not());
}

#[test]
fn test_show_config_defaults() {
    let temp = create_project();

    cli(temp.path())
        .arg("--show-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[environment]"))
        .stdout(predicate::str::contains("dir = \"env\""))
        .stderr(predicate::str::contains("using defaults"));
}

#[test]
fn test_completions() {
    Command::cargo_bin("run-with-env")
        .unwrap()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run-with-env"));
}
