use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn write_config(&self, content: &str) {
        let dir = self.xdg_config.join("chanstat");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), content).expect("failed to write config");
    }
}

fn fixture_dir() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../chanstat-core/tests/fixtures/export")
        .to_string_lossy()
        .into_owned()
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("chanstat"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute chanstat: {e}"))
}

/// Run against the fixture export without a progress bar.
fn run_fixture(env: &CliTestEnv, args: &[&str]) -> Output {
    let dir = fixture_dir();
    let mut full = vec!["--dir", dir.as_str(), "--no-progress"];
    full.extend_from_slice(args);
    run_bin(env, &full)
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "chanstat {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn users_report_prints_header_and_table() {
    let env = CliTestEnv::new();
    let args = ["--exclude", "slackbot"];

    let output = run_fixture(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Using data dump:"));
    assert!(
        stdout.contains("Showing data for all channels for all time sorted by messages"),
        "unexpected header:\n{stdout}"
    );
    assert!(stdout.contains("Excluding these users: slackbot"));
    assert!(stdout.contains("Favorite Channels"));
    assert!(stdout.contains("#general, #random"));
    assert!(!stdout.contains("│ slackbot"));

    let alice = stdout.find("alice").expect("alice row");
    let bob = stdout.find("bob").expect("bob row");
    assert!(alice < bob, "alice should rank above bob:\n{stdout}");
}

#[test]
fn users_json_export_respects_window_and_limit() {
    let env = CliTestEnv::new();
    let args = ["--from", "2024-02-01", "--limit", "1", "--export", "json"];

    let output = run_fixture(&env, &args);
    assert_success(&args, &output);

    let value = stdout_json(&output);
    assert_eq!(value["totals"]["messages"], 4);
    assert_eq!(value["totals"]["characters"], 69);
    assert_eq!(value["filters"]["from"], "2024-02-01");
    assert_eq!(value["filters"]["sort"], "messages");

    let users = value["users"].as_array().expect("users array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "bob");
    assert_eq!(users[0]["messages"], 3);
    assert_eq!(users[0]["favorite_channels"][0], "dev");
}

#[test]
fn config_file_supplies_defaults() {
    let env = CliTestEnv::new();
    env.write_config("[report]\nsort = \"verbosity\"\nlimit = 2\nexclude = [\"slackbot\"]\n");
    let args = ["--export", "json"];

    let output = run_fixture(&env, &args);
    assert_success(&args, &output);

    let value = stdout_json(&output);
    assert_eq!(value["filters"]["sort"], "verbosity");
    let users = value["users"].as_array().expect("users array");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["name"], "alice");
    assert_eq!(users[1]["name"], "bob");
}

#[test]
fn channels_report_lists_active_channels() {
    let env = CliTestEnv::new();
    let args = ["--report", "channels", "--export", "json"];

    let output = run_fixture(&env, &args);
    assert_success(&args, &output);

    let value = stdout_json(&output);
    let names: Vec<&str> = value["channels"]
        .as_array()
        .expect("channels array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, vec!["general", "random", "dev"]);
}

#[test]
fn directory_report_lists_profiles() {
    let env = CliTestEnv::new();
    let args = ["--report", "directory"];

    let output = run_fixture(&env, &args);
    assert_success(&args, &output);

    let value = stdout_json(&output);
    let entries = value.as_array().expect("directory array");
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0]["name"], "alice");
    assert_eq!(entries[0]["real_name"], "Alice Liddell");
    assert_eq!(entries[1]["display_name"], "bobb");
}

#[test]
fn invalid_limit_fails() {
    let env = CliTestEnv::new();

    let output = run_fixture(&env, &["--limit", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("limit"), "unexpected stderr:\n{stderr}");
}

#[test]
fn command_line_limit_overrides_bad_config_limit() {
    let env = CliTestEnv::new();
    env.write_config("[report]\nlimit = 0\n");

    let args = ["--limit", "2", "--export", "json"];
    let output = run_fixture(&env, &args);
    assert_success(&args, &output);
    let users = stdout_json(&output)["users"].as_array().expect("users array").len();
    assert_eq!(users, 2);

    let output = run_fixture(&env, &["--export", "json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("limit"), "unexpected stderr:\n{stderr}");
}

#[test]
fn invalid_date_fails() {
    let env = CliTestEnv::new();

    let output = run_fixture(&env, &["--from", "last tuesday"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--from"), "unexpected stderr:\n{stderr}");
}

#[test]
fn missing_export_dir_fails() {
    let env = CliTestEnv::new();
    let missing = env.home.join("nowhere");
    let missing = missing.to_string_lossy();

    let output = run_bin(&env, &["--dir", &missing, "--no-progress"]);
    assert!(!output.status.success());
}
