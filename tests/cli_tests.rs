//! End-to-end tests driving the `mail2es` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use assert_fs::prelude::*;
use predicates::prelude::*;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The binary with an isolated config location.
fn mail2es(temp: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mail2es"));
    cmd.env("MAIL2ES_CONFIG", temp.path().join("absent.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

// ─── Test 1: File argument → pretty JSON on stdout ──────────────────

#[test]
fn test_convert_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = mail2es(&temp).arg(fixture("simple.eml")).output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.ends_with("}\n"));
    assert!(predicate::str::contains("\"part-0.1\"").eval(&out));
    assert!(predicate::str::contains("\n  \"from\": ").eval(&out));

    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["subject"], "Quarterly report");
}

// ─── Test 2: Standard input, compact output ─────────────────────────

#[test]
fn test_convert_stdin_compact() {
    let temp = assert_fs::TempDir::new().unwrap();
    let raw = std::fs::read(fixture("latin1_html.eml")).unwrap();

    let mut child = mail2es(&temp)
        .args(["--compact", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&raw).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert_eq!(out.lines().count(), 1);
    assert!(predicate::str::contains("café crème").eval(&out));
}

// ─── Test 3: Missing file → error on stderr, nothing on stdout ──────

#[test]
fn test_missing_file_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = mail2es(&temp)
        .arg(temp.path().join("nope.eml"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(predicate::str::contains("not found").eval(&stderr(&output)));
}

// ─── Test 4: Empty input is fatal ───────────────────────────────────

#[test]
fn test_empty_file_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let empty = temp.child("empty.eml");
    empty.touch().unwrap();

    let output = mail2es(&temp).arg(empty.path()).output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(predicate::str::contains("Cannot parse message").eval(&stderr(&output)));
}

// ─── Test 5: --date-format timestamp ────────────────────────────────

#[test]
fn test_date_format_flag() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = mail2es(&temp)
        .args(["--date-format", "timestamp", "--compact"])
        .arg(fixture("simple.eml"))
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(predicate::str::contains("\"date\":1704362400").eval(&stdout(&output)));
}

// ─── Test 6: Config file sets defaults, flags override them ─────────

#[test]
fn test_config_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("config.toml");
    config
        .write_str("[output]\npretty = false\ndate_format = \"rfc2822\"\n")
        .unwrap();

    let output = mail2es(&temp)
        .arg("--config")
        .arg(config.path())
        .arg(fixture("simple.eml"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert_eq!(out.lines().count(), 1);
    assert!(predicate::str::contains("\"date\":\"Thu, 4 Jan 2024 10:00:00 +0000\"").eval(&out));

    let output = mail2es(&temp)
        .arg("--config")
        .arg(config.path())
        .args(["--date-format", "rfc3339"])
        .arg(fixture("simple.eml"))
        .output()
        .unwrap();
    assert!(predicate::str::contains("2024-01-04T10:00:00+00:00").eval(&stdout(&output)));
}

// ─── Test 7: Size limit from config ─────────────────────────────────

#[test]
fn test_message_too_large() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("config.toml");
    config.write_str("[input]\nmax_message_size = 16\n").unwrap();

    let output = mail2es(&temp)
        .arg("-c")
        .arg(config.path())
        .arg(fixture("simple.eml"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(predicate::str::contains("16 byte limit").eval(&stderr(&output)));
}

// ─── Test 8: --debug traces the walk on stderr only ─────────────────

#[test]
fn test_debug_trace() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = mail2es(&temp)
        .args(["--debug", "--compact"])
        .arg(fixture("alternative_with_pdf.eml"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let err = stderr(&output);
    assert!(predicate::str::contains("found part").eval(&err));
    assert!(predicate::str::contains("alternative replaces previous entry").eval(&err));

    let out = stdout(&output);
    assert!(!out.contains("found part"));
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(json.get("part-1.1").is_none());
    assert!(json.get("part-1.2").is_some());
}

// ─── Test 9: --debug survives -v and a restrictive RUST_LOG ─────────

#[test]
fn test_debug_trace_with_other_levels() {
    let temp = assert_fs::TempDir::new().unwrap();

    let output = mail2es(&temp)
        .args(["-d", "-v", "--compact"])
        .arg(fixture("alternative_with_pdf.eml"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(predicate::str::contains("found part").eval(&stderr(&output)));

    let output = mail2es(&temp)
        .env("RUST_LOG", "warn")
        .args(["-d", "--compact"])
        .arg(fixture("alternative_with_pdf.eml"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(predicate::str::contains("found part").eval(&stderr(&output)));
    assert!(!stdout(&output).contains("found part"));
}

// ─── Test 10: Broken config file is reported, defaults apply ────────

#[test]
fn test_broken_config_warns() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("config.toml");
    config.write_str("[output
pretty = ").unwrap();

    let output = mail2es(&temp)
        .arg("-c")
        .arg(config.path())
        .arg(fixture("simple.eml"))
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(predicate::str::contains("Failed to load config, using defaults").eval(&err));
    assert!(predicate::str::contains("Failed to parse").eval(&err));

    // Defaults: pretty output.
    assert!(predicate::str::contains("
  \"from\": ").eval(&stdout(&output)));
}

// ─── Test 11: Log file in the configured cache dir ───────────────────

#[test]
fn test_log_to_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let cache = temp.child("cache");
    let config = temp.child("config.toml");
    config
        .write_str(&format!(
            "[general]\nlog_to_file = true\nlog_level = \"info\"\ncache_dir = {:?}\n",
            cache.path().display().to_string()
        ))
        .unwrap();

    let output = mail2es(&temp)
        .arg("-c")
        .arg(config.path())
        .arg(fixture("simple.eml"))
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    cache.child("mail2es.log").assert(predicate::path::exists());
}

// ─── Test 12: Completions and man page ──────────────────────────────

#[test]
fn test_completions_and_manpage() {
    let temp = assert_fs::TempDir::new().unwrap();

    let output = mail2es(&temp).args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success());
    assert!(predicate::str::contains("mail2es").eval(&stdout(&output)));

    let output = mail2es(&temp).arg("manpage").output().unwrap();
    assert!(output.status.success());
    assert!(predicate::str::contains(".TH").eval(&stdout(&output)));
}
