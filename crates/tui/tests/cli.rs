use predicates::prelude::*;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

const SAMPLE: &str = "\
diff --git a/src/ui/keys.rs b/src/ui/keys.rs
--- a/src/ui/keys.rs
+++ b/src/ui/keys.rs
@@ -1,2 +1,2 @@
-old
+new
 same
diff --git a/src/ui/tree.rs b/src/ui/tree.rs
new file mode 100644
--- /dev/null
+++ b/src/ui/tree.rs
@@ -0,0 +1,2 @@
+one
+two
diff --git a/README.md b/README.md
--- a/README.md
+++ b/README.md
@@ -3 +3 @@
-a
+b
";

fn with_timeout<F, R>(duration: Duration, f: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(f));
        let _ = tx.send(result);
    });

    match rx.recv_timeout(duration) {
        Ok(Ok(output)) => output,
        Ok(Err(err)) => panic::resume_unwind(err),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test timed out after {:?}", duration)
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            panic!("test worker disconnected without signalling completion")
        }
    }
}

fn diffnav(config_dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("diffnav").unwrap();
    cmd.env("DIFFNAV_HEADLESS", "1");
    cmd.env("DIFFNAV_CONFIG_DIR", config_dir);
    cmd.env_remove("DIFFNAV_LOG_FILE");
    cmd.timeout(Duration::from_secs(5));
    cmd
}

fn stderr_error(output: &std::process::Output) -> Value {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .find(|l| l.contains("tool.error"))
        .unwrap_or_else(|| panic!("no error line in {stderr}"));
    serde_json::from_str(line).unwrap()
}

#[test]
fn headless_prints_collapsed_tree_from_file() {
    with_timeout(Duration::from_secs(10), || {
        let dir = tempfile::tempdir().unwrap();
        let diff_path = dir.path().join("sample.diff");
        File::create(&diff_path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();

        let assert = diffnav(dir.path()).arg(&diff_path).assert().success();
        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
        let expected = ".\n  src/ui\n    > keys.rs\n    tree.rs\n  README.md\n";
        assert_eq!(stdout, expected);
    });
}

#[test]
fn headless_reads_stdin_for_dash_and_no_argument() {
    with_timeout(Duration::from_secs(10), || {
        let dir = tempfile::tempdir().unwrap();
        diffnav(dir.path())
            .arg("-")
            .write_stdin(SAMPLE)
            .assert()
            .success()
            .stdout(predicate::str::contains("> keys.rs"));
        diffnav(dir.path())
            .write_stdin(SAMPLE)
            .assert()
            .success()
            .stdout(predicate::str::contains("README.md"));
    });
}

#[test]
fn config_file_width_is_applied() {
    with_timeout(Duration::from_secs(10), || {
        let diff = "--- a/a_rather_long_module_name.rs\n+++ b/a_rather_long_module_name.rs\n@@ -1 +1 @@\n-x\n+y\n";
        let dir = tempfile::tempdir().unwrap();
        diffnav(dir.path())
            .write_stdin(diff)
            .assert()
            .success()
            .stdout(predicate::str::contains("\u{2026}"));

        let mut f = File::create(dir.path().join("config.toml")).unwrap();
        writeln!(f, "[ui]\nicons = \"unicode\"\nfile_tree_width = 40").unwrap();
        diffnav(dir.path())
            .write_stdin(diff)
            .assert()
            .success()
            .stdout(predicate::str::contains("> a_rather_long_module_name.rs"));
    });
}

#[test]
fn broken_config_falls_back_to_defaults() {
    with_timeout(Duration::from_secs(10), || {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("config.toml")).unwrap();
        writeln!(f, "[ui\nicons = ").unwrap();
        diffnav(dir.path())
            .write_stdin(SAMPLE)
            .assert()
            .success()
            .stdout(predicate::str::contains("> keys.rs"));
    });
}

#[test]
fn empty_diff_exits_cleanly_without_output() {
    with_timeout(Duration::from_secs(10), || {
        let dir = tempfile::tempdir().unwrap();
        diffnav(dir.path())
            .write_stdin("")
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    });
}

#[test]
fn missing_file_reports_not_found() {
    with_timeout(Duration::from_secs(10), || {
        let dir = tempfile::tempdir().unwrap();
        let assert = diffnav(dir.path())
            .arg("/no/such/diff.patch")
            .assert()
            .code(2);
        let value = stderr_error(assert.get_output());
        assert_eq!(value["type"], "tool.error");
        assert_eq!(value["error"]["diff_load_failed"], true);
        assert_eq!(value["error"]["reason"], "not_found");
        assert_eq!(value["error"]["path"], "/no/such/diff.patch");
    });
}

#[test]
fn malformed_diff_reports_parse_error() {
    with_timeout(Duration::from_secs(10), || {
        let dir = tempfile::tempdir().unwrap();
        let assert = diffnav(dir.path())
            .arg("-")
            .write_stdin("@@ -1 +1 @@\n-x\n+y\n")
            .assert()
            .code(2);
        let value = stderr_error(assert.get_output());
        assert_eq!(value["error"]["reason"], "parse_error");
        assert_eq!(value["error"]["path"], "-");
        assert!(value["error"]["message"].as_str().unwrap().contains("line 1"));
    });
}

#[test]
fn oversized_input_reports_too_large() {
    with_timeout(Duration::from_secs(20), || {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big.diff");
        let file = File::create(&big).unwrap();
        file.set_len(16 * 1024 * 1024 + 1).unwrap();
        let assert = diffnav(dir.path()).arg(&big).assert().code(2);
        let value = stderr_error(assert.get_output());
        assert_eq!(value["error"]["reason"], "too_large");
    });
}

#[cfg(unix)]
#[test]
fn unreadable_input_reports_read_failed() {
    with_timeout(Duration::from_secs(10), || {
        let dir = tempfile::tempdir().unwrap();
        let assert = diffnav(dir.path()).arg(dir.path()).assert().code(2);
        let value = stderr_error(assert.get_output());
        assert_eq!(value["error"]["reason"], "read_failed");
        assert!(value["error"]["message"].is_string());
    });
}

#[test]
fn hide_root_starts_the_tree_at_top_level_entries() {
    with_timeout(Duration::from_secs(10), || {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("config.toml")).unwrap();
        writeln!(f, "[ui]\nhide_root = true").unwrap();
        let assert = diffnav(dir.path()).write_stdin(SAMPLE).assert().success();
        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
        assert_eq!(stdout, "src/ui\n  > keys.rs\n  tree.rs\nREADME.md\n");
    });
}
