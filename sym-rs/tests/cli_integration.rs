use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestDir {
    path: PathBuf,
}

impl TestDir {
    fn new(tag: &str) -> Self {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let path = std::env::temp_dir()
            .join(format!("sym_rs_cli_{}_{}_{}", tag, std::process::id(), ts));
        fs::create_dir_all(&path).expect("create temp test dir");
        Self { path }
    }

    fn write(&self, name: &str, contents: &str) {
        let path = self.path.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(path, contents).expect("write script");
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_sym(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sym-rs"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("run sym-rs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(strip_ansi_escapes::strip(&output.stderr)).expect("utf-8 stderr")
}

#[test]
fn eval_source_prints_output() {
    let dir = TestDir::new("eval");
    let output = run_sym(&["-e", "[e] : (a + b)*(a - b); printf $e; printn $e;"], &dir.path);

    assert!(output.status.success(), "process failed: {:?}", output);
    assert_eq!(stdout(&output), "a^2 - b^2\n2\n");
}

#[test]
fn files_share_one_session() {
    let dir = TestDir::new("files");
    dir.write("first.sym", "[r] define x -> y + 1; end\n");
    dir.write("second.sym", "[e] apply $r to 2*x*z;\nprintf $e;\n");

    let output = run_sym(&["first.sym", "second.sym"], &dir.path);
    assert!(output.status.success(), "process failed: {:?}", output);
    assert_eq!(stdout(&output), "2 * y * z + 2 * z\n");
}

#[test]
fn include_searches_include_dirs() {
    let dir = TestDir::new("include");
    dir.write("lib/rules.sym", "[r] define a -> b; end\n");
    dir.write("main.sym", "include \"rules.sym\"\n[e] apply $r to a;\nprint $e;\n");

    let output = run_sym(&["-I", "lib", "main.sym"], &dir.path);
    assert!(output.status.success(), "process failed: {:?}", output);
    assert_eq!(stdout(&output), "b\n");

    let output = run_sym(&["main.sym"], &dir.path);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot find the file `rules.sym`"));
}

#[test]
fn failure_sets_exit_status_and_reports() {
    let dir = TestDir::new("failure");
    let output = run_sym(&["-e", "printn a + b; assert a = b; printn c;"], &dir.path);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "2\n");
    assert!(stderr(&output).contains("assertion failed"));
}

#[test]
fn stdin_is_read_when_not_a_terminal() {
    let dir = TestDir::new("stdin");
    let mut child = Command::new(env!("CARGO_BIN_EXE_sym-rs"))
        .current_dir(&dir.path)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn sym-rs");

    child.stdin
        .take()
        .expect("child stdin")
        .write_all(b"eval x*y with x = 3; other = 2; end\n")
        .expect("write stdin");

    let output = child.wait_with_output().expect("wait for sym-rs");
    assert!(output.status.success(), "process failed: {:?}", output);
    assert_eq!(stdout(&output), "6\n");
}

#[test]
fn tokens_flag_prints_tokens() {
    let dir = TestDir::new("tokens");
    let output = run_sym(&["--tokens", "-e", "[e] : a;"], &dir.path);

    assert!(output.status.success(), "process failed: {:?}", output);
    let stdout = stdout(&output);
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.starts_with("Label \"[e]\" at 0..3"));
}

#[test]
fn missing_file_is_reported() {
    let dir = TestDir::new("missing");
    let output = run_sym(&["nope.sym"], &dir.path);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot read `nope.sym`"));
}
