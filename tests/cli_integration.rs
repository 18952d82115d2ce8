//! End-to-end tests for the chrome-instrument binary.
//!
//! A shell script stands in for instrument.exe, so the full-run tests only
//! build on unix.
//!
//! Run with:
//!   cargo test --test cli_integration -- --nocapture

use std::fs;
#[cfg(unix)]
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_chrome-instrument"))
}

fn run(args: &[String]) -> Output {
    bin().args(args).output().expect("failed to run chrome-instrument")
}

struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let workspace = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        let chrome = workspace.chrome();
        fs::create_dir_all(chrome.join("locales")).unwrap();
        fs::write(chrome.join("chrome.exe"), b"chrome exe").unwrap();
        fs::write(chrome.join("chrome.dll"), b"chrome dll").unwrap();
        fs::write(chrome.join("resources.pak"), b"pak").unwrap();
        fs::write(chrome.join("locales/de.dll"), b"de").unwrap();
        workspace
    }

    fn chrome(&self) -> PathBuf {
        self.temp_dir.path().join("chrome")
    }

    fn out(&self) -> PathBuf {
        self.temp_dir.path().join("out")
    }

    fn tools(&self) -> PathBuf {
        self.temp_dir.path().join("tools")
    }

    fn args(&self, extra: &[&str]) -> Vec<String> {
        let mut args = vec![
            format!("--input-dir={}", self.chrome().display()),
            format!("--output-dir={}", self.out().display()),
            format!("--tool-dir={}", self.tools().display()),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        args
    }

    #[cfg(unix)]
    fn install_tools(&self, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let tools = self.tools();
        fs::create_dir_all(&tools).unwrap();
        let exe = tools.join("instrument.exe");
        fs::write(&exe, format!("#!/bin/sh\n{}\n", script)).unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(tools.join("call_trace_client.dll"), b"call trace").unwrap();
        fs::write(tools.join("profile_client.dll"), b"profile").unwrap();
    }

    #[cfg(unix)]
    fn calls(&self) -> String {
        fs::read_to_string(self.tools().join("calls.log")).unwrap_or_default()
    }
}

#[cfg(unix)]
const REWRITE: &str = r#"for arg in "$@"; do
  case "$arg" in
    --input-image=*) src="${arg#--input-image=}" ;;
    --output-image=*) dst="${arg#--output-image=}" ;;
  esac
done
echo "$@" >> "$(dirname "$0")/calls.log"
{ cat "$src"; echo " instrumented"; } > "$dst""#;

#[cfg(unix)]
fn list_files(root: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/*", glob::Pattern::escape(root.to_str().unwrap()));
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}

#[test]
fn missing_input_dir_is_usage_error() {
    let workspace = Workspace::new();
    let output = run(&[format!("--output-dir={}", workspace.out().display())]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--input-dir"));
    assert!(!workspace.out().exists());
}

#[test]
fn missing_output_dir_is_usage_error() {
    let workspace = Workspace::new();
    let output = run(&[format!("--input-dir={}", workspace.chrome().display())]);

    assert_eq!(output.status.code(), Some(2));
    assert!(!workspace.out().exists());
}

#[test]
fn positional_argument_is_usage_error() {
    let workspace = Workspace::new();
    let output = run(&workspace.args(&["unexpected"]));

    assert_eq!(output.status.code(), Some(2));
    assert!(!workspace.out().exists());
}

#[test]
fn missing_tools_fail_before_staging() {
    let workspace = Workspace::new();
    let output = run(&workspace.args(&[]));

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("instrument.exe"));
    assert!(!workspace.out().exists());
}

#[cfg(unix)]
#[test]
fn successful_run_produces_instrumented_copy() {
    let workspace = Workspace::new();
    workspace.install_tools(REWRITE);

    let output = run(&workspace.args(&[]));
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let mut expected = list_files(&workspace.chrome());
    expected.push(PathBuf::from("call_trace_client.dll"));
    expected.sort();
    assert_eq!(list_files(&workspace.out()), expected);

    let original = fs::read(workspace.chrome().join("chrome.dll")).unwrap();
    let instrumented = fs::read(workspace.out().join("chrome.dll")).unwrap();
    assert_ne!(original, instrumented);
    assert_eq!(
        fs::read(workspace.out().join("chrome.exe")).unwrap(),
        b"chrome exe"
    );

    let calls = workspace.calls();
    assert_eq!(calls.lines().count(), 1);
    assert!(calls.contains(&format!(
        "--input-image={}",
        workspace.chrome().join("chrome.dll").display()
    )));
    assert!(calls.contains(&format!(
        "--output-image={}",
        workspace.out().join("chrome.dll").display()
    )));
    assert!(!calls.contains("--no-interior-refs"));
}

#[cfg(unix)]
#[test]
fn profile_client_run_suppresses_interior_refs() {
    let workspace = Workspace::new();
    workspace.install_tools(REWRITE);

    let output = run(&workspace.args(&["--client-dll=profile_client.dll"]));
    assert!(output.status.success());

    assert!(workspace.out().join("profile_client.dll").exists());
    assert!(!workspace.out().join("call_trace_client.dll").exists());
    let calls = workspace.calls();
    assert!(calls.contains("--call-trace-client=profile_client.dll"));
    assert!(calls.contains("--no-interior-refs"));
}

#[cfg(unix)]
#[test]
fn instrumenter_failure_exits_with_one() {
    let workspace = Workspace::new();
    workspace.install_tools("exit 5");

    let output = run(&workspace.args(&[]));
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to instrument \"chrome.dll\""));
    // Staging already happened and is not rolled back.
    assert_eq!(
        fs::read(workspace.out().join("chrome.dll")).unwrap(),
        b"chrome dll"
    );
}

#[cfg(unix)]
#[test]
fn verbose_logs_progress() {
    let workspace = Workspace::new();
    workspace.install_tools(REWRITE);

    let quiet = run(&workspace.args(&[]));
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("Instrumenting"));

    let verbose = run(&workspace.args(&["--verbose"]));
    assert!(verbose.status.success());
    let stderr = String::from_utf8_lossy(&verbose.stderr);
    assert!(stderr.contains("Copying chrome files"));
    assert!(stderr.contains("Instrumenting \"chrome.dll\"."));
}

#[cfg(unix)]
#[test]
fn launch_failure_reports_os_cause_once() {
    use std::os::unix::fs::PermissionsExt;

    let workspace = Workspace::new();
    workspace.install_tools(REWRITE);
    let exe = workspace.tools().join("instrument.exe");
    fs::set_permissions(&exe, fs::Permissions::from_mode(0o644)).unwrap();

    let output = run(&workspace.args(&[]));
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&format!("Failed to launch {}", exe.display())));
    assert_eq!(stderr.matches("Permission denied").count(), 1, "stderr: {stderr}");
}
