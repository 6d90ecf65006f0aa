use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestManifest {
    root: PathBuf,
}

impl TestManifest {
    fn new(contents: &str) -> Self {
        let root = unique_temp_dir("load-order");
        fs::create_dir_all(&root).expect("create temp dir");
        fs::write(root.join("ordo.toml"), contents).expect("write manifest");
        Self { root }
    }

    fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(ordo_bin());
        cmd.arg("--manifest").arg(self.root.join("ordo.toml"));
        cmd.args(args);
        cmd.output().expect("run ordo")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        assert!(
            output.status.success(),
            "ordo {} failed\nstdout:\n{stdout}\nstderr:\n{stderr}",
            args.join(" ")
        );
        stdout
    }
}

impl Drop for TestManifest {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn ordo_bin() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_ordo") {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().expect("resolve current test binary path");
    let target_dir = current_exe
        .parent()
        .and_then(|path| path.parent())
        .expect("derive cargo target dir from test binary path");
    let bin_name = if cfg!(windows) { "ordo.exe" } else { "ordo" };
    let fallback = target_dir.join(bin_name);

    if fallback.is_file() {
        fallback
    } else {
        panic!(
            "CARGO_BIN_EXE_ordo is not set and fallback binary not found at {}",
            fallback.display()
        );
    }
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("ordo-{prefix}-{pid}-{nanos}"))
}

const CHAIN: &str = r#"[[plugin]]
name = "core"

[[plugin]]
name = "lib"
depends_on = ["core"]

[[plugin]]
name = "app"
depends_on = ["lib"]
"#;

#[test]
fn order_is_dependency_first() {
    let manifest = TestManifest::new(CHAIN);
    let stdout = manifest.run_ok(&["order"]);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines, vec!["core", "lib", "app"]);
}

#[test]
fn order_json_matches_plain_output() {
    let manifest = TestManifest::new(CHAIN);
    let stdout = manifest.run_ok(&["order", "--json"]);
    let order: Vec<String> = serde_json::from_str(&stdout).expect("parse order json");
    assert_eq!(order, vec!["core", "lib", "app"]);
}

#[test]
fn declaration_order_breaks_ties() {
    let manifest = TestManifest::new(
        r#"[[plugin]]
name = "app"
depends_on = ["base"]

[[plugin]]
name = "base"

[[plugin]]
name = "extra"
"#,
    );
    let stdout = manifest.run_ok(&["order"]);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines, vec!["base", "app", "extra"]);
}

#[test]
fn cyclic_manifest_fails_with_diagnostic() {
    let manifest = TestManifest::new(
        r#"[[plugin]]
name = "a"
depends_on = ["b"]

[[plugin]]
name = "b"
depends_on = ["a"]
"#,
    );
    let output = manifest.run(&["order"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "no partial order on stdout");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Graph is cyclic! Cycles:"),
        "stderr:\n{stderr}"
    );
    assert!(stderr.contains('a') && stderr.contains('b'));
}

#[test]
fn unknown_dependency_fails_before_resolution() {
    let manifest = TestManifest::new(
        r#"[[plugin]]
name = "app"
depends_on = ["ghost"]
"#,
    );
    let output = manifest.run(&["order"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown plugin 'ghost'"), "stderr:\n{stderr}");
}

#[test]
fn show_flat_lists_dependencies() {
    let manifest = TestManifest::new(CHAIN);
    let stdout = manifest.run_ok(&["show"]);
    assert_eq!(stdout, "core\nlib\n  -> core\napp\n  -> lib\n");
}

#[test]
fn show_dot_renders_edges() {
    let manifest = TestManifest::new(CHAIN);
    let stdout = manifest.run_ok(&["show", "--format", "dot"]);
    assert!(stdout.contains("\"lib\" -> \"core\";"));
    assert!(stdout.contains("\"app\" -> \"lib\";"));
}
