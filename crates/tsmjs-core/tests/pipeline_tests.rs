#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tsmjs_core::build::{BuildRequest, BuildStatus, BuildTool};
use tsmjs_core::config::TsmjsConfig;
use tsmjs_core::error::WalkError;
use tsmjs_core::{TsmjsError, pipeline};

/// Stand-in compiler: copies `<stem>.ts` to `<out>/<stem>.js` plus a map,
/// and fails on sources containing `SYNTAX ERROR`.
const FAKE_COMPILER: &str = r#"
entry="$1"
out="$2"
if grep -q "SYNTAX ERROR" "$entry"; then
  echo "$entry: unexpected token" >&2
  exit 1
fi
name=$(basename "$entry")
stem="${name%.*}"
cp "$entry" "$out/$stem.js"
echo '{"version":3}' > "$out/$stem.js.map"
"#;

struct FakeCompiler;

impl BuildTool for FakeCompiler {
    fn name(&self) -> &str {
        "fake-compiler"
    }

    fn command(&self, request: &BuildRequest) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(FAKE_COMPILER)
            .arg("sh")
            .arg(&request.entry_point)
            .arg(&request.out_dir);
        cmd
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn config_in(root: &Path) -> TsmjsConfig {
    TsmjsConfig {
        src_dir: root.join("src/ts"),
        out_dir: root.join("lib/mjs"),
        ..TsmjsConfig::default()
    }
}

#[test]
fn builds_every_source_into_output_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "src/ts/index.ts", "export const a = 1;\n");
    write(root, "src/ts/utils/helper.ts", "export const b = 2;\n");
    write(root, "src/ts/README.md", "docs\n");

    let config = config_in(root);
    let report = pipeline::run(&config, FakeCompiler).unwrap();

    assert!(report.is_success());
    assert_eq!(report.len(), 2);
    for name in ["index.js", "index.js.map", "helper.js", "helper.js.map"] {
        assert!(config.out_dir.join(name).exists(), "missing {name}");
    }
    assert_eq!(
        fs::read_to_string(config.out_dir.join("helper.js")).unwrap(),
        "export const b = 2;\n"
    );
}

#[test]
fn failing_file_does_not_stop_the_others() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "src/ts/good.ts", "export const ok = true;\n");
    write(root, "src/ts/bad.ts", "SYNTAX ERROR\n");
    write(root, "src/ts/nested/also_good.ts", "export {};\n");

    let config = config_in(root);
    let report = pipeline::run(&config, FakeCompiler).unwrap();

    assert!(!report.is_success());
    assert_eq!(report.len(), 3);
    assert_eq!(report.succeeded().count(), 2);

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].entry_point, config.src_dir.join("bad.ts"));
    match &failed[0].status {
        BuildStatus::Failed { code, stderr } => {
            assert_eq!(*code, Some(1));
            assert!(stderr.contains("unexpected token"));
        }
        other => panic!("expected compile failure, got {other:?}"),
    }

    assert!(config.out_dir.join("good.js").exists());
    assert!(config.out_dir.join("also_good.js").exists());
    assert!(!config.out_dir.join("bad.js").exists());
}

#[test]
fn many_concurrent_builds_keep_outputs_separate() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    for i in 0..32 {
        write(
            root,
            &format!("src/ts/dir{}/module{i}.ts", i % 4),
            &format!("export const value = {i};\n"),
        );
    }

    let config = config_in(root);
    let report = pipeline::run(&config, FakeCompiler).unwrap();

    assert!(report.is_success());
    assert_eq!(report.len(), 32);
    for i in 0..32 {
        let out = fs::read_to_string(config.out_dir.join(format!("module{i}.js"))).unwrap();
        assert_eq!(out, format!("export const value = {i};\n"));
    }
}

/// Sleeps so that every build is still running when the next one starts.
struct SlowCompiler;

impl BuildTool for SlowCompiler {
    fn name(&self) -> &str {
        "slow-compiler"
    }

    fn command(&self, _request: &BuildRequest) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("sleep 1");
        cmd
    }
}

#[test]
fn hundreds_of_overlapping_builds_all_succeed() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    for i in 0..600 {
        write(root, &format!("src/ts/m{i}.ts"), "export {};\n");
    }

    let config = config_in(root);
    let report = pipeline::run(&config, SlowCompiler).unwrap();

    let failures: Vec<String> = report
        .failed()
        .map(|o| format!("{}: {}", o.entry_point.display(), o.status))
        .collect();
    assert!(failures.is_empty(), "{}", failures.join("\n"));
    assert_eq!(report.len(), 600);
}

#[test]
fn empty_source_tree_builds_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    fs::create_dir_all(&config.src_dir).unwrap();

    let report = pipeline::run(&config, FakeCompiler).unwrap();
    assert!(report.is_empty());
    assert!(report.is_success());
    assert!(config.out_dir.is_dir());
}

#[test]
fn missing_source_root_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());

    let err = pipeline::run(&config, FakeCompiler).unwrap_err();
    match err {
        TsmjsError::SourceDir { path, .. } => assert_eq!(path, config.src_dir),
        other => panic!("expected source dir error, got {other:?}"),
    }
    assert!(!config.out_dir.exists());
}

#[test]
fn file_source_root_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "src/ts", "not a directory\n");

    let config = config_in(root);
    let err = pipeline::run(&config, FakeCompiler).unwrap_err();
    assert!(matches!(err, TsmjsError::Walk(WalkError::NotADirectory(_))));
    assert!(!config.out_dir.exists());
}

#[test]
fn unwritable_output_path_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "src/ts/index.ts", "export {};\n");
    // a regular file where the output directory should go
    write(root, "lib", "not a directory\n");

    let err = pipeline::run(&config_in(root), FakeCompiler).unwrap_err();
    match err {
        TsmjsError::OutputDir { path, .. } => assert_eq!(path, root.join("lib/mjs")),
        other => panic!("expected output dir error, got {other:?}"),
    }
}

#[test]
fn builds_started_before_a_walk_error_are_joined() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(root, "src/ts/a/index.ts", "export {};\n");
    std::os::unix::fs::symlink(root.join("src/ts/a"), root.join("src/ts/a/loop")).unwrap();

    let config = config_in(root);
    let err = pipeline::run(&config, FakeCompiler).unwrap_err();
    assert!(matches!(err, TsmjsError::Walk(_)));
    // index.ts may or may not be listed before the loop; if it was, its build finished
    let built: Vec<PathBuf> = fs::read_dir(&config.out_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert!(built.is_empty() || built.contains(&config.out_dir.join("index.js")));
}
