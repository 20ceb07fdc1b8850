use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Lays out `src/` and `doc/_store/` side by side, the way the default
/// templates expect when run from `doc/`.
fn project() -> TempDir {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("src")).unwrap();
    fs::create_dir_all(root.path().join("doc").join("_store")).unwrap();

    write(root.path(), "weekday", "// code\n/*\n!!sphinx\nweekday\n=======\n!!sphinx\n*/\n");
    write(root.path(), "gap", "!!sphinx\ngap\n===\n!!sphinx\nint gap;\n!!sphinx\nMore on gap.\n!!sphinx\n");
    write(root.path(), "tcorr", "int main() { return 0; }\n");
    root
}

fn write(root: &Path, name: &str, content: &str) {
    fs::write(root.join("src").join(format!("{}.cc", name)), content).unwrap();
}

fn genrst(root: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("genrst").unwrap();
    cmd.current_dir(root.path().join("doc")).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_default_run_writes_all_outputs() {
    let root = project();

    genrst(&root).arg("-q").assert().success();

    let store = root.path().join("doc").join("_store");
    assert_eq!(
        fs::read_to_string(store.join("weekday.rst")).unwrap(),
        "weekday\n=======\n"
    );
    assert_eq!(
        fs::read_to_string(store.join("gap.rst")).unwrap(),
        "gap\n===\nMore on gap.\n"
    );
    assert_eq!(fs::read_to_string(store.join("tcorr.rst")).unwrap(), "");
}

#[test]
fn test_missing_source_stops_run() {
    let root = project();

    genrst(&root)
        .args(["weekday", "missing", "gap", "--output-format", "plain"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing.cc"));

    let store = root.path().join("doc").join("_store");
    assert!(store.join("weekday.rst").exists());
    assert!(!store.join("missing.rst").exists());
    assert!(!store.join("gap.rst").exists());
}

#[test]
fn test_missing_dest_dir_fails_without_create_dirs() {
    let root = project();
    fs::remove_dir(root.path().join("doc").join("_store")).unwrap();

    genrst(&root).arg("-q").assert().code(4);

    genrst(&root).args(["-q", "--create-dirs"]).assert().success();
    assert!(root.path().join("doc/_store/gap.rst").exists());
}

#[test]
fn test_custom_sentinel_and_names() {
    let root = project();
    write(root.path(), "interp", "@@doc trailing text\nInterpolation\n@@doc\n!!sphinx\n");

    genrst(&root)
        .args(["interp", "--sentinel", "@@doc", "--dest-ext", "txt", "-q"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(root.path().join("doc/_store/interp.txt")).unwrap(),
        "Interpolation\n"
    );
}

#[test]
fn test_json_report_and_output() {
    let root = project();
    write(root.path(), "open", "!!sphinx\nnever closed\n");

    genrst(&root)
        .args(["open", "--output-format", "json", "--report", "report.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"unterminated\""));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.path().join("doc/report.json")).unwrap())
            .unwrap();
    assert_eq!(report["summary"]["unterminated"][0], "open");
    assert_eq!(
        fs::read_to_string(root.path().join("doc/_store/open.rst")).unwrap(),
        "never closed\n"
    );
}

#[test]
fn test_discover_uses_source_directory() {
    let root = project();

    genrst(&root)
        .args(["--discover", "--dry-run", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gap.cc"))
        .stdout(predicate::str::contains("tcorr.rst"));

    assert!(!root.path().join("doc/_store/gap.rst").exists());
}

#[test]
fn test_config_file_is_loaded() {
    let root = project();
    fs::write(
        root.path().join("doc").join("genrst.toml"),
        "names = [\"gap\"]\n\n[paths]\ndest_dir = \"generated\"\n\n[output]\ncreate_missing_dirs = true\n",
    )
    .unwrap();

    genrst(&root).arg("-q").assert().success();

    assert!(root.path().join("doc/generated/gap.rst").exists());
    assert!(!root.path().join("doc/generated/weekday.rst").exists());
}

#[test]
fn test_invalid_name_rejected() {
    let root = project();

    genrst(&root)
        .args(["../escape"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid source name"));
}

#[test]
fn test_rerun_is_stable() {
    let root = project();
    let gap = root.path().join("doc/_store/gap.rst");

    genrst(&root).arg("-q").assert().success();
    let first = fs::read(&gap).unwrap();
    genrst(&root).arg("-q").assert().success();

    assert_eq!(first, fs::read(&gap).unwrap());
}

#[test]
fn test_destination_aliasing_source_is_refused() {
    let root = project();
    let original = fs::read(root.path().join("src/gap.cc")).unwrap();

    genrst(&root)
        .args(["gap", "--dest-dir", "../doc/../src", "--dest-ext", "cc", "-q"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Refusing to overwrite source file"));

    assert_eq!(fs::read(root.path().join("src/gap.cc")).unwrap(), original);
}

#[test]
fn test_startup_errors_follow_output_format() {
    let root = project();

    genrst(&root)
        .args(["../escape", "--output-format", "json"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"level\":\"error\""))
        .stdout(predicate::str::contains("Invalid source name"));
}

#[test]
fn test_failure_reported_once() {
    let root = project();

    genrst(&root)
        .args(["missing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing.cc").count(1));
}
