use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const SNAPSHOT: &str = r#"{
    "classes": [
        {"name": "Parent", "namespace": "app"},
        {"name": "Child", "namespace": "app", "bases": ["app.Parent"]},
        {"name": "Logger", "namespace": "vendor.logging"}
    ],
    "objects": [
        {"id": "p", "class": "app.Parent", "attributes": {
            "child": {"ref": "c"},
            "log": {"ref": "l"}
        }},
        {"id": "c", "class": "app.Child", "attributes": {
            "items": {"list": [{"ref": "c"}, {"ref": "p"}]},
            "label": {"scalar": "leaf"}
        }},
        {"id": "l", "class": "vendor.logging.Logger"}
    ],
    "roots": [{"ref": "p"}, {"ref": "c"}, {"scalar": 42}]
}"#;

#[allow(deprecated)]
fn relmap() -> Command {
    let mut cmd = Command::cargo_bin("relmap").expect("binary");
    cmd.env_remove("RELMAP_CONFIG").env("RUST_LOG", "warn");
    cmd
}

fn write_snapshot(dir: &Path) -> PathBuf {
    let path = dir.join("heap.json");
    fs::write(&path, SNAPSHOT).unwrap();
    path
}

fn analyze_json(args: &[&str]) -> Value {
    let temp = tempdir().unwrap();
    let snapshot = write_snapshot(temp.path());
    let output = relmap()
        .arg("analyze")
        .arg(&snapshot)
        .args(["--format", "json"])
        .args(args)
        .output()
        .expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn entry<'a>(report: &'a Value, class: &str) -> Option<&'a Value> {
    report["classes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["class"] == class)
}

#[test]
fn json_report_for_parent_child_snapshot() {
    let report = analyze_json(&["--namespace", "app"]);

    let classes: Vec<_> = report["classes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["class"].as_str().unwrap())
        .collect();
    assert_eq!(classes, vec!["app.Child", "app.Parent"]);

    let parent = entry(&report, "app.Parent").unwrap();
    assert_eq!(parent["aggregations"].as_array().unwrap().len(), 1);
    assert_eq!(parent["aggregations"][0]["attribute"], "child");
    assert_eq!(parent["aggregations"][0]["multiplicity"], "single");
    assert_eq!(parent["inherits"].as_array().unwrap().len(), 0);

    let child = entry(&report, "app.Child").unwrap();
    let items: Vec<_> = child["aggregations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|agg| (agg["target"].as_str().unwrap(), agg["multiplicity"].as_str().unwrap()))
        .collect();
    assert_eq!(items, vec![("app.Child", "multiple"), ("app.Parent", "multiple")]);
    assert_eq!(child["inherits"][0], "app.Parent");
}

#[test]
fn exclude_flag_removes_class() {
    let report = analyze_json(&["--namespace", "app", "--exclude", "app.Parent"]);

    assert!(entry(&report, "app.Parent").is_none());
    let child = entry(&report, "app.Child").unwrap();
    let aggregations = child["aggregations"].as_array().unwrap();
    assert_eq!(aggregations.len(), 1);
    assert_eq!(aggregations[0]["target"], "app.Child");
    assert!(child["inherits"].as_array().unwrap().is_empty());
}

#[test]
fn dot_output_uses_diagram_styles() {
    let temp = tempdir().unwrap();
    let snapshot = write_snapshot(temp.path());

    relmap()
        .arg("analyze")
        .arg(&snapshot)
        .args(["--namespace", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rankdir=TB"))
        .stdout(predicate::str::contains("node [shape=box]"))
        .stdout(predicate::str::contains(
            "\"app.Parent\" -> \"app.Child\" [arrowhead=odiamond, label=\"child\"]",
        ))
        .stdout(predicate::str::contains(
            "\"app.Child\" -> \"app.Parent\" [arrowhead=empty]",
        ))
        .stdout(predicate::str::contains("Logger").not());
}

#[test]
fn config_file_supplies_namespace_and_exclusions() {
    let temp = tempdir().unwrap();
    let snapshot = write_snapshot(temp.path());
    let config = temp.path().join("relmap.toml");
    fs::write(
        &config,
        "target_namespace = \"app\"\nexcluded = [\"app.Child\"]\n",
    )
    .unwrap();
    let out = temp.path().join("report.json");

    relmap()
        .arg("analyze")
        .arg(&snapshot)
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "--output"])
        .arg(&out)
        .assert()
        .success();

    let report: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let classes = report["classes"].as_array().unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["class"], "app.Parent");
    assert!(classes[0]["aggregations"].as_array().unwrap().is_empty());
}

#[test]
fn missing_namespace_is_reported() {
    let temp = tempdir().unwrap();
    let snapshot = write_snapshot(temp.path());

    relmap()
        .arg("analyze")
        .arg(&snapshot)
        .assert()
        .failure()
        .stderr(predicate::str::contains("target_namespace"));
}

#[test]
fn image_formats_need_an_output_path() {
    let temp = tempdir().unwrap();
    let snapshot = write_snapshot(temp.path());

    relmap()
        .arg("analyze")
        .arg(&snapshot)
        .args(["--namespace", "app", "--format", "png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn broken_snapshot_reference_fails() {
    let temp = tempdir().unwrap();
    let snapshot = temp.path().join("broken.json");
    fs::write(
        &snapshot,
        r#"{"classes": [], "objects": [{"id": "x", "class": "app.Missing"}]}"#,
    )
    .unwrap();

    relmap()
        .arg("analyze")
        .arg(&snapshot)
        .args(["--namespace", "app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown class: app.Missing"));
}

#[test]
fn schema_and_config_commands() {
    relmap()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"classes\""))
        .stdout(predicate::str::contains("\"roots\""));

    relmap()
        .args(["config", "--namespace", "app", "--inheritance", "immediate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("target_namespace = \"app\""))
        .stdout(predicate::str::contains("inheritance = \"immediate_parents\""));
}

#[cfg(unix)]
fn fake_graphviz(dir: &Path, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-dot");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn image_output_pipes_dot_through_graphviz() {
    let temp = tempdir().unwrap();
    let snapshot = write_snapshot(temp.path());
    // Invoked as `dot -Tpng -o <path>`
    let dot = fake_graphviz(temp.path(), "#!/bin/sh\ncat > \"$3\"\n");
    let out = temp.path().join("out.png");

    relmap()
        .env("RELMAP_DOT", &dot)
        .arg("analyze")
        .arg(&snapshot)
        .args(["--namespace", "app", "--format", "png", "-o"])
        .arg(&out)
        .assert()
        .success();

    let rendered = fs::read_to_string(&out).unwrap();
    assert!(rendered.contains("rankdir=TB"));
    assert!(rendered.contains("\"app.Child\" -> \"app.Parent\" [arrowhead=empty]"));
}

#[cfg(unix)]
#[test]
fn graphviz_failure_is_reported_with_its_stderr() {
    let temp = tempdir().unwrap();
    let snapshot = write_snapshot(temp.path());
    let dot = fake_graphviz(
        temp.path(),
        "#!/bin/sh\ncat >/dev/null\necho \"layout exploded\" >&2\nexit 1\n",
    );
    let out = temp.path().join("out.svg");

    relmap()
        .env("RELMAP_DOT", &dot)
        .arg("analyze")
        .arg(&snapshot)
        .args(["--namespace", "app", "--format", "svg", "-o"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Graphviz exited with"))
        .stderr(predicate::str::contains("layout exploded"));
}

#[test]
fn skipped_roots_are_warned_about() {
    let temp = tempdir().unwrap();
    let snapshot = write_snapshot(temp.path());

    relmap()
        .arg("analyze")
        .arg(&snapshot)
        .args(["--namespace", "app"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring scalar root"));
}
