//! Runs the `roadnet-export` binary the way a user would, from a scratch
//! working directory.

use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../roadnet-core/test_fixtures")
        .join(name)
}

fn scratch_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("roadnet_cli_tests").join(test_name);
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn roadnet_export() -> Command {
    Command::new(env!("CARGO_BIN_EXE_roadnet-export"))
}

#[test]
fn test_missing_input_exits_with_status_one() {
    let dir = scratch_dir("missing_input");

    let output = roadnet_export().current_dir(&dir).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("taipei_with_security.graphml"), "stdout: {stdout}");
    assert!(!dir.join("taipei_with_security.json").exists());
}

#[test]
fn test_default_paths_in_working_directory() {
    let dir = scratch_dir("default_paths");
    std::fs::copy(
        fixture("taipei_sample.graphml"),
        dir.join("taipei_with_security.graphml"),
    )
    .unwrap();

    let output = roadnet_export().current_dir(&dir).output().unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let written = std::fs::read_to_string(dir.join("taipei_with_security.json")).unwrap();
    let expected = std::fs::read_to_string(fixture("taipei_sample.expected.json")).unwrap();
    assert_eq!(written, expected.trim_end());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nodes: 5"));
    assert!(stdout.contains("Edges: 6"));
    assert!(stdout.contains("assets/mock_data/"));
}

#[test]
fn test_explicit_paths_and_report() {
    let dir = scratch_dir("explicit_paths");
    let out = dir.join("network.json");
    let report = dir.join("report.json");

    let output = roadnet_export()
        .arg("--input")
        .arg(fixture("taipei_sample.graphml"))
        .arg("--output")
        .arg(&out)
        .arg("--report")
        .arg(&report)
        .arg("--profile")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(out.exists());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(report["node_count"], 5);
    assert_eq!(report["edge_count"], 6);
    assert_eq!(report["graph_metadata"]["crs"], "epsg:4326");
    assert_eq!(report["input_sha256"].as_str().unwrap().len(), 64);
    assert_eq!(report["stage_timings"].as_array().unwrap().len(), 4);
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let dir = scratch_dir("broken_config");
    let config = dir.join("export.yaml");
    std::fs::write(&config, "coordinate_fallback: [not, a, policy]\n").unwrap();
    let out = dir.join("out.json");

    let output = roadnet_export()
        .arg("-i")
        .arg(fixture("single_node.graphml"))
        .arg("-o")
        .arg(&out)
        .arg("-c")
        .arg(&config)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stdout.contains("Loaded config from"), "stdout: {stdout}");
    assert!(stderr.contains("Failed to load config"), "stderr: {stderr}");
    assert!(out.exists());
}

#[test]
fn test_valid_config_is_reported_and_applied() {
    let dir = scratch_dir("valid_config");
    let config = dir.join("export.yaml");
    std::fs::write(&config, "coordinate_fallback: falsy\n").unwrap();
    let out = dir.join("out.json");

    let output = roadnet_export()
        .arg("-i")
        .arg(fixture("taipei_sample.graphml"))
        .arg("-o")
        .arg(&out)
        .arg("-c")
        .arg(&config)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loaded config from"), "stdout: {stdout}");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["nodes"][4]["latitude"], 25.1);
}

#[test]
fn test_malformed_input_fails_without_output() {
    let dir = scratch_dir("malformed_input");
    let out = dir.join("out.json");

    let output = roadnet_export()
        .arg("-i")
        .arg(fixture("truncated.graphml"))
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Export failed"), "stderr: {stderr}");
    assert!(!out.exists());
}

#[test]
fn test_rejects_unknown_fallback_policy() {
    let output = roadnet_export()
        .arg("--coordinate-fallback")
        .arg("nearest")
        .output()
        .unwrap();

    assert!(!output.status.success());
}
