/// Integration test suite — drives the compiled `metagraph` binary against small graph
/// documents written to a temporary directory.
///
/// All tests invoke the binary via subprocess. The `CARGO_BIN_EXE_metagraph` environment
/// variable is set by Cargo during `cargo test` to point to the compiled binary for the
/// current profile (debug or release).
///
/// The main fixture is a five-node path A-B-C-D-E laid out on a horizontal line, plus an
/// unconnected node F, with two metadata types so grouping has something to do.
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_metagraph"))
}

const PATH_GRAPH: &str = r#"{
  "nodes": [
    {"id": 1, "type": "CustomObject", "fullName": "Account",          "x": 0,   "y": 0},
    {"id": 2, "type": "ApexTrigger",  "fullName": "Account Trigger",  "x": 100, "y": 0},
    {"id": 3, "type": "ApexClass",    "fullName": "AccountService",   "x": 200, "y": 0},
    {"id": 4, "type": "ApexClass",    "fullName": "ContactService",   "x": 300, "y": 0},
    {"id": 5, "type": "CustomObject", "fullName": "Contact",          "x": 400, "y": 0},
    {"id": 6, "type": "ApexClass",    "fullName": "Unused",           "x": 0,   "y": 300}
  ],
  "edges": [
    {"source": 2, "target": 1},
    {"source": 2, "target": 3},
    {"source": 3, "target": 4},
    {"source": 4, "target": 5}
  ]
}"#;

/// Write the fixture graph (and optional config) into a fresh temp dir.
fn fixture(config: Option<&str>) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let graph = dir.path().join("graph.json");
    std::fs::write(&graph, PATH_GRAPH).expect("failed to write graph fixture");
    if let Some(config) = config {
        std::fs::write(dir.path().join("metagraph.toml"), config).expect("failed to write config");
    }
    (dir, graph)
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture file");
    path
}

/// Run a metagraph command and assert it exits successfully.
/// Returns stdout as a String.
fn run_success(args: &[&str]) -> String {
    let out = Command::new(binary())
        .args(args)
        .output()
        .expect("failed to invoke metagraph binary");
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        out.status.success(),
        "command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
        args,
        out.status,
        stdout,
        stderr
    );
    stdout
}

/// Run a metagraph command and assert it exits with a non-zero status.
/// Returns (stdout, stderr) as Strings.
fn run_failure(args: &[&str]) -> (String, String) {
    let out = Command::new(binary())
        .args(args)
        .output()
        .expect("failed to invoke metagraph binary");
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        !out.status.success(),
        "command {:?} expected to fail but exited successfully\nstdout: {}\nstderr: {}",
        args,
        stdout,
        stderr
    );
    (stdout, stderr)
}

/// Node ids listed in compact output (`  node <fullName> <id>` lines), sorted.
fn node_ids(stdout: &str) -> Vec<String> {
    let mut ids: Vec<String> = stdout
        .lines()
        .filter(|l| l.starts_with("  node "))
        .filter_map(|l| l.rsplit(' ').next())
        .map(str::to_owned)
        .collect();
    ids.sort();
    ids
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// test_search_full_name — substring, case-insensitive match on fullName.
#[test]
fn test_search_full_name() {
    let (_dir, graph) = fixture(None);
    let stdout = run_success(&["search", "account", graph.to_str().unwrap()]);
    assert_eq!(node_ids(&stdout), vec!["1", "2", "3"], "stdout: {}", stdout);
    assert!(stdout.contains("3 nodes selected"), "stdout: {}", stdout);
}

/// test_search_attribute_override — --attr replaces the configured scope.
#[test]
fn test_search_attribute_override() {
    let (_dir, graph) = fixture(None);
    let stdout = run_success(&[
        "search",
        "^apexclass$",
        graph.to_str().unwrap(),
        "--attr",
        "type",
    ]);
    assert_eq!(node_ids(&stdout), vec!["3", "4", "6"]);
}

/// test_search_scope_from_config — search_attributes in metagraph.toml is honoured.
#[test]
fn test_search_scope_from_config() {
    let (_dir, graph) = fixture(Some("search_attributes = [\"id\"]\n"));
    let stdout = run_success(&["search", "^5$", graph.to_str().unwrap()]);
    assert_eq!(node_ids(&stdout), vec!["5"]);
}

/// test_search_invalid_pattern — an unbalanced group fails with a pattern error.
#[test]
fn test_search_invalid_pattern() {
    let (_dir, graph) = fixture(None);
    let (_, stderr) = run_failure(&["search", "(", graph.to_str().unwrap()]);
    assert!(
        stderr.contains("invalid search pattern"),
        "stderr should name the pattern error\nstderr: {}",
        stderr
    );
}

/// test_search_unknown_attribute — a misspelled attribute is rejected.
#[test]
fn test_search_unknown_attribute() {
    let (_dir, graph) = fixture(None);
    let (_, stderr) = run_failure(&[
        "search",
        "x",
        graph.to_str().unwrap(),
        "--attr",
        "fullname",
    ]);
    assert!(stderr.contains("unknown node attribute"), "stderr: {}", stderr);
}

/// test_search_json_output — JSON output parses and is grouped in legend order.
#[test]
fn test_search_json_output() {
    let (_dir, graph) = fixture(None);
    let stdout = run_success(&["search", "Account", graph.to_str().unwrap(), "--format", "json"]);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("search --format json output is not valid JSON");
    assert_eq!(parsed["count"], 3);
    assert_eq!(parsed["groupBy"], "type");
    let groups: Vec<&str> = parsed["groups"]
        .as_array()
        .expect("groups should be an array")
        .iter()
        .map(|g| g["group"].as_str().unwrap())
        .collect();
    // Legend order: ApexTrigger (1 node), CustomObject (2), ApexClass (3).
    assert_eq!(groups, vec!["ApexTrigger", "CustomObject", "ApexClass"]);
}

// ---------------------------------------------------------------------------
// Box selection
// ---------------------------------------------------------------------------

/// test_select_box_identity — box around B with no pan/zoom.
#[test]
fn test_select_box_identity() {
    let (_dir, graph) = fixture(None);
    let stdout = run_success(&[
        "select-box",
        graph.to_str().unwrap(),
        "--from",
        "110,10",
        "--to",
        "90,-10",
    ]);
    assert_eq!(node_ids(&stdout), vec!["2"]);
}

/// test_select_box_inclusive_edges — nodes exactly on the box border are selected.
#[test]
fn test_select_box_inclusive_edges() {
    let (_dir, graph) = fixture(None);
    let stdout = run_success(&[
        "select-box",
        graph.to_str().unwrap(),
        "--from",
        "100,0",
        "--to",
        "300,0",
    ]);
    assert_eq!(node_ids(&stdout), vec!["2", "3", "4"]);
}

/// test_select_box_with_transform — pan and zoom are removed before hit-testing.
#[test]
fn test_select_box_with_transform() {
    let (_dir, graph) = fixture(None);
    // pointer = graph * 2 + (10, 10): graph x in [300, 400] is pointer x in [610, 810].
    let stdout = run_success(&[
        "select-box",
        graph.to_str().unwrap(),
        "--from",
        "610,0",
        "--to",
        "810,20",
        "--translate",
        "10,10",
        "--scale",
        "2",
    ]);
    assert_eq!(node_ids(&stdout), vec!["4", "5"]);
}

/// test_select_box_rejects_bad_scale — a non-positive zoom is an argument error.
#[test]
fn test_select_box_rejects_bad_scale() {
    let (_dir, graph) = fixture(None);
    let (_, stderr) = run_failure(&[
        "select-box",
        graph.to_str().unwrap(),
        "--from",
        "0,0",
        "--to",
        "1,1",
        "--scale",
        "0",
    ]);
    assert!(stderr.contains("--scale must be positive"), "stderr: {}", stderr);
}

// ---------------------------------------------------------------------------
// Expansion, contraction, legend
// ---------------------------------------------------------------------------

/// test_expand_steps — one and two hops from B along the path.
#[test]
fn test_expand_steps() {
    let (_dir, graph) = fixture(None);
    let path = graph.to_str().unwrap();
    let one = run_success(&["expand", path, "--select", "2"]);
    assert_eq!(node_ids(&one), vec!["1", "2", "3"]);
    let two = run_success(&["expand", path, "--select", "2", "--steps", "2"]);
    assert_eq!(node_ids(&two), vec!["1", "2", "3", "4"]);
    let all = run_success(&["expand", path, "--select", "2", "--steps", "10"]);
    assert_eq!(node_ids(&all), vec!["1", "2", "3", "4", "5"], "node 6 is unconnected");
}

/// test_expand_unknown_id — unknown ids fail the command.
#[test]
fn test_expand_unknown_id() {
    let (_dir, graph) = fixture(None);
    let (_, stderr) = run_failure(&["expand", graph.to_str().unwrap(), "--select", "99"]);
    assert!(stderr.contains("no node with id '99'"), "stderr: {}", stderr);
}

/// test_contract_drops_isolated_members — 5 and 6 have no selected neighbour.
#[test]
fn test_contract_drops_isolated_members() {
    let (_dir, graph) = fixture(None);
    let stdout = run_success(&["contract", graph.to_str().unwrap(), "--select", "1,2,3,5,6"]);
    assert_eq!(node_ids(&stdout), vec!["1", "2", "3"]);
}

/// test_legend — groups ordered smallest first, palette assigned in that order.
#[test]
fn test_legend() {
    let (_dir, graph) = fixture(None);
    let stdout = run_success(&["legend", graph.to_str().unwrap()]);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "legend ApexTrigger 1 #1f77b4",
            "legend CustomObject 2 #ff7f0e",
            "legend ApexClass 3 #2ca02c",
            "3 groups by type",
        ]
    );
}

/// test_group_by_override — --group-by wins over the config file.
#[test]
fn test_group_by_override() {
    let (_dir, graph) = fixture(Some("group_by = \"type\"\n"));
    let stdout = run_success(&["legend", graph.to_str().unwrap(), "--group-by", "fullName"]);
    assert!(stdout.contains("6 groups by fullName"), "stdout: {}", stdout);
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// test_replay_box_then_expand — box around B, then three expansions cover the whole path.
#[test]
fn test_replay_box_then_expand() {
    let (dir, graph) = fixture(None);
    let events = write_file(
        dir.path(),
        "events.jsonl",
        r#"{"event": "pointerDown", "x": 90, "y": -10}
{"event": "pointerMove", "x": 100, "y": 0}
{"event": "pointerUp", "x": 110, "y": 10}
{"event": "expand"}
{"event": "expand"}

{"event": "expand"}
"#,
    );
    let stdout = run_success(&["replay", graph.to_str().unwrap(), events.to_str().unwrap()]);
    assert_eq!(node_ids(&stdout), vec!["1", "2", "3", "4", "5"]);
}

/// test_replay_bad_search_keeps_selection — an invalid pattern is logged and skipped.
#[test]
fn test_replay_bad_search_keeps_selection() {
    let (dir, graph) = fixture(None);
    let events = write_file(
        dir.path(),
        "events.jsonl",
        r#"{"event": "clickNode", "id": "1"}
{"event": "search", "pattern": "("}
{"event": "not-an-event"}
"#,
    );
    let out = Command::new(binary())
        .args(["replay", graph.to_str().unwrap(), events.to_str().unwrap()])
        .output()
        .expect("failed to invoke metagraph binary");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(node_ids(&stdout), vec!["1"]);
    assert!(stderr.contains("event rejected"), "stderr: {}", stderr);
}

/// test_replay_transform_and_scope — pan/zoom and checkbox events feed later gestures.
#[test]
fn test_replay_transform_and_scope() {
    let (dir, graph) = fixture(None);
    let events = write_file(
        dir.path(),
        "events.jsonl",
        r#"{"event": "setTransform", "translateX": 0, "translateY": 0, "scale": 0.5}
{"event": "pointerDown", "x": -1, "y": -1}
{"event": "pointerUp", "x": 51, "y": 1}
{"event": "toggleAttribute", "key": "type"}
{"event": "search", "pattern": "customobject"}
"#,
    );
    // Box covers graph x in [-2, 102]: A and B. Then search over fullName+type replaces it.
    let stdout = run_success(&[
        "replay",
        graph.to_str().unwrap(),
        events.to_str().unwrap(),
        "--format",
        "json",
    ]);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON");
    assert_eq!(parsed["count"], 2);
    assert_eq!(parsed["groups"][0]["group"], "CustomObject");
}

/// test_missing_graph_file — a load failure exits non-zero with the path in the message.
#[test]
fn test_missing_graph_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    let (_, stderr) = run_failure(&["legend", missing.to_str().unwrap()]);
    assert!(stderr.contains("nope.json"), "stderr: {}", stderr);
}
