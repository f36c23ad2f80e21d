use assert_cmd::prelude::*;
use std::process::Command;

fn mapa_cli() -> Command {
    Command::new(assert_cmd::cargo_bin!("mapa-cli"))
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).expect("stdout is JSON")
}

#[test]
fn tree_without_input_prints_the_seed() {
    let doc = stdout_json(mapa_cli().arg("tree"));
    assert_eq!(doc["id"], "root");
    assert_eq!(doc["type"], "root");
    assert_eq!(doc["children"].as_array().map(Vec::len), Some(6));
}

#[test]
fn layout_prints_every_node_and_edge() {
    let doc = stdout_json(mapa_cli().args(["layout", "--pretty"]));
    let nodes = doc["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 24);
    assert_eq!(doc["edges"].as_array().map(Vec::len), Some(23));
    assert_eq!(nodes[0]["id"], "root");
    assert_eq!(nodes[0]["x"], 0.0);
    assert_eq!(nodes[0]["y"], 0.0);
}

#[test]
fn layout_reads_a_tree_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("tree.json");
    std::fs::write(
        &input,
        r#"{"id":"r","name":"R","type":"root","children":[{"id":"a","name":"A"},{"id":"b","name":"B"}]}"#,
    )
    .expect("write tree");

    let doc = stdout_json(mapa_cli().arg("layout").arg(&input));
    let nodes = doc["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[1]["kind"], "item");
    assert_eq!(nodes[1]["x"], 340.0);
    assert_eq!(nodes[2]["y"], 48.0);
}

#[test]
fn render_svg_applies_edits() {
    let out = mapa_cli()
        .args(["render", "--edit", "n1=Renamed Node", "--width", "800", "--height", "600"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let svg = String::from_utf8(out).expect("utf8");
    assert!(svg.starts_with("<svg"), "{svg}");
    assert!(svg.contains(r#"data-node-id="n1""#));
    assert!(svg.contains("Renamed Node"));
    assert!(!svg.contains("Nicho: Immersive"));
}

#[test]
fn render_png_writes_the_output_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("map.png");

    mapa_cli()
        .args(["render", "--format", "png", "--width", "320", "--height", "200", "--out"])
        .arg(&out)
        .assert()
        .success();

    let bytes = std::fs::read(&out).expect("png written");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[test]
fn invalid_trees_fail_at_runtime() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("dup.json");
    std::fs::write(
        &input,
        r#"{"id":"r","name":"R","type":"root","children":[{"id":"r","name":"again"}]}"#,
    )
    .expect("write tree");

    let output = mapa_cli().arg("layout").arg(&input).output().expect("run");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate node id"));
}

#[test]
fn unknown_themes_fail_at_runtime() {
    mapa_cli()
        .args(["render", "--theme", "neon"])
        .assert()
        .code(1);
}

#[test]
fn bad_flags_are_usage_errors() {
    mapa_cli().args(["render", "--bogus"]).assert().code(2);
    mapa_cli().args(["render", "--edit", "no-separator"]).assert().code(2);
    mapa_cli().args(["render", "--width", "0"]).assert().code(2);
}
