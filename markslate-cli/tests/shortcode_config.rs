use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const CONFIG: &str = r#"
[[shortcodes]]
name = "note"
kind = "block"
template = '<aside class="note">{{title}}</aside>'
"#;

#[test]
fn configured_component_renders_in_html() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, "Intro\n\n:::note\ntitle: Careful\n:::\n").unwrap();
    let config = dir.path().join("markslate.toml");
    fs::write(&config, CONFIG).unwrap();

    let mut cmd = cargo_bin_cmd!("markslate");
    cmd.arg(&input)
        .arg("--to")
        .arg("html")
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"<aside class="note">Careful</aside>"#));
}

#[test]
fn unconfigured_component_stays_literal() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, ":::note\ntitle: Careful\n:::\n").unwrap();

    let mut cmd = cargo_bin_cmd!("markslate");
    cmd.arg(&input).arg("--to").arg("markdown");

    cmd.assert()
        .success()
        .stdout(":::note\ntitle: Careful\n:::\n");
}

#[test]
fn inspect_shows_resolved_component() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, ":::note\ntitle: Careful\n:::\n").unwrap();
    let config = dir.path().join("markslate.toml");
    fs::write(&config, CONFIG).unwrap();

    let mut cmd = cargo_bin_cmd!("markslate");
    cmd.arg("inspect")
        .arg(&input)
        .arg("slate")
        .arg("--config")
        .arg(&config);

    cmd.assert().success().stdout(
        predicate::str::contains("\"component\"").and(predicate::str::contains("\"Careful\"")),
    );
}

#[test]
fn missing_config_file_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, "a").unwrap();

    let mut cmd = cargo_bin_cmd!("markslate");
    cmd.arg(&input)
        .arg("--to")
        .arg("markdown")
        .arg("--config")
        .arg(dir.path().join("absent.toml"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
