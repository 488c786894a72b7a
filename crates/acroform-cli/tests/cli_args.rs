//! Integration tests for the `acroform` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn cmd() -> Command {
    Command::cargo_bin("acroform").unwrap()
}

const FORM_JSON: &str = r#"{
    "default_appearance": "/Helv 12 Tf 0 g",
    "fields": [
        { "name": "name", "type": "text", "value": "Ada",
          "widgets": [{ "rect": [72, 700, 272, 720], "border_color": [0, 0, 0] }] },
        { "name": "agree", "type": "checkbox", "value": "Yes",
          "widgets": [{ "rect": [72, 660, 86, 674] }] }
    ]
}"#;

fn render(dir: &Path) -> std::path::PathBuf {
    let input = dir.join("form.json");
    let out = dir.join("form.pdf");
    std::fs::write(&input, FORM_JSON).unwrap();
    cmd()
        .arg("render")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    out
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("regen"))
        .stdout(predicate::str::contains("fields"));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    cmd().assert().failure().code(2);
}

#[test]
fn da_decodes_font_size_and_color() {
    cmd()
        .args(["da", "/Helv 12 Tf 0.5 g"])
        .assert()
        .success()
        .stdout(predicate::str::contains("font\tHelv"))
        .stdout(predicate::str::contains("size\t12"))
        .stdout(predicate::str::contains("color\t0.5 g"));
}

#[test]
fn da_treats_zero_gray_as_unset() {
    cmd()
        .args(["da", "/Helv 12 Tf 0 g"])
        .assert()
        .success()
        .stdout(predicate::str::contains("color\t-"));
}

#[test]
fn da_json_reports_auto_size() {
    let output = cmd()
        .args(["da", "/Cour 0 Tf 1 0 0 rg", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["font"], "Cour");
    assert_eq!(value["auto_size"], true);
    assert_eq!(value["color"], serde_json::json!([1.0, 0.0, 0.0]));
}

#[test]
fn fit_uses_box_height_for_empty_text() {
    // 20 * 1000 / (931 + 225) for Helvetica's bounding box.
    cmd()
        .args(["fit", "--width", "100", "--height", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("17.301"));
}

#[test]
fn fit_rejects_unknown_font() {
    cmd()
        .args(["fit", "--width", "10", "--height", "10", "--font", "Comic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown standard font"));
}

#[test]
fn render_writes_a_form_with_appearances() {
    let dir = tempfile::tempdir().unwrap();
    let out = render(dir.path());

    let doc = lopdf::Document::load(&out).unwrap();
    let catalog = doc.catalog().unwrap();
    let acroform = match catalog.get(b"AcroForm").unwrap() {
        lopdf::Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
        lopdf::Object::Dictionary(dict) => dict,
        other => panic!("unexpected /AcroForm {other:?}"),
    };
    let fields = acroform.get(b"Fields").unwrap().as_array().unwrap();
    assert_eq!(fields.len(), 2);
}

#[test]
fn render_rejects_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    std::fs::write(&input, r#"{ "feilds": [] }"#).unwrap();
    cmd()
        .arg("render")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid form description"));
}

#[test]
fn fields_lists_rendered_values() {
    let dir = tempfile::tempdir().unwrap();
    let out = render(dir.path());
    cmd()
        .arg("fields")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("name\ttext\tAda\t1"))
        .stdout(predicate::str::contains("agree\tcheckbox\tYes\t1\tYes"));
}

#[test]
fn regen_applies_assignments() {
    let dir = tempfile::tempdir().unwrap();
    let out = render(dir.path());
    let updated = dir.path().join("updated.pdf");
    cmd()
        .arg("regen")
        .arg(&out)
        .arg("-o")
        .arg(&updated)
        .args(["--set", "name=Grace", "--set", "agree=Off"])
        .assert()
        .success();

    let output = cmd()
        .arg("fields")
        .arg(&updated)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    let name = rows.iter().find(|r| r["name"] == "name").unwrap();
    assert_eq!(name["value"], "Grace");
    let agree = rows.iter().find(|r| r["name"] == "agree").unwrap();
    assert_eq!(agree["state"], "Off");
}

#[test]
fn regen_reports_unknown_field() {
    let dir = tempfile::tempdir().unwrap();
    let out = render(dir.path());
    cmd()
        .arg("regen")
        .arg(&out)
        .arg("-o")
        .arg(dir.path().join("x.pdf"))
        .args(["--set", "nope=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no field named 'nope'"));
}

#[test]
fn fields_reports_missing_file() {
    cmd()
        .args(["fields", "does-not-exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}
