#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const TEMPLATE: &str = "Dear {{Donor.name}},
<!-- denver wording start -->
old denver
<!-- denver wording end -->
<!-- wslope wording start -->
old wslope
<!-- wslope wording end -->
<!-- denver sig start -->
old signature
<!-- denver sig end -->
";

const SIGNATURES: &str = r#"{
    "denver": {
        "Spring": [
            {"name": "Sam Ortiz", "title": "Board Chair", "min_gift": 50},
            {"name": "Ada Chen", "title": "Executive Director", "min_gift": 1000}
        ]
    },
    "wslope": {
        "Tied": [
            {"name": "One", "title": "x", "min_gift": 10},
            {"name": "Two", "title": "x", "min_gift": 10}
        ]
    }
}"#;

fn letterbox(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("letterbox").unwrap();
    cmd.current_dir(dir.path())
        .env("LETTERBOX_ROOT", dir.path())
        .env_remove("LETTERBOX_OWNER")
        .env_remove("LETTERBOX_REPO")
        .env_remove("LETTERBOX_BRANCH")
        .env_remove("GITHUB_TOKEN")
        .arg("--local")
        .arg(dir.path());
    cmd
}

fn write(dir: &TempDir, path: &str, body: &str) {
    let full = dir.path().join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, body).unwrap();
}

fn read(dir: &TempDir, path: &str) -> String {
    std::fs::read_to_string(dir.path().join(path)).unwrap()
}

fn exists(dir: &TempDir, path: &str) -> bool {
    Path::new(&dir.path().join(path)).exists()
}

// ---------------------------------------------------------------------------
// letterbox signature preview
// ---------------------------------------------------------------------------

#[test]
fn preview_custom_signees_prints_snippet() {
    let dir = TempDir::new().unwrap();
    let expected = [
        "{{#if (compare Gift.amount.value \">\" 99.99)}}",
        "<p>",
        "A",
        "<br>",
        "T1",
        "</p>",
        "{{else}}",
        "<p>",
        "B",
        "<br>",
        "T2",
        "</p>",
        "{{/if}}",
    ]
    .join("\n");

    letterbox(&dir)
        .args([
            "signature",
            "preview",
            "--location",
            "denver",
            "--signee",
            "B|T2|50",
            "--signee",
            "A|T1|100",
        ])
        .assert()
        .success()
        .stdout(format!("{expected}\n"));
}

#[test]
fn preview_rejects_more_than_four_signees() {
    let dir = TempDir::new().unwrap();
    let mut cmd = letterbox(&dir);
    cmd.args(["signature", "preview", "--location", "wslope"]);
    for i in 0..5 {
        cmd.args(["--signee", &format!("N{i}|T|{i}")]);
    }
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 4 signees"));
}

#[test]
fn preview_preset_json() {
    let dir = TempDir::new().unwrap();
    write(&dir, "config/signatures.json", SIGNATURES);

    let output = letterbox(&dir)
        .args(["--json", "signature", "preview", "--location", "denver", "--set", "Spring"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["location"], "denver");
    assert_eq!(value["signees"][0]["name"], "Ada Chen");
    assert!(value["snippet"]
        .as_str()
        .unwrap()
        .starts_with("{{#if (compare Gift.amount.value \">\" 999.99)}}"));
}

#[test]
fn unknown_preset_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "config/signatures.json", SIGNATURES);

    letterbox(&dir)
        .args(["signature", "preview", "--location", "denver", "--set", "Winter"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'Winter' not found"));
}

// ---------------------------------------------------------------------------
// letterbox signature sets / apply
// ---------------------------------------------------------------------------

#[test]
fn sets_lists_presets() {
    let dir = TempDir::new().unwrap();
    write(&dir, "config/signatures.json", SIGNATURES);

    letterbox(&dir)
        .args(["signature", "sets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Spring"))
        .stdout(predicate::str::contains("Ada Chen (1000.00)"))
        .stdout(predicate::str::contains("Tied"));
}

#[test]
fn apply_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    write(&dir, "config/signatures.json", SIGNATURES);
    write(&dir, "updated_letters/appeal_live.txt", TEMPLATE);

    letterbox(&dir)
        .args(["signature", "apply", "--location", "denver", "--set", "Spring"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("confirmation required"));
    assert_eq!(read(&dir, "updated_letters/appeal_live.txt"), TEMPLATE);
}

#[test]
fn apply_rewrites_live_letters_only() {
    let dir = TempDir::new().unwrap();
    write(&dir, "config/signatures.json", SIGNATURES);
    write(&dir, "updated_letters/appeal_live.txt", TEMPLATE);
    write(&dir, "updated_letters/appeal_draft.txt", TEMPLATE);

    letterbox(&dir)
        .args(["signature", "apply", "--location", "denver", "--set", "Spring", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("appeal_live.txt"))
        .stdout(predicate::str::contains("Signature update (Denver) complete."));

    let live = read(&dir, "updated_letters/appeal_live.txt");
    assert!(live.contains(
        "<!-- denver sig start -->\n{{#if (compare Gift.amount.value \">\" 999.99)}}\n<p>\nAda Chen"
    ));
    assert!(live.contains("Board Chair\n</p>\n{{/if}}\n<!-- denver sig end -->"));
    assert!(!live.contains("old signature"));
    assert_eq!(read(&dir, "updated_letters/appeal_draft.txt"), TEMPLATE);
}

#[test]
fn apply_missing_signature_tags_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    write(&dir, "config/signatures.json", SIGNATURES);
    write(&dir, "updated_letters/appeal_live.txt", TEMPLATE);

    letterbox(&dir)
        .args(["signature", "apply", "--location", "wslope", "--set", "Tied", "--yes"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("failed"))
        .stderr(predicate::str::contains("1 of 1 files failed"));
}

#[test]
fn apply_refuses_preset_with_negative_minimum() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "config/signatures.json",
        r#"{"denver": {"Bad": [
            {"name": "A", "title": "x", "min_gift": -5},
            {"name": "B", "title": "x", "min_gift": -20}
        ]}, "wslope": {}}"#,
    );
    write(&dir, "updated_letters/appeal_live.txt", TEMPLATE);

    letterbox(&dir)
        .args(["signature", "apply", "--location", "denver", "--set", "Bad", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid minimum gift"));
    assert_eq!(read(&dir, "updated_letters/appeal_live.txt"), TEMPLATE);
}

// ---------------------------------------------------------------------------
// letterbox wording
// ---------------------------------------------------------------------------

#[test]
fn wording_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    write(&dir, "wording/denver.txt", "new denver");

    letterbox(&dir)
        .args(["wording", "--scope", "denver", "--denver-file"])
        .arg(dir.path().join("wording/denver.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("confirmation required"));
}

#[test]
fn wording_requires_text_for_each_location() {
    let dir = TempDir::new().unwrap();
    write(&dir, "wording/denver.txt", "new denver");

    letterbox(&dir)
        .args(["wording", "--scope", "both", "--yes", "--denver-file"])
        .arg(dir.path().join("wording/denver.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no wording supplied for WSlope"));
}

#[test]
fn wording_both_builds_letters_from_templates() {
    let dir = TempDir::new().unwrap();
    write(&dir, "base_templates/appeal_live.txt", TEMPLATE);
    write(&dir, "wording/denver.txt", "First.\n\nSecond.\n");
    write(&dir, "wording/wslope.txt", "Mountain wording\n");

    letterbox(&dir)
        .args(["wording", "--scope", "both", "--html", "--yes", "--denver-file"])
        .arg(dir.path().join("wording/denver.txt"))
        .arg("--wslope-file")
        .arg(dir.path().join("wording/wslope.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let letter = read(&dir, "updated_letters/appeal_live.txt");
    assert!(letter.contains(
        "<!-- denver wording start -->\n<p>First.</p>\n\n<p>Second.</p>\n<!-- denver wording end -->"
    ));
    assert!(letter.contains(
        "<!-- wslope wording start -->\n<p>Mountain wording</p>\n<!-- wslope wording end -->"
    ));
    assert_eq!(read(&dir, "base_templates/appeal_live.txt"), TEMPLATE);
}

#[test]
fn wording_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    write(&dir, "base_templates/appeal.md", TEMPLATE);
    write(&dir, "wording/denver.txt", "x");
    write(&dir, "wording/wslope.txt", "y");

    let output = letterbox(&dir)
        .args(["--json", "wording", "--scope", "both", "--dry-run", "--denver-file"])
        .arg(dir.path().join("wording/denver.txt"))
        .arg("--wslope-file")
        .arg(dir.path().join("wording/wslope.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["results"][0]["status"], "planned");
    assert_eq!(value["failed"], 0);
    assert!(!exists(&dir, "updated_letters/appeal.md"));
}

#[test]
fn wording_reads_stdin() {
    let dir = TempDir::new().unwrap();
    write(&dir, "updated_letters/a.txt", TEMPLATE);

    letterbox(&dir)
        .args(["wording", "--scope", "wslope", "--yes", "--wslope-file", "-"])
        .write_stdin("from stdin\n")
        .assert()
        .success();

    let letter = read(&dir, "updated_letters/a.txt");
    assert!(letter.contains("<!-- wslope wording start -->\nfrom stdin\n<!-- wslope wording end -->"));
    assert!(letter.contains("old denver"));
}

// ---------------------------------------------------------------------------
// letterbox files / config
// ---------------------------------------------------------------------------

#[test]
fn files_lists_text_like_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "updated_letters/a.txt", "x");
    write(&dir, "updated_letters/b.pdf", "x");

    letterbox(&dir)
        .arg("files")
        .assert()
        .success()
        .stdout(predicate::str::contains("updated_letters/a.txt"))
        .stdout(predicate::str::contains("b.pdf").not());
}

#[test]
fn files_in_missing_folder_is_empty() {
    let dir = TempDir::new().unwrap();

    letterbox(&dir)
        .args(["files", "--folder", "nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No letter files in 'nowhere'."));
}

#[test]
fn files_refuses_folders_outside_the_checkout() {
    let dir = TempDir::new().unwrap();

    letterbox(&dir)
        .args(["files", "--folder", "../.."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'..' segments are not allowed"));
}

#[test]
fn settings_file_moves_folders() {
    let dir = TempDir::new().unwrap();
    write(&dir, "letterbox.yaml", "folders:\n  updated_letters: out\n");
    write(&dir, "out/z_live.txt", "x");

    letterbox(&dir)
        .arg("files")
        .assert()
        .success()
        .stdout(predicate::str::contains("out/z_live.txt"));
}

#[test]
fn config_validate_warns_on_shared_minimums() {
    let dir = TempDir::new().unwrap();
    write(&dir, "config/signatures.json", SIGNATURES);

    letterbox(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning] wslope/Tied"));
}

#[test]
fn config_validate_fails_on_empty_set() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "config/signatures.json",
        r#"{"denver": {"Empty": []}, "wslope": {}}"#,
    );

    letterbox(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] denver/Empty"));
}

#[test]
fn github_mode_needs_a_repository() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("letterbox").unwrap();
    cmd.current_dir(dir.path())
        .env("LETTERBOX_ROOT", dir.path())
        .env_remove("LETTERBOX_OWNER")
        .env_remove("LETTERBOX_REPO")
        .env_remove("GITHUB_TOKEN")
        .arg("files")
        .assert()
        .failure()
        .stderr(predicate::str::contains("repository not configured"));
}
