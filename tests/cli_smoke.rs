use assert_cmd::prelude::*;
use chrono::{Local, TimeZone, Utc};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;
use transtat::model::PullRequestRecord;
use transtat::store::Store;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let config_path = dir.join("config.yaml");
    fs::write(
        &config_path,
        r#"
github_token: "dummy-token"
repository:
  owner: "acme"
  name: "docs"
  trans_label: "translation"
  branch: "master"
except: "300"
duration:
  start: "2023-01-01T00:00:00Z"
  end: "2023-12-31T23:59:59Z"
chart:
  title: "Translation Contributions"
  series: "contrib"
"#,
    )
    .unwrap();
    config_path
}

fn seed_store(db_path: &Path) {
    let store = Store::open(db_path).unwrap();
    for (number, author, count) in [(100u64, "alice", 120u64), (200, "bob", 80), (300, "mallory", 999)] {
        store
            .insert(&PullRequestRecord {
                number,
                author: author.to_string(),
                merged_at: Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap(),
                base_branch: "master".to_string(),
                zh_word_count: count,
            })
            .unwrap();
    }
}

#[test]
fn help_smoke() {
    let mut cmd = Command::cargo_bin("transtat").unwrap();
    cmd.arg("--help").assert().success();
}

#[test]
fn report_renders_dated_svg() {
    let dir = tempdir().unwrap();
    let config_path = write_config(dir.path());
    let db_path = dir.path().join("db.sqlite");
    seed_store(&db_path);
    let out_dir = dir.path().join("charts");

    let mut cmd = Command::cargo_bin("transtat").unwrap();
    cmd.arg("--config")
        .arg(&config_path)
        .arg("--db")
        .arg(&db_path)
        .arg("--out")
        .arg(&out_dir)
        .arg("report");
    cmd.assert().success();

    let stamp = Local::now().format("%Y%m%d").to_string();
    let chart_path = out_dir.join(format!("{stamp}_contrib_pie.svg"));
    assert!(chart_path.exists(), "expected chart at {}", chart_path.display());

    let svg = fs::read_to_string(&chart_path).unwrap();
    assert!(svg.contains("alice"));
    assert!(svg.contains("bob"));
    assert!(svg.contains("other"));
    // Excluded numbers never reach the chart.
    assert!(!svg.contains("mallory"));
}

#[test]
fn report_fails_on_malformed_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, "github_token: \"\"\n").unwrap();

    let mut cmd = Command::cargo_bin("transtat").unwrap();
    cmd.arg("--config").arg(&config_path).arg("report");
    cmd.assert().failure();
}
