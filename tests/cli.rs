use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn temp_workspace() -> TempDir {
    tempfile::tempdir().expect("create tempdir")
}

fn write_corpus(workspace: &TempDir) {
    let corpus = workspace.path().join("corpus");
    fs::create_dir(&corpus).expect("create corpus dir");
    fs::write(corpus.join("a.txt"), "The cat sat. The dog sat.\n").expect("write a.txt");
}

fn ngram_stats() -> Command {
    Command::cargo_bin("ngram-stats").expect("binary exists")
}

#[test]
fn analyze_writes_csv_tables() {
    let workspace = temp_workspace();
    write_corpus(&workspace);

    ngram_stats()
        .current_dir(workspace.path())
        .args(["--quiet", "analyze", "corpus", "-o", "out", "--no-progress"])
        .assert()
        .success();

    let out = workspace.path().join("out");
    for stem in [
        "ngrams",
        "n_minus1_grams",
        "vocabulary",
        "witten-bell",
        "good-turing",
    ] {
        assert!(out.join(format!("{stem}.csv")).exists(), "{stem}.csv written");
    }
    let vocabulary = fs::read_to_string(out.join("vocabulary.csv")).expect("read vocabulary");
    assert_eq!(vocabulary, "the;2\ncat;1\nsat;2\ndog;1\n");
    let good_turing = fs::read_to_string(out.join("good-turing.csv")).expect("read good-turing");
    assert!(good_turing.starts_with("0;12;"));
}

#[test]
fn json_report_can_be_inspected() {
    let workspace = temp_workspace();
    write_corpus(&workspace);

    ngram_stats()
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "analyze",
            "corpus",
            "-o",
            "out",
            "--format",
            "json",
            "--strategy",
            "cross-product",
            "--pretty",
            "--no-progress",
        ])
        .assert()
        .success();
    let report_path = workspace.path().join("out").join("analysis.json");
    assert!(report_path.exists(), "analysis.json was created");
    assert!(!workspace.path().join("out").join("ngrams.csv").exists());

    let output = ngram_stats()
        .current_dir(workspace.path())
        .args(["--quiet", "inspect", "-r", "out/analysis.json", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let summary: Value = serde_json::from_slice(&output).expect("inspect emits JSON");
    assert_eq!(summary["order"], 2);
    assert_eq!(summary["lower"], 0);
    assert_eq!(summary["upper"], 1);
    let rows = summary["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["count"], 12);
    assert_eq!(rows[1]["count"], 4);

    let text = ngram_stats()
        .current_dir(workspace.path())
        .args(["--quiet", "inspect", "-r", "out/analysis.json", "--lower", "1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(text).expect("utf-8 output");
    assert!(text.contains("Frequency"));
    assert!(text.contains("Window        : 1..=1"));
}

#[test]
fn order_below_two_is_rejected() {
    let workspace = temp_workspace();
    write_corpus(&workspace);

    ngram_stats()
        .current_dir(workspace.path())
        .args(["--quiet", "analyze", "corpus", "-n", "1", "-o", "out", "--no-progress"])
        .assert()
        .failure();
    assert!(!workspace.path().join("out").exists());
}

#[test]
fn smoothing_failure_writes_nothing() {
    let workspace = temp_workspace();
    let corpus = workspace.path().join("repeated.txt");
    fs::write(&corpus, "a b. a b.\n").expect("write corpus");

    ngram_stats()
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "analyze",
            "repeated.txt",
            "-k",
            "1",
            "-o",
            "out",
            "--no-progress",
        ])
        .assert()
        .failure();
    assert!(!workspace.path().join("out").exists());
}

#[test]
fn failed_report_leaves_no_csv_tables() {
    let workspace = temp_workspace();
    write_corpus(&workspace);
    let out = workspace.path().join("out");
    fs::create_dir_all(out.join("analysis.json")).expect("occupy report path");

    ngram_stats()
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "analyze",
            "corpus",
            "-o",
            "out",
            "--format",
            "both",
            "--no-progress",
        ])
        .assert()
        .failure();

    assert!(!out.join("ngrams.csv").exists());
    let leftovers: Vec<_> = fs::read_dir(&out)
        .expect("read output dir")
        .map(|entry| entry.expect("dir entry").file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("analysis.json")]);
}

#[test]
fn both_formats_are_written_together() {
    let workspace = temp_workspace();
    write_corpus(&workspace);

    ngram_stats()
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "analyze",
            "corpus",
            "-o",
            "out",
            "--format",
            "both",
            "--no-progress",
        ])
        .assert()
        .success();
    let out = workspace.path().join("out");
    assert!(out.join("analysis.json").is_file());
    assert!(out.join("good-turing.csv").is_file());
}
