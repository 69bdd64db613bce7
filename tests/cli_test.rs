//! CLI contract tests
//!
//! Drives the compiled binary against throwaway git repositories and checks
//! output formats, report files, init and the --fail-on-bad exit code.

use git2::{Repository, Signature, Time};
use std::path::Path;
use std::process::Command;

fn ihs_bin() -> &'static str {
    env!("CARGO_BIN_EXE_ihs")
}

/// Write `files` and commit them on HEAD
fn commit(repo: &Repository, files: &[(&str, &str)], message: &str, seconds: i64) {
    let root = repo.workdir().unwrap().to_path_buf();
    let mut index = repo.index().unwrap();
    for (path, content) in files {
        let full = root.join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(&full, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::new("Test", "test@example.com", &Time::new(seconds, 0)).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

fn setup_test_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let now = chrono::Utc::now().timestamp();
    commit(
        &repo,
        &[
            ("app/src/main.ts", "// TODO: remove\nconst x: any = 1;\n"),
            ("README.md", "# Demo\n"),
        ],
        "initial",
        now - 7200,
    );
    commit(
        &repo,
        &[
            ("app/src/main.ts", "export const x = 1;\n"),
            ("app/src/main.test.ts", "test('x', () => {});\n"),
            ("AGENTS.md", "# Agents\n"),
        ],
        "tidy up",
        now - 60,
    );
    dir
}

fn run_ihs(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(ihs_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run ihs");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn test_score_json_output() {
    let dir = setup_test_repo();
    let path = dir.path().to_str().unwrap();
    let (code, stdout, stderr) =
        run_ihs(&["score", path, "--skip-runtime-checks", "--format", "json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let report: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(report["current"]["source_files"], 1);
    assert_eq!(report["current"]["test_files"], 1);
    assert_eq!(report["previous"]["debt_markers"], 1);
    assert_eq!(report["scores"]["trend"], "improved");
    assert_eq!(report["runtime"]["unit_test"]["status"], "skipped");
    for key in ["overall", "corrosion", "testing", "documentation"] {
        let score = report["scores"][key].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score), "{} out of range", key);
    }
}

#[test]
fn test_first_commit_is_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    commit(
        &repo,
        &[("app/src/a.ts", "export {}\n")],
        "only",
        chrono::Utc::now().timestamp(),
    );

    let path = dir.path().to_str().unwrap();
    let (code, stdout, _) = run_ihs(&["score", path, "--skip-runtime-checks", "-f", "json"]);
    assert_eq!(code, 0);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["scores"]["trend"], "first-run baseline");
    assert!(report["previous"].is_null());
}

#[test]
fn test_markdown_writes_report_file() {
    let dir = setup_test_repo();
    let path = dir.path().to_str().unwrap();
    let (code, stdout, stderr) =
        run_ihs(&["score", path, "--skip-runtime-checks", "--format", "md"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.trim().is_empty());
    assert!(stderr.contains("Report written to"));

    let md = std::fs::read_to_string(dir.path().join("IHS.md")).expect("IHS.md");
    assert!(md.starts_with("# IHS Repository Health Report"));
    assert!(md.contains("## 7) Raw Data"));
}

#[test]
fn test_relative_output_resolves_against_repo_root() {
    let dir = setup_test_repo();
    let path = dir.path().to_str().unwrap();
    let (code, _, _) = run_ihs(&[
        "score",
        path,
        "--skip-runtime-checks",
        "--output",
        "reports/ihs.txt",
    ]);
    assert_eq!(code, 0);

    let text = std::fs::read_to_string(dir.path().join("reports/ihs.txt")).expect("report");
    assert!(text.contains("IHS Health Report"));
    assert!(!text.contains('\x1b'), "file output should not carry ANSI codes");
}

#[test]
fn test_init_writes_config_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_str().unwrap();

    let (code, _, _) = run_ihs(&["init", path]);
    assert_eq!(code, 0);
    let config = std::fs::read_to_string(dir.path().join("ihs.toml")).expect("ihs.toml");
    assert!(config.contains("[layout]"));

    let (code, _, stderr) = run_ihs(&["init", path]);
    assert_ne!(code, 0);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_fail_on_bad_exits_nonzero() {
    // No sources, no docs, no history: everything scores low
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_str().unwrap();

    let (code, stdout, _) = run_ihs(&["score", path, "--skip-runtime-checks", "--fail-on-bad"]);
    assert_eq!(code, 1);
    assert!(stdout.contains("bad"));

    let (code, _, _) = run_ihs(&["score", path, "--skip-runtime-checks"]);
    assert_eq!(code, 0, "without --fail-on-bad a bad verdict still exits 0");
}

#[test]
fn test_missing_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let (code, _, stderr) = run_ihs(&["score", missing.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Path does not exist"));
}
