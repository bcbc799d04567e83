//! The `mdocs` binary against the fake contents server.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::common::fake_github::{FakeGitHub, LOGIN, TOKEN};

/// `mdocs` isolated to `data_dir` and talking to `server`.
fn mdocs(data_dir: &Path, server: &FakeGitHub) -> Command {
    let mut cmd = Command::cargo_bin("mdocs").unwrap();
    cmd.env_remove("MDOCS_TOKEN")
        .env_remove("MDOCS_DATA_DIR")
        .env_remove("MDOCS_API_URL")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--api-url")
        .arg(server.base_url());
    cmd
}

fn login_and_configure(data_dir: &Path, server: &FakeGitHub) {
    mdocs(data_dir, server)
        .args(["login", "--token", TOKEN])
        .assert()
        .success();
    mdocs(data_dir, server)
        .args(["repo", "set", "--owner", "octo", "--name", "handbook"])
        .assert()
        .success();
}

#[test]
fn test_help_lists_commands() {
    let server = FakeGitHub::start();
    let data = TempDir::new().unwrap();

    mdocs(data.path(), &server)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("--data-dir"));
}

#[test]
fn test_login_whoami_logout() {
    let server = FakeGitHub::start();
    let data = TempDir::new().unwrap();

    mdocs(data.path(), &server)
        .args(["login", "--token", TOKEN])
        .assert()
        .success()
        .stdout(format!("Logged in as {LOGIN}\n"));
    assert!(data.path().join("storage.json").exists());

    mdocs(data.path(), &server)
        .arg("whoami")
        .assert()
        .success()
        .stdout(format!("{LOGIN}\n"));

    mdocs(data.path(), &server)
        .arg("logout")
        .assert()
        .success();
    mdocs(data.path(), &server)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_login_token_from_stdin() {
    let server = FakeGitHub::start();
    let data = TempDir::new().unwrap();

    mdocs(data.path(), &server)
        .arg("login")
        .write_stdin(format!("{TOKEN}\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains(LOGIN));
}

#[test]
fn test_rejected_token_fails_login() {
    let server = FakeGitHub::start();
    let data = TempDir::new().unwrap();

    mdocs(data.path(), &server)
        .args(["login", "--token", "ghp_wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to authenticate"));
}

#[test]
fn test_repo_set_is_written_to_config() {
    let server = FakeGitHub::start();
    let data = TempDir::new().unwrap();

    mdocs(data.path(), &server)
        .args(["repo", "show"])
        .assert()
        .success()
        .stdout("No repository configured\n");

    mdocs(data.path(), &server)
        .args([
            "repo", "set", "--owner", "octo", "--name", "handbook", "--path", "notes/",
        ])
        .assert()
        .success();

    let config = std::fs::read_to_string(data.path().join("config.toml")).unwrap();
    assert!(config.contains("owner = \"octo\""), "{config}");
    assert!(config.contains("path = \"notes/\""), "{config}");
    mdocs(data.path(), &server)
        .args(["repo", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("octo/handbook"));
}

#[test]
fn test_list_requires_a_repository() {
    let server = FakeGitHub::start();
    let data = TempDir::new().unwrap();
    mdocs(data.path(), &server)
        .args(["login", "--token", TOKEN])
        .assert()
        .success();

    mdocs(data.path(), &server)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No repository configured"));
}

#[test]
fn test_document_lifecycle() {
    let server = FakeGitHub::start();
    let data = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    login_and_configure(data.path(), &server);

    let file = work.path().join("guide.md");
    std::fs::write(&file, "# Guide\n\nHello.\n").unwrap();
    mdocs(data.path(), &server)
        .arg("upload")
        .arg(&file)
        .assert()
        .success()
        .stdout("Uploaded docs/guide.md\n");
    assert_eq!(
        server.file_text("docs/guide.md").as_deref(),
        Some("# Guide\n\nHello.\n")
    );

    mdocs(data.path(), &server)
        .arg("list")
        .assert()
        .success()
        .stdout("guide.md\n");

    mdocs(data.path(), &server)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"path\": \"docs/guide.md\""));

    mdocs(data.path(), &server)
        .args(["show", "guide"])
        .assert()
        .success()
        .stdout("# Guide\n\nHello.\n");

    let out = work.path().join("out");
    mdocs(data.path(), &server)
        .args(["download", "guide.md", "--out"])
        .arg(&out)
        .assert()
        .success();
    assert_eq!(
        std::fs::read_to_string(out.join("guide.md")).unwrap(),
        "# Guide\n\nHello.\n"
    );

    mdocs(data.path(), &server)
        .args(["delete", "guide.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
    assert!(server.file_text("docs/guide.md").is_some());

    mdocs(data.path(), &server)
        .args(["delete", "guide.md", "--yes"])
        .assert()
        .success()
        .stdout("Deleted docs/guide.md\n");
    assert!(server.file_text("docs/guide.md").is_none());
}

#[test]
fn test_upload_reports_skipped_files() {
    let server = FakeGitHub::start();
    let data = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    login_and_configure(data.path(), &server);

    let good = work.path().join("a.md");
    let bad = work.path().join("notes.txt");
    std::fs::write(&good, "# A").unwrap();
    std::fs::write(&bad, "plain").unwrap();

    mdocs(data.path(), &server)
        .arg("upload")
        .arg(&good)
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Uploaded docs/a.md"))
        .stdout(predicate::str::contains("Skipped notes.txt"))
        .stderr(predicate::str::contains("1 of 2 file(s) were not uploaded"));
    assert!(server.file_text("docs/notes.txt").is_none());
}

#[test]
fn test_show_unknown_document() {
    let server = FakeGitHub::start();
    let data = TempDir::new().unwrap();
    login_and_configure(data.path(), &server);

    mdocs(data.path(), &server)
        .args(["show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No document named missing.md"));
}

#[test]
fn test_theme_commands() {
    let server = FakeGitHub::start();
    let data = TempDir::new().unwrap();

    mdocs(data.path(), &server)
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout("dark\n");
    mdocs(data.path(), &server)
        .args(["theme", "set", "light"])
        .assert()
        .success()
        .stdout("Theme set to light\n");
    mdocs(data.path(), &server)
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout("Theme set to dark\n");
}
