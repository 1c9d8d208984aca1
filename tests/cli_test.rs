// tests/cli_test.rs
use std::path::Path;
use std::process::Command;

fn git_monotag() -> Command {
    Command::new(env!("CARGO_BIN_EXE_git-monotag"))
}

#[test]
fn test_git_monotag_help() {
    let output = git_monotag()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git-monotag"));
    assert!(stdout.contains("status"));
    assert!(stdout.contains("increment"));
}

#[test]
fn test_git_monotag_version() {
    let output = git_monotag()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_bump_is_rejected() {
    let output = git_monotag()
        .args(["increment", "Api", "huge"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2), "clap usage errors exit with 2");
}

#[test]
fn test_missing_repository_exits_with_error() {
    let output = git_monotag()
        .args(["--repo-dir", "/definitely/not/a/repo", "list"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ERROR"), "got: {}", stderr);
}

#[test]
fn test_list_in_repository() {
    let dir = tempfile::tempdir().unwrap();
    git2::Repository::init(dir.path()).expect("Could not init git repo");
    std::fs::write(dir.path().join(".monotag.toml"), "[git]\nbranch = \"HEAD\"\n").unwrap();
    for descriptor in ["Core/Core.csproj", "Api/Api.proj", "Api.Tests/Api.Tests.proj"] {
        let path = dir.path().join(descriptor);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "<Project />").unwrap();
    }

    let output = git_monotag()
        .arg("--repo-dir")
        .arg(Path::new(dir.path()))
        .arg("list")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = console::strip_ansi_codes(&String::from_utf8(output.stdout).unwrap()).to_string();
    assert_eq!(stdout, " #0 Api\n #1 Core\n");
}
