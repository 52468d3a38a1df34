//! The `stencil` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn stencil(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stencil").unwrap();
    cmd.env("STENCIL_CONFIG_PATH", config_dir.path().join("none.toml")).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_render_to_stdout() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("page.txt"), "{{ title }} has {{ items | length }} items").unwrap();

    stencil(&temp)
        .current_dir(temp.path())
        .args(["render", "page.txt", "--var", "title=Cart", "--var", "items=[1,2,3]"])
        .assert()
        .success()
        .stdout("Cart has 3 items");
}

#[test]
fn test_render_with_vars_file_root_and_includes() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("views")).unwrap();
    fs::write(
        temp.path().join("views/page.html"),
        "{{ style_includes() }}{{ user.name }}|{{ script_includes() }}",
    )
    .unwrap();
    fs::write(temp.path().join("vars.json"), r#"{"user": {"name": "Ada"}}"#).unwrap();
    let output = temp.path().join("out.html");

    stencil(&temp)
        .current_dir(temp.path())
        .args(["render", "page.html", "--root", "views", "--vars", "vars.json"])
        .args(["--script", "app.js", "--style", "<style>p{}</style>"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        fs::read_to_string(output).unwrap(),
        "<style>p{}</style>\nAda|<script src=\"app.js\"></script>\n"
    );
}

#[test]
fn test_missing_template_fails_with_suggestion() {
    let temp = TempDir::new().unwrap();

    stencil(&temp)
        .current_dir(temp.path())
        .args(["render", "missing.html"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Template file not found"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_unknown_variable_lists_suggestions() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("page.txt"), "{{ titel }}").unwrap();

    stencil(&temp)
        .current_dir(temp.path())
        .args(["render", "page.txt", "--var", "title=x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean"))
        .stderr(predicate::str::contains("title"));
}

#[test]
fn test_invalid_var_spec() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("page.txt"), "x").unwrap();

    stencil(&temp)
        .current_dir(temp.path())
        .args(["render", "page.txt", "--var", "oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid variable 'oops'"));
}

#[test]
fn test_path_command() {
    let temp = TempDir::new().unwrap();

    stencil(&temp)
        .args(["path", "--separator", "/", "a", "./b", "c/../d/"])
        .assert()
        .success()
        .stdout("a/b/d\n");

    stencil(&temp)
        .args(["path", "--separator", "/", "--normalize-only", "a//b", "../c"])
        .assert()
        .success()
        .stdout("a/b/../c\n");
}

#[test]
fn test_config_file_sets_root() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("site")).unwrap();
    fs::write(temp.path().join("site/index.txt"), "configured").unwrap();
    let config = temp.path().join("stencil.toml");
    let root = temp.path().join("site").display().to_string();
    fs::write(&config, format!("template_root = {root:?}\n")).unwrap();

    stencil(&temp)
        .arg("--config")
        .arg(&config)
        .args(["render", "index.txt"])
        .assert()
        .success()
        .stdout("configured");
}
