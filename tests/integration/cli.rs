use assert_cmd::Command;
use assert_cmd::assert::{Assert, OutputAssertExt};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use crate::common::{TestRegistry, sample_items};

fn kitpm() -> Command {
    let mut cmd = Command::cargo_bin("kitpm").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("HTTPS_PROXY")
        .env_remove("https_proxy");
    cmd
}

/// Run `args` against `registry` from `dir` on a blocking thread.
async fn run(registry: &TestRegistry, dir: &std::path::Path, args: &[&str]) -> Assert {
    let base_url = registry.base_url.clone();
    let dir = dir.to_path_buf();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let output = tokio::task::spawn_blocking(move || {
        kitpm().current_dir(dir).env("REGISTRY_URL", base_url).args(args).output().unwrap()
    })
    .await
    .unwrap();
    output.assert()
}

#[test]
fn test_help_lists_commands() {
    kitpm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("view"));
}

#[test]
fn test_unknown_subcommand_fails() {
    kitpm()
        .arg("remove")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_add_without_names_fails() {
    kitpm().arg("add").assert().failure().stderr(predicate::str::contains("<COMPONENT>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_installs_and_reports() {
    let registry = TestRegistry::start(sample_items()).await;
    let temp = TempDir::new().unwrap();

    run(&registry, temp.path(), &["add", "button"])
        .await
        .success()
        .stdout(predicate::str::contains("created"))
        .stdout(predicate::str::contains("button.tsx"))
        .stdout(predicate::str::contains("npm install @radix-ui/react-slot clsx tailwind-merge"));

    assert!(temp.path().join("components/ui/button.tsx").exists());
    assert!(temp.path().join("lib/utils.ts").exists());

    // second run skips the existing file
    run(&registry, temp.path(), &["add", "button"])
        .await
        .success()
        .stdout(predicate::str::contains("skipped"))
        .stdout(predicate::str::contains("already exists"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_with_cwd_and_quiet() {
    let registry = TestRegistry::start(sample_items()).await;
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("web");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("components.json"), r#"{ "tsx": false }"#).unwrap();

    run(&registry, temp.path(), &["-q", "--cwd", "web", "add", "use-toggle"])
        .await
        .success()
        .stdout(predicate::str::is_empty());

    assert!(project.join("hooks/use-toggle.js").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_unknown_component_suggests() {
    let registry = TestRegistry::start(sample_items()).await;
    let temp = TempDir::new().unwrap();

    run(&registry, temp.path(), &["add", "buton"])
        .await
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Component 'buton' is not in the registry"))
        .stderr(predicate::str::contains("Did you mean 'button'?"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_and_view() {
    let registry = TestRegistry::start(sample_items()).await;
    let temp = TempDir::new().unwrap();

    run(&registry, temp.path(), &["list", "--kind", "hook"])
        .await
        .success()
        .stdout(predicate::str::contains("use-toggle"))
        .stdout(predicate::str::contains("button").not());

    run(&registry, temp.path(), &["view", "button"])
        .await
        .success()
        .stdout(predicate::str::contains("Displays a button."))
        .stdout(predicate::str::contains("registry/ui/button.tsx"));

    run(&registry, temp.path(), &["view", "toggle-buton"])
        .await
        .failure()
        .stderr(predicate::str::contains("Did you mean 'toggle-button'?"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_project_config_is_reported() {
    let registry = TestRegistry::start(sample_items()).await;
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("components.json"), "{ tsx: ").unwrap();

    run(&registry, temp.path(), &["add", "button"])
        .await
        .failure()
        .stderr(predicate::str::contains("Invalid project config"));
}
