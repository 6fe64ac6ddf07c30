//! End-to-end runs of the `buildvar` binary against the packaging fixture.

use assert_cmd::Command;
use predicates::str::contains;
use std::path::{Path, PathBuf};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/android.toml")
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("buildvar").unwrap();
    // keep the developer's host config out of the run
    cmd.env("XDG_CONFIG_HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd
}

fn with_fixture(args: &[&str]) -> Command {
    let mut cmd = cmd();
    cmd.args(args).arg("--config").arg(fixture());
    cmd
}

#[test]
fn resolve_release_human() {
    with_fixture(&["resolve", "release"])
        .assert()
        .success()
        .stdout(contains("Variant: release"))
        .stdout(contains("Shrink resources: true"))
        .stdout(contains("proguard-rules.pro"));
}

#[test]
fn resolve_debug_json() {
    with_fixture(&["resolve", "debug", "--json"])
        .assert()
        .success()
        .stdout(contains("\"variant_key\""))
        .stdout(contains("\"min_platform\": 21"));
}

#[test]
fn resolve_broken_fails_with_field() {
    with_fixture(&["resolve", "broken"])
        .assert()
        .failure()
        .stderr(contains("OPTIMIZATION_POLICY"))
        .stderr(contains("optimization.shrink_code"));
}

#[test]
fn resolve_unknown_lists_available() {
    with_fixture(&["resolve", "nightly"])
        .assert()
        .failure()
        .stderr(contains("UNKNOWN_VARIANT"))
        .stderr(contains("Available variants: debug, release, broken, staging"));
}

#[test]
fn list_excludes_failures() {
    with_fixture(&["list"])
        .assert()
        .success()
        .stdout(contains("Buildable variants (3 of 4)"))
        .stderr(contains("broken"));
}

#[test]
fn list_json_tags_errors() {
    with_fixture(&["list", "--json"])
        .assert()
        .success()
        .stdout(contains("\"kind\": \"OPTIMIZATION_POLICY\""));
}

#[test]
fn verify_fails_on_broken_variant() {
    with_fixture(&["verify"])
        .assert()
        .failure()
        .stdout(contains("FAIL broken"))
        .stderr(contains("1 of 4 variants failed validation"));
}

#[test]
fn verify_passes_after_set_override() {
    // replacing the variant list drops the broken entry
    with_fixture(&["verify", "--set", r#"variants=[{"name": "debug"}]"#])
        .assert()
        .success()
        .stdout(contains("All 1 variants valid"));
}

#[test]
fn config_redacts_credentials() {
    with_fixture(&["config"])
        .assert()
        .success()
        .stdout(contains("[REDACTED]"))
        .stdout(contains("buildvar/effective_config@1"));
}

#[test]
fn bad_set_syntax_is_rejected() {
    with_fixture(&["list", "--set", "toolchain.min_platform"])
        .assert()
        .failure()
        .stderr(contains("KEY=VALUE"));
}

#[test]
fn config_prints_duplicate_declarations_without_registering() {
    with_fixture(&[
        "config",
        "--set",
        r#"variants=[{"name": "debug"}, {"name": "debug"}]"#,
    ])
    .assert()
    .success()
    .stdout(contains("buildvar/effective_config@1"));
}

#[test]
fn set_keeps_version_text() {
    with_fixture(&[
        "resolve",
        "debug",
        "--json",
        "--set",
        "toolchain.ndk_version=26.10",
        "--set",
        "signing.alias=1234",
    ])
    .assert()
    .success()
    .stdout(contains("\"ndk_version\": \"26.10\""))
    .stdout(contains("\"alias\": \"1234\""));
}
