//! End-to-end runs of the binary on manifest-only modes

mod helper;

use helper::TempManifest;
use predicates::prelude::*;

#[test]
fn list_prints_sorted_requirements() {
    let manifest = TempManifest::new("six>=1.0\n# tools\nattrs\n");

    manifest
        .command()
        .arg("-l")
        .assert()
        .success()
        .stdout("attrs\nsix   >=1.0\n");
}

#[test]
fn search_finds_matching_lines() {
    let manifest = TempManifest::new("Flask==3.0\nrequests\nflask-cors\n");

    manifest
        .command()
        .args(["-s", "^flask", "-i"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 entries."));
}

#[test]
fn search_without_matches_exits_with_failure() {
    let manifest = TempManifest::new("requests\n");

    manifest
        .command()
        .args(["-s", "django"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No entries found with: django"));
}

#[test]
fn search_with_invalid_pattern_is_an_error() {
    let manifest = TempManifest::new("requests\n");

    manifest
        .command()
        .args(["-s", "[a-"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid search pattern"));
}

#[test]
fn sort_rewrites_the_file() {
    let manifest = TempManifest::new("six\n# web\nFlask\nattrs\n");

    manifest
        .command()
        .arg("-S")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Sorted requirements file:"));

    assert_eq!(manifest.read(), "attrs\n# web\nFlask\nsix\n");
}

#[test]
fn duplicates_exit_with_failure() {
    let manifest = TempManifest::new("six\nattrs\nSix==1.16.0\n");

    manifest
        .command()
        .arg("-d")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("six has 2 entries (lines 1, 3)"));
}

#[test]
fn no_duplicates_succeeds() {
    let manifest = TempManifest::new("six\nattrs\n");

    manifest
        .command()
        .arg("-d")
        .assert()
        .success()
        .stdout("No duplicate requirements found.\n");
}

#[test]
fn add_creates_the_file() {
    let manifest = TempManifest::missing();

    manifest
        .command()
        .args(["-a", "requests>=2.32", "six"])
        .assert()
        .success()
        .stdout("Added requirement: requests>=2.32\nAdded requirement: six\n");

    assert_eq!(manifest.read(), "requests>=2.32\nsix\n");
}

#[test]
fn add_replaces_an_existing_requirement() {
    let manifest = TempManifest::new("# deps\nrequests>=2.0\nsix\n");

    manifest
        .command()
        .args(["-a", "Requests>=2.32"])
        .assert()
        .success()
        .stdout("Replaced requirement with: Requests>=2.32\n");

    assert_eq!(manifest.read(), "# deps\nRequests>=2.32\nsix\n");
}

#[test]
fn add_existing_requirement_is_rejected() {
    let manifest = TempManifest::new("six\n");

    manifest
        .command()
        .args(["-a", "six"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("six"));

    assert_eq!(manifest.read(), "six\n");
}

#[test]
fn empty_manifest_is_not_an_error() {
    let manifest = TempManifest::new("# only comments\n\n");

    manifest
        .command()
        .arg("-c")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("No requirements found in"));
}

#[test]
fn missing_manifest_is_an_error() {
    let manifest = TempManifest::missing();

    manifest
        .command()
        .arg("-l")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("requirements.txt"));
}

#[test]
fn conflicting_modes_are_rejected() {
    let manifest = TempManifest::new("six\n");

    manifest.command().args(["-l", "-S"]).assert().failure();
}

#[test]
fn add_malformed_marker_leaves_file_untouched() {
    let manifest = TempManifest::new("six\n");

    manifest
        .command()
        .args(["-a", "requests>=2.0 ; this is not a marker!!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid requirement"));

    assert_eq!(manifest.read(), "six\n");
}

#[test]
fn search_modifiers_without_search_are_rejected() {
    let manifest = TempManifest::new("six\n");

    manifest.command().args(["-d", "-i"]).assert().failure();
}
