//! Requirement checking against fake installed packages and a fake index

mod helper;

use std::time::Duration;

use helper::{FakeIndex, FakeInstalled, TempManifest};
use requirementz::cli::{self, CheckOptions, Context, Mode, Outcome, Printer, Theme};
use requirementz::parser::RequirementsTxtParser;
use requirementz::version::checker::{LookupFailure, compare, filter_issues};
use requirementz::version::fetch::{FetchOptions, fetch_remote_index};
use requirementz::version::installed::InstalledIndex;
use requirementz::version::types::{InstalledPackage, Status};

fn fast() -> FetchOptions {
    FetchOptions {
        timeout: Duration::from_secs(5),
        stagger: Duration::ZERO,
    }
}

async fn run_mode(
    manifest: &TempManifest,
    installed: &FakeInstalled,
    index: &FakeIndex,
    mode: Mode,
) -> (Outcome, String, String) {
    let context = Context {
        manifest_path: manifest.path(),
        installed,
        index,
        fetch: fast(),
    };
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut printer = Printer::new(&mut out, &mut err, Theme::plain());
    let outcome = cli::run(&context, mode, &mut printer).await.unwrap();
    (
        outcome,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[tokio::test]
async fn compare_reports_every_status() {
    let content = "\
colr>=0.7.6
requests
Django==4.2
attrs>=1,<2
-e ./mylib
broken>=1.0 extra
";
    let requirements = RequirementsTxtParser::new().parse(content);
    let installed = InstalledIndex::new(vec![
        InstalledPackage::new("colr", "0.7.5", "/site"),
        InstalledPackage::new("requests", "2.31.0", "/site"),
        InstalledPackage::new("django", "4.2", "/site"),
        InstalledPackage::new("attrs", "1.5", "/site"),
    ]);

    let reports = compare(&requirements, &installed, None);
    let statuses: Vec<Status> = reports.iter().map(|r| r.status).collect();

    assert_eq!(
        statuses,
        vec![
            Status::Unsatisfied,
            Status::Satisfied,
            Status::Satisfied,
            Status::Satisfied,
            Status::Unknown,
            Status::Unknown,
        ]
    );
    assert_eq!(
        reports[0].failed_constraint.as_ref().map(|c| c.version.as_str()),
        Some("0.7.6")
    );

    let issues = filter_issues(&reports, false);
    let lines: Vec<usize> = issues.iter().map(|r| r.requirement.line_number).collect();
    assert_eq!(lines, vec![1, 6]);

    let with_unchecked = filter_issues(&reports, true);
    assert_eq!(with_unchecked.len(), 3);
}

#[tokio::test]
async fn compare_with_remote_marks_outdated_and_degrades_failures() {
    let requirements = RequirementsTxtParser::new().parse("requests>=2.0\nsix\ninternal\nflaky\n");
    let installed = InstalledIndex::new(vec![
        InstalledPackage::new("requests", "2.31.0", "/site"),
        InstalledPackage::new("six", "1.16.0", "/site"),
        InstalledPackage::new("internal", "1.0", "/site"),
        InstalledPackage::new("flaky", "1.0", "/site"),
    ]);
    let index = FakeIndex::new()
        .with_latest("requests", "2.32.5")
        .with_latest("six", "1.16.0")
        .with_failure("flaky");

    let names: Vec<&str> = requirements.iter().map(|r| r.normalized_name.as_str()).collect();
    let remote = fetch_remote_index(&index, names, fast()).await;
    let reports = compare(&requirements, &installed, Some(&remote));

    assert_eq!(reports[0].status, Status::Outdated);
    assert_eq!(reports[1].status, Status::Satisfied);
    assert_eq!(reports[2].status, Status::Satisfied);
    assert_eq!(reports[2].remote_error, Some(LookupFailure::NotFound));
    assert_eq!(reports[3].status, Status::Unknown);
    assert!(matches!(reports[3].remote_error, Some(LookupFailure::Failed(_))));
}

#[tokio::test]
async fn fetch_deduplicates_names_and_times_out() {
    let index = FakeIndex::new()
        .with_latest("foo-bar", "1.0")
        .with_delay(Duration::from_millis(200));
    let options = FetchOptions {
        timeout: Duration::from_millis(20),
        stagger: Duration::ZERO,
    };

    let remote = fetch_remote_index(&index, ["Foo_Bar", "foo-bar", "foo.bar"], options).await;

    assert_eq!(index.calls(), 1);
    assert_eq!(remote.len(), 1);
    assert!(matches!(remote.get("FOO_BAR"), Some(Err(_))));
}

#[tokio::test]
async fn run_check_latest_prints_index_column() {
    let manifest = TempManifest::new("requests>=2.0\n");
    let installed = FakeInstalled::new().with_package("requests", "2.31.0");
    let index = FakeIndex::new().with_latest("requests", "2.32.5");
    let mode = Mode::Check(CheckOptions {
        latest: true,
        ..Default::default()
    });

    let (outcome, out, _) = run_mode(&manifest, &installed, &index, mode).await;

    assert_eq!(outcome, Outcome::Issues(1));
    assert!(out.starts_with("Error requests"));
    assert!(out.trim_end().ends_with("- pypi: 2.32.5"));
}

#[tokio::test]
async fn run_check_without_latest_never_touches_the_index() {
    let manifest = TempManifest::new("six\n");
    let installed = FakeInstalled::new().with_package("six", "1.16.0");
    let index = FakeIndex::new();

    let (outcome, _, _) = run_mode(
        &manifest,
        &installed,
        &index,
        Mode::Check(CheckOptions::default()),
    )
    .await;

    assert_eq!(outcome, Outcome::Success);
    assert_eq!(index.calls(), 0);
}

#[tokio::test]
async fn run_on_empty_manifest_prints_notice() {
    let manifest = TempManifest::new("# nothing yet\n\n");
    let installed = FakeInstalled::new();
    let index = FakeIndex::new();

    let (outcome, out, err) = run_mode(
        &manifest,
        &installed,
        &index,
        Mode::Check(CheckOptions::default()),
    )
    .await;

    assert_eq!(outcome, Outcome::Success);
    assert!(out.is_empty());
    assert!(err.starts_with("No requirements found in"));
}

#[tokio::test]
async fn run_info_uses_manifest_packages() {
    let manifest = TempManifest::new("six\nrequests>=2\n");
    let installed = FakeInstalled::new().with_package("six", "1.16.0");
    let index = FakeIndex::new()
        .with_latest("six", "1.17.0")
        .with_latest("requests", "2.32.5");

    let (outcome, out, err) = run_mode(
        &manifest,
        &installed,
        &index,
        Mode::Info { names: Vec::new() },
    )
    .await;

    assert_eq!(outcome, Outcome::Success);
    assert!(err.is_empty());
    let requests = out.find("requests").unwrap();
    let six = out.find("six").unwrap();
    assert!(requests < six);
    assert!(out.contains("Latest: 1.17.0 (installed: 1.16.0)"));
    assert!(out.contains("Latest: 2.32.5 (not installed)"));
}
