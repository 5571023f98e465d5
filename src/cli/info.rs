//! Package index information

use anyhow::Result;
use indexmap::IndexSet;

use crate::cli::format::info_block;
use crate::cli::{Context, Outcome, Printer};
use crate::manifest::ManifestError;
use crate::version::fetch::fetch_remote_index;

/// Print index information for `names`, or for every manifest package when
/// `names` is empty
///
/// A failed lookup is reported and counted; the remaining packages are still
/// shown.
pub async fn show_info(context: &Context<'_>, names: &[String], printer: &mut Printer<'_>) -> Result<Outcome> {
    let names: Vec<String> = if names.is_empty() {
        let manifest = context.load_manifest()?;
        let mut names: Vec<String> = manifest
            .registry_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        names.sort();
        names
    } else {
        names.to_vec()
    };
    let names: IndexSet<String> = names.into_iter().collect();
    if names.is_empty() {
        return Err(ManifestError::Empty(context.manifest_path.clone()).into());
    }

    let installed = context.load_installed()?;
    let remote = fetch_remote_index(context.index, names.iter().map(String::as_str), context.fetch).await;

    let mut failures = 0;
    for name in &names {
        match remote.get(name) {
            Some(Ok(info)) => {
                printer.println("")?;
                printer.println(info_block(info, installed.get(name), &printer.theme))?;
            }
            Some(Err(e)) => {
                failures += 1;
                printer.error_label("Failed to get index info for", format!("{name} ({e})"))?;
            }
            None => {
                failures += 1;
                printer.error_label("No info for package", name)?;
            }
        }
    }

    Ok(Outcome::from_count(failures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Theme;
    use crate::version::error::RegistryError;
    use crate::version::fetch::FetchOptions;
    use crate::version::installed::MockInstalledProvider;
    use crate::version::registry::MockPackageIndex;
    use crate::version::types::{InstalledPackage, RemotePackageInfo};
    use std::time::Duration;
    use tempfile::TempDir;

    fn provider() -> MockInstalledProvider {
        let mut provider = MockInstalledProvider::new();
        provider
            .expect_list_installed()
            .returning(|| Ok(vec![InstalledPackage::new("requests", "2.32.5", "/site")]));
        provider
    }

    fn index() -> MockPackageIndex {
        let mut index = MockPackageIndex::new();
        index.expect_fetch_latest().returning(|name| match name {
            "requests" => Ok(RemotePackageInfo {
                name: "requests".to_string(),
                latest_version: "2.32.5".to_string(),
                summary: Some("Python HTTP for Humans.".to_string()),
                release_count: 1,
                ..Default::default()
            }),
            other => Err(RegistryError::NotFound(other.to_string())),
        });
        index
    }

    async fn run(content: &str, names: &[String]) -> (Outcome, String, String) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");
        std::fs::write(&path, content).unwrap();
        let provider = provider();
        let index = index();
        let context = Context {
            manifest_path: path,
            installed: &provider,
            index: &index,
            fetch: FetchOptions {
                timeout: Duration::from_secs(5),
                stagger: Duration::ZERO,
            },
        };
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut printer = Printer::new(&mut out, &mut err, Theme::plain());
        let outcome = show_info(&context, names, &mut printer).await.unwrap();
        (
            outcome,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[tokio::test]
    async fn show_info_for_named_packages() {
        let names = vec!["requests".to_string(), "nope".to_string()];

        let (outcome, out, err) = run("", &names).await;

        assert_eq!(outcome, Outcome::Issues(1));
        assert!(out.contains("Python HTTP for Humans."));
        assert!(out.contains("Latest: 2.32.5 (installed)"));
        assert!(err.contains("Failed to get index info for: nope"));
    }

    #[tokio::test]
    async fn show_info_for_manifest_packages() {
        let (outcome, out, err) = run("requests>=2.0\n-e ./local\n", &[]).await;

        assert_eq!(outcome, Outcome::Success);
        assert!(out.starts_with("\nrequests"));
        assert!(err.is_empty());
    }
}
