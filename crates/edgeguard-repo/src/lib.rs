//! Project adapters: locate and read the deploy config, walk the source tree,
//! and load the project-level settings and ignore files.
//!
//! This crate is allowed to do filesystem IO. Decisions about what a failure means
//! (fail-open) belong to the caller.

#![forbid(unsafe_code)]

mod discover;
mod package;
mod sources;

use anyhow::Context;
use camino::Utf8Path;
use edgeguard_domain::model::ProjectModel;
use edgeguard_domain::policy::IgnorePolicy;
use edgeguard_settings::{
    EdgeguardConfigV1, IGNORE_FILE_NAME, Overrides, ResolvedSettings, SETTINGS_FILE_NAME,
};

pub use discover::{LoadedConfig, discover_config, load_config};
pub use package::{PACKAGE_FILE_NAME, parse_package_manifest, read_package_manifest};
pub use sources::{SKIPPED_DIRS, SOURCE_EXTENSIONS, TEST_FILE_GLOBS, walk_sources};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions never panic on any input.
pub mod fuzz {
    /// Parse arbitrary text as a package manifest.
    pub fn parse_package(text: &str) -> anyhow::Result<()> {
        let _ = super::package::parse_package_manifest(text)?;
        Ok(())
    }

    /// Classify arbitrary relative paths with the source-walk filters.
    pub fn classify_paths(paths: &[String], excludes: &[String]) -> anyhow::Result<Vec<bool>> {
        let filter = super::sources::PathFilter::new(excludes)?;
        Ok(paths.iter().map(|p| filter.is_test(p)).collect())
    }
}

/// Read `.pre-deploy-ignore` from the project root. A missing file is an empty policy.
pub fn read_ignore_policy(project_root: &Utf8Path) -> anyhow::Result<IgnorePolicy> {
    let path = project_root.join(IGNORE_FILE_NAME);
    match read_optional(&path)? {
        Some(text) => Ok(edgeguard_settings::parse_ignore_file(&text)),
        None => Ok(IgnorePolicy::new()),
    }
}

/// Read and resolve `edgeguard.toml`. A missing file resolves to defaults plus `overrides`.
pub fn read_settings(
    project_root: &Utf8Path,
    overrides: Overrides,
) -> anyhow::Result<ResolvedSettings> {
    let path = project_root.join(SETTINGS_FILE_NAME);
    let cfg = match read_optional(&path)? {
        Some(text) => {
            edgeguard_settings::parse_settings_toml(&text).with_context(|| format!("parse {path}"))?
        }
        None => EdgeguardConfigV1::default(),
    };
    edgeguard_settings::resolve_settings(cfg, overrides).with_context(|| format!("resolve {path}"))
}

/// Build the in-memory project model used by the rule catalog.
///
/// `config` is the already-parsed deploy config. Source and package reads degrade to
/// `None` so config-only rules still run.
pub fn build_project_model(
    project_root: &Utf8Path,
    config: edgeguard_config::ConfigNode,
    settings: &ResolvedSettings,
) -> ProjectModel {
    let sources = match walk_sources(project_root, settings) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "source walk failed; skipping source rules");
            None
        }
    };
    let package = match read_package_manifest(project_root) {
        Ok(pkg) => pkg,
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "package manifest unreadable; skipping");
            None
        }
    };

    ProjectModel {
        config,
        sources,
        package,
    }
}

pub(crate) fn read_optional(path: &Utf8Path) -> anyhow::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("read {path}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    #[test]
    fn missing_ignore_file_is_empty_policy() {
        let tmp = TempDir::new().expect("temp dir");
        let policy = read_ignore_policy(&utf8_root(&tmp)).expect("policy");
        assert!(policy.is_empty());
    }

    #[test]
    fn ignore_file_is_read_from_root() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join(".pre-deploy-ignore"), "!SEC001\nPERF001\n");
        let policy = read_ignore_policy(&root).expect("policy");
        assert!(policy.is_blocking("SEC001"));
        assert!(!policy.is_blocking("PERF001"));
    }

    #[test]
    fn settings_default_when_absent_and_error_when_invalid() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let resolved = read_settings(&root, Overrides::default()).expect("defaults");
        assert_eq!(resolved, ResolvedSettings::default());

        write_file(&root.join("edgeguard.toml"), "retry_threshold = \"many\"\n");
        let err = read_settings(&root, Overrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("edgeguard.toml"));
    }

    #[test]
    fn project_model_without_sources_or_package() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let model = build_project_model(
            &root,
            edgeguard_config::ConfigNode::default(),
            &ResolvedSettings::default(),
        );
        assert!(model.sources.is_none());
        assert!(model.package.is_none());
        assert_eq!(model.files_scanned(), 0);
    }

    proptest! {
        #[test]
        fn fuzz_parsers_never_panic(input in ".*") {
            let _ = fuzz::parse_package(&input);
            let _ = fuzz::classify_paths(&[input.clone()], &[input]);
        }
    }
}
