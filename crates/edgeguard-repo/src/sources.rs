use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use edgeguard_domain::model::{SourceFile, SourceTree};
use edgeguard_settings::ResolvedSettings;
use edgeguard_types::RepoPath;
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use walkdir::{DirEntry, WalkDir};

pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "ts", "mts", "cts", "jsx", "tsx"];

/// Directory names never descended into.
pub const SKIPPED_DIRS: &[&str] = &["node_modules", ".wrangler", ".git", "dist", "build", "coverage"];

/// Test, fixture, story and mock files. Rules may opt out of scanning these.
pub const TEST_FILE_GLOBS: &[&str] = &[
    "**/*.test.*",
    "**/*.spec.*",
    "**/__tests__/**",
    "**/test/**",
    "**/tests/**",
    "**/fixtures/**",
    "**/__fixtures__/**",
    "**/*.stories.*",
    "**/__mocks__/**",
];

pub(crate) struct PathFilter {
    tests: GlobSet,
    exclude: GlobSet,
}

impl PathFilter {
    pub(crate) fn new(excludes: &[String]) -> anyhow::Result<Self> {
        let tests = build_globset(TEST_FILE_GLOBS.iter().copied()).context("compile test globs")?;
        let exclude =
            build_globset(excludes.iter().map(String::as_str)).context("compile exclude globs")?;
        Ok(Self { tests, exclude })
    }

    pub(crate) fn is_test(&self, rel: &str) -> bool {
        self.tests.is_match(rel)
    }

    pub(crate) fn is_excluded(&self, rel: &str) -> bool {
        self.exclude.is_match(rel)
    }
}

/// Walk the configured source directory and read every source file.
///
/// Returns `Ok(None)` when the source directory does not exist. Unreadable entries
/// are skipped with a warning; invalid UTF-8 is replaced rather than dropping the file.
pub fn walk_sources(
    project_root: &Utf8Path,
    settings: &ResolvedSettings,
) -> anyhow::Result<Option<SourceTree>> {
    let source_root = project_root.join(&settings.source_dir);
    if !source_root.is_dir() {
        tracing::debug!(dir = %source_root, "source directory missing; source rules skipped");
        return Ok(None);
    }

    let filter = PathFilter::new(&settings.exclude)?;

    let mut candidates: Vec<(Utf8PathBuf, RepoPath)> = Vec::new();
    for entry in WalkDir::new(&source_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
    {
        let Ok(abs) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
            continue;
        };
        if !has_source_extension(&abs) {
            continue;
        }
        let rel = RepoPath::new(abs.strip_prefix(project_root).unwrap_or(&abs).as_str());
        if filter.is_excluded(rel.as_str()) {
            continue;
        }
        candidates.push((abs, rel));
    }

    let files: Vec<SourceFile> = candidates
        .into_par_iter()
        .filter_map(|(abs, rel)| match std::fs::read(&abs) {
            Ok(bytes) => {
                let text = match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::debug!(path = %rel, "source file is not valid UTF-8; decoding lossily");
                        String::from_utf8_lossy(err.as_bytes()).into_owned()
                    }
                };
                let is_test = filter.is_test(rel.as_str());
                Some(SourceFile::new(rel, text, is_test))
            }
            Err(err) => {
                tracing::warn!(path = %rel, error = %err, "skipping unreadable source file");
                None
            }
        })
        .collect();

    tracing::debug!(files = files.len(), "source tree loaded");
    Ok(Some(SourceTree::new(files)))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn has_source_extension(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn build_globset<'a>(patterns: impl IntoIterator<Item = &'a str>) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globs_cover_common_layouts() {
        let filter = PathFilter::new(&[]).expect("filter");
        for path in [
            "src/index.test.ts",
            "src/handler.spec.js",
            "src/__tests__/queue.ts",
            "src/test/helpers.ts",
            "src/tests/unit.ts",
            "src/fixtures/data.ts",
            "src/__fixtures__/data.ts",
            "src/Button.stories.tsx",
            "src/__mocks__/env.ts",
        ] {
            assert!(filter.is_test(path), "{path} should be a test file");
        }
        for path in ["src/index.ts", "src/contest.ts", "src/testing-utils.ts"] {
            assert!(!filter.is_test(path), "{path} should be production");
        }
    }

    #[test]
    fn excludes_are_matched_on_relative_paths() {
        let filter = PathFilter::new(&["src/generated/**".to_string()]).expect("filter");
        assert!(filter.is_excluded("src/generated/schema.ts"));
        assert!(!filter.is_excluded("src/index.ts"));
    }

    #[test]
    fn invalid_exclude_is_an_error() {
        assert!(PathFilter::new(&["[oops".to_string()]).is_err());
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_source_extension(Utf8Path::new("src/a.TS")));
        assert!(has_source_extension(Utf8Path::new("src/a.mjs")));
        assert!(!has_source_extension(Utf8Path::new("src/a.d")));
        assert!(!has_source_extension(Utf8Path::new("src/README.md")));
    }
}
