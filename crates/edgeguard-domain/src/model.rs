use crate::policy::Limits;
use edgeguard_config::ConfigNode;
use edgeguard_inline_suppressions::SuppressionIndex;
use edgeguard_types::RepoPath;

/// One scanned source file.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Project-relative path.
    pub path: RepoPath,
    pub text: String,
    /// Test, fixture, story or mock file. Rules that ask for it skip these.
    pub is_test: bool,
    /// Built once on load and shared by every rule that looks at this file.
    pub suppressions: SuppressionIndex,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(path: RepoPath, text: String, is_test: bool) -> Self {
        let suppressions = SuppressionIndex::parse(&text);
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            path,
            text,
            is_test,
            suppressions,
            line_starts,
        }
    }

    /// 1-based line containing byte `offset` (newlines before it, plus one).
    pub fn line_of(&self, offset: usize) -> u32 {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        idx as u32 + 1
    }

    pub fn size_bytes(&self) -> u64 {
        self.text.len() as u64
    }

    pub fn is_suppressed(&self, line: u32, rule_id: &str) -> bool {
        self.suppressions.is_suppressed(line, rule_id)
    }
}

/// The scanned part of the project source directory.
#[derive(Clone, Debug, Default)]
pub struct SourceTree {
    pub files: Vec<SourceFile>,
}

impl SourceTree {
    pub fn new(mut files: Vec<SourceFile>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Self { files }
    }

    pub fn production_files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter().filter(|f| !f.is_test)
    }

    /// Bytes of non-test source, the starting point of the bundle estimate.
    pub fn production_bytes(&self) -> u64 {
        self.production_files().map(SourceFile::size_bytes).sum()
    }

    pub fn any_production_file(&self, pred: impl Fn(&SourceFile) -> bool) -> bool {
        self.production_files().any(pred)
    }
}

/// Runtime dependency names from the project package manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageManifest {
    pub dependencies: Vec<String>,
}

impl PackageManifest {
    pub fn new(mut dependencies: Vec<String>) -> Self {
        dependencies.sort();
        dependencies.dedup();
        Self { dependencies }
    }

    pub fn has(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }
}

/// Everything the rules can look at.
#[derive(Clone, Debug, Default)]
pub struct ProjectModel {
    pub config: ConfigNode,
    pub sources: Option<SourceTree>,
    pub package: Option<PackageManifest>,
}

impl ProjectModel {
    pub fn context<'a>(&'a self, limits: &'a Limits) -> RuleContext<'a> {
        RuleContext {
            config: &self.config,
            sources: self.sources.as_ref(),
            package: self.package.as_ref(),
            limits,
        }
    }

    pub fn files_scanned(&self) -> u32 {
        self.sources.as_ref().map_or(0, |s| s.files.len() as u32)
    }
}

/// Read-only view handed to every rule.
#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a> {
    pub config: &'a ConfigNode,
    pub sources: Option<&'a SourceTree>,
    pub package: Option<&'a PackageManifest>,
    pub limits: &'a Limits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_of_counts_newlines_before_offset() {
        let file = SourceFile::new(RepoPath::new("src/a.ts"), "a\nbb\n\nccc".to_string(), false);
        assert_eq!(file.line_of(0), 1);
        assert_eq!(file.line_of(1), 1);
        assert_eq!(file.line_of(2), 2);
        assert_eq!(file.line_of(5), 3);
        assert_eq!(file.line_of(6), 4);
        assert_eq!(file.line_of(8), 4);
    }

    #[test]
    fn production_bytes_skip_test_files() {
        let tree = SourceTree::new(vec![
            SourceFile::new(RepoPath::new("src/a.ts"), "12345".to_string(), false),
            SourceFile::new(RepoPath::new("src/a.test.ts"), "1234567890".to_string(), true),
        ]);
        assert_eq!(tree.production_bytes(), 5);
    }

    #[test]
    fn source_tree_is_sorted_by_path() {
        let tree = SourceTree::new(vec![
            SourceFile::new(RepoPath::new("src/z.ts"), String::new(), false),
            SourceFile::new(RepoPath::new("src/a.ts"), String::new(), false),
        ]);
        assert_eq!(tree.files[0].path.as_str(), "src/a.ts");
    }
}
