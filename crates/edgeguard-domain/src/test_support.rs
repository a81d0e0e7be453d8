use crate::checks::RuleFn;
use crate::model::{PackageManifest, ProjectModel, SourceFile, SourceTree};
use crate::policy::{IgnorePolicy, Limits};
use edgeguard_config::{ConfigNode, parse_jsonc, parse_toml_lite};
use edgeguard_types::{Issue, RepoPath};

pub fn jsonc(text: &str) -> ConfigNode {
    parse_jsonc(text).expect("valid jsonc fixture")
}

pub fn toml(text: &str) -> ConfigNode {
    parse_toml_lite(text)
}

pub fn source(path: &str, text: &str) -> SourceFile {
    SourceFile::new(RepoPath::new(path), text.to_string(), false)
}

pub fn test_source(path: &str, text: &str) -> SourceFile {
    SourceFile::new(RepoPath::new(path), text.to_string(), true)
}

pub fn project(config: ConfigNode, files: Vec<SourceFile>) -> ProjectModel {
    ProjectModel {
        config,
        sources: Some(SourceTree::new(files)),
        package: None,
    }
}

pub fn config_only(config: ConfigNode) -> ProjectModel {
    ProjectModel {
        config,
        sources: None,
        package: None,
    }
}

pub fn with_deps(mut model: ProjectModel, deps: &[&str]) -> ProjectModel {
    model.package = Some(PackageManifest::new(
        deps.iter().map(|d| d.to_string()).collect(),
    ));
    model
}

/// Run one rule with default limits.
pub fn run(rule: RuleFn, model: &ProjectModel) -> Vec<Issue> {
    let limits = Limits::default();
    rule(&model.context(&limits))
}

pub fn ids(issues: &[Issue]) -> Vec<&str> {
    issues.iter().map(|i| i.id.as_str()).collect()
}

pub fn policy(lines: &[&str]) -> IgnorePolicy {
    let mut policy = IgnorePolicy::new();
    for line in lines {
        if let Some(rule) = line.strip_prefix('!') {
            policy.add_blocking(rule);
        } else if let Some((rule, ctx)) = line.split_once(':') {
            policy.suppress(rule, ctx);
        } else {
            policy.suppress(line, "");
        }
    }
    policy
}
