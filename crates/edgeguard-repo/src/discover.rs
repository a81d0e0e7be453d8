use anyhow::Context;
use camino::Utf8Path;
use edgeguard_config::{CONFIG_FILE_NAMES, ConfigNode, Dialect};
use edgeguard_types::RepoPath;

/// A deploy config that was found and parsed.
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub path: RepoPath,
    pub node: ConfigNode,
}

/// First config file present at the project root, in [`CONFIG_FILE_NAMES`] order.
pub fn discover_config(project_root: &Utf8Path) -> Option<RepoPath> {
    CONFIG_FILE_NAMES
        .iter()
        .find(|name| project_root.join(name).is_file())
        .map(RepoPath::new)
}

/// Locate, read and parse the deploy config.
///
/// `Ok(None)` when no config file exists. Read and parse failures are errors; the
/// caller decides to fail open.
pub fn load_config(project_root: &Utf8Path) -> anyhow::Result<Option<LoadedConfig>> {
    let Some(path) = discover_config(project_root) else {
        tracing::debug!(root = %project_root, "no deploy config found");
        return Ok(None);
    };

    let abs = project_root.join(path.as_str());
    let text = std::fs::read_to_string(&abs).with_context(|| format!("read {abs}"))?;
    let node = edgeguard_config::parse_config(&text, Dialect::from_file_name(path.as_str()))
        .with_context(|| format!("parse {}", path))?;

    tracing::debug!(config = %path, "deploy config loaded");
    Ok(Some(LoadedConfig { path, node }))
}
