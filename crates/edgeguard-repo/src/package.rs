use anyhow::Context;
use camino::Utf8Path;
use edgeguard_domain::model::PackageManifest;

pub const PACKAGE_FILE_NAME: &str = "package.json";

/// Runtime dependency names from `package.json` text.
///
/// Only `dependencies` is read; dev dependencies never reach the deployed bundle.
pub fn parse_package_manifest(text: &str) -> anyhow::Result<PackageManifest> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse package.json")?;
    let names = value
        .get("dependencies")
        .and_then(serde_json::Value::as_object)
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default();
    Ok(PackageManifest::new(names))
}

/// `Ok(None)` when the project has no `package.json`.
pub fn read_package_manifest(project_root: &Utf8Path) -> anyhow::Result<Option<PackageManifest>> {
    let path = project_root.join(PACKAGE_FILE_NAME);
    match crate::read_optional(&path)? {
        Some(text) => parse_package_manifest(&text)
            .with_context(|| format!("read {path}"))
            .map(Some),
        None => Ok(None),
    }
}
