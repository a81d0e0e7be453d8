//! Integration tests for the source walk.

use camino::{Utf8Path, Utf8PathBuf};
use edgeguard_repo::{build_project_model, load_config, walk_sources};
use edgeguard_settings::ResolvedSettings;
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

fn scanned_paths(root: &Utf8Path, settings: &ResolvedSettings) -> Vec<(String, bool)> {
    walk_sources(root, settings)
        .expect("walk")
        .expect("source dir present")
        .files
        .iter()
        .map(|f| (f.path.as_str().to_string(), f.is_test))
        .collect()
}

#[test]
fn walk_skips_dependency_dirs_and_other_extensions() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    write_file(&root.join("src/index.ts"), "export default {};\n");
    write_file(&root.join("src/lib/db.mjs"), "export const q = 1;\n");
    write_file(&root.join("src/node_modules/pkg/index.js"), "x\n");
    write_file(&root.join("src/dist/out.js"), "x\n");
    write_file(&root.join("src/.wrangler/tmp/bundle.js"), "x\n");
    write_file(&root.join("src/notes.md"), "# notes\n");
    write_file(&root.join("src/index.test.ts"), "test();\n");

    let paths = scanned_paths(&root, &ResolvedSettings::default());
    assert_eq!(
        paths,
        vec![
            ("src/index.test.ts".to_string(), true),
            ("src/index.ts".to_string(), false),
            ("src/lib/db.mjs".to_string(), false),
        ]
    );
}

#[test]
fn walk_honours_source_dir_and_excludes() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    write_file(&root.join("src/ignored.ts"), "x\n");
    write_file(&root.join("worker/main.ts"), "x\n");
    write_file(&root.join("worker/generated/types.ts"), "x\n");

    let settings = ResolvedSettings {
        source_dir: "worker".to_string(),
        exclude: vec!["worker/generated/**".to_string()],
        ..ResolvedSettings::default()
    };
    let paths = scanned_paths(&root, &settings);
    assert_eq!(paths, vec![("worker/main.ts".to_string(), false)]);
}

#[test]
fn missing_source_dir_is_none() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    let tree = walk_sources(&root, &ResolvedSettings::default()).expect("walk");
    assert!(tree.is_none());
}

#[test]
fn suppression_index_is_built_on_load() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    write_file(
        &root.join("src/poll.ts"),
        "// @pre-deploy-ok LOOP007\nwhile (true) {}\n",
    );
    let tree = walk_sources(&root, &ResolvedSettings::default())
        .expect("walk")
        .expect("present");
    let file = &tree.files[0];
    assert!(file.is_suppressed(2, "LOOP007"));
    assert!(!file.is_suppressed(3, "LOOP007"));
}

#[test]
fn full_project_model_from_disk() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    write_file(
        &root.join("wrangler.jsonc"),
        "{\n  // worker\n  \"name\": \"api\",\n}\n",
    );
    write_file(&root.join("src/index.ts"), "export default {};\n");
    write_file(
        &root.join("package.json"),
        r#"{ "dependencies": { "lodash": "^4.17.21" } }"#,
    );

    let config = load_config(&root).expect("load").expect("present");
    let model = build_project_model(&root, config.node, &ResolvedSettings::default());
    assert_eq!(model.files_scanned(), 1);
    assert!(model.package.as_ref().is_some_and(|p| p.has("lodash")));
}

#[test]
fn walk_order_is_deterministic() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    for name in ["z.ts", "a.ts", "m/b.ts", "m/a.ts"] {
        write_file(&root.join("src").join(name), "x\n");
    }
    let first = scanned_paths(&root, &ResolvedSettings::default());
    let second = scanned_paths(&root, &ResolvedSettings::default());
    assert_eq!(first, second);
    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(first, sorted);
}

#[test]
fn invalid_utf8_file_is_still_scanned() {
    let tmp = TempDir::new().expect("temp dir");
    let root = utf8_root(&tmp);
    std::fs::create_dir_all(root.join("src")).expect("create src");
    std::fs::write(root.join("src/legacy.js"), b"// caf\xe9\nwhile (true) { tick(); }\n").expect("write");

    let tree = walk_sources(&root, &ResolvedSettings::default())
        .expect("walk")
        .expect("source dir present");
    assert_eq!(tree.files.len(), 1);
    assert!(tree.files[0].text.contains("while (true)"));
    assert!(tree.files[0].text.contains('\u{FFFD}'));
}
