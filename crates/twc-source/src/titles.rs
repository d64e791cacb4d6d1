//! Deriving tiddler titles from the files of a wiki folder.
//!
//! TiddlyWiki stores tiddlers under `tiddlers/` in a handful of formats. The
//! title is what exclusion lists refer to, so every file that carries a
//! tiddler gets one:
//!
//! - `.tid`: the `title:` header field, else the file stem
//! - `.json`: the `title` of a single tiddler object (or a one-element array)
//! - `.meta`: the sidecar's `title:` field, shared with the file it describes
//! - any other file: its sidecar's title, else its file name
//!
//! Plugins, themes and languages stored as folders under `plugins/`,
//! `themes/` or `languages/` are one tiddler each. Every file in such a
//! folder takes the `title` from the nearest enclosing `plugin.info`.
//!
//! Any other file gets no title.

use std::collections::BTreeMap;

use twc_types::{LayerTree, Title, TreeEntry};

const TIDDLERS_DIR: &str = "tiddlers/";
const META_SUFFIX: &str = ".meta";
const PLUGIN_DIRS: &[&str] = &["plugins/", "themes/", "languages/"];
const PLUGIN_INFO: &str = "plugin.info";

/// Attach titles to raw folder files and build a tree keyed by path.
pub fn assign_titles(files: BTreeMap<String, Vec<u8>>) -> LayerTree {
    let mut tree = LayerTree::new();
    for (path, content) in &files {
        let title = derive_title(path, content, &files);
        tree.insert(
            path.clone(),
            TreeEntry {
                title,
                content: content.clone(),
            },
        );
    }
    tree
}

fn derive_title(path: &str, content: &[u8], files: &BTreeMap<String, Vec<u8>>) -> Option<Title> {
    if PLUGIN_DIRS.iter().any(|dir| path.starts_with(dir)) {
        return plugin_title(path, files);
    }
    if !path.starts_with(TIDDLERS_DIR) {
        return None;
    }
    let name = file_name(path);

    if let Some(described) = path.strip_suffix(META_SUFFIX) {
        return header_field(content, "title")
            .or_else(|| Some(file_name(described).to_string()))
            .and_then(|t| Title::new(t).ok());
    }

    if let Some(stem) = name.strip_suffix(".tid") {
        return header_field(content, "title")
            .or_else(|| Some(stem.to_string()))
            .and_then(|t| Title::new(t).ok());
    }

    if name.ends_with(".json") {
        return json_title(content).and_then(|t| Title::new(t).ok());
    }

    let sidecar = format!("{path}{META_SUFFIX}");
    if let Some(meta) = files.get(&sidecar) {
        if let Some(title) = header_field(meta, "title") {
            return Title::new(title).ok();
        }
    }
    Title::new(name).ok()
}

/// Title of the plugin folder holding `path`: the nearest ancestor directory
/// with a `plugin.info`.
fn plugin_title(path: &str, files: &BTreeMap<String, Vec<u8>>) -> Option<Title> {
    let mut dir = path;
    while let Some((parent, _)) = dir.rsplit_once('/') {
        if let Some(info) = files.get(&format!("{parent}/{PLUGIN_INFO}")) {
            return json_title(info).and_then(|t| Title::new(t).ok());
        }
        dir = parent;
    }
    None
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Read `field` from a `.tid`/`.meta` header.
///
/// The header is the run of `name: value` lines before the first blank line.
pub fn header_field(content: &[u8], field: &str) -> Option<String> {
    let text = std::str::from_utf8(content).ok()?;
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim() == field {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Title of a JSON tiddler file holding exactly one tiddler.
///
/// Files holding several tiddlers have no single title and return `None`.
fn json_title(content: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(content).ok()?;
    let object = match &value {
        serde_json::Value::Object(_) => &value,
        serde_json::Value::Array(items) if items.len() == 1 => &items[0],
        _ => return None,
    };
    object.get("title")?.as_str().map(str::to_string)
}
