//! Reading and writing wiki folders.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use twc_types::{LayerTree, TreeEntry};
use walkdir::WalkDir;

use crate::error::{SourceError, SourceResult};
use crate::titles::assign_titles;

/// Directories never read into a layer.
const SKIPPED_DIRS: &[&str] = &[".git"];

/// Read every file below `root` into a tree keyed by `/`-separated path.
///
/// Titles are attached per [`crate::titles`]. Symlinks are followed; `.git`
/// directories are skipped.
pub fn read_folder(root: &Path) -> SourceResult<LayerTree> {
    if !root.is_dir() {
        return Err(SourceError::FolderNotFound(root.to_path_buf()));
    }

    let mut files = BTreeMap::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && SKIPPED_DIRS.iter().any(|d| e.file_name() == *d))
        });

    for entry in walker {
        let entry = entry.map_err(|e| SourceError::Walk {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| SourceError::Walk {
                path: entry.path().to_path_buf(),
                reason: e.to_string(),
            })?;
        let key = tree_key(relative);
        let content = fs::read(entry.path())?;
        files.insert(key, content);
    }

    let tree = assign_titles(files);
    debug!(
        root = %root.display(),
        files = tree.len(),
        titled = tree.titles().count(),
        "read wiki folder"
    );
    Ok(tree)
}

/// Write entries into `dir`, creating parent directories as needed.
///
/// Keys must be relative paths without `..`; anything else is rejected before
/// a single file is written.
pub fn write_folder<'a, I>(entries: I, dir: &Path) -> SourceResult<usize>
where
    I: IntoIterator<Item = (&'a String, &'a TreeEntry)>,
{
    let mut planned: Vec<(PathBuf, &'a [u8])> = Vec::new();
    for (key, entry) in entries {
        planned.push((safe_relative(key)?, entry.content.as_slice()));
    }

    for (relative, content) in &planned {
        let target = dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
    }

    debug!(dir = %dir.display(), files = planned.len(), "wrote wiki folder");
    Ok(planned.len())
}

/// Write entries into a fresh directory at `dir`.
///
/// `dir` must not exist or be empty. Files are staged in a temporary sibling
/// directory and renamed into place only after every file is written, so a
/// failed write leaves `dir` as it was.
pub fn publish_folder<'a, I>(entries: I, dir: &Path) -> SourceResult<usize>
where
    I: IntoIterator<Item = (&'a String, &'a TreeEntry)>,
{
    let existing = dir.exists();
    if existing && fs::read_dir(dir)?.next().is_some() {
        return Err(SourceError::OutputNotEmpty(dir.to_path_buf()));
    }

    let parent = match dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let staging = tempfile::Builder::new()
        .prefix(".twc-staging-")
        .tempdir_in(parent)?;
    let written = write_folder(entries, staging.path())?;

    if existing {
        fs::remove_dir(dir)?;
    }
    fs::rename(staging.path(), dir)?;
    debug!(dir = %dir.display(), files = written, "published wiki folder");
    Ok(written)
}

fn tree_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn safe_relative(key: &str) -> SourceResult<PathBuf> {
    let path = Path::new(key);
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return Err(SourceError::UnsafePath(key.to_string())),
        }
    }
    if out.as_os_str().is_empty() {
        return Err(SourceError::UnsafePath(key.to_string()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn reads_nested_files_with_slash_keys() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tiddlywiki.info", "{}");
        write(dir.path(), "tiddlers/Foo.tid", "title: Foo\n\nfoo");
        write(dir.path(), "tiddlers/sub/Bar.tid", "title: Bar\n\nbar");

        let tree = read_folder(dir.path()).unwrap();
        let keys: Vec<_> = tree.keys().collect();
        assert_eq!(keys, vec!["tiddlers/Foo.tid", "tiddlers/sub/Bar.tid", "tiddlywiki.info"]);
        assert_eq!(
            tree.get("tiddlers/sub/Bar.tid").unwrap().title.as_ref().unwrap().as_str(),
            "Bar"
        );
    }

    #[test]
    fn git_directory_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".git/HEAD", "ref: refs/heads/master");
        write(dir.path(), "tiddlers/A.tid", "title: A\n\n");
        let tree = read_folder(dir.path()).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.contains_key("tiddlers/A.tid"));
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_folder(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, SourceError::FolderNotFound(_)));
    }

    #[test]
    fn write_then_read_preserves_content() {
        let src = tempfile::tempdir().unwrap();
        write(src.path(), "tiddlers/A.tid", "title: A\n\nalpha");
        write(src.path(), "tiddlywiki.info", "{\"plugins\":[]}");
        let tree = read_folder(src.path()).unwrap();

        let out = tempfile::tempdir().unwrap();
        let written = write_folder(tree.iter(), out.path()).unwrap();
        assert_eq!(written, 2);
        assert_eq!(read_folder(out.path()).unwrap(), tree);
    }

    #[test]
    fn parent_traversal_is_rejected() {
        let mut tree = LayerTree::new();
        tree.insert("ok.txt", TreeEntry::file("fine"));
        tree.insert("../escape.txt", TreeEntry::file("bad"));
        let out = tempfile::tempdir().unwrap();
        let err = write_folder(tree.iter(), out.path()).unwrap_err();
        assert!(matches!(err, SourceError::UnsafePath(_)));
        assert!(!out.path().join("ok.txt").exists());
    }

    #[test]
    fn publish_creates_the_target_folder() {
        let root = tempfile::tempdir().unwrap();
        let mut tree = LayerTree::new();
        tree.insert("tiddlywiki.info", TreeEntry::file("{}"));
        tree.insert("tiddlers/A.tid", TreeEntry::file("title: A\n\nalpha"));

        let out = root.path().join("merged");
        assert_eq!(publish_folder(tree.iter(), &out).unwrap(), 2);
        assert_eq!(fs::read_to_string(out.join("tiddlers/A.tid")).unwrap(), "title: A\n\nalpha");

        let leftovers: Vec<_> = fs::read_dir(root.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("merged")]);
    }

    #[test]
    fn publish_into_an_empty_folder_is_allowed() {
        let out = tempfile::tempdir().unwrap();
        let mut tree = LayerTree::new();
        tree.insert("tiddlers/A.tid", TreeEntry::file("title: A\n\n"));
        assert_eq!(publish_folder(tree.iter(), out.path()).unwrap(), 1);
        assert!(out.path().join("tiddlers/A.tid").is_file());
    }

    #[test]
    fn publish_refuses_a_folder_with_stale_files() {
        let out = tempfile::tempdir().unwrap();
        write(out.path(), "tiddlers/Removed.tid", "title: Removed\n\nold");
        let mut tree = LayerTree::new();
        tree.insert("tiddlers/A.tid", TreeEntry::file("title: A\n\n"));

        let err = publish_folder(tree.iter(), out.path()).unwrap_err();
        assert!(matches!(err, SourceError::OutputNotEmpty(_)));
        assert!(out.path().join("tiddlers/Removed.tid").is_file());
        assert!(!out.path().join("tiddlers/A.tid").exists());
    }

    #[test]
    fn failed_publish_leaves_no_output() {
        let root = tempfile::tempdir().unwrap();
        let mut tree = LayerTree::new();
        tree.insert("ok.txt", TreeEntry::file("fine"));
        tree.insert("../escape.txt", TreeEntry::file("bad"));

        let out = root.path().join("merged");
        let err = publish_folder(tree.iter(), &out).unwrap_err();
        assert!(matches!(err, SourceError::UnsafePath(_)));
        assert!(!out.exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn absolute_keys_are_rejected() {
        assert!(safe_relative("/etc/passwd").is_err());
        assert!(safe_relative("").is_err());
        assert_eq!(safe_relative("./a/b").unwrap(), PathBuf::from("a/b"));
    }
}
