//! Discovery of eligible HTML pages under the site root.
//!
//! Excluded and hidden directories are pruned before descent, so nothing
//! inside them is ever read.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::{DirEntry, WalkDir};

use crate::builder::SitemapError;
use crate::config::SitemapConfig;

/// Conventional not-found page, never listed.
pub const NOT_FOUND_FILE: &str = "404.html";

/// An HTML page found during the scan.
#[derive(Debug, Clone)]
pub struct PageFile {
    /// Path relative to the site root
    pub relative_path: PathBuf,

    /// Modification time on disk
    pub modified: SystemTime,
}

/// Walk the site root and collect every eligible page.
///
/// Any unreadable entry aborts the scan with an error naming its path.
pub fn discover_pages(config: &SitemapConfig) -> Result<Vec<PageFile>, SitemapError> {
    let root = &config.site_root;

    if !root.is_dir() {
        return Err(SitemapError::RootNotFound(root.display().to_string()));
    }

    let mut pages = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_pruned(entry, config));

    for entry in walker {
        let entry = entry.map_err(|e| SitemapError::Walk {
            path: e
                .path()
                .unwrap_or(root.as_path())
                .display()
                .to_string(),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();

        if !is_html(path) {
            continue;
        }
        if entry
            .file_name()
            .as_encoded_bytes()
            .eq_ignore_ascii_case(NOT_FOUND_FILE.as_bytes())
        {
            tracing::debug!("Skipping not-found page {}", path.display());
            continue;
        }

        let metadata_error = |message: String| SitemapError::Metadata {
            path: path.display().to_string(),
            message,
        };
        let modified = entry
            .metadata()
            .map_err(|e| metadata_error(e.to_string()))?
            .modified()
            .map_err(|e| metadata_error(e.to_string()))?;

        let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();

        tracing::debug!("Found page {}", relative_path.display());

        pages.push(PageFile {
            relative_path,
            modified,
        });
    }

    Ok(pages)
}

/// Whether an entry (and, for directories, everything below it) is skipped.
fn is_pruned(entry: &DirEntry, config: &SitemapConfig) -> bool {
    let raw_name = entry.file_name();
    // Configured names are UTF-8, so a name that is not can never match one
    let name = raw_name.to_str();
    let hidden = raw_name.as_encoded_bytes().first() == Some(&b'.');

    if entry.file_type().is_dir() {
        if name.is_some_and(|n| config.is_excluded(n)) {
            tracing::debug!("Pruning excluded directory {}", entry.path().display());
            return true;
        }
        if hidden && !name.is_some_and(|n| config.is_hidden_allowed(n)) {
            tracing::debug!("Pruning hidden directory {}", entry.path().display());
            return true;
        }
        return false;
    }

    hidden
}

/// Whether a path has an `.html` extension, any case.
fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<html></html>").unwrap();
    }

    fn relative_paths(config: &SitemapConfig) -> Vec<String> {
        let mut paths: Vec<String> = discover_pages(config)
            .unwrap()
            .into_iter()
            .map(|p| p.relative_path.to_string_lossy().replace('\\', "/"))
            .collect();
        paths.sort();
        paths
    }

    fn config_for(root: &Path) -> SitemapConfig {
        SitemapConfig {
            site_root: root.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn finds_html_files_recursively() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "index.html");
        touch(temp.path(), "blog/index.html");
        touch(temp.path(), "blog/post.HTML");
        touch(temp.path(), "style.css");
        touch(temp.path(), "notes.htm");

        let paths = relative_paths(&config_for(temp.path()));

        assert_eq!(paths, vec!["blog/index.html", "blog/post.HTML", "index.html"]);
    }

    #[test]
    fn skips_not_found_page() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "404.html");
        touch(temp.path(), "errors/404.html");
        touch(temp.path(), "page.html");

        let paths = relative_paths(&config_for(temp.path()));

        assert_eq!(paths, vec!["page.html"]);
    }

    #[test]
    fn prunes_excluded_and_hidden_directories() {
        let temp = tempdir().unwrap();
        touch(temp.path(), ".git/anything.html");
        touch(temp.path(), "scripts/generate.html");
        touch(temp.path(), "node_modules/pkg/readme.html");
        touch(temp.path(), ".cache/page.html");
        touch(temp.path(), "docs/.drafts/wip.html");
        touch(temp.path(), "docs/.hidden.html");
        touch(temp.path(), "docs/guide.html");

        let paths = relative_paths(&config_for(temp.path()));

        assert_eq!(paths, vec!["docs/guide.html"]);
    }

    #[test]
    fn allow_list_opens_hidden_directory() {
        let temp = tempdir().unwrap();
        touch(temp.path(), ".well-known/security.html");
        touch(temp.path(), ".cache/page.html");

        let config = SitemapConfig {
            allow_hidden: vec![".well-known".to_string()],
            ..config_for(temp.path())
        };

        assert_eq!(relative_paths(&config), vec![".well-known/security.html"]);
    }

    #[test]
    fn extra_exclusions_are_pruned() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "drafts/idea.html");
        touch(temp.path(), "posts/drafts/nested.html");
        touch(temp.path(), "posts/live.html");

        let mut config = config_for(temp.path());
        config.exclude_dirs.push("drafts".to_string());

        assert_eq!(relative_paths(&config), vec!["posts/live.html"]);
    }

    #[test]
    fn hidden_site_root_is_still_scanned() {
        let temp = tempdir().unwrap();
        let root = temp.path().join(".site");
        touch(&root, "page.html");

        assert_eq!(relative_paths(&config_for(&root)), vec!["page.html"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempdir().unwrap();
        let config = config_for(&temp.path().join("missing"));

        let result = discover_pages(&config);

        assert!(matches!(result, Err(SitemapError::RootNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_kept_and_filtered() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempdir().unwrap();
        for name in [&b"a\xff.html"[..], b"a\xfe.html", b".\xff.html"] {
            fs::write(temp.path().join(OsStr::from_bytes(name)), "<html></html>").unwrap();
        }
        touch(&temp.path().join(OsStr::from_bytes(b".\xfedir")), "page.html");

        let pages = discover_pages(&config_for(temp.path())).unwrap();

        let mut names: Vec<Vec<u8>> = pages
            .iter()
            .map(|p| p.relative_path.as_os_str().as_bytes().to_vec())
            .collect();
        names.sort();
        assert_eq!(names, vec![b"a\xfe.html".to_vec(), b"a\xff.html".to_vec()]);
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlink_aborts_with_path() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "page.html");
        std::os::unix::fs::symlink(
            temp.path().join("missing.html"),
            temp.path().join("broken.html"),
        )
        .unwrap();

        let err = discover_pages(&config_for(temp.path())).unwrap_err();

        match err {
            SitemapError::Walk { path, .. } => assert!(path.ends_with("broken.html")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
