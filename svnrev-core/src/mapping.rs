//! Working-copy to repository address mapping
//!
//! Translates between local filesystem paths and repository-relative
//! addresses. The repository-relative address of an item is composed
//! from two pieces, in this order:
//!
//! 1. the relative URL between the repository root URL and the
//!    working-copy root URL, then
//! 2. the relative filesystem path between the working-copy root and
//!    the item,
//!
//! joined with `/` and prefixed with a leading `/`.

use std::path::{Path, PathBuf};

/// Errors composing or decomposing repository-relative addresses.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MappingError {
    #[error("URL '{child}' is not under '{parent}'")]
    UrlNotUnderParent { parent: String, child: String },

    #[error("path '{file}' is outside the working copy root '{root}'")]
    OutsideWorkingCopy { file: PathBuf, root: PathBuf },
}

/// The repository location of one working-copy root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootUrlInfo {
    /// Repository root URL.
    pub repository_url: String,
    /// Absolute URL the working-copy root is checked out from.
    pub root_url: String,
    /// Local filesystem path of the working-copy root.
    pub root_path: PathBuf,
}

impl RootUrlInfo {
    pub fn new(
        repository_url: impl Into<String>,
        root_url: impl Into<String>,
        root_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repository_url: repository_url.into(),
            root_url: root_url.into(),
            root_path: root_path.into(),
        }
    }

    /// Repository-relative address of the working-copy root itself,
    /// slash-prefixed (`/` when the working copy is the whole
    /// repository).
    pub fn root_relative_address(&self) -> Result<String, MappingError> {
        Ok(ensure_start_slash(&relative_url(
            &self.repository_url,
            &self.root_url,
        )?))
    }

    /// Repository-relative address of `file`, which must live under
    /// this working-copy root.
    pub fn relative_address(&self, file: &Path) -> Result<String, MappingError> {
        let url_part = relative_url(&self.repository_url, &self.root_url)?;
        let path_part = relative_fs_path(&self.root_path, file)?;
        Ok(ensure_start_slash(&join_slashed(&url_part, &path_part)))
    }

    /// Map a repository-relative address back onto a local path under
    /// this root. `None` when the address does not live under this
    /// working copy's repository location.
    pub fn local_path(&self, repo_relative: &str) -> Option<PathBuf> {
        let prefix = self.root_relative_address().ok()?;
        let remainder = strip_address_prefix(repo_relative, &prefix)?;
        let mut path = self.root_path.clone();
        for segment in remainder.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        Some(path)
    }
}

/// Path-resolution collaborator supplied by the host: associates local
/// files with their working-copy roots and translates repository
/// addresses back to local paths.
pub trait WorkingCopyMapping {
    /// The working-copy root tracking `file`, or `None` when the file
    /// is not under version control.
    fn root_for(&self, file: &Path) -> Option<RootUrlInfo>;

    /// Translate a repository-relative address to a local path. `None`
    /// when the address maps under no known root.
    fn local_path(&self, root: &RootUrlInfo, repo_relative: &str) -> Option<PathBuf> {
        root.local_path(repo_relative)
    }
}

/// Relative URL from `parent` to `child`; empty when they are equal.
/// Trailing slashes on either side are ignored.
pub fn relative_url(parent: &str, child: &str) -> Result<String, MappingError> {
    let parent_trimmed = parent.trim_end_matches('/');
    let child_trimmed = child.trim_end_matches('/');

    if child_trimmed == parent_trimmed {
        return Ok(String::new());
    }
    if let Some(rest) = child_trimmed.strip_prefix(parent_trimmed) {
        if let Some(rest) = rest.strip_prefix('/') {
            return Ok(rest.to_string());
        }
    }
    Err(MappingError::UrlNotUnderParent {
        parent: parent.to_string(),
        child: child.to_string(),
    })
}

/// Slash-separated relative path from `root` to `file`; empty when they
/// are equal.
pub fn relative_fs_path(root: &Path, file: &Path) -> Result<String, MappingError> {
    let rest = file
        .strip_prefix(root)
        .map_err(|_| MappingError::OutsideWorkingCopy {
            file: file.to_path_buf(),
            root: root.to_path_buf(),
        })?;
    let segments: Vec<String> = rest
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(segments.join("/"))
}

/// Join two slash-separated fragments, skipping empty sides.
pub fn join_slashed(a: &str, b: &str) -> String {
    let a = a.trim_matches('/');
    let b = b.trim_matches('/');
    match (a.is_empty(), b.is_empty()) {
        (true, true) => String::new(),
        (true, false) => b.to_string(),
        (false, true) => a.to_string(),
        (false, false) => format!("{}/{}", a, b),
    }
}

/// Prefix with `/` unless already prefixed.
pub fn ensure_start_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Strip an address prefix at a path-component boundary. Returns the
/// remainder (possibly empty, without its leading slash).
fn strip_address_prefix<'a>(address: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() || prefix == "/" {
        return Some(address.trim_start_matches('/'));
    }
    let rest = address.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some("")
    } else {
        rest.strip_prefix('/')
    }
}
