//! Path Safety
//!
//! Converts host-provided URIs into filesystem paths and decides whether a
//! path is safe to hand to the cleaner.

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Directories the cleaner must never touch
pub const PROTECTED_PREFIXES: &[&str] = &["/bin", "/sbin", "/usr", "/etc", "/var", "/boot", "/root"];

/// Rejects relative, unresolvable and protected paths.
#[derive(Debug, Clone)]
pub struct PathValidator {
    protected: Vec<PathBuf>,
}

impl Default for PathValidator {
    fn default() -> Self {
        Self::new(PROTECTED_PREFIXES.iter().map(PathBuf::from).collect())
    }
}

impl PathValidator {
    pub fn new(protected: Vec<PathBuf>) -> Self {
        Self { protected }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.protected_prefixes.iter().map(PathBuf::from).collect())
    }

    /// Check that a path is absolute, resolvable, free of traversal after
    /// symlink resolution and outside every protected prefix.
    pub fn validate(&self, path: &Path) -> bool {
        if !path.is_absolute() {
            warn!("Path validation failed: not absolute: {}", path.display());
            return false;
        }

        let resolved = match std::fs::canonicalize(path) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("Path validation failed: cannot resolve {}: {}", path.display(), e);
                return false;
            }
        };

        if resolved.components().any(|c| c == Component::ParentDir) {
            warn!("Path validation failed: traversal detected: {}", path.display());
            return false;
        }

        // Path::starts_with compares whole components, so /usrlocal is not /usr
        if let Some(prefix) = self.protected.iter().find(|p| resolved.starts_with(p)) {
            warn!(
                "Path validation failed: {} resolves under system directory {}",
                resolved.display(),
                prefix.display()
            );
            return false;
        }

        true
    }
}

/// Convert a `file://` URI into a filesystem path.
///
/// Only the file scheme is accepted, with an empty or `localhost` authority.
pub fn path_from_uri(uri: &str) -> Option<PathBuf> {
    let (scheme, rest) = uri.split_once(':')?;
    if !scheme.eq_ignore_ascii_case("file") {
        return None;
    }

    let rest = rest.strip_prefix("//")?;
    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => return None,
    };
    if !authority.is_empty() && !authority.eq_ignore_ascii_case("localhost") {
        warn!("Rejecting file URI with remote authority: {}", uri);
        return None;
    }

    let path = path.split(['?', '#']).next().unwrap_or_default();
    let decoded = urlencoding::decode_binary(path.as_bytes());
    Some(PathBuf::from(OsStr::from_bytes(&decoded)))
}

/// Accept either a file URI or a plain absolute path, as host shims pass both.
pub fn path_from_arg(arg: &str) -> Option<PathBuf> {
    if arg.starts_with('/') {
        Some(PathBuf::from(arg))
    } else if arg.contains("://") {
        path_from_uri(arg)
    } else {
        None
    }
}

/// Turn every selected entry into a path, one per entry.
///
/// Entries that are not local files are kept as their raw, relative text so
/// the validator rejects them and they are counted as failed.
pub fn selection_from_args(args: &[String]) -> Vec<PathBuf> {
    args.iter()
        .map(|arg| {
            path_from_arg(arg).unwrap_or_else(|| {
                warn!("Unsupported location in selection: {}", arg);
                PathBuf::from(arg)
            })
        })
        .collect()
}
