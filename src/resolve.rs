//! Safe resolution of content requests to files on disk.
//!
//! Course files (markdown, html, code) are served from a content root under a
//! public URL prefix, `/course-content/` by default. Every request path is
//! untrusted: it is decoded, joined onto the root, normalized lexically, and
//! rejected unless the result is still inside the root.
//!
//! ```text
//! /course-content/level-1-foundations/module-1-http/theory.md?raw=1
//!                 └──────────────── request path ─────────────┘
//!   strip query    → level-1-foundations/module-1-http/theory.md
//!   join + normalize → /srv/course/level-1-foundations/module-1-http/theory.md
//!   inside root?   → yes → stat → regular file → serve as text/markdown
//! ```
//!
//! [`resolve_safe_path`] is pure: no filesystem access, so it is the single
//! traversal check shared by every serving mode and by the `resolve` CLI
//! command. [`inspect`] and [`open`] add the stat step (sync and async).
//!
//! Rejection reasons are kept for logging only. Callers answer every
//! [`ResolveError`] the same way, as not-found, so a client cannot tell a
//! traversal attempt from a missing file.
//!
//! Symlinks inside the root are followed without a second containment check;
//! the root is trusted content.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("path escapes the content root")]
    Traversal,
    #[error("path is not valid after percent-decoding")]
    InvalidPath,
    #[error("not a regular file")]
    NotAFile,
    #[error("stat failed: {0}")]
    Io(#[from] std::io::Error),
}

pub const MARKDOWN: &str = "text/markdown; charset=utf-8";
pub const HTML: &str = "text/html; charset=utf-8";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Strip the public `prefix` from a URL path.
///
/// Matches only on a segment boundary: `/course-content/x` and
/// `/course-content` match, `/course-contents/x` does not.
pub fn strip_prefix<'a>(prefix: &str, uri_path: &'a str) -> Option<&'a str> {
    let prefix = prefix.trim_end_matches('/');
    let rest = uri_path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') {
        Some(rest)
    } else {
        None
    }
}

/// Resolve a request path (already stripped of the public prefix) to a path
/// inside `root`, or reject it.
///
/// `root` should be absolute. It is normalized the same way as the request so
/// the containment check compares like with like. The check is component-wise:
/// root `/srv/content` does not contain `/srv/content-old/x`.
pub fn resolve_safe_path(root: &Path, request_path: &str) -> Result<PathBuf, ResolveError> {
    let raw = request_path.split('?').next().unwrap_or_default();
    let decoded = urlencoding::decode(raw).map_err(|_| ResolveError::InvalidPath)?;
    if decoded.contains('\0') {
        return Err(ResolveError::InvalidPath);
    }
    let relative = decoded.trim_start_matches('/');

    let root = normalize(root);
    let candidate = normalize(&root.join(relative));
    if candidate.starts_with(&root) {
        Ok(candidate)
    } else {
        Err(ResolveError::Traversal)
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem.
///
/// `..` at the filesystem root stays at the root, matching how paths resolve
/// on POSIX systems.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Content type from the file extension, compared case-insensitively.
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("md") => MARKDOWN,
        Some("html") => HTML,
        _ => OCTET_STREAM,
    }
}

/// A request resolved to a servable file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub content_type: &'static str,
    pub len: u64,
}

/// Resolve and stat synchronously. Used by the CLI.
pub fn inspect(root: &Path, request_path: &str) -> Result<ResolvedFile, ResolveError> {
    let path = resolve_safe_path(root, request_path)?;
    let meta = std::fs::metadata(&path)?;
    resolved(path, &meta)
}

/// Resolve, stat and open for streaming. Used by the HTTP server.
///
/// The traversal check runs before any filesystem access.
pub async fn open(
    root: &Path,
    request_path: &str,
) -> Result<(ResolvedFile, tokio::fs::File), ResolveError> {
    let path = resolve_safe_path(root, request_path)?;
    let meta = tokio::fs::metadata(&path).await?;
    let file = resolved(path, &meta)?;
    let handle = tokio::fs::File::open(&file.path).await?;
    Ok((file, handle))
}

fn resolved(path: PathBuf, meta: &std::fs::Metadata) -> Result<ResolvedFile, ResolveError> {
    if !meta.is_file() {
        return Err(ResolveError::NotAFile);
    }
    let content_type = content_type_for(&path);
    Ok(ResolvedFile {
        path,
        content_type,
        len: meta.len(),
    })
}
