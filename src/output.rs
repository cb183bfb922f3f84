//! CLI output formatting.
//!
//! Output is course-centric: levels and modules are shown by id and title,
//! with folders and files as indented context lines underneath.
//!
//! ## Check
//!
//! ```text
//! Content root: /srv/course
//! 01 Foundations (level-1-foundations)
//!     1-1 HTTP Internals → level-1-foundations/module-1-http
//!     1-2 JVM Threads → level-1-foundations/module-2-jvm
//!         Missing: theory.md, code/
//! 02 Scaling (level-2-scaling)
//!     2-1 Load Balancing → level-2-scaling/module-1-load-balancing
//!         Folder missing
//!
//! Orphan module folders
//!     level-1-foundations/module-9-extra (extra)
//!
//! 2 levels, 3 modules, 8 missing files, 1 orphan folder
//! ```
//!
//! ## Resolve
//!
//! ```text
//! /level-1-foundations/module-1-http/theory.md → /srv/course/level-1-foundations/module-1-http/theory.md
//!     Content-Type: text/markdown; charset=utf-8
//!     Size: 1204 bytes
//! ```
//!
//! Each command has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::check::CheckReport;
use crate::resolve::{ResolveError, ResolvedFile};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![format!("Content root: {}", report.content_root.display())];

    for level in &report.levels {
        lines.push(format!("{:0>2} {} ({})", level.id, level.title, level.slug));
        for module in &level.modules {
            lines.push(format!(
                "{}{} {} → {}",
                indent(1),
                module.topic_id,
                module.title,
                module.base_path
            ));
            if !module.folder_exists {
                lines.push(format!("{}Folder missing", indent(2)));
                continue;
            }
            let missing: Vec<&str> = module.missing().map(|r| r.target()).collect();
            if !missing.is_empty() {
                lines.push(format!("{}Missing: {}", indent(2), missing.join(", ")));
            }
        }
    }

    if !report.orphans.is_empty() {
        lines.push(String::new());
        lines.push("Orphan module folders".to_string());
        for orphan in &report.orphans {
            if orphan.title.is_empty() {
                lines.push(format!("{}{}", indent(1), orphan.path));
            } else {
                lines.push(format!("{}{} ({})", indent(1), orphan.path, orphan.title));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{}, {}, {}, {}",
        plural(report.levels.len(), "level", "levels"),
        plural(report.module_count(), "module", "modules"),
        plural(report.missing_count(), "missing file", "missing files"),
        plural(report.orphans.len(), "orphan folder", "orphan folders"),
    ));
    lines
}

pub fn print_check(report: &CheckReport) {
    for line in format_check(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Resolve
// ============================================================================

pub fn format_resolve(
    request_path: &str,
    result: &Result<ResolvedFile, ResolveError>,
) -> Vec<String> {
    match result {
        Ok(file) => vec![
            format!("{} → {}", request_path, file.path.display()),
            format!("{}Content-Type: {}", indent(1), file.content_type),
            format!("{}Size: {}", indent(1), plural(file.len as usize, "byte", "bytes")),
        ],
        Err(err) => vec![
            format!("{} → not found", request_path),
            format!("{}Reason: {}", indent(1), err),
        ],
    }
}

pub fn print_resolve(request_path: &str, result: &Result<ResolvedFile, ResolveError>) {
    for line in format_resolve(request_path, result) {
        println!("{}", line);
    }
}
