//! Shared test utilities for the course-site test suite.
//!
//! Provides a small two-level course and an on-disk content root that
//! mirrors it, so resolver, page and server tests share one fixture.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let course = sample_course();
//! let tmp = setup_content();
//! assert_file(&content_root(&tmp), "level-1-foundations/module-1-http/theory.md");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::course::Course;

// =========================================================================
// Course fixture
// =========================================================================

/// A two-level course with code examples and exercises on the first topic.
pub fn sample_course_json() -> String {
    r#"{
  "title": "Sample Course",
  "tagline": "A course used by tests",
  "levels": [
    {
      "id": 1,
      "slug": "level-1-foundations",
      "title": "Foundations",
      "subtitle": "Basics",
      "description": "Learn the basics.",
      "accent": "cyan",
      "topics": [
        {
          "id": "1-1",
          "title": "HTTP Internals",
          "description": "Requests and responses.",
          "concepts": ["HTTP/1.1", "Headers", "REST"],
          "resources": ["theory.md", "code/"],
          "module_slug": "module-1-http",
          "module_base_path": "level-1-foundations/module-1-http",
          "code_examples": [
            { "title": "Raw request", "language": "bash", "code": "curl -v http://localhost" }
          ],
          "exercises": [
            { "title": "Parse a request line", "description": "Split method, target and version.", "difficulty": "beginner" }
          ]
        },
        {
          "id": "1-2",
          "title": "JVM <Threads>",
          "description": "Executors and pools.",
          "concepts": ["JVM", "Threads"],
          "resources": ["theory.md"],
          "module_slug": "module-2-jvm",
          "module_base_path": "level-1-foundations/module-2-jvm"
        }
      ]
    },
    {
      "id": 2,
      "slug": "level-2-scaling",
      "title": "Scaling",
      "subtitle": "Scaling Services",
      "description": "Grow past one box.",
      "accent": "amber",
      "topics": [
        {
          "id": "2-1",
          "title": "Load Balancing",
          "description": "Spread the load.",
          "concepts": ["LB"],
          "resources": [],
          "module_slug": "module-1-load-balancing",
          "module_base_path": "level-2-scaling/module-1-load-balancing"
        }
      ]
    }
  ]
}"#
    .to_string()
}

pub fn sample_course() -> Course {
    Course::from_json(&sample_course_json()).unwrap()
}

// =========================================================================
// Content root fixture
// =========================================================================

/// Markdown body of the fixture's `module-1-http/theory.md`.
pub const THEORY_MD: &str = "# HTTP Internals\n\nA request has a method, a target and a version.\n";

/// Build a content root matching [`sample_course`] in a temp directory.
///
/// Only `module-1-http` is fully populated; `module-2-jvm` has a README and
/// nothing else. A `secret.txt` sits next to the root (not inside it) so
/// traversal tests have something real to aim at.
pub fn setup_content() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("content");
    let http = root.join("level-1-foundations/module-1-http");
    fs::create_dir_all(http.join("code")).unwrap();
    fs::write(http.join("README.md"), "# module 1\n").unwrap();
    fs::write(http.join("theory.md"), THEORY_MD).unwrap();
    fs::write(http.join("exercises.md"), "# Exercises\n").unwrap();
    fs::write(http.join("solutions.md"), "# Solutions\n").unwrap();
    fs::write(http.join("project.md"), "# Project\n").unwrap();
    fs::write(http.join("slides.html"), "<h1>slides</h1>").unwrap();
    fs::write(http.join("code/Server.java"), "class Server {}\n").unwrap();

    let jvm = root.join("level-1-foundations/module-2-jvm");
    fs::create_dir_all(&jvm).unwrap();
    fs::write(jvm.join("README.md"), "# jvm\n").unwrap();

    fs::write(tmp.path().join("secret.txt"), "top secret").unwrap();
    tmp
}

/// Content root inside a [`setup_content`] temp directory.
pub fn content_root(tmp: &TempDir) -> std::path::PathBuf {
    tmp.path().join("content")
}

/// Assert a file exists under `root`. Panics with the missing path.
pub fn assert_file(root: &Path, rel: &str) {
    let path = root.join(rel);
    assert!(path.is_file(), "missing fixture file: {}", path.display());
}
