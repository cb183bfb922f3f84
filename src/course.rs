//! The course content model.
//!
//! A course is a fixed hierarchy: ordered levels, each with ordered topics
//! (modules). The tree is defined once at startup from a JSON document, either
//! the one compiled into the binary (`data/course.json`) or a file named in the
//! site config, validated, and then shared read-only by every request.
//!
//! ## Document Shape
//!
//! ```json
//! {
//!   "title": "Java System Design",
//!   "tagline": "...",
//!   "levels": [
//!     {
//!       "id": 1,
//!       "slug": "level-1-foundations",
//!       "title": "Fundamentos Essenciais",
//!       "subtitle": "Foundations",
//!       "description": "...",
//!       "accent": "cyan",
//!       "topics": [
//!         {
//!           "id": "1-1",
//!           "title": "HTTP Internals",
//!           "description": "...",
//!           "concepts": ["HTTP/1.1", "REST"],
//!           "resources": ["theory.md", "code/"],
//!           "module_slug": "module-1-http",
//!           "module_base_path": "level-1-foundations/module-1-http"
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! ## Invariants
//!
//! Checked by [`Course::validate`] at load time:
//! - Level ids are `1..=N`, in order. Previous/next navigation is `id ∓ 1`.
//! - Topic ids and module slugs are unique within a level; slugs are url-safe.
//! - Module base paths are unique within a level, relative, and never contain
//!   `..`, so a module slug maps to exactly one content folder.

use crate::slug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// The course document compiled into the binary.
pub const EMBEDDED_COURSE: &str = include_str!("../data/course.json");

#[derive(Error, Debug)]
pub enum CourseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Course validation error: {0}")]
    Validation(String),
}

/// Accent theme of a level. Drives the color of badges, links and progress dots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Cyan,
    Amber,
}

impl Accent {
    pub fn as_str(self) -> &'static str {
        match self {
            Accent::Cyan => "cyan",
            Accent::Amber => "amber",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Course {
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    pub levels: Vec<CourseLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourseLevel {
    pub id: u32,
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub accent: Accent,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    pub module_slug: String,
    pub module_base_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_examples: Vec<CodeExample>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeExample {
    pub title: String,
    pub language: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Exercise {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Iniciante",
            Difficulty::Intermediate => "Intermédio",
            Difficulty::Advanced => "Avançado",
        }
    }
}

impl Course {
    /// Parse and validate the course compiled into the binary.
    pub fn embedded() -> Result<Self, CourseError> {
        Self::from_json(EMBEDDED_COURSE)
    }

    /// Parse and validate a course document.
    pub fn from_json(json: &str) -> Result<Self, CourseError> {
        let course: Course = serde_json::from_str(json)?;
        course.validate()?;
        Ok(course)
    }

    /// Load from `path` when given, otherwise the embedded course.
    pub fn load(path: Option<&Path>) -> Result<Self, CourseError> {
        match path {
            Some(path) => Self::from_json(&fs::read_to_string(path)?),
            None => Self::embedded(),
        }
    }

    pub fn validate(&self) -> Result<(), CourseError> {
        for (idx, level) in self.levels.iter().enumerate() {
            let expected = idx as u32 + 1;
            if level.id != expected {
                return Err(CourseError::Validation(format!(
                    "level ids must be contiguous from 1: expected {expected}, found {}",
                    level.id
                )));
            }
            if !slug::is_url_safe(&level.slug) {
                return Err(CourseError::Validation(format!(
                    "level {} slug is not url-safe: {:?}",
                    level.id, level.slug
                )));
            }
            level.validate_topics()?;
        }
        Ok(())
    }

    pub fn level(&self, id: u32) -> Option<&CourseLevel> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// Find a topic by module slug within one level only.
    pub fn topic(&self, level_id: u32, module_slug: &str) -> Option<&Topic> {
        self.level(level_id)?.topic(module_slug)
    }

    pub fn previous_level(&self, id: u32) -> Option<&CourseLevel> {
        self.level(id.checked_sub(1)?)
    }

    pub fn next_level(&self, id: u32) -> Option<&CourseLevel> {
        self.level(id.checked_add(1)?)
    }

    /// Total number of modules across all levels.
    pub fn module_count(&self) -> usize {
        self.levels.iter().map(|l| l.topics.len()).sum()
    }
}

impl CourseLevel {
    pub fn topic(&self, module_slug: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.module_slug == module_slug)
    }

    pub fn concept_count(&self) -> usize {
        self.topics.iter().map(|t| t.concepts.len()).sum()
    }

    pub fn exercise_count(&self) -> usize {
        self.topics.iter().map(|t| t.exercises.len()).sum()
    }

    pub fn code_example_count(&self) -> usize {
        self.topics.iter().map(|t| t.code_examples.len()).sum()
    }

    /// Zero-padded id for badges (`01`, `02`, ...).
    pub fn padded_id(&self) -> String {
        format!("{:02}", self.id)
    }

    fn validate_topics(&self) -> Result<(), CourseError> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        let mut paths = HashSet::new();
        for topic in &self.topics {
            let context = format!("level {} topic {:?}", self.id, topic.id);
            if !ids.insert(topic.id.as_str()) {
                return Err(CourseError::Validation(format!("{context}: duplicate topic id")));
            }
            if !slug::is_url_safe(&topic.module_slug) {
                return Err(CourseError::Validation(format!(
                    "{context}: module slug is not url-safe: {:?}",
                    topic.module_slug
                )));
            }
            if !slugs.insert(topic.module_slug.as_str()) {
                return Err(CourseError::Validation(format!(
                    "{context}: duplicate module slug {:?}",
                    topic.module_slug
                )));
            }
            if !is_contained_relative(&topic.module_base_path) {
                return Err(CourseError::Validation(format!(
                    "{context}: module base path must be relative without '..': {:?}",
                    topic.module_base_path
                )));
            }
            if !paths.insert(topic.module_base_path.as_str()) {
                return Err(CourseError::Validation(format!(
                    "{context}: duplicate module base path {:?}",
                    topic.module_base_path
                )));
            }
        }
        Ok(())
    }
}

fn is_contained_relative(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// The conventional content set every module folder is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleResource {
    Readme,
    Theory,
    Exercises,
    Solutions,
    Project,
    Code,
}

impl ModuleResource {
    pub const ALL: [ModuleResource; 6] = [
        ModuleResource::Readme,
        ModuleResource::Theory,
        ModuleResource::Exercises,
        ModuleResource::Solutions,
        ModuleResource::Project,
        ModuleResource::Code,
    ];

    /// Link label shown on the module page.
    pub fn label(self) -> &'static str {
        match self {
            ModuleResource::Readme => "README",
            ModuleResource::Theory => "Teoria",
            ModuleResource::Exercises => "Exercícios",
            ModuleResource::Solutions => "Soluções",
            ModuleResource::Project => "Projeto",
            ModuleResource::Code => "Código",
        }
    }

    /// Path relative to the module folder. Directories end in `/`.
    pub fn target(self) -> &'static str {
        match self {
            ModuleResource::Readme => "README.md",
            ModuleResource::Theory => "theory.md",
            ModuleResource::Exercises => "exercises.md",
            ModuleResource::Solutions => "solutions.md",
            ModuleResource::Project => "project.md",
            ModuleResource::Code => "code/",
        }
    }

    pub fn is_dir(self) -> bool {
        self.target().ends_with('/')
    }
}

/// A link from a module page to one of its content files.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceLink {
    pub resource: ModuleResource,
    pub href: String,
}

impl Topic {
    /// Links to every conventional content file, under the public `prefix`.
    ///
    /// Links are built without checking the files exist; a missing file is a
    /// 404 when followed.
    pub fn resource_links(&self, prefix: &str) -> Vec<ResourceLink> {
        let base = format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            self.module_base_path.trim_matches('/')
        );
        ModuleResource::ALL
            .iter()
            .map(|&resource| ResourceLink {
                resource,
                href: format!("{base}/{}", resource.target()),
            })
            .collect()
    }

    /// On-disk folder for this module under the content root.
    pub fn content_dir(&self, content_root: &Path) -> PathBuf {
        content_root.join(&self.module_base_path)
    }
}
