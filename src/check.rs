//! Content tree check.
//!
//! Compares the course document against the folders under the content root:
//! every module's folder should exist and hold the conventional resource set
//! ([`ModuleResource::ALL`]), and every `level-N-*/module-N-*` folder on disk
//! should belong to some topic. Folders that don't are reported as orphans.
//!
//! Missing files are not errors. Module pages link to every resource anyway
//! and a missing one answers 404, so the report is informational.

use crate::course::{Course, ModuleResource};
use crate::slug::parse_slug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("content root is not a directory: {0}")]
    MissingRoot(PathBuf),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub content_root: PathBuf,
    pub levels: Vec<LevelReport>,
    /// Module folders no topic points at, sorted by path.
    pub orphans: Vec<OrphanFolder>,
}

/// A `level-N-*/module-N-*` folder that no topic's base path names.
#[derive(Debug, Clone, PartialEq)]
pub struct OrphanFolder {
    /// Relative to the content root.
    pub path: String,
    /// Title guessed from the module folder name (`module-9-extra-notes` → "extra notes").
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelReport {
    pub id: u32,
    pub title: String,
    pub slug: String,
    pub modules: Vec<ModuleReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleReport {
    pub topic_id: String,
    pub title: String,
    pub base_path: String,
    pub folder_exists: bool,
    pub resources: Vec<ResourceStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceStatus {
    pub resource: ModuleResource,
    pub present: bool,
}

impl ModuleReport {
    pub fn missing(&self) -> impl Iterator<Item = ModuleResource> + '_ {
        self.resources
            .iter()
            .filter(|s| !s.present)
            .map(|s| s.resource)
    }
}

impl CheckReport {
    pub fn module_count(&self) -> usize {
        self.levels.iter().map(|l| l.modules.len()).sum()
    }

    /// Resource files missing across all modules.
    pub fn missing_count(&self) -> usize {
        self.levels
            .iter()
            .flat_map(|l| &l.modules)
            .map(|m| m.missing().count())
            .sum()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0 && self.orphans.is_empty()
    }
}

/// Check `course` against the content folders under `content_root`.
pub fn check_content(course: &Course, content_root: &Path) -> Result<CheckReport, CheckError> {
    if !content_root.is_dir() {
        return Err(CheckError::MissingRoot(content_root.to_path_buf()));
    }

    let levels = course
        .levels
        .iter()
        .map(|level| LevelReport {
            id: level.id,
            title: level.title.clone(),
            slug: level.slug.clone(),
            modules: level
                .topics
                .iter()
                .map(|topic| {
                    let dir = topic.content_dir(content_root);
                    let resources = ModuleResource::ALL
                        .iter()
                        .map(|&resource| {
                            let path = dir.join(resource.target().trim_end_matches('/'));
                            let present = if resource.is_dir() {
                                path.is_dir()
                            } else {
                                path.is_file()
                            };
                            ResourceStatus { resource, present }
                        })
                        .collect();
                    ModuleReport {
                        topic_id: topic.id.clone(),
                        title: topic.title.clone(),
                        base_path: topic.module_base_path.clone(),
                        folder_exists: dir.is_dir(),
                        resources,
                    }
                })
                .collect(),
        })
        .collect();

    let known: HashSet<&str> = course
        .levels
        .iter()
        .flat_map(|l| &l.topics)
        .map(|t| t.module_base_path.trim_matches('/'))
        .collect();
    let orphans = find_orphans(content_root, &known)?;

    Ok(CheckReport {
        content_root: content_root.to_path_buf(),
        levels,
        orphans,
    })
}

/// `level-N-*/module-N-*` folders not in `known`, sorted.
fn find_orphans(
    content_root: &Path,
    known: &HashSet<&str>,
) -> Result<Vec<OrphanFolder>, CheckError> {
    let mut orphans = Vec::new();
    for entry in WalkDir::new(content_root)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(content_root) else {
            continue;
        };
        let names: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let [level_dir, module_dir] = names.as_slice() else {
            continue;
        };
        let level = parse_slug(level_dir);
        let module = parse_slug(module_dir);
        if level.kind != "level" || level.number.is_none() {
            continue;
        }
        if module.kind != "module" || module.number.is_none() {
            continue;
        }
        let path = format!("{level_dir}/{module_dir}");
        if !known.contains(path.as_str()) {
            orphans.push(OrphanFolder {
                path,
                title: module.display_title,
            });
        }
    }
    Ok(orphans)
}
