//! # Course Site
//!
//! Web server for a multi-level programming course. The course is a fixed
//! hierarchy, Level → Topic, compiled into the binary as JSON. Each topic is
//! backed by a module folder of markdown and code on disk:
//!
//! ```text
//! content root/
//! ├── level-1-foundations/
//! │   ├── module-1-http/
//! │   │   ├── README.md
//! │   │   ├── theory.md
//! │   │   ├── exercises.md
//! │   │   ├── solutions.md
//! │   │   ├── project.md
//! │   │   └── code/
//! │   └── module-2-jvm/
//! └── level-2-scaling/
//!     └── ...
//! ```
//!
//! Pages are rendered on the server: a home page listing levels, one page per
//! level with its topics and a scroll progress tracker, and one page per
//! module linking to its files. The files themselves are served raw under
//! `/course-content/`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`course`] | Course document: levels, topics, lookups and validation |
//! | [`slug`] | `kind-N-name` slug convention for level and module folders |
//! | [`resolve`] | Maps `/course-content/` requests to files, rejecting traversal |
//! | [`router`] | Page route table |
//! | [`tracker`] | Active-section state for the level page progress tracker |
//! | [`boundary`] | Catches render failures and shows a fallback screen |
//! | [`pages`] | Maud page templates |
//! | [`server`] | axum application and listener |
//! | [`config`] | Layered settings: defaults, TOML file, environment, flags |
//! | [`check`] | Compares the course document with the folders on disk |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Resolver for Every Mode
//!
//! Development and production differ only in where static assets come from.
//! Both serve course content through the same handler and the same
//! [`resolve::resolve_safe_path`], so a traversal fix can't land in one mode
//! and miss the other. The check is lexical and happens before the filesystem
//! is touched.
//!
//! ## Server-Rendered Pages
//!
//! The route table is matched on the server and pages are plain HTML from
//! [Maud](https://maud.lambda.xyz/), auto-escaped. The only client script is
//! the progress tracker, which drives the dots rendered by the server with
//! the same trigger band ([`tracker::TriggerBand`]).
//!
//! ## Immutable Course Data
//!
//! The course document is parsed and validated once at startup and shared
//! read-only across requests. Changing the course means rebuilding or
//! pointing `course_file` at a new document and restarting.

pub mod boundary;
pub mod check;
pub mod config;
pub mod course;
pub mod output;
pub mod pages;
pub mod resolve;
pub mod router;
pub mod server;
pub mod slug;
pub mod tracker;

#[cfg(test)]
pub(crate) mod test_helpers;
