//! Scroll-position tracking for the level page's progress indicator.
//!
//! The level page lists its topics as sections (`#topic-<id>`). A vertical
//! trigger band near the top of the viewport decides which section is
//! "active": a section becomes active when it enters the band. The progress
//! dots beside the list fill up to the active index.
//!
//! [`ScrollTracker`] is the state machine; the browser side
//! (`static/progress.js`) feeds it the same way with `IntersectionObserver`
//! batches, using [`TriggerBand::root_margin`] rendered into the page.
//!
//! ## Tie-break
//!
//! Several sections can report entering the band in one batch (fast scrolls,
//! anchor jumps). Entries are applied in batch order and the last one wins.
//! There is no "most visible" heuristic: the order is whatever the observer
//! delivers.

/// A viewport intersection report for one section.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub section_id: String,
    pub is_intersecting: bool,
}

impl Intersection {
    pub fn entering(section_id: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            is_intersecting: true,
        }
    }

    pub fn leaving(section_id: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            is_intersecting: false,
        }
    }
}

/// The active band, as fractions of the viewport height cut from the top and
/// from the bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerBand {
    pub top: f64,
    pub bottom: f64,
}

impl Default for TriggerBand {
    fn default() -> Self {
        Self {
            top: 0.2,
            bottom: 0.6,
        }
    }
}

impl TriggerBand {
    /// `IntersectionObserver` `rootMargin` shrinking the viewport to the band.
    pub fn root_margin(&self) -> String {
        format!(
            "-{}% 0px -{}% 0px",
            percent(self.top),
            percent(self.bottom)
        )
    }
}

fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

/// Tracks which of an ordered list of sections is active.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    sections: Vec<String>,
    active: usize,
    watching: bool,
    generation: u64,
}

impl ScrollTracker {
    pub fn new(sections: Vec<String>) -> Self {
        Self {
            sections,
            active: 0,
            watching: true,
            generation: 0,
        }
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    /// Incremented on every [`reset`](Self::reset). The page scrolls back to
    /// the top when it changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply one observer batch. Entries that are not intersecting, or that
    /// name a section outside the list, are ignored. Returns the active index.
    pub fn observe(&mut self, batch: &[Intersection]) -> usize {
        if !self.watching {
            return self.active;
        }
        for entry in batch.iter().filter(|e| e.is_intersecting) {
            if let Some(idx) = self.sections.iter().position(|s| *s == entry.section_id) {
                self.active = idx;
            }
        }
        self.active
    }

    /// Watch a new list of sections (navigation to another level). The active
    /// index goes back to 0.
    pub fn reset(&mut self, sections: Vec<String>) {
        self.sections = sections;
        self.active = 0;
        self.watching = true;
        self.generation += 1;
    }

    /// Stop watching. Batches delivered after this are dropped.
    pub fn disconnect(&mut self) {
        self.watching = false;
    }

    /// Display state of the dot at `idx`.
    pub fn dot(&self, idx: usize) -> DotState {
        match idx.cmp(&self.active) {
            std::cmp::Ordering::Less => DotState::Passed,
            std::cmp::Ordering::Equal => DotState::Active,
            std::cmp::Ordering::Greater => DotState::Upcoming,
        }
    }
}

/// How a progress dot renders relative to the active section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotState {
    Passed,
    Active,
    Upcoming,
}

impl DotState {
    pub fn css_class(self) -> &'static str {
        match self {
            DotState::Passed => "dot passed",
            DotState::Active => "dot active",
            DotState::Upcoming => "dot",
        }
    }

    /// Connector after this dot is filled when the dot is already passed.
    pub fn line_filled(self) -> bool {
        self == DotState::Passed
    }
}

/// DOM id of a topic section.
pub fn section_id(topic_id: &str) -> String {
    format!("topic-{topic_id}")
}
