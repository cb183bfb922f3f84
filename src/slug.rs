//! Slug parsing for the `kind-N-name` convention.
//!
//! Levels and modules are addressed by url-safe slugs that carry their
//! position in the course:
//!
//! - `level-1-foundations` → kind="level", number=1, title="foundations"
//! - `module-2-jvm-concurrency` → kind="module", number=2, title="jvm concurrency"
//!
//! The same slugs name the content folders on disk, so a module's base path is
//! `<level slug>/<module slug>`. Parsing is lenient: anything url-safe is a
//! valid slug, the numbered form is only used for display and ordering hints.

/// Result of parsing a slug like `module-1-http`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSlug {
    /// Leading word before the number (`module`), empty if the slug is not numbered.
    pub kind: String,
    /// Position number if present (`1` from `module-1-http`).
    pub number: Option<u32>,
    /// Remainder after `kind-N-` with dashes converted to spaces. The whole
    /// slug when unnumbered.
    pub display_title: String,
}

/// A slug is url-safe when it is non-empty lowercase ASCII letters, digits and
/// dashes, without leading, trailing or doubled dashes.
pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Parse a slug following the `kind-N-name` convention.
///
/// - `"module-1-http"` → kind="module", number=Some(1), display_title="http"
/// - `"level-4-production-architecture"` → number=Some(4), display_title="production architecture"
/// - `"module-3"` → number=Some(3), display_title=""
/// - `"appendix"` → kind="", number=None, display_title="appendix"
pub fn parse_slug(slug: &str) -> ParsedSlug {
    let mut parts = slug.splitn(3, '-');
    if let (Some(kind), Some(num)) = (parts.next(), parts.next())
        && let Ok(number) = num.parse::<u32>()
    {
        let name = parts.next().unwrap_or("");
        return ParsedSlug {
            kind: kind.to_string(),
            number: Some(number),
            display_title: name.replace('-', " "),
        };
    }
    ParsedSlug {
        kind: String::new(),
        number: None,
        display_title: slug.replace('-', " "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_slug_single_word() {
        let p = parse_slug("module-1-http");
        assert_eq!(p.kind, "module");
        assert_eq!(p.number, Some(1));
        assert_eq!(p.display_title, "http");
    }

    #[test]
    fn level_slug_dashes_become_spaces() {
        let p = parse_slug("level-4-production-architecture");
        assert_eq!(p.kind, "level");
        assert_eq!(p.number, Some(4));
        assert_eq!(p.display_title, "production architecture");
    }

    #[test]
    fn number_without_name() {
        let p = parse_slug("module-3");
        assert_eq!(p.number, Some(3));
        assert_eq!(p.display_title, "");
    }

    #[test]
    fn unnumbered_slug() {
        let p = parse_slug("appendix-notes");
        assert_eq!(p.kind, "");
        assert_eq!(p.number, None);
        assert_eq!(p.display_title, "appendix notes");
    }

    #[test]
    fn url_safe_accepts_course_slugs() {
        assert!(is_url_safe("module-1-http"));
        assert!(is_url_safe("level-2-scaling"));
        assert!(is_url_safe("a1"));
    }

    #[test]
    fn url_safe_rejects_unsafe_input() {
        assert!(!is_url_safe(""));
        assert!(!is_url_safe("Module-1"));
        assert!(!is_url_safe("module 1"));
        assert!(!is_url_safe("module/1"));
        assert!(!is_url_safe("-module"));
        assert!(!is_url_safe("module-"));
        assert!(!is_url_safe("module--1"));
        assert!(!is_url_safe(".."));
    }
}
