//! Route table for course pages.
//!
//! | Path | Route |
//! |------|-------|
//! | `/` | [`Route::Home`] |
//! | `/level/:id` | [`Route::Level`] |
//! | `/level/:id/module/:module_slug` | [`Route::Module`] |
//! | `/404` | [`Route::NotFound`] |
//! | anything else | [`Route::NotFound`] |
//!
//! Parameters are captured as raw strings. The router never validates them;
//! parsing `:id` and looking up the level or module is the page's job, and a
//! failure there renders the page's own not-found state.

/// A matched page route with its raw path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Level { id: String },
    Module { id: String, module_slug: String },
    NotFound,
}

impl Route {
    /// Match a URL path against the route table.
    ///
    /// The query string is ignored, and so is a single trailing slash on
    /// anything other than the root.
    pub fn match_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        if path == "/" || path.is_empty() {
            return Route::Home;
        }

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            ["level", id] if !id.is_empty() => Route::Level { id: id.to_string() },
            ["level", id, "module", slug] if !id.is_empty() && !slug.is_empty() => Route::Module {
                id: id.to_string(),
                module_slug: slug.to_string(),
            },
            _ => Route::NotFound,
        }
    }

    /// Canonical path for this route. Inverse of [`Route::match_path`].
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Level { id } => format!("/level/{id}"),
            Route::Module { id, module_slug } => format!("/level/{id}/module/{module_slug}"),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn level(id: u32) -> Route {
        Route::Level { id: id.to_string() }
    }

    pub fn module(id: u32, module_slug: &str) -> Route {
        Route::Module {
            id: id.to_string(),
            module_slug: module_slug.to_string(),
        }
    }
}

/// Parse a `:id` parameter into a level id.
///
/// Strict: ASCII digits only. `"2"` parses, `"abc"`, `"2abc"`, `"+2"`, `"-1"`
/// and `""` do not.
pub fn parse_level_id(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_home() {
        assert_eq!(Route::match_path("/"), Route::Home);
        assert_eq!(Route::match_path(""), Route::Home);
        assert_eq!(Route::match_path("/?utm=x"), Route::Home);
    }

    #[test]
    fn level_route_captures_raw_id() {
        assert_eq!(Route::match_path("/level/2"), Route::level(2));
        assert_eq!(
            Route::match_path("/level/abc"),
            Route::Level { id: "abc".into() }
        );
    }

    #[test]
    fn module_route_captures_both_params() {
        assert_eq!(
            Route::match_path("/level/1/module/module-1-http"),
            Route::module(1, "module-1-http")
        );
    }

    #[test]
    fn explicit_not_found_and_wildcard() {
        assert_eq!(Route::match_path("/404"), Route::NotFound);
        assert_eq!(Route::match_path("/nope"), Route::NotFound);
        assert_eq!(Route::match_path("/level"), Route::NotFound);
        assert_eq!(Route::match_path("/level/1/module"), Route::NotFound);
        assert_eq!(Route::match_path("/level/1/extra"), Route::NotFound);
        assert_eq!(Route::match_path("/level/1/module/a/b"), Route::NotFound);
        assert_eq!(Route::match_path("/course-content/x.md"), Route::NotFound);
    }

    #[test]
    fn trailing_slash_and_query_are_ignored() {
        assert_eq!(Route::match_path("/level/3/"), Route::level(3));
        assert_eq!(Route::match_path("/level/3?tab=topics"), Route::level(3));
        assert_eq!(
            Route::match_path("/level/3/module/module-1-saga/#top"),
            Route::module(3, "module-1-saga")
        );
    }

    #[test]
    fn empty_params_do_not_match() {
        assert_eq!(Route::match_path("/level//module/x"), Route::NotFound);
        assert_eq!(Route::match_path("/level/1/module//"), Route::NotFound);
    }

    #[test]
    fn path_round_trips_for_each_route() {
        for route in [
            Route::Home,
            Route::level(4),
            Route::module(2, "module-3-messaging"),
            Route::NotFound,
        ] {
            assert_eq!(Route::match_path(&route.path()), route);
        }
    }

    #[test]
    fn level_id_parsing_is_strict() {
        assert_eq!(parse_level_id("2"), Some(2));
        assert_eq!(parse_level_id("abc"), None);
        assert_eq!(parse_level_id("2abc"), None);
        assert_eq!(parse_level_id("-1"), None);
        assert_eq!(parse_level_id("+2"), None);
        assert_eq!(parse_level_id(" 2"), None);
        assert_eq!(parse_level_id(""), None);
    }
}
