//! Page rendering.
//!
//! Every page route renders to a full HTML document with
//! [maud](https://maud.lambda.xyz/). All interpolation is auto-escaped, so
//! course text can contain `<`, `&` and quotes safely.
//!
//! ## Pages
//!
//! - **Home** (`/`): course hero and one card per level
//! - **Level** (`/level/:id`): topics with the progress tracker and
//!   previous/next level navigation
//! - **Module** (`/level/:id/module/:slug`): links to the module's content
//!   files under the content prefix
//! - **Not found**: the generic 404 page, plus level and module specific
//!   variants when a parameter doesn't resolve
//!
//! [`render_path`] is the entry point. It runs the page inside an
//! [`ErrorBoundary`] so a failing renderer yields the fallback screen.

use crate::boundary::ErrorBoundary;
use crate::course::{Accent, Course, CourseLevel, Topic};
use crate::router::{Route, parse_level_id};
use crate::tracker::{ScrollTracker, TriggerBand, section_id};
use maud::{DOCTYPE, Markup, html};

/// Stylesheet and tracker script, embedded at compile time.
pub const CSS: &str = include_str!("../static/style.css");
pub const PROGRESS_JS: &str = include_str!("../static/progress.js");

/// Concepts shown on a collapsed topic card.
const CONCEPT_PREVIEW: usize = 5;

/// Outcome class of a rendered page. The server maps it to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Ok,
    NotFound,
    Error,
}

#[derive(Debug)]
pub struct RenderedPage {
    pub status: PageStatus,
    pub markup: Markup,
}

/// Everything a page needs besides its route.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub course: &'a Course,
    /// Public URL prefix content files are served under.
    pub content_prefix: &'a str,
}

/// Match `path` and render the page inside an error boundary.
pub fn render_path(ctx: PageContext<'_>, path: &str) -> RenderedPage {
    let route = Route::match_path(path);
    // Canonical path, so `/level/2/?x=1` marks the same nav link as `/level/2`
    let current_path = route.path();
    let mut status = PageStatus::Ok;
    let mut boundary = ErrorBoundary::new();
    let markup = boundary.render(|| {
        let page = render_route(ctx, &route, &current_path);
        status = page.status;
        page.markup
    });
    if boundary.has_error() {
        status = PageStatus::Error;
    }
    RenderedPage { status, markup }
}

/// Render a matched route. Parameter parsing and lookups happen here, and a
/// miss renders the page's own not-found state.
pub fn render_route(
    ctx: PageContext<'_>,
    route: &Route,
    current_path: &str,
) -> RenderedPage {
    let course = ctx.course;
    match route {
        Route::Home => ok(render_home(course, current_path)),
        Route::Level { id } => match parse_level_id(id).and_then(|id| course.level(id)) {
            Some(level) => ok(render_level(course, level, current_path)),
            None => not_found(render_level_not_found(course, current_path)),
        },
        Route::Module { id, module_slug } => {
            let found = parse_level_id(id)
                .and_then(|id| Some((course.level(id)?, course.topic(id, module_slug)?)));
            match found {
                Some((level, topic)) => ok(render_module(ctx, level, topic, current_path)),
                None => not_found(render_module_not_found(course, current_path)),
            }
        }
        Route::NotFound => not_found(render_not_found()),
    }
}

fn ok(markup: Markup) -> RenderedPage {
    RenderedPage {
        status: PageStatus::Ok,
        markup,
    }
}

fn not_found(markup: Markup) -> RenderedPage {
    RenderedPage {
        status: PageStatus::NotFound,
        markup,
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
pub fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/assets/style.css";
                script src="/assets/progress.js" defer {}
            }
            body {
                (content)
            }
        }
    }
}

/// Top navigation. The mobile menu is a checkbox toggle, no script needed.
pub fn render_navbar(course: &Course, current_path: &str) -> Markup {
    let link_class = |path: &str| (current_path == path).then_some("current");
    html! {
        nav.navbar {
            a.brand href="/" { (course.title.to_uppercase()) }
            div.nav-links {
                a class=[link_class("/")] href="/" { "Início" }
                @for level in &course.levels {
                    @let path = Route::level(level.id).path();
                    a class=[link_class(&path)] href=(path) {
                        span.level-number { (level.padded_id()) }
                        " " (level.subtitle)
                    }
                }
            }
            input.nav-toggle type="checkbox" id="nav-toggle";
            label.nav-hamburger for="nav-toggle" aria-label="Menu" {
                span.hamburger-line {}
                span.hamburger-line {}
                span.hamburger-line {}
            }
            div.nav-panel {
                a class=[link_class("/")] href="/" { "Início" }
                @for level in &course.levels {
                    @let path = Route::level(level.id).path();
                    a class=[link_class(&path)] href=(path) {
                        span.level-number { (level.padded_id()) }
                        " " (level.title)
                    }
                }
            }
        }
    }
}

fn render_footer(course: &Course) -> Markup {
    html! {
        footer.site-footer {
            p { (course.title) " Course — Construído para engenheiros que querem dominar sistemas distribuídos" }
        }
    }
}

fn accent_class(accent: Accent) -> String {
    format!("accent-{}", accent.as_str())
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Centered message with a link home, used by the not-found variants.
fn message_page(course: &Course, current_path: &str, heading: &str, link: &str) -> Markup {
    let content = html! {
        (render_navbar(course, current_path))
        main.message-page {
            h1 { (heading) }
            a href="/" { (link) }
        }
    };
    base_document(heading, content)
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page: hero and level grid
pub fn render_home(course: &Course, current_path: &str) -> Markup {
    let content = html! {
        (render_navbar(course, current_path))
        main.home-page {
            section.hero {
                span.hero-badge { "PRODUCTION ENGINEERING ROADMAP" }
                h1 { (course.title) }
                @if !course.tagline.is_empty() {
                    p.tagline { (course.tagline) }
                }
                ul.hero-stats {
                    li { strong { (plural(course.levels.len(), "Nível", "Níveis")) } " de proficiência" }
                    li { strong { (plural(course.module_count(), "Módulo", "Módulos")) } " de estudo" }
                }
                a.explore href="#levels" { "EXPLORAR" }
            }
            section.levels id="levels" {
                h2 { "Escolha o Seu Nível" }
                div.level-grid {
                    @for level in &course.levels {
                        (render_level_card(level))
                    }
                }
            }
        }
        (render_footer(course))
    };
    base_document(&course.title, content)
}

/// Preview card for a level on the home page
pub fn render_level_card(level: &CourseLevel) -> Markup {
    html! {
        article class={ "level-card level-" (level.id) " " (accent_class(level.accent)) } {
            header {
                span.level-badge { "NÍVEL " (level.padded_id()) }
                span.subtitle { (level.subtitle) }
            }
            @if let Some(image) = &level.image {
                img src=(image) alt=(level.title) loading="lazy";
            }
            h3 { (level.title) }
            p.description { (level.description) }
            ul.level-stats {
                li { (plural(level.topics.len(), "tópico", "tópicos")) }
                li { (plural(level.exercise_count(), "exercício", "exercícios")) }
                li { (plural(level.code_example_count(), "exemplo", "exemplos")) }
            }
            a.cta href=(Route::level(level.id).path()) { "Explorar Nível →" }
        }
    }
}

/// Renders a level page: hero, stats, tracked topic list, level navigation
pub fn render_level(course: &Course, level: &CourseLevel, current_path: &str) -> Markup {
    let sections = level.topics.iter().map(|t| section_id(&t.id)).collect();
    let tracker = ScrollTracker::new(sections);
    let prev = course.previous_level(level.id);
    let next = course.next_level(level.id);

    let content = html! {
        (render_navbar(course, current_path))
        main class={ "level-page level-" (level.id) " " (accent_class(level.accent)) } {
            section.level-hero {
                nav.breadcrumb {
                    a href="/" { "Início" }
                    " › "
                    span.current { "Nível " (level.padded_id()) }
                }
                span.subtitle { (level.subtitle) }
                h1 { (level.title) }
            }
            section.level-summary {
                p.description { (level.description) }
                ul.level-stats {
                    li.topics { (plural(level.topics.len(), "tópico", "tópicos")) }
                    li { (plural(level.concept_count(), "conceito", "conceitos")) }
                    li { (plural(level.exercise_count(), "exercício prático", "exercícios práticos")) }
                    li { (plural(level.code_example_count(), "exemplo de código", "exemplos de código")) }
                }
            }
            section.level-topics {
                (render_progress_tracker(level, &tracker, TriggerBand::default()))
                div.topic-list {
                    @for (index, topic) in level.topics.iter().enumerate() {
                        div.topic-section id=(section_id(&topic.id)) {
                            (render_topic_card(level, topic, index))
                        }
                    }
                }
            }
            nav.level-nav {
                @if let Some(prev) = prev {
                    a.prev href=(Route::level(prev.id).path()) {
                        span.hint { "Nível anterior" }
                        span.target { (prev.title) }
                    }
                } @else {
                    a.prev href="/" {
                        span.hint { "Voltar" }
                        span.target { "Página Inicial" }
                    }
                }
                @if let Some(next) = next {
                    a.next href=(Route::level(next.id).path()) {
                        span.hint { "Próximo nível" }
                        span.target { (next.title) }
                    }
                } @else {
                    div.next.complete {
                        span.hint { "Parabéns!" }
                        span.target { "Curso Completo" }
                    }
                }
            }
        }
        (render_footer(course))
    };
    base_document(&format!("{} - {}", level.title, course.title), content)
}

/// Vertical progress dots, one per topic. `progress.js` picks up
/// `data-root-margin` and moves the active dot as topics scroll into the band.
pub fn render_progress_tracker(level: &CourseLevel, tracker: &ScrollTracker, band: TriggerBand) -> Markup {
    let last = level.topics.len().saturating_sub(1);
    html! {
        aside.progress-tracker data-root-margin=(band.root_margin()) data-active=(tracker.active_index()) {
            @for (idx, topic) in level.topics.iter().enumerate() {
                @let dot = tracker.dot(idx);
                a class=(dot.css_class()) href={ "#" (section_id(&topic.id)) } title=(topic.title) data-index=(idx) {}
                @if idx < last {
                    div.line.filled[dot.line_filled()] {}
                }
            }
        }
    }
}

/// Card for one topic on its level page
pub fn render_topic_card(level: &CourseLevel, topic: &Topic, index: usize) -> Markup {
    let hidden = topic.concepts.len().saturating_sub(CONCEPT_PREVIEW);
    html! {
        article.topic-card {
            header {
                span.topic-number { (format!("{:02}", index + 1)) }
                h3 { (topic.title) }
            }
            p.description { (topic.description) }
            ul.concepts {
                @for concept in topic.concepts.iter().take(CONCEPT_PREVIEW) {
                    li { (concept) }
                }
                @if hidden > 0 {
                    li.more { "+" (hidden) " mais" }
                }
            }
            @if !topic.code_examples.is_empty() {
                details.code-examples {
                    summary { "Exemplos de Código (" (topic.code_examples.len()) ")" }
                    @for example in &topic.code_examples {
                        figure.code-block {
                            figcaption {
                                (example.title)
                                span.language { (example.language) }
                            }
                            pre { code class={ "language-" (example.language) } { (example.code.trim()) } }
                        }
                    }
                }
            }
            @if !topic.exercises.is_empty() {
                details.exercises {
                    summary { "Exercícios Práticos (" (topic.exercises.len()) ")" }
                    ol {
                        @for exercise in &topic.exercises {
                            li {
                                strong { (exercise.title) }
                                span class={ "difficulty " (exercise.difficulty.as_str()) } { (exercise.difficulty.label()) }
                                p { (exercise.description) }
                            }
                        }
                    }
                }
            }
            a.open-module href=(Route::module(level.id, &topic.module_slug).path()) {
                "Abrir módulo →"
            }
        }
    }
}

/// Renders a module page: links to each file in the module's content set
pub fn render_module(ctx: PageContext<'_>, level: &CourseLevel, topic: &Topic, current_path: &str) -> Markup {
    let level_path = Route::level(level.id).path();
    let content = html! {
        (render_navbar(ctx.course, current_path))
        main class={ "module-page " (accent_class(level.accent)) } {
            nav.breadcrumb {
                a href="/" { "Início" }
                " › "
                a href=(level_path) { "Nível " (level.padded_id()) }
                " › "
                span.current { (topic.title) }
            }
            header.module-header {
                h1 { (topic.title) }
                p.description { (topic.description) }
            }
            section.module-content {
                h2 { "Conteúdo do módulo" }
                div.resource-grid {
                    @for link in topic.resource_links(ctx.content_prefix) {
                        a.resource href=(link.href) target="_blank" rel="noreferrer" {
                            span.name { (link.resource.label()) }
                            span.file { (link.resource.target()) }
                        }
                    }
                }
                p.note {
                    "Os links abrem os ficheiros do repositório. O conteúdo é servido em "
                    code { (ctx.content_prefix.trim_end_matches('/')) "/" }
                    "."
                }
            }
            a.back href=(level_path) { "Voltar ao nível " (level.id) }
        }
        (render_footer(ctx.course))
    };
    base_document(&format!("{} - {}", topic.title, ctx.course.title), content)
}

pub fn render_level_not_found(course: &Course, current_path: &str) -> Markup {
    message_page(
        course,
        current_path,
        "Nível não encontrado",
        "Voltar ao início",
    )
}

pub fn render_module_not_found(course: &Course, current_path: &str) -> Markup {
    message_page(
        course,
        current_path,
        "Módulo não encontrado",
        "Voltar ao curso",
    )
}

/// Generic 404 page
pub fn render_not_found() -> Markup {
    let content = html! {
        main.not-found-page {
            div.not-found-panel {
                h1 { "404" }
                h2 { "Página não encontrada" }
                p { "A página que procura não existe ou foi movida." }
                a.home href="/" { "Voltar ao início" }
            }
        }
    };
    base_document("404", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_course;

    fn ctx(course: &Course) -> PageContext<'_> {
        PageContext {
            course,
            content_prefix: "/course-content",
        }
    }

    fn page(course: &Course, path: &str) -> RenderedPage {
        render_path(ctx(course), path)
    }

    #[test]
    fn home_lists_every_level() {
        let course = sample_course();
        let p = page(&course, "/");
        assert_eq!(p.status, PageStatus::Ok);
        let html = p.markup.into_string();
        assert!(html.contains("<title>Sample Course</title>"));
        assert!(html.contains(r#"href="/level/1""#));
        assert!(html.contains(r#"href="/level/2""#));
        assert!(html.contains("NÍVEL 01"));
        assert!(html.contains("2 Níveis"));
        assert!(html.contains("3 Módulos"));
    }

    #[test]
    fn level_page_renders_parsed_level() {
        let course = sample_course();
        let p = page(&course, "/level/2");
        assert_eq!(p.status, PageStatus::Ok);
        let html = p.markup.into_string();
        assert!(html.contains("<h1>Scaling</h1>"));
        assert!(html.contains("Nível 02"));
        assert!(html.contains("accent-amber"));
    }

    #[test]
    fn level_page_with_non_numeric_id_is_not_found() {
        let course = sample_course();
        let p = page(&course, "/level/abc");
        assert_eq!(p.status, PageStatus::NotFound);
        assert!(p.markup.into_string().contains("Nível não encontrado"));
    }

    #[test]
    fn level_page_with_signed_id_is_not_found() {
        let course = sample_course();
        for path in ["/level/+2", "/level/+2/module/module-1-load-balancing"] {
            let p = page(&course, path);
            assert_eq!(p.status, PageStatus::NotFound, "{path}");
        }
    }

    #[test]
    fn level_page_with_unknown_id_is_not_found() {
        let course = sample_course();
        let p = page(&course, "/level/9");
        assert_eq!(p.status, PageStatus::NotFound);
        assert!(p.markup.into_string().contains("Nível não encontrado"));
    }

    #[test]
    fn level_page_stats_and_sections() {
        let course = sample_course();
        let html = page(&course, "/level/1").markup.into_string();
        assert!(html.contains("2 tópicos"));
        assert!(html.contains("5 conceitos"));
        assert!(html.contains("1 exercício prático"));
        assert!(html.contains("1 exemplo de código"));
        assert!(html.contains(r#"id="topic-1-1""#));
        assert!(html.contains(r#"id="topic-1-2""#));
    }

    #[test]
    fn level_page_progress_tracker_starts_at_first_topic() {
        let course = sample_course();
        let html = page(&course, "/level/1").markup.into_string();
        assert!(html.contains(r#"data-root-margin="-20% 0px -60% 0px""#));
        assert!(html.contains(r##"class="dot active" href="#topic-1-1""##));
        assert!(html.contains(r##"class="dot" href="#topic-1-2""##));
        // One connector between two dots
        assert_eq!(html.matches(r#"class="line""#).count(), 1);
    }

    #[test]
    fn progress_script_follows_the_tracker_model() {
        let html = page(&sample_course(), "/level/1").markup.into_string();

        // Reads the band and the dots the level page renders
        assert!(PROGRESS_JS.contains(r#"getAttribute("data-root-margin")"#));
        assert!(PROGRESS_JS.contains(&format!("\"{}\"", TriggerBand::default().root_margin())));
        assert!(PROGRESS_JS.contains(r#"querySelector(".progress-tracker")"#));
        assert!(html.contains(r#"<aside class="progress-tracker""#));
        assert!(PROGRESS_JS.contains(r#"querySelectorAll("a.dot")"#));
        assert!(PROGRESS_JS.contains(r#"querySelectorAll(".line")"#));
        assert!(PROGRESS_JS.contains(r#"setAttribute("data-active""#));

        // Same rules as ScrollTracker::observe: leaving entries are skipped,
        // unknown sections ignored, each applied entry overwrites the last
        assert!(PROGRESS_JS.contains("if (!entry.isIntersecting) return;"));
        assert!(PROGRESS_JS.contains("if (idx >= 0) setActive(idx);"));
        assert!(PROGRESS_JS.contains("entries.forEach("));

        // Same classes as DotState
        assert!(PROGRESS_JS.contains(r#"toggle("passed", i < active)"#));
        assert!(PROGRESS_JS.contains(r#"toggle("active", i === active)"#));
        assert!(PROGRESS_JS.contains(r#"toggle("filled", i < active)"#));

        // Watches are released on pagehide, as ScrollTracker::disconnect
        assert!(PROGRESS_JS.contains("observer.disconnect()"));
    }

    #[test]
    fn first_level_links_home_and_last_level_completes_course() {
        let course = sample_course();
        let first = page(&course, "/level/1").markup.into_string();
        assert!(first.contains("Página Inicial"));
        assert!(first.contains("Próximo nível"));
        assert!(!first.contains("Nível anterior"));

        let last = page(&course, "/level/2").markup.into_string();
        assert!(last.contains("Nível anterior"));
        assert!(last.contains("Curso Completo"));
        assert!(!last.contains("Próximo nível"));
    }

    #[test]
    fn topic_card_links_to_module_page() {
        let course = sample_course();
        let html = page(&course, "/level/1").markup.into_string();
        assert!(html.contains(r#"href="/level/1/module/module-1-http""#));
        assert!(html.contains("Exemplos de Código (1)"));
        assert!(html.contains("Parse a request line"));
    }

    #[test]
    fn topic_card_collapses_long_concept_lists() {
        let mut course = sample_course();
        course.levels[0].topics[0].concepts = (1..=8).map(|i| format!("c{i}")).collect();
        let level = course.level(1).unwrap();
        let html = render_topic_card(level, &level.topics[0], 0).into_string();
        assert!(html.contains("<li>c5</li>"));
        assert!(!html.contains("<li>c6</li>"));
        assert!(html.contains("+3 mais"));
    }

    #[test]
    fn module_page_links_content_files() {
        let course = sample_course();
        let p = page(&course, "/level/1/module/module-1-http");
        assert_eq!(p.status, PageStatus::Ok);
        let html = p.markup.into_string();
        for file in ["README.md", "theory.md", "exercises.md", "solutions.md", "project.md", "code/"] {
            assert!(
                html.contains(&format!(
                    r#"href="/course-content/level-1-foundations/module-1-http/{file}""#
                )),
                "missing link to {file}"
            );
        }
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains("Voltar ao nível 1"));
    }

    #[test]
    fn module_from_another_level_is_not_found() {
        let course = sample_course();
        let p = page(&course, "/level/2/module/module-1-http");
        assert_eq!(p.status, PageStatus::NotFound);
        assert!(p.markup.into_string().contains("Módulo não encontrado"));

        let p = page(&course, "/level/x/module/module-1-http");
        assert_eq!(p.status, PageStatus::NotFound);
    }

    #[test]
    fn unknown_paths_render_generic_not_found() {
        let course = sample_course();
        for path in ["/404", "/missing", "/level/1/extra"] {
            let p = page(&course, path);
            assert_eq!(p.status, PageStatus::NotFound, "{path}");
            assert!(p.markup.into_string().contains("Página não encontrada"));
        }
    }

    #[test]
    fn navbar_marks_current_level() {
        let course = sample_course();
        let html = render_navbar(&course, "/level/2").into_string();
        assert!(html.contains(r#"<a class="current" href="/level/2">"#));
        assert!(!html.contains(r#"<a class="current" href="/">"#));
        assert!(html.contains("nav-toggle"));
    }

    #[test]
    fn trailing_slash_renders_the_same_page() {
        let course = sample_course();
        let plain = page(&course, "/level/2").markup.into_string();
        let slashed = page(&course, "/level/2/?tab=1").markup.into_string();
        assert_eq!(plain, slashed);
    }

    #[test]
    fn course_text_is_escaped() {
        let course = sample_course();
        let html = page(&course, "/level/1").markup.into_string();
        assert!(html.contains("JVM &lt;Threads&gt;"));
        assert!(!html.contains("JVM <Threads>"));
    }
}
