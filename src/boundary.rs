//! Error boundary around page rendering.
//!
//! Page renderers are infallible by signature, so the failure left to guard
//! against is a panic inside one (an out-of-range index, a broken invariant in
//! the course data). It must not produce an empty or half-written response:
//! the boundary catches it as a [`RenderError`] and switches to a fallback
//! screen with the error detail and a reload button.
//!
//! Once tripped, a boundary stays tripped: further [`ErrorBoundary::render`]
//! calls return the fallback without running the child again. Recovery is a
//! full reload, which on the server means a new request and a new boundary.
//!
//! Only the render path is covered. Handler logic, file streaming and
//! transport errors are outside the boundary.

use crate::pages::base_document;
use maud::{Markup, html};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// A panic captured while rendering, with its message.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("render panicked: {0}")]
pub struct RenderError(pub String);

#[derive(Debug, Default)]
pub struct ErrorBoundary {
    captured: Option<RenderError>,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_error(&self) -> bool {
        self.captured.is_some()
    }

    pub fn error(&self) -> Option<&RenderError> {
        self.captured.as_ref()
    }

    /// Render `child`, or the fallback if it panics or the boundary already
    /// caught an error.
    pub fn render<F>(&mut self, child: F) -> Markup
    where
        F: FnOnce() -> Markup,
    {
        if let Some(err) = &self.captured {
            return fallback(err);
        }
        let err = match panic::catch_unwind(AssertUnwindSafe(child)) {
            Ok(markup) => return markup,
            Err(payload) => RenderError(panic_message(payload.as_ref())),
        };
        tracing::error!(error = %err, "page render failed, showing fallback");
        let markup = fallback(&err);
        self.captured = Some(err);
        markup
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Full-page fallback screen.
pub fn fallback(err: &RenderError) -> Markup {
    let content = html! {
        main.error-page {
            div.error-panel {
                span.error-icon aria-hidden="true" { "⚠" }
                h2 { "Ocorreu um erro inesperado." }
                pre.error-detail { (err) }
                button.reload type="button" onclick="window.location.reload()" {
                    "Recarregar"
                }
            }
        }
    };
    base_document("Erro", content)
}
