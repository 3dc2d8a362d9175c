//! Documentable free text (descriptions, documentation titles and bodies).
//!
//! Text is kept exactly as written in the document. Rendering to markup is
//! done on demand by a [`Renderer`]; [`MarkdownRenderer`] is the default.

use std::fmt;

use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};

/// Turns raw text into markup.
pub trait Renderer {
    fn render(&self, text: &str) -> String;
}

/// Renders Markdown to HTML with `pulldown-cmark`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(text, Options::ENABLE_TABLES));
        out
    }
}

/// Raw text with lazy rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content(String);

impl Content {
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    /// The untouched text
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Render as Markdown
    pub fn html(&self) -> String {
        self.html_with(&MarkdownRenderer)
    }

    pub fn html_with(&self, renderer: &dyn Renderer) -> String {
        renderer.render(&self.0)
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// User documentation attached to a security scheme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Documentation {
    title: Option<String>,
    content: Option<String>,
}

impl Documentation {
    pub fn new(title: Option<String>, content: Option<String>) -> Self {
        Self { title, content }
    }

    pub fn title(&self) -> Option<Content> {
        self.title.as_deref().map(Content::from)
    }

    pub fn content(&self) -> Option<Content> {
        self.content.as_deref().map(Content::from)
    }
}
