//! Built-in spacetraveling templates using the Tera template engine
//!
//! Templates and theme assets are embedded in the binary.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::error::Result;

/// Static assets copied into the public directory on generation
const ASSETS: &[(&str, &str)] = &[
    ("css/style.css", include_str!("spacetraveling/assets/style.css")),
    ("images/logo.svg", include_str!("spacetraveling/assets/logo.svg")),
    (
        "images/calendar.svg",
        include_str!("spacetraveling/assets/calendar.svg"),
    ),
    ("images/user.svg", include_str!("spacetraveling/assets/user.svg")),
    ("images/clock.svg", include_str!("spacetraveling/assets/clock.svg")),
];

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("spacetraveling/layout.html")),
            ("index.html", include_str!("spacetraveling/index.html")),
            ("post.html", include_str!("spacetraveling/post.html")),
            ("error.html", include_str!("spacetraveling/error.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("spacetraveling/partials/header.html"),
            ),
            (
                "partials/post_info.html",
                include_str!("spacetraveling/partials/post_info.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Write theme assets below `public_dir`
    pub fn copy_assets(&self, public_dir: &Path) -> Result<()> {
        for (relative, content) in ASSETS {
            let dest = public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, content)?;
        }
        tracing::debug!("Copied {} theme assets", ASSETS.len());
        Ok(())
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub locale: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingData {
    pub posts: Vec<SummaryData>,
    /// Link that loads the next page, present while more pages exist
    pub load_more: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    /// Rendered rich text, inserted unescaped
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub title: String,
    pub banner_url: Option<String>,
    pub author: String,
    pub date: String,
    pub datetime: String,
    pub reading_time: usize,
    pub sections: Vec<SectionData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorData {
    pub status: u16,
    pub message: String,
}
