//! Page controllers for the listing (`/`) and detail (`/post/{slug}`) views

mod detail;
mod listing;

pub use detail::DetailController;
pub use listing::ListingController;

use tera::Context;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::helpers::DateFormatter;
use crate::templates::{ErrorData, SiteData, TemplateRenderer};

/// Everything needed to turn controller state into HTML
pub struct PageRenderer {
    config: SiteConfig,
    templates: TemplateRenderer,
    dates: DateFormatter,
}

impl PageRenderer {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            templates: TemplateRenderer::new()?,
            dates: DateFormatter::from_config(config)?,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateRenderer {
        &self.templates
    }

    pub fn dates(&self) -> &DateFormatter {
        &self.dates
    }

    /// Create a base context with common variables
    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: self.config.title.clone(),
                locale: self.config.locale.clone(),
            },
        );
        context
    }

    pub fn render_error(&self, status: u16, message: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert(
            "error",
            &ErrorData {
                status,
                message: message.to_string(),
            },
        );
        self.templates.render("error.html", &context)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory content source for controller tests

    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::error::{BlogError, Result};
    use crate::prismic::{ContentClient, Document, Predicate, QueryOptions, SearchResponse};

    pub fn summary_doc(uid: &str, date: &str) -> Document {
        serde_json::from_value(serde_json::json!({
            "id": format!("id-{}", uid),
            "uid": uid,
            "type": "post",
            "first_publication_date": date,
            "data": {
                "title": format!("Post {}", uid),
                "subtitle": "Subtítulo",
                "author": "Danilo Vieira"
            }
        }))
        .unwrap()
    }

    pub fn response(results: Vec<Document>, next_page: Option<&str>) -> SearchResponse {
        SearchResponse {
            next_page: next_page.map(str::to_string),
            results,
            ..SearchResponse::default()
        }
    }

    /// Serves a fixed first page plus continuation pages keyed by URL
    #[derive(Default)]
    pub struct FakeClient {
        pub first: SearchResponse,
        pub pages: HashMap<String, SearchResponse>,
        pub documents: Vec<Document>,
        pub queries: Mutex<Vec<QueryOptions>>,
        pub fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentClient for FakeClient {
        async fn query(&self, options: &QueryOptions) -> Result<SearchResponse> {
            self.queries.lock().unwrap().push(options.clone());
            let uid = options.predicates.iter().find_map(|p| match p {
                Predicate::At { path, value } if path.ends_with(".uid") => Some(value.clone()),
                _ => None,
            });
            match uid {
                Some(uid) => Ok(response(
                    self.documents
                        .iter()
                        .filter(|d| d.uid.as_deref() == Some(uid.as_str()))
                        .cloned()
                        .collect(),
                    None,
                )),
                None => Ok(self.first.clone()),
            }
        }

        async fn fetch_page(&self, url: &str) -> Result<SearchResponse> {
            self.fetched.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| BlogError::TransientFetch(format!("{} unavailable", url)))
        }
    }
}
