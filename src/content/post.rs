//! Post models built from content API documents

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::RichText;
use crate::error::{BlogError, Result};
use crate::prismic::{ContentClient, Document, QueryOptions, SearchResponse};

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Document uid, used as the URL slug
    pub uid: String,

    /// Publication timestamp as sent by the API
    pub first_publication_date: Option<String>,

    pub title: String,

    pub subtitle: String,

    pub author: String,
}

/// Projected fields of a post document
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummaryData {
    title: String,
    subtitle: String,
    author: String,
}

impl PostSummary {
    /// Build a summary; documents without a uid cannot be linked to
    pub fn from_document(doc: &Document) -> Option<Self> {
        let uid = doc.uid.clone()?;
        let data: SummaryData = if doc.data.is_null() {
            SummaryData::default()
        } else {
            serde_json::from_value(doc.data.clone()).unwrap_or_else(|e| {
                tracing::warn!("Malformed summary data in document {}: {}", doc.id, e);
                SummaryData::default()
            })
        };

        Some(Self {
            uid,
            first_publication_date: doc.first_publication_date.clone(),
            title: data.title,
            subtitle: data.subtitle,
            author: data.author,
        })
    }
}

/// One page of an externally paginated result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// URL of the next page; `None` once the result set is exhausted
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page: Option<String>) -> Self {
        Self { items, next_page }
    }

    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }
}

impl From<SearchResponse> for Page<PostSummary> {
    fn from(response: SearchResponse) -> Self {
        let items = response
            .results
            .iter()
            .filter_map(|doc| {
                let summary = PostSummary::from_document(doc);
                if summary.is_none() {
                    tracing::warn!("Skipping document {} without uid", doc.id);
                }
                summary
            })
            .collect();
        Self::new(items, response.next_page)
    }
}

impl Page<PostSummary> {
    /// Every summary matching `options`, following continuation pages to the end
    ///
    /// A continuation URL seen twice is an `Api` error.
    pub async fn collect_all<C: ContentClient + ?Sized>(
        client: &C,
        options: &QueryOptions,
    ) -> Result<Vec<PostSummary>> {
        let mut page = Self::from(client.query(options).await?);
        let mut items = Vec::new();
        let mut seen_pages = HashSet::new();

        loop {
            items.append(&mut page.items);

            let Some(next) = page.next_page.take() else {
                break;
            };
            if !seen_pages.insert(next.clone()) {
                return Err(BlogError::Api(format!(
                    "pagination loops back to {}",
                    next
                )));
            }
            page = Self::from(client.fetch_page(&next).await?);
        }

        Ok(items)
    }
}

/// A titled block of the post body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: String,

    #[serde(default)]
    pub body: RichText,
}

/// A full post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub uid: String,

    pub first_publication_date: Option<String>,

    pub title: String,

    pub banner_url: Option<String>,

    pub author: String,

    pub content: Vec<Section>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DetailData {
    title: String,
    banner: Banner,
    author: String,
    content: Vec<Section>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Banner {
    url: Option<String>,
}

impl PostDetail {
    pub fn from_document(doc: Document) -> Result<Self> {
        let uid = doc
            .uid
            .ok_or_else(|| BlogError::Api(format!("document {} has no uid", doc.id)))?;
        let data: DetailData = serde_json::from_value(doc.data)
            .map_err(|e| BlogError::Api(format!("malformed post {}: {}", uid, e)))?;

        Ok(Self {
            uid,
            first_publication_date: doc.first_publication_date,
            title: data.title,
            banner_url: data.banner.url.filter(|url| !url.is_empty()),
            author: data.author,
            content: data.content,
        })
    }

    /// Words across every heading and body
    pub fn word_count(&self) -> usize {
        self.content
            .iter()
            .map(|section| {
                crate::helpers::count_words(&section.heading)
                    + crate::helpers::count_words(&section.body.as_text())
            })
            .sum()
    }
}
