//! Listing controller: the paginated post list

use super::PageRenderer;
use crate::config::SiteConfig;
use crate::content::{Page, PostSummary};
use crate::error::Result;
use crate::helpers::{load_more_url, post_url};
use crate::prismic::{ContentClient, Predicate, QueryOptions};
use crate::templates::{ListingData, SummaryData};

/// Listing state: the page currently shown and the link to the next one
///
/// Loading more replaces the shown items with the next page instead of
/// accumulating them, so every listing URL shows exactly one page.
pub struct ListingController<'a, C: ContentClient + ?Sized> {
    client: &'a C,
    page: Page<PostSummary>,
}

impl<'a, C: ContentClient + ?Sized> ListingController<'a, C> {
    /// The initial listing query: posts only, projected to summary fields
    pub fn initial_query(config: &SiteConfig) -> QueryOptions {
        let document_type = &config.document_type;
        QueryOptions::new(vec![Predicate::document_type(document_type)])
            .fetch(&[
                format!("{}.title", document_type),
                format!("{}.subtitle", document_type),
                format!("{}.author", document_type),
            ])
            .page_size(config.page_size)
    }

    /// Fetch the first page
    pub async fn load(client: &'a C, config: &SiteConfig) -> Result<Self> {
        let response = client.query(&Self::initial_query(config)).await?;
        let page = Page::from(response);
        tracing::info!(
            "Loaded {} posts (more: {})",
            page.items.len(),
            page.has_next()
        );
        Ok(Self::from_page(client, page))
    }

    /// Resume from a page fetched earlier
    pub fn from_page(client: &'a C, page: Page<PostSummary>) -> Self {
        Self { client, page }
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.page.items
    }

    pub fn next_page(&self) -> Option<&str> {
        self.page.next_page.as_deref()
    }

    /// Whether the "load more" affordance is offered
    pub fn can_load_more(&self) -> bool {
        self.page.has_next()
    }

    /// Replace the current page with the next one
    ///
    /// Returns `Ok(false)` when there is nothing more to load. On failure
    /// the current page is kept and the error is returned to the caller.
    pub async fn load_more(&mut self) -> Result<bool> {
        let Some(next) = self.page.next_page.as_deref() else {
            return Ok(false);
        };

        match self.client.fetch_page(next).await {
            Ok(response) => {
                self.page = Page::from(response);
                tracing::debug!(
                    "Loaded next page: {} posts (more: {})",
                    self.page.items.len(),
                    self.page.has_next()
                );
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Keeping current page, load more failed: {}", e);
                Err(e)
            }
        }
    }

    /// Template data; fails if any publication date cannot be formatted
    pub fn view(&self, pages: &PageRenderer) -> Result<ListingData> {
        let posts = self
            .page
            .items
            .iter()
            .map(|post| {
                Ok(SummaryData {
                    title: post.title.clone(),
                    subtitle: post.subtitle.clone(),
                    author: post.author.clone(),
                    date: pages
                        .dates()
                        .format(post.first_publication_date.as_deref())?,
                    path: post_url(pages.config(), &post.uid),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ListingData {
            posts,
            load_more: self.page.next_page.as_deref().map(load_more_url),
        })
    }

    pub fn render(&self, pages: &PageRenderer) -> Result<String> {
        let mut context = pages.base_context();
        context.insert("listing", &self.view(pages)?);
        pages.templates().render("index.html", &context)
    }
}
