//! Detail controller: a single post

use super::PageRenderer;
use crate::config::SiteConfig;
use crate::content::{Page, PostDetail};
use crate::error::{BlogError, Result};
use crate::helpers::{date_xml, parse_timestamp, reading_time};
use crate::prismic::{ContentClient, Predicate, QueryOptions};
use crate::templates::{PostPageData, SectionData};

/// Largest page size the content API accepts
const MAX_PAGE_SIZE: usize = 100;

pub struct DetailController<'a, C: ContentClient + ?Sized> {
    client: &'a C,
    document_type: String,
}

impl<'a, C: ContentClient + ?Sized> DetailController<'a, C> {
    pub fn new(client: &'a C, config: &SiteConfig) -> Self {
        Self {
            client,
            document_type: config.document_type.clone(),
        }
    }

    /// Every post uid, following continuation pages to the end
    pub async fn paths(&self) -> Result<Vec<String>> {
        let options = QueryOptions::new(vec![Predicate::document_type(&self.document_type)])
            .fetch(&[format!("{}.title", self.document_type)])
            .page_size(MAX_PAGE_SIZE);

        let uids: Vec<String> = Page::collect_all(self.client, &options)
            .await?
            .into_iter()
            .map(|post| post.uid)
            .collect();

        tracing::info!("Found {} {} paths", uids.len(), self.document_type);
        Ok(uids)
    }

    /// The full post for a slug; `NotFound` when no document matches
    pub async fn load(&self, slug: &str) -> Result<PostDetail> {
        let document = self.client.get_by_uid(&self.document_type, slug).await?;
        PostDetail::from_document(document)
    }

    /// Template data; fails if the publication date cannot be formatted
    pub fn view(post: &PostDetail, pages: &PageRenderer) -> Result<PostPageData> {
        let raw_date = post
            .first_publication_date
            .as_deref()
            .ok_or_else(|| BlogError::Format("publication date is null".to_string()))?;
        let date = parse_timestamp(raw_date)?;

        let title = if post.title.trim().is_empty() {
            pages.config().title.clone()
        } else {
            post.title.clone()
        };

        Ok(PostPageData {
            title,
            banner_url: post.banner_url.clone(),
            author: post.author.clone(),
            date: pages.dates().format_datetime(&date),
            datetime: date_xml(&date),
            reading_time: reading_time(post.word_count(), pages.config().words_per_minute),
            sections: post
                .content
                .iter()
                .map(|section| SectionData {
                    heading: section.heading.clone(),
                    html: section.body.as_html(),
                })
                .collect(),
        })
    }

    pub fn render(post: &PostDetail, pages: &PageRenderer) -> Result<String> {
        let mut context = pages.base_context();
        context.insert("post", &Self::view(post, pages)?);
        pages.templates().render("post.html", &context)
    }
}
