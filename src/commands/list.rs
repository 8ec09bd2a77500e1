//! List the posts known to the content source

use anyhow::Result;

use crate::config::SiteConfig;
use crate::content::{Page, PostSummary};
use crate::helpers::parse_timestamp;
use crate::prismic::{ContentClient, Predicate, QueryOptions};
use crate::Blog;

/// Print every post, newest page first as the API returns them
pub async fn run(blog: &Blog) -> Result<()> {
    let client = blog.client()?;
    let posts = collect_posts(&client, &blog.config).await?;

    println!("Posts ({}):", posts.len());
    for post in &posts {
        println!("{}", format_line(post));
    }

    Ok(())
}

/// Fetch all post summaries across every page
pub async fn collect_posts<C: ContentClient + ?Sized>(
    client: &C,
    config: &SiteConfig,
) -> Result<Vec<PostSummary>> {
    let document_type = &config.document_type;
    let options = QueryOptions::new(vec![Predicate::document_type(document_type)])
        .fetch(&[
            format!("{}.title", document_type),
            format!("{}.author", document_type),
        ])
        .page_size(100);

    Ok(Page::collect_all(client, &options).await?)
}

fn format_line(post: &PostSummary) -> String {
    let date = post
        .first_publication_date
        .as_deref()
        .and_then(|raw| parse_timestamp(raw).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    format!("  {} - {} [{}]", date, post.title, post.uid)
}
