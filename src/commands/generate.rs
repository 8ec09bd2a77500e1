//! Generate static files

use anyhow::Result;

use crate::generator::{GenerateReport, Generator};
use crate::Blog;

/// Fetch all content and write the static site
pub async fn run(blog: &Blog) -> Result<GenerateReport> {
    let start = std::time::Instant::now();

    let client = blog.client()?;
    let generator = Generator::new(blog)?;
    let report = generator.generate(&client).await?;

    if !report.skipped.is_empty() {
        tracing::warn!("Skipped {} posts: {:?}", report.skipped.len(), report.skipped);
    }

    let duration = start.elapsed();
    tracing::info!(
        "Generated listing ({} posts) and {} post pages in {:.2}s",
        report.listed,
        report.posts,
        duration.as_secs_f64()
    );

    Ok(report)
}
