//! Generator module - renders the listing and every known post to static HTML

use anyhow::{Context as _, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::PostDetail;
use crate::controllers::{DetailController, ListingController, PageRenderer};
use crate::error::BlogError;
use crate::prismic::ContentClient;
use crate::Blog;

/// Summary of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub listed: usize,
    pub posts: usize,
    pub skipped: Vec<String>,
}

/// Static site generator
pub struct Generator {
    blog: Blog,
    pages: PageRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let pages = PageRenderer::new(&blog.config)?;
        Ok(Self {
            blog: blog.clone(),
            pages,
        })
    }

    pub fn pages(&self) -> &PageRenderer {
        &self.pages
    }

    /// Generate the entire site
    pub async fn generate<C: ContentClient + ?Sized>(&self, client: &C) -> Result<GenerateReport> {
        fs::create_dir_all(&self.blog.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.blog.public_dir))?;

        self.pages.templates().copy_assets(&self.blog.public_dir)?;

        let mut report = GenerateReport::default();

        // Listing
        let listing = ListingController::load(client, &self.blog.config)
            .await
            .context("Failed to load the post listing")?;
        report.listed = listing.posts().len();
        let html = listing.render(&self.pages)?;
        self.write(self.blog.public_dir.join("index.html"), &html)?;

        // Posts
        let detail = DetailController::new(client, &self.blog.config);
        let uids = detail.paths().await.context("Failed to enumerate posts")?;
        for uid in uids {
            if !is_valid_slug(&uid) {
                tracing::warn!("Skipping post with unusable uid {:?}", uid);
                report.skipped.push(uid);
                continue;
            }
            let post = match detail.load(&uid).await {
                Ok(post) => post,
                // Unpublished between enumeration and fetch
                Err(BlogError::NotFound { .. }) => {
                    tracing::warn!("Post {} disappeared during generation", uid);
                    report.skipped.push(uid);
                    continue;
                }
                Err(e) => return Err(e).with_context(|| format!("Failed to load post {}", uid)),
            };
            self.write_post(&post)
                .with_context(|| format!("Failed to render post {}", uid))?;
            report.posts += 1;
        }

        // Error page
        let not_found = self
            .pages
            .render_error(404, "Esta página não existe.")?;
        self.write(self.blog.public_dir.join("404.html"), &not_found)?;

        Ok(report)
    }

    /// Render one post and write it to its public path
    pub fn write_post(&self, post: &PostDetail) -> Result<PathBuf> {
        let html = DetailController::<dyn ContentClient>::render(post, &self.pages)?;
        let output_path = self.post_output_path(&post.uid);
        self.write(output_path.clone(), &html)?;
        tracing::debug!("Generated post: {:?}", output_path);
        Ok(output_path)
    }

    /// Where a post page is written
    pub fn post_output_path(&self, slug: &str) -> PathBuf {
        self.blog
            .public_dir
            .join(self.blog.config.post_dir.trim_matches('/'))
            .join(slug)
            .join("index.html")
    }

    fn write(&self, output_path: PathBuf, html: &str) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        Ok(())
    }
}

/// Slugs that are safe to use as a single path segment
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug::slugify(slug) == slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::prismic::{Document, SearchResponse};

    fn blog(dir: &std::path::Path) -> Blog {
        let config = SiteConfig {
            api_endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            ..SiteConfig::default()
        };
        Blog::with_config(dir, config)
    }

    fn doc(uid: &str) -> Document {
        serde_json::from_value(serde_json::json!({
            "id": format!("id-{}", uid),
            "uid": uid,
            "type": "post",
            "first_publication_date": "2021-03-25T12:00:00+0000",
            "data": {
                "title": format!("Post {}", uid),
                "subtitle": "Subtítulo",
                "author": "Joseph Oliveira",
                "content": [{"heading": "Intro", "body": [{"text": "Hello"}]}]
            }
        }))
        .unwrap()
    }

    fn client(docs: Vec<Document>) -> crate::controllers::testing::FakeClient {
        crate::controllers::testing::FakeClient {
            first: SearchResponse {
                results: docs.clone(),
                ..SearchResponse::default()
            },
            documents: docs,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_generate_writes_listing_and_posts() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&blog(dir.path())).unwrap();
        let client = client(vec![doc("um"), doc("dois")]);

        let report = generator.generate(&client).await.unwrap();
        assert_eq!(report.listed, 2);
        assert_eq!(report.posts, 2);

        let public = dir.path().join("public");
        let index = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(index.contains("Post um"));
        assert!(!index.contains("Carregar mais posts"));

        let post = fs::read_to_string(public.join("post/dois/index.html")).unwrap();
        assert!(post.contains("<p>Hello</p>"));
        assert!(public.join("404.html").exists());
        assert!(public.join("css/style.css").exists());
    }

    #[tokio::test]
    async fn test_generate_skips_unsafe_uids() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&blog(dir.path())).unwrap();
        let client = client(vec![doc("ok"), doc("../escape")]);

        let report = generator.generate(&client).await.unwrap();
        assert_eq!(report.posts, 1);
        assert_eq!(report.skipped, vec!["../escape".to_string()]);
        assert!(!dir.path().join("escape").exists());
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("como-utilizar-hooks"));
        assert!(!is_valid_slug("../etc"));
        assert!(!is_valid_slug("Com Espaço"));
        assert!(!is_valid_slug(""));
    }
}
