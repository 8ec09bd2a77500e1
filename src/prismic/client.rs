//! Content client: the boundary to the headless CMS

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::OnceCell;

use super::api::{ApiInfo, Document, SearchResponse};
use super::predicate::{to_query, Predicate};
use crate::config::SiteConfig;
use crate::error::{BlogError, Result};

/// Options of a document search
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub predicates: Vec<Predicate>,
    /// Field projection, e.g. `post.title`; empty fetches whole documents
    pub fetch: Vec<String>,
    pub page_size: Option<usize>,
}

impl QueryOptions {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self {
            predicates,
            ..Self::default()
        }
    }

    pub fn fetch<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.fetch = fields.iter().map(|f| f.as_ref().to_string()).collect();
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Read-only access to the content source
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Search documents
    async fn query(&self, options: &QueryOptions) -> Result<SearchResponse>;

    /// Fetch a continuation URL returned as `next_page`
    async fn fetch_page(&self, url: &str) -> Result<SearchResponse>;

    /// Fetch the full document of a custom type by uid
    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Document> {
        let options = QueryOptions::new(vec![Predicate::uid(document_type, uid)]).page_size(1);
        let response = self.query(&options).await?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| BlogError::not_found(document_type, uid))
    }
}

/// Prismic REST API v2 client
pub struct PrismicClient {
    http: Client,
    endpoint: String,
    access_token: Option<String>,
    master_ref: OnceCell<String>,
}

impl PrismicClient {
    pub fn new(http: Client, endpoint: &str, access_token: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token,
            master_ref: OnceCell::new(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .user_agent(concat!("spacetraveling/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BlogError::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self::new(
            http,
            &config.api_endpoint,
            config.access_token.clone(),
        ))
    }

    /// Resolve the master ref once per client
    async fn master_ref(&self) -> Result<&str> {
        let reference = self
            .master_ref
            .get_or_try_init(|| async {
                let mut request = self.http.get(&self.endpoint);
                if let Some(token) = &self.access_token {
                    request = request.query(&[("access_token", token)]);
                }
                let info: ApiInfo = send_json(request).await.map_err(BlogError::Api)?;
                let reference = info
                    .master_ref()
                    .ok_or_else(|| BlogError::Api("repository has no master ref".to_string()))?;
                tracing::debug!("Resolved master ref {}", reference);
                Ok::<_, BlogError>(reference.to_string())
            })
            .await?;
        Ok(reference.as_str())
    }
}

#[async_trait]
impl ContentClient for PrismicClient {
    async fn query(&self, options: &QueryOptions) -> Result<SearchResponse> {
        let reference = self.master_ref().await?;

        let mut params: Vec<(&str, String)> = vec![
            ("ref", reference.to_string()),
            ("q", to_query(&options.predicates)),
        ];
        if !options.fetch.is_empty() {
            params.push(("fetch", options.fetch.join(",")));
        }
        if let Some(page_size) = options.page_size {
            params.push(("pageSize", page_size.to_string()));
        }
        if let Some(token) = &self.access_token {
            params.push(("access_token", token.clone()));
        }

        let url = format!("{}/documents/search", self.endpoint);
        tracing::debug!("Querying {} with q={}", url, params[1].1);
        send_json(self.http.get(&url).query(&params))
            .await
            .map_err(BlogError::Api)
    }

    async fn fetch_page(&self, url: &str) -> Result<SearchResponse> {
        let mut request = self.http.get(url);
        if let Some(token) = &self.access_token {
            if !url.contains("access_token=") {
                request = request.query(&[("access_token", token)]);
            }
        }
        tracing::debug!("Fetching next page {}", url);
        send_json(request).await.map_err(BlogError::TransientFetch)
    }
}

/// Send a request and decode a JSON body, describing failures as text
async fn send_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> std::result::Result<T, String> {
    let response = request.send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("{} returned {}", response.url(), status));
    }
    response.json::<T>().await.map_err(|e| e.to_string())
}
