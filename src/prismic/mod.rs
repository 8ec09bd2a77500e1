//! Prismic content source: wire types, predicates and the HTTP client

mod api;
mod client;
mod predicate;

pub use api::{ApiInfo, ApiRef, Document, SearchResponse};
pub use client::{ContentClient, PrismicClient, QueryOptions};
pub use predicate::{to_query, Predicate};
