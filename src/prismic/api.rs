//! Wire types of the Prismic REST API (v2)

use serde::{Deserialize, Serialize};

/// Response of `GET {endpoint}`: repository metadata
#[derive(Debug, Clone, Deserialize)]
pub struct ApiInfo {
    pub refs: Vec<ApiRef>,
}

/// A content release reference
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRef {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
    #[serde(default)]
    pub label: Option<String>,
}

impl ApiInfo {
    /// The ref of the currently published content
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

/// Response of `GET {endpoint}/documents/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub page: usize,
    pub results_per_page: usize,
    pub results_size: usize,
    pub total_results_size: usize,
    pub total_pages: usize,
    pub next_page: Option<String>,
    pub prev_page: Option<String>,
    pub results: Vec<Document>,
}

/// A content document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,

    #[serde(default)]
    pub uid: Option<String>,

    #[serde(rename = "type")]
    pub document_type: String,

    #[serde(default)]
    pub first_publication_date: Option<String>,

    #[serde(default)]
    pub last_publication_date: Option<String>,

    /// Custom-type fields, shaped by the document type
    #[serde(default)]
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_ref() {
        let info: ApiInfo = serde_json::from_str(
            r#"{"refs": [
                {"id": "preview", "ref": "YHp", "label": "Preview"},
                {"id": "master", "ref": "YHm", "label": "Master", "isMasterRef": true}
            ], "types": {"post": "Post"}}"#,
        )
        .unwrap();
        assert_eq!(info.master_ref(), Some("YHm"));
    }

    #[test]
    fn test_search_response_end_of_results() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"page": 2, "results_per_page": 5, "total_pages": 2,
                "next_page": null, "prev_page": "https://x/api/v2/documents/search?page=1",
                "results": [{"id": "a", "uid": "a", "type": "post", "data": {}}]}"#,
        )
        .unwrap();
        assert_eq!(response.next_page, None);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].document_type, "post");
    }
}
