//! Headless CMS query API client.
//!
//! Issues GROQ queries over `GET /v{apiVersion}/data/query/{dataset}` and
//! converts `assignment` documents into tracker assignments.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use duetrack_core::{Assignment, ContentConfig};

use crate::error::ContentError;
use crate::retry::{with_retry, RetryConfig};
use crate::types::{AssignmentDocument, QueryResponse};

/// All assignments, soonest due first.
pub const ALL_ASSIGNMENTS_QUERY: &str = r#"*[_type == "assignment"] | order(dueDate asc)"#;

/// One assignment by document id, bound to `$id`.
pub const ASSIGNMENT_BY_ID_QUERY: &str = r#"*[_type == "assignment" && _id == $id][0]"#;

pub struct ContentClient {
    client: Client,
    base_url: String,
    api_version: String,
    dataset: String,
    retry: RetryConfig,
}

impl ContentClient {
    /// Client for the project named in `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ContentConfig) -> Result<Self, ContentError> {
        let host = if config.use_cdn { "apicdn" } else { "api" };
        let base_url = format!("https://{}.{}.sanity.io", config.project_id, host);
        Self::with_base_url(&base_url, config)
    }

    /// Client against an explicit host, e.g. a mock server.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str, config: &ContentConfig) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            dataset: config.dataset.clone(),
            retry: RetryConfig {
                max_retries: config.max_retries,
                ..RetryConfig::default()
            },
        })
    }

    /// Override the backoff schedule.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every assignment document, ordered by due date.
    ///
    /// Documents with an unrecognized type are skipped.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_assignments(&self) -> Result<Vec<Assignment>, ContentError> {
        let docs: Vec<AssignmentDocument> = self.query(ALL_ASSIGNMENTS_QUERY, &[]).await?;
        let total = docs.len();
        let assignments: Vec<Assignment> = docs
            .into_iter()
            .filter_map(AssignmentDocument::into_assignment)
            .collect();

        tracing::info!("Fetched {} assignments ({} skipped)", assignments.len(), total - assignments.len());
        Ok(assignments)
    }

    /// A single assignment by document id, or `None` if it does not exist.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_assignment(&self, id: &str) -> Result<Option<Assignment>, ContentError> {
        let id_param = serde_json::to_string(id)
            .map_err(|e| ContentError::InvalidResponse(format!("cannot encode id: {}", e)))?;
        let doc: Option<AssignmentDocument> = self
            .query(ASSIGNMENT_BY_ID_QUERY, &[("$id", id_param.as_str())])
            .await?;
        Ok(doc.and_then(AssignmentDocument::into_assignment))
    }

    fn query_url(&self, query: &str, params: &[(&str, &str)]) -> Result<Url, ContentError> {
        let raw = format!(
            "{}/v{}/data/query/{}",
            self.base_url, self.api_version, self.dataset
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| ContentError::InvalidResponse(format!("bad query URL {}: {}", raw, e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ContentError> {
        let url = &self.query_url(query, params)?;
        let response: QueryResponse<T> = with_retry(&self.retry, move || async move {
            let response = self.client.get(url.clone()).send().await.map_err(map_send_error)?;
            self.handle_response(response).await
        })
        .await?;

        if let Some(ms) = response.ms {
            tracing::debug!("Query completed server-side in {}ms", ms);
        }
        Ok(response.result)
    }

    /// Map an HTTP response to a decoded body or a typed error.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ContentError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ContentError::InvalidResponse(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(ContentError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(ContentError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

fn map_send_error(e: reqwest::Error) -> ContentError {
    if e.is_timeout() {
        ContentError::Timeout
    } else {
        ContentError::Network(e)
    }
}

impl std::fmt::Debug for ContentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentClient")
            .field("base_url", &self.base_url)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .finish()
    }
}
