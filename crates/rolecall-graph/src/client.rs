//! Microsoft Graph HTTP client.
//!
//! Read-only GET surface with bearer-token injection, OData error
//! decoding, and transport-level retry for throttling and transient
//! gateway failures. Retry policy lives here, not in the resolution
//! core; callers above see only success or a final error.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{GraphConfig, GraphError, GraphResult, TokenProvider};

const MAX_RETRIES: u32 = 5;

/// OData error envelope returned by Graph.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
    #[serde(rename = "innerError")]
    pub inner_error: Option<serde_json::Value>,
}

/// Paginated collection response.
#[derive(Debug, Deserialize)]
pub struct ODataCollection<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Microsoft Graph API client.
#[derive(Debug)]
pub struct GraphClient {
    http_client: reqwest::Client,
    tokens: TokenProvider,
    base_url: String,
}

impl GraphClient {
    /// Creates a client for the configured cloud and tenant.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &GraphConfig, tokens: TokenProvider) -> GraphResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GraphError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            tokens,
            base_url: config.graph_base_url(),
        })
    }

    /// Builds an absolute URL for a Graph resource path with query pairs.
    ///
    /// Query values are percent-encoded by the `url` crate, which is what
    /// keeps `$filter` expressions containing quotes and spaces well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Url`] if the base URL is not parseable.
    pub fn resource_url(&self, path: &str, query: &[(&str, &str)]) -> GraphResult<String> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path.trim_start_matches('/')))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url.into())
    }

    /// Performs a GET request, injecting a bearer token and retrying
    /// throttled (429) and transient (502/503/504) responses.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> GraphResult<T> {
        let mut retries = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            let token = self.tokens.bearer_token().await?;

            let response = self
                .http_client
                .get(url)
                .bearer_auth(&token)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if retries >= MAX_RETRIES {
                    return Err(GraphError::MaxRetriesExceeded { attempts: retries });
                }
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map_or(delay, Duration::from_secs);

                retries += 1;
                warn!("Throttled, retry {}/{} after {:?}", retries, MAX_RETRIES, retry_after);
                tokio::time::sleep(retry_after).await;
                delay *= 2;
                continue;
            }

            if matches!(
                status,
                reqwest::StatusCode::BAD_GATEWAY
                    | reqwest::StatusCode::SERVICE_UNAVAILABLE
                    | reqwest::StatusCode::GATEWAY_TIMEOUT
            ) && retries < MAX_RETRIES
            {
                retries += 1;
                warn!("Transient error {}, retry {}/{} after {:?}", status, retries, MAX_RETRIES, delay);
                tokio::time::sleep(delay).await;
                delay *= 2;
                continue;
            }

            if status.is_success() {
                return response.json().await.map_err(GraphError::from);
            }

            let error_body = response.text().await.unwrap_or_default();
            if let Ok(odata) = serde_json::from_str::<ODataError>(&error_body) {
                return Err(GraphError::GraphApi {
                    code: odata.error.code,
                    message: odata.error.message,
                    inner_error: odata.error.inner_error.map(|v| v.to_string()),
                });
            }

            return Err(GraphError::GraphApi {
                code: status.to_string(),
                message: error_body,
                inner_error: None,
            });
        }
    }

    /// Fetches every page of a collection, following `@odata.nextLink`.
    #[instrument(skip(self))]
    pub async fn get_collection<T: DeserializeOwned>(&self, initial_url: &str) -> GraphResult<Vec<T>> {
        let mut url = initial_url.to_string();
        let mut items = Vec::new();

        loop {
            debug!("Fetching page: {}", url);
            let page: ODataCollection<T> = self.get(&url).await?;
            items.extend(page.value);

            match page.next_link {
                Some(next) => url = next,
                None => return Ok(items),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odata_error_parsing() {
        let json = r#"{
            "error": {
                "code": "Request_ResourceNotFound",
                "message": "Resource not found",
                "innerError": {"date": "2025-11-02"}
            }
        }"#;

        let error: ODataError = serde_json::from_str(json).unwrap();
        assert_eq!(error.error.code, "Request_ResourceNotFound");
        assert!(error.error.inner_error.is_some());
    }

    #[test]
    fn test_collection_parsing_with_next_link() {
        #[derive(Debug, Deserialize)]
        struct Item {
            #[allow(dead_code)]
            id: String,
        }

        let json = r#"{
            "value": [{"id": "1"}, {"id": "2"}],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/servicePrincipals?$skiptoken=xxx"
        }"#;

        let page: ODataCollection<Item> = serde_json::from_str(json).unwrap();
        assert_eq!(page.value.len(), 2);
        assert!(page.next_link.is_some());
    }
}
