//! # REST Backend
//!
//! HTTP implementation of [`RemoteBackend`] against a generic JSON
//! entity-CRUD API.
//!
//! ## Endpoint Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list    GET    {base}/{collection}          -> [record, ...]          │
//! │  create  POST   {base}/{collection}          -> record                 │
//! │  update  PATCH  {base}/{collection}/{id}     -> record                 │
//! │  delete  DELETE {base}/{collection}/{id}     -> 200/204                │
//! │                                                                         │
//! │  Status mapping:                                                        │
//! │    401 / 403        -> Auth                                             │
//! │    404              -> NotFound                                         │
//! │    400 / 409 / 422  -> Validation                                       │
//! │    anything else    -> Network (incl. all transport failures)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries and no per-operation deadline: a hung call is bounded only by
//! the client-level timeout from [`RemoteConfig`]. Callers retry by user
//! action; local state is guaranteed unchanged on failure.

use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::backend::{Collection, RemoteBackend};
use crate::config::{ConfigError, RemoteConfig};
use crate::error::{RemoteError, RemoteResult};

// =============================================================================
// REST Backend
// =============================================================================

/// HTTP client for the remote entity service.
///
/// Cheap to clone; shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    base: Url,
    api_key: Option<String>,
}

impl RestBackend {
    /// Builds a backend from resolved configuration.
    pub fn new(config: &RemoteConfig) -> Result<Self, ConfigError> {
        // A trailing slash makes Url::join append instead of replace.
        let normalized = if config.base_url.ends_with('/') {
            config.base_url.clone()
        } else {
            format!("{}/", config.base_url)
        };
        let base = Url::parse(&normalized)
            .map_err(|e| ConfigError::Invalid(format!("base_url: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("http client: {}", e)))?;

        Ok(RestBackend {
            http,
            base,
            api_key: config.api_key.clone(),
        })
    }

    /// URL for a whole collection.
    fn collection_url(&self, collection: Collection) -> Url {
        // base is validated with a trailing slash, join cannot fail on a
        // bare lowercase segment
        self.base
            .join(collection.as_str())
            .expect("collection path segment is always a valid URL suffix")
    }

    /// URL for a single record.
    fn item_url(&self, collection: Collection, id: &str) -> RemoteResult<Url> {
        let mut url = self.collection_url(collection);
        url.path_segments_mut()
            .map_err(|_| RemoteError::Validation("base URL cannot carry path segments".into()))?
            .push(id);
        Ok(url)
    }

    /// Attaches the bearer token when configured.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Checks the status and decodes a JSON body.
    async fn read_json(
        response: Response,
        collection: Collection,
        id: Option<&str>,
    ) -> RemoteResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body, collection, id));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| RemoteError::Network(format!("invalid response body: {}", e)))
    }
}

/// Maps an HTTP error status onto the remote error taxonomy.
fn error_for_status(
    status: StatusCode,
    body: &str,
    collection: Collection,
    id: Option<&str>,
) -> RemoteError {
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Auth(detail),
        StatusCode::NOT_FOUND => {
            RemoteError::not_found(collection.as_str(), id.unwrap_or("<collection>"))
        }
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            RemoteError::Validation(detail)
        }
        _ => RemoteError::Network(detail),
    }
}

// =============================================================================
// RemoteBackend Implementation
// =============================================================================

impl RemoteBackend for RestBackend {
    async fn list(&self, collection: Collection) -> RemoteResult<Vec<Value>> {
        let url = self.collection_url(collection);
        debug!(%collection, "Listing remote collection");

        let response = self.authorize(self.http.get(url)).send().await?;
        let body = Self::read_json(response, collection, None).await?;

        match body {
            Value::Array(records) => Ok(records),
            other => Err(RemoteError::Network(format!(
                "expected an array of records, got {}",
                value_kind(&other)
            ))),
        }
    }

    async fn create(&self, collection: Collection, draft: Value) -> RemoteResult<Value> {
        let url = self.collection_url(collection);
        debug!(%collection, "Creating remote record");

        let response = self
            .authorize(self.http.post(url))
            .json(&draft)
            .send()
            .await?;
        let body = Self::read_json(response, collection, None).await?;

        // Some services answer a create with a one-element array
        match body {
            Value::Array(mut records) if !records.is_empty() => Ok(records.remove(0)),
            Value::Object(_) => Ok(body),
            other => Err(RemoteError::Network(format!(
                "expected the confirmed record, got {}",
                value_kind(&other)
            ))),
        }
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> RemoteResult<Value> {
        let url = self.item_url(collection, id)?;
        debug!(%collection, id, "Updating remote record");

        let response = self
            .authorize(self.http.patch(url))
            .json(&patch)
            .send()
            .await?;
        let body = Self::read_json(response, collection, Some(id)).await?;

        match body {
            Value::Array(mut records) if !records.is_empty() => Ok(records.remove(0)),
            Value::Object(_) => Ok(body),
            other => Err(RemoteError::Network(format!(
                "expected the confirmed record, got {}",
                value_kind(&other)
            ))),
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> RemoteResult<()> {
        let url = self.item_url(collection, id)?;
        debug!(%collection, id, "Deleting remote record");

        let response = self.authorize(self.http.delete(url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body, collection, Some(id)));
        }
        Ok(())
    }
}

/// Short label for a JSON value's shape, for error messages.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> RestBackend {
        RestBackend::new(&RemoteConfig {
            base_url: base.to_string(),
            api_key: None,
            request_timeout_secs: 30,
        })
        .unwrap()
    }

    #[test]
    fn test_collection_url_joining() {
        let b = backend("https://api.example.com/v1");
        assert_eq!(
            b.collection_url(Collection::Products).as_str(),
            "https://api.example.com/v1/products"
        );

        // Trailing slash on the configured base changes nothing
        let b = backend("https://api.example.com/v1/");
        assert_eq!(
            b.collection_url(Collection::SalesReturns).as_str(),
            "https://api.example.com/v1/sales_returns"
        );
    }

    #[test]
    fn test_item_url_escapes_ids() {
        let b = backend("https://api.example.com/v1");
        let url = b.item_url(Collection::Products, "product 42").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/products/product%2042"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = RestBackend::new(&RemoteConfig {
            base_url: "not a url".to_string(),
            api_key: None,
            request_timeout_secs: 30,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_status_mapping() {
        let auth = error_for_status(StatusCode::UNAUTHORIZED, "", Collection::Sales, None);
        assert!(matches!(auth, RemoteError::Auth(_)));

        let missing = error_for_status(
            StatusCode::NOT_FOUND,
            "",
            Collection::Products,
            Some("p-42"),
        );
        assert!(matches!(missing, RemoteError::NotFound { .. }));
        assert_eq!(missing.to_string(), "products not found on remote: p-42");

        let rejected = error_for_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "price must be positive",
            Collection::Products,
            None,
        );
        assert!(matches!(rejected, RemoteError::Validation(_)));
        assert!(rejected.to_string().contains("price must be positive"));

        let down = error_for_status(StatusCode::BAD_GATEWAY, "", Collection::Sales, None);
        assert!(matches!(down, RemoteError::Network(_)));
        assert!(down.is_retryable());
    }
}
