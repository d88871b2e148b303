//! Table API client.
//!
//! Collections are queried with filter/order/limit predicates and mutated
//! with insert/update/delete keyed by a column filter. There is no cache and
//! no retry layer: every call is one request, and failures propagate to the
//! caller as [`PlatformError`].

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::PlatformConfig;
use crate::error::{PlatformError, api_error};

/// Sort direction for [`TableRequest::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Client for the platform's table API.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    http: reqwest::Client,
    endpoint: String,
    anon_key: String,
    service_key: Option<SecretString>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("endpoint", &self.inner.endpoint)
            .field(
                "service_key",
                &self.inner.service_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a new table API client.
    #[must_use]
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            inner: Arc::new(RestClientInner {
                http: reqwest::Client::new(),
                endpoint: config.rest_endpoint(),
                anon_key: config.anon_key().to_owned(),
                service_key: config.service_key().cloned(),
            }),
        }
    }

    /// Start a request against a collection.
    #[must_use]
    pub fn table(&self, name: &str) -> TableRequest {
        TableRequest {
            client: self.clone(),
            table: name.to_owned(),
            query: Vec::new(),
        }
    }

    /// Bearer token for data access: the service-role key when configured
    /// (server-side binaries), the publishable key otherwise. Row access is
    /// enforced by the platform's row-level policy either way.
    fn bearer(&self) -> String {
        self.inner.service_key.as_ref().map_or_else(
            || self.inner.anon_key.clone(),
            |key| key.expose_secret().to_owned(),
        )
    }
}

/// A single request against one collection.
///
/// Builder methods accumulate predicates; the terminal async methods send
/// exactly one HTTP request.
#[derive(Debug)]
pub struct TableRequest {
    client: RestClient,
    table: String,
    query: Vec<(String, String)>,
}

impl TableRequest {
    /// Restrict returned columns (defaults to `*`).
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.query.push(("select".to_owned(), columns.to_owned()));
        self
    }

    /// Equality predicate on a column.
    #[must_use]
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.query.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    /// Case-insensitive containment match against any of the given columns.
    ///
    /// Renders as an `or` group of `ilike` predicates with the term wrapped
    /// in wildcards. Characters that would break the group syntax are
    /// stripped from the term.
    #[must_use]
    pub fn or_ilike(mut self, columns: &[&str], term: &str) -> Self {
        let term = sanitize_term(term);
        let group = columns
            .iter()
            .map(|column| format!("{column}.ilike.*{term}*"))
            .collect::<Vec<_>>()
            .join(",");
        self.query.push(("or".to_owned(), format!("({group})")));
        self
    }

    /// Sort by a column.
    #[must_use]
    pub fn order(mut self, column: &str, direction: Order) -> Self {
        self.query.push((
            "order".to_owned(),
            format!("{column}.{}", direction.as_str()),
        ));
        self
    }

    /// Bound the page size.
    #[must_use]
    pub fn limit(mut self, count: usize) -> Self {
        self.query.push(("limit".to_owned(), count.to_string()));
        self
    }

    /// Fetch all rows matching the accumulated predicates.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, PlatformError> {
        let body = self.send(Method::GET, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch at most one row.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, PlatformError> {
        let mut rows = self.limit(1).fetch::<T>().await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Insert one row and return its representation.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure, and
    /// `PlatformError::NotFound` if the platform returns no representation.
    #[instrument(skip(self, row), fields(table = %self.table))]
    pub async fn insert<T: Serialize + Sync, R: DeserializeOwned>(
        self,
        row: &T,
    ) -> Result<R, PlatformError> {
        let table = self.table.clone();
        let payload = serde_json::to_string(row)?;
        let body = self.send(Method::POST, Some(payload)).await?;
        let mut rows: Vec<R> = serde_json::from_str(&body)?;
        if rows.is_empty() {
            return Err(PlatformError::NotFound(format!(
                "insert into {table} returned no row"
            )));
        }
        Ok(rows.swap_remove(0))
    }

    /// Apply a patch to every row matching the accumulated predicates and
    /// return the updated representations.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport, API, or decode failure.
    #[instrument(skip(self, patch), fields(table = %self.table))]
    pub async fn update<T: Serialize + Sync, R: DeserializeOwned>(
        self,
        patch: &T,
    ) -> Result<Vec<R>, PlatformError> {
        let payload = serde_json::to_string(patch)?;
        let body = self.send(Method::PATCH, Some(payload)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete every row matching the accumulated predicates.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport or API failure.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn delete(self) -> Result<(), PlatformError> {
        self.send(Method::DELETE, None).await?;
        Ok(())
    }

    /// Send the request and triage the response.
    async fn send(self, method: Method, body: Option<String>) -> Result<String, PlatformError> {
        let inner = &self.client.inner;
        let url = format!("{}/{}", inner.endpoint, self.table);

        let mut request = inner
            .http
            .request(method, url)
            .header("apikey", &inner.anon_key)
            .bearer_auth(self.client.bearer())
            // Mutations return the affected rows so callers never need a
            // second read to observe what they wrote.
            .header("Prefer", "return=representation")
            .query(&self.query);

        if let Some(payload) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(payload);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(PlatformError::RateLimited(retry_after));
        }

        // Body first for error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                table = %self.table,
                "table API returned non-success status"
            );
            return Err(api_error(status, &text));
        }

        Ok(text)
    }

    #[cfg(test)]
    fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

/// Strip characters that would break the `or` group syntax out of a
/// user-supplied search term.
fn sanitize_term(term: &str) -> String {
    term.chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '"'))
        .collect()
}
