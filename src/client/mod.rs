//! Request orchestration
//!
//! [`CachingClient`] ties the pieces together:
//! - picks the cache or the service endpoint for reads
//! - walks `offset` pages lazily until the service stops returning one
//! - splits writes into chunks of at most ten records, sent one after another
//! - converts between flat rows and wire records when processing is on
//!
//! Any non-success status aborts the call. Earlier chunks of a multi-chunk
//! write are not rolled back.

mod options;

#[cfg(test)]
mod tests;

pub use options::{FetchOptions, WriteOptions};

use crate::auth::Credentials;
use crate::batch::BatchPlanner;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpRequest, HttpResponse, Transport};
use crate::pagination::{paginate, Page};
use crate::records::{
    from_wire, to_wire, DeletedRecord, FlatRow, ListResponse, RecordsEnvelope, WireBatch,
    WireRecord,
};
use crate::types::{JsonValue, Method, Route};
use crate::webhooks::WebhookClient;
use futures::{Stream, TryStreamExt};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Result of a read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Records {
    /// Flat rows with decoded special values and `at_record_id`
    Rows(Vec<FlatRow>),
    /// Records exactly as the service returned them
    Raw(Vec<WireRecord>),
}

impl Records {
    pub fn len(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.len(),
            Self::Raw(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat rows, if the read was processed
    pub fn into_rows(self) -> Option<Vec<FlatRow>> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Raw(_) => None,
        }
    }

    /// Wire records, if the read was raw
    pub fn into_raw(self) -> Option<Vec<WireRecord>> {
        match self {
            Self::Raw(records) => Some(records),
            Self::Rows(_) => None,
        }
    }
}

/// Client for Airtable record endpoints, optionally fronted by a cache
pub struct CachingClient {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
    api_url: Url,
    cache_url: Option<Url>,
    base: Option<String>,
    process: bool,
    planner: BatchPlanner,
}

impl CachingClient {
    /// Create a client backed by a reqwest transport
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpClient::with_config(config.http_config())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends requests through `transport`
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let credentials = config.credentials()?;
        let api_url = Url::parse(&config.api_url)?;
        let cache_url = config
            .cache
            .as_ref()
            .map(|cache| Url::parse(&cache.url))
            .transpose()?;

        debug!(
            "Client ready (cache: {}, base: {:?}, process: {})",
            cache_url.is_some(),
            config.base,
            config.process
        );

        Ok(Self {
            transport,
            credentials,
            api_url,
            cache_url,
            base: config.base.clone(),
            process: config.process,
            planner: BatchPlanner::default(),
        })
    }

    /// Use a different chunk size for writes
    #[must_use]
    pub fn with_planner(mut self, planner: BatchPlanner) -> Self {
        self.planner = planner;
        self
    }

    /// Base used when a call does not name one
    pub fn default_base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Whether calls process records unless told otherwise
    pub fn processes_by_default(&self) -> bool {
        self.process
    }

    /// Whether reads can go through the cache
    pub fn has_cache(&self) -> bool {
        self.cache_url.is_some() && self.credentials.has_cache_token()
    }

    /// Webhook management for this client's credentials
    pub fn webhooks(&self) -> Result<WebhookClient<'_>> {
        if !self.credentials.has_personal_token() {
            return Err(Error::missing_field("personal_token"));
        }
        Ok(WebhookClient::new(
            self.transport.as_ref(),
            &self.credentials,
            &self.api_url,
        ))
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Read every record of a table
    ///
    /// All pages are fetched before returning; any failed page fails the call.
    pub async fn fetch(&self, table: &str, options: &FetchOptions) -> Result<Records> {
        let process = options.process.resolve(self.process);
        let records: Vec<WireRecord> = self.fetch_stream(table, options)?.try_collect().await?;
        info!("Fetched {} records from {}", records.len(), table);

        if process {
            Ok(Records::Rows(from_wire(records, true)?))
        } else {
            Ok(Records::Raw(records))
        }
    }

    /// Read every record of a table as flat rows, whatever the default
    pub async fn fetch_rows(&self, table: &str, options: &FetchOptions) -> Result<Vec<FlatRow>> {
        let records: Vec<WireRecord> = self.fetch_stream(table, options)?.try_collect().await?;
        from_wire(records, true)
    }

    /// Lazily stream the wire records of a table
    ///
    /// Pages are requested only as the stream is polled. The first error ends
    /// the stream.
    pub fn fetch_stream<'a>(
        &'a self,
        table: &str,
        options: &FetchOptions,
    ) -> Result<impl Stream<Item = Result<WireRecord>> + 'a> {
        let base = self.resolve_base(options.base.as_deref())?;
        let route = self.route(options.direct);
        let url = self.endpoint(route, &[base.as_str(), table])?;
        let query = options.query();

        debug!("Reading {} via {:?}", url, route);

        Ok(paginate(move |cursor: Option<String>| {
            let mut request = self
                .credentials
                .apply(route, HttpRequest::new(Method::GET, url.clone()));
            request.query.extend(query.iter().cloned());
            if let Some(offset) = cursor {
                request = request.query("offset", offset);
            }
            async move {
                let page: ListResponse = self.send(request).await?.json()?;
                Ok::<_, Error>(Page::new(page.records, page.offset))
            }
        }))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Create records from JSON input
    ///
    /// Processed input is a list of flat rows; raw input is a list of wire
    /// records or a `{"records": [...]}` container.
    pub async fn create(
        &self,
        table: &str,
        data: JsonValue,
        options: &WriteOptions,
    ) -> Result<Vec<WireRecord>> {
        let records = if options.process.resolve(self.process) {
            to_wire(&parse_rows(data)?, false, true)?.into_records()
        } else {
            WireBatch::from_json(data)?.into_records()
        };
        self.create_records(table, records, options.base.as_deref())
            .await
    }

    /// Create records from flat rows
    pub async fn create_rows(
        &self,
        table: &str,
        rows: &[FlatRow],
        base: Option<&str>,
    ) -> Result<Vec<WireRecord>> {
        let records = to_wire(rows, false, true)?.into_records();
        self.create_records(table, records, base).await
    }

    /// Create wire records as given
    pub async fn create_records(
        &self,
        table: &str,
        records: Vec<WireRecord>,
        base: Option<&str>,
    ) -> Result<Vec<WireRecord>> {
        let created = self.write(Method::POST, table, base, &records).await?;
        info!("Created {} records in {}", created.len(), table);
        Ok(created)
    }

    /// Update records from JSON input
    ///
    /// Processed rows must carry `at_record_id`.
    pub async fn update(
        &self,
        table: &str,
        data: JsonValue,
        options: &WriteOptions,
    ) -> Result<Vec<WireRecord>> {
        let records = if options.process.resolve(self.process) {
            to_wire(&parse_rows(data)?, options.keep_none, false)?.into_records()
        } else {
            WireBatch::from_json(data)?.into_records()
        };
        self.update_records(table, records, options.base.as_deref())
            .await
    }

    /// Update records from flat rows carrying `at_record_id`
    pub async fn update_rows(
        &self,
        table: &str,
        rows: &[FlatRow],
        options: &WriteOptions,
    ) -> Result<Vec<WireRecord>> {
        let records = to_wire(rows, options.keep_none, false)?.into_records();
        self.update_records(table, records, options.base.as_deref())
            .await
    }

    /// Update wire records as given
    pub async fn update_records(
        &self,
        table: &str,
        records: Vec<WireRecord>,
        base: Option<&str>,
    ) -> Result<Vec<WireRecord>> {
        let updated = self.write(Method::PATCH, table, base, &records).await?;
        info!("Updated {} records in {}", updated.len(), table);
        Ok(updated)
    }

    /// Delete records by id
    pub async fn delete(
        &self,
        table: &str,
        ids: &[String],
        base: Option<&str>,
    ) -> Result<Vec<DeletedRecord>> {
        let base = self.resolve_base(base)?;
        let url = self.endpoint(Route::Direct, &[base.as_str(), table])?;
        let chunks = self.planner.plan(ids);
        let total = chunks.len();
        let mut deleted = Vec::with_capacity(ids.len());

        for (i, chunk) in chunks.into_iter().enumerate() {
            let mut request = self
                .credentials
                .apply(Route::Direct, HttpRequest::new(Method::DELETE, url.clone()));
            for id in chunk {
                request = request.query("records[]", id.as_str());
            }
            let response: RecordsEnvelope<DeletedRecord> = self.send(request).await?.json()?;
            debug!("DELETE chunk {}/{} on {}", i + 1, total, table);
            deleted.extend(response.records);
        }

        info!("Deleted {} records from {}", deleted.len(), table);
        Ok(deleted)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn write(
        &self,
        method: Method,
        table: &str,
        base: Option<&str>,
        records: &[WireRecord],
    ) -> Result<Vec<WireRecord>> {
        let base = self.resolve_base(base)?;
        let url = self.endpoint(Route::Direct, &[base.as_str(), table])?;
        let chunks = self.planner.plan(records);
        let total = chunks.len();
        let mut written = Vec::with_capacity(records.len());

        for (i, chunk) in chunks.into_iter().enumerate() {
            let request = self
                .credentials
                .apply(Route::Direct, HttpRequest::new(method, url.clone()))
                .json(json!({ "records": chunk }));
            let response: RecordsEnvelope<WireRecord> = self.send(request).await?.json()?;
            debug!(
                "{} chunk {}/{} ({} records) on {}",
                method,
                i + 1,
                total,
                chunk.len(),
                table
            );
            written.extend(response.records);
        }

        Ok(written)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.transport.send(request).await?.error_for_status()
    }

    fn resolve_base(&self, base: Option<&str>) -> Result<String> {
        base.filter(|b| !b.is_empty())
            .or(self.base.as_deref())
            .map(str::to_string)
            .ok_or_else(|| Error::missing_field("base"))
    }

    fn route(&self, direct: bool) -> Route {
        if direct {
            Route::Direct
        } else if self.has_cache() {
            Route::Cache
        } else {
            debug!("No cache configured, reading from Airtable directly");
            Route::Direct
        }
    }

    fn endpoint(&self, route: Route, segments: &[&str]) -> Result<Url> {
        let root = match (route, &self.cache_url) {
            (Route::Cache, Some(cache)) => cache,
            _ => &self.api_url,
        };
        join_segments(root, segments)
    }
}

impl std::fmt::Debug for CachingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingClient")
            .field("api_url", &self.api_url.as_str())
            .field("cache_url", &self.cache_url.as_ref().map(Url::as_str))
            .field("base", &self.base)
            .field("process", &self.process)
            .field("batch_size", &self.planner.size())
            .finish_non_exhaustive()
    }
}

/// Append percent-encoded path segments to `root`
pub(crate) fn join_segments(root: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = root.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| Error::invalid_value("api_url", "cannot be used as a base URL"))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

fn parse_rows(data: JsonValue) -> Result<Vec<FlatRow>> {
    serde_json::from_value(data).map_err(|e| Error::decode(format!("expected a list of rows: {e}")))
}
