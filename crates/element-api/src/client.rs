// Elements API HTTP client
//
// Wraps `reqwest::Client` with Elements-specific URL construction, the
// `{ body, retrieve_after_id }` envelope, and the cursor-following fetch
// engine. Endpoint families (folders, devices, readings, packets) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::cache::IdCache;
use crate::error::Error;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Client for the Elements IoT telemetry API.
///
/// Holds the base API location (including the version prefix, e.g.
/// `https://dew21.element-iot.com/api/v1`), the API key, and a per-instance
/// cache mapping vendor serial numbers to device addresses. Pass one
/// instance around where possible so the cache gets reused.
///
/// All I/O is sequential: a paginated fetch or identifier probe runs its
/// requests one after another and returns only when done. The cache is not
/// synchronized internally -- the resolution methods take `&mut self`, so
/// sharing a client across tasks requires caller-side exclusion.
pub struct ElementClient {
    http: reqwest::Client,
    api_location: String,
    api_key: SecretString,
    pub(crate) cache: IdCache,
}

impl ElementClient {
    /// Create a client with the default transport (5 s per-request timeout).
    ///
    /// `api_location` is the API root including the version, e.g.
    /// `https://dew21.element-iot.com/api/v1`; trailing slashes are
    /// stripped. The key is sent as the `auth` query parameter on every
    /// request, never as a header.
    pub fn new(api_location: &str, api_key: &str) -> Result<Self, Error> {
        Self::with_transport(api_location, api_key, &TransportConfig::default())
    }

    /// Create a client with a custom [`TransportConfig`].
    pub fn with_transport(
        api_location: &str,
        api_key: &str,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            api_location: api_location.trim_end_matches('/').to_owned(),
            api_key: SecretString::from(api_key.to_owned()),
            cache: IdCache::default(),
        })
    }

    /// The API root this client talks to.
    pub fn api_location(&self) -> &str {
        &self.api_location
    }

    // ── Request mechanics ────────────────────────────────────────────

    /// Build the request URL: `{base}/{route}?auth=<key>&{params}`, with
    /// `retrieve_after=<token>` appended for continuation requests.
    fn request_url(
        &self,
        route: &str,
        params: &[(&str, String)],
        retrieve_after: Option<&str>,
    ) -> Result<Url, Error> {
        let mut url = Url::parse(&format!("{}/{route}", self.api_location))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("auth", self.api_key.expose_secret());
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(token) = retrieve_after {
                query.append_pair("retrieve_after", token);
            }
        }
        Ok(url)
    }

    /// Issue one GET and parse the envelope. Transport failures (timeouts,
    /// connection errors, non-2xx) propagate unchanged -- no retries here.
    async fn request(
        &self,
        route: &str,
        params: &[(&str, String)],
        retrieve_after: Option<&str>,
    ) -> Result<Envelope<Value>, Error> {
        let url = self.request_url(route, params, retrieve_after)?;
        // log the route, not the URL: the URL carries the API key
        debug!(route, continuation = retrieve_after.is_some(), "GET");

        let resp = self.http.get(url).send().await?.error_for_status()?;
        let body = resp.text().await?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    // ── Paginated fetch engine ───────────────────────────────────────

    /// Fetch `route`, following `retrieve_after_id` cursors until the API
    /// stops returning one or `max_pages` pages have been fetched (the
    /// first request counts as page 1, so `Some(1)` never follows a
    /// cursor). Array bodies are merged in order; a cursor on a non-array
    /// body is [`Error::ScalarPagination`], raised before the continuation
    /// request is issued.
    pub(crate) async fn fetch(
        &self,
        route: &str,
        params: &[(&str, String)],
        max_pages: Option<u32>,
    ) -> Result<Envelope<Value>, Error> {
        let mut envelope = self.request(route, params, None).await?;
        let mut cursor = envelope.retrieve_after_id.clone();
        let mut pages: u32 = 1;

        while let Some(token) = cursor {
            if max_pages.is_some_and(|cap| pages >= cap) {
                break;
            }
            let Value::Array(merged) = &mut envelope.body else {
                return Err(Error::ScalarPagination);
            };

            let page = self.request(route, params, Some(&token)).await?;
            cursor = page.retrieve_after_id;
            match page.body {
                Value::Array(items) => merged.extend(items),
                _ => return Err(Error::ScalarPagination),
            }
            pages += 1;
        }

        debug!(route, pages, "fetch complete");
        Ok(envelope)
    }

    /// Fetch a route whose body is an array and deserialize the merged
    /// records.
    pub(crate) async fn fetch_collection<T: DeserializeOwned>(
        &self,
        route: &str,
        params: &[(&str, String)],
        max_pages: Option<u32>,
    ) -> Result<Vec<T>, Error> {
        let envelope = self.fetch(route, params, max_pages).await?;
        deserialize_body(envelope.body)
    }
}

/// Deserialize an envelope body, keeping the raw JSON for debugging when the
/// shape does not match.
pub(crate) fn deserialize_body<T: DeserializeOwned>(body: Value) -> Result<T, Error> {
    serde_json::from_value(body.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_string(),
    })
}

// ── Redaction & equality ─────────────────────────────────────────────

impl fmt::Debug for ElementClient {
    /// Masks the API key except its final 3 characters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.api_key.expose_secret();
        // char-based tail selection: keys are documented as ASCII, but a
        // multibyte character must not panic the formatter
        let tail_start = key.char_indices().rev().nth(2).map_or(0, |(i, _)| i);
        let stars = key[..tail_start].chars().count();
        let masked = format!("{}{}", "*".repeat(stars), &key[tail_start..]);
        f.debug_struct("ElementClient")
            .field("api_location", &self.api_location)
            .field("api_key", &masked)
            .finish()
    }
}

impl PartialEq for ElementClient {
    /// Compares `(api_location, api_key)` only; cache state is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.api_location == other.api_location
            && self.api_key.expose_secret() == other.api_key.expose_secret()
    }
}
