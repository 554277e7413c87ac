//! Client for the external case-tracking API.
//!
//! The API is a black box returning movement records; this module only
//! owns the transport: bearer auth, request timeout, pagination, and CNJ
//! normalization of the case number before the path is built.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::ApiError;
use crate::monitoring::{cnj, CaseMovement};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_PAGE_SIZE: u32 = 50;

/// Anything that can produce the movements of a case. The seam between
/// the monitoring runner and the real HTTP client.
pub trait MovementSource: Send + Sync {
    fn fetch_movements(&self, case_number: &str) -> Result<Vec<CaseMovement>, ApiError>;
}

/// HTTP implementation of [`MovementSource`].
pub struct TrackingApiClient {
    base_url: Url,
    token: String,
    timeout: Duration,
    page_size: u32,
}

impl TrackingApiClient {
    /// Create a client for `base_url`, authenticated with `token`.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, ApiError> {
        // A base without a trailing slash would swallow its last path
        // segment on join().
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            base_url: Url::parse(&base)?,
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fetch one page. Accepts either a bare movement array or an
    /// `{"items": [...], "next_page": n|null}` envelope.
    fn fetch_page(
        &self,
        client: &Client,
        number: &str,
        page: u64,
    ) -> Result<(Vec<CaseMovement>, Option<u64>), ApiError> {
        let url = self
            .base_url
            .join(&format!("processos/numero_cnj/{number}/movimentacoes"))?;

        let handle = tokio::runtime::Handle::current();
        let response = handle.block_on(
            client
                .get(url)
                .query(&[
                    ("page", page.to_string()),
                    ("page_size", self.page_size.to_string()),
                ])
                .bearer_auth(&self.token)
                .send(),
        )?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = handle.block_on(response.json())?;

        if body.is_array() {
            let movements = serde_json::from_value(body)
                .map_err(|e| ApiError::Body(e.to_string()))?;
            return Ok((movements, None));
        }

        let items = body
            .get("items")
            .cloned()
            .ok_or_else(|| ApiError::Body("missing 'items' in paginated response".to_string()))?;
        let movements =
            serde_json::from_value(items).map_err(|e| ApiError::Body(e.to_string()))?;
        // Cursor stays u64; a narrowing cast here could wrap an oversized
        // envelope value onto a valid page.
        let next_page = body.get("next_page").and_then(|v| v.as_u64());

        Ok((movements, next_page))
    }
}

impl MovementSource for TrackingApiClient {
    fn fetch_movements(&self, case_number: &str) -> Result<Vec<CaseMovement>, ApiError> {
        let number = cnj::normalize(case_number);
        let client = Client::builder().timeout(self.timeout).build()?;

        let mut movements = Vec::new();
        let mut page: u64 = 1;
        loop {
            let (mut batch, next_page) = self.fetch_page(&client, &number, page)?;
            movements.append(&mut batch);
            match next_page {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(movements)
    }
}
