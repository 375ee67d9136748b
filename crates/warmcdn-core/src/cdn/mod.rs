//! CDN prefetch API client.
//!
//! Issues one PUT per dispatch call carrying `{"paths": [...]}` and the
//! static `X-token` header. The endpoint is assembled once at construction
//! from the configured base, CDN and templated resource path.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;
use std::time::Duration;

use crate::config::CdnConfig;
use crate::dispatch::{Prefetch, PrefetchError, PrefetchResponse};

#[derive(Serialize)]
struct PrefetchBody<'a> {
    paths: &'a [String],
}

/// Client for the CDN's prefetch endpoint.
pub struct CdnClient {
    endpoint: String,
    token: String,
}

impl CdnClient {
    /// Builds the final endpoint from the config and validates it as a URL.
    /// An unparseable endpoint is a startup error, not a per-call one.
    pub fn new(cfg: &CdnConfig) -> Result<Self> {
        let resource_path = cfg
            .prefetch_api_path
            .replace("{PROJECT_ID}", &cfg.project_id)
            .replace("{RESOURCE_ID}", &cfg.resource_id);
        let endpoint = format!("{}{}{}", cfg.base_api_path, cfg.cdn_api_path, resource_path);
        url::Url::parse(&endpoint)
            .with_context(|| format!("invalid CDN prefetch endpoint: {endpoint}"))?;
        Ok(Self {
            endpoint,
            token: cfg.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Prefetch for CdnClient {
    fn prefetch(&self, paths: &[String]) -> Result<PrefetchResponse, PrefetchError> {
        let payload = serde_json::to_vec(&PrefetchBody { paths })?;
        let mut payload_reader = payload.as_slice();
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&self.endpoint)?;
        easy.put(true)?;
        easy.in_filesize(payload.len() as u64)?;
        easy.connect_timeout(Duration::from_secs(15))?;
        easy.timeout(Duration::from_secs(60))?;

        let mut list = curl::easy::List::new();
        list.append(&format!("X-token: {}", self.token))?;
        list.append("Content-Type: application/json")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.read_function(|buf| Ok(payload_reader.read(buf).unwrap_or(0)))?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(PrefetchResponse { status, body })
    }
}
