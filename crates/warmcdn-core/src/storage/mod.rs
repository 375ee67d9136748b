//! Bucket listing over the S3 ListObjectsV2 HTTP protocol.
//!
//! Uses the curl crate to GET `{endpoint}/{bucket}?list-type=2` pages and
//! extracts object keys from the `ListBucketResult` XML body. A listing
//! failure is fatal for the run: with no key set there is nothing to warm.

mod parse;
mod sign;

use anyhow::{bail, Context, Result};
use std::time::Duration;

use crate::config::StorageConfig;

/// Keys fetched per page. ListObjectsV2 caps this server-side at 1000.
const PAGE_SIZE: u32 = 1000;

/// Seam between the orchestrator and the listing transport, so tests can
/// wire an in-memory listing.
pub trait Listing {
    fn list_keys(&self, bucket: &str) -> Result<Vec<String>>;
}

/// Listing client against an S3-compatible endpoint.
pub struct ListingClient {
    endpoint: String,
    access_key: String,
    secret_key: String,
}

impl ListingClient {
    pub fn new(cfg: &StorageConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            access_key: cfg.access_key.clone(),
            secret_key: cfg.secret_key.clone(),
        }
    }

    fn page_url(&self, bucket: &str, continuation: Option<&str>) -> Result<String> {
        let mut url = url::Url::parse(&format!("{}/{}", self.endpoint, bucket))
            .context("invalid storage endpoint")?;
        url.query_pairs_mut()
            .append_pair("list-type", "2")
            .append_pair("max-keys", &PAGE_SIZE.to_string());
        if let Some(token) = continuation {
            url.query_pairs_mut().append_pair("continuation-token", token);
        }
        Ok(url.into())
    }

    /// GET one listing page and return its raw XML body.
    ///
    /// The request carries a signature V2 `Authorization` header over the
    /// bucket resource path (`/{bucket}`), the scheme S3-compatible
    /// gateways expect for private buckets.
    fn fetch_page(&self, url: &str, resource: &str) -> Result<Vec<u8>> {
        let mut body = Vec::new();

        let date = sign::request_date();
        let auth = sign::authorization(&self.access_key, &self.secret_key, &date, resource)?;

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid listing URL")?;
        easy.connect_timeout(Duration::from_secs(15))?;
        easy.timeout(Duration::from_secs(60))?;

        let mut list = curl::easy::List::new();
        list.append(&format!("Date: {date}"))?;
        list.append(&format!("Authorization: {auth}"))?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform().context("listing request failed")?;
        }

        let code = easy.response_code().context("no response code")?;
        if !(200..300).contains(&code) {
            bail!("listing GET returned HTTP {}", code);
        }
        Ok(body)
    }
}

impl Listing for ListingClient {
    /// Enumerates every key in `bucket`, following continuation tokens until
    /// the listing reports itself complete.
    fn list_keys(&self, bucket: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;
        let resource = format!("/{bucket}");

        loop {
            let url = self.page_url(bucket, continuation.as_deref())?;
            let body = self.fetch_page(&url, &resource)?;
            let page = parse::parse_list_page(&body)
                .with_context(|| format!("malformed listing response for bucket {bucket}"))?;

            tracing::debug!(bucket, page_keys = page.keys.len(), "listing page fetched");
            keys.extend(page.keys);

            match page.next_continuation_token {
                Some(token) if page.is_truncated => continuation = Some(token),
                _ => break,
            }
        }

        tracing::info!(bucket, total = keys.len(), "bucket listing complete");
        Ok(keys)
    }
}
