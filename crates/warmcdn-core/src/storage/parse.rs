//! Extract keys and pagination state from a `ListBucketResult` body.
//!
//! The listing protocol's XML is flat and fully known in advance, so the
//! fields are pulled out by element scanning rather than a full XML parse.
//! Only `<Key>` inside `<Contents>`, `<IsTruncated>` and
//! `<NextContinuationToken>` matter here.

use anyhow::{bail, Result};

/// One page of a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListPage {
    pub keys: Vec<String>,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
}

/// Parses one ListObjectsV2 response body.
pub(crate) fn parse_list_page(body: &[u8]) -> Result<ListPage> {
    let text = std::str::from_utf8(body)?;
    if !text.contains("<ListBucketResult") {
        bail!("response is not a ListBucketResult document");
    }

    let keys = collect_elements(text, "Key")
        .into_iter()
        .map(unescape_xml)
        .collect();
    let is_truncated = first_element(text, "IsTruncated")
        .map(|v| v == "true")
        .unwrap_or(false);
    let next_continuation_token = first_element(text, "NextContinuationToken").map(unescape_xml);

    Ok(ListPage {
        keys,
        is_truncated,
        next_continuation_token,
    })
}

/// All text contents of `<name>...</name>` elements, in document order.
fn collect_elements(text: &str, name: &str) -> Vec<String> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(&open) {
        rest = &rest[start + open.len()..];
        let Some(end) = rest.find(&close) else {
            break;
        };
        out.push(rest[..end].to_string());
        rest = &rest[end + close.len()..];
    }
    out
}

fn first_element(text: &str, name: &str) -> Option<String> {
    collect_elements(text, name).into_iter().next()
}

/// Undo the entity escaping the listing protocol applies to key text.
fn unescape_xml(s: String) -> String {
    if !s.contains('&') {
        return s;
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(inner: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">{inner}</ListBucketResult>"
        )
    }

    #[test]
    fn single_page_with_keys() {
        let body = page(
            "<Name>media</Name><IsTruncated>false</IsTruncated>\
             <Contents><Key>hls/a.ts</Key><Size>1</Size></Contents>\
             <Contents><Key>hls/b.m3u8</Key><Size>2</Size></Contents>",
        );
        let parsed = parse_list_page(body.as_bytes()).unwrap();
        assert_eq!(parsed.keys, vec!["hls/a.ts", "hls/b.m3u8"]);
        assert!(!parsed.is_truncated);
        assert!(parsed.next_continuation_token.is_none());
    }

    #[test]
    fn truncated_page_carries_token() {
        let body = page(
            "<IsTruncated>true</IsTruncated>\
             <NextContinuationToken>abc123==</NextContinuationToken>\
             <Contents><Key>hls/a.ts</Key></Contents>",
        );
        let parsed = parse_list_page(body.as_bytes()).unwrap();
        assert!(parsed.is_truncated);
        assert_eq!(parsed.next_continuation_token.as_deref(), Some("abc123=="));
    }

    #[test]
    fn empty_bucket_page() {
        let body = page("<Name>media</Name><IsTruncated>false</IsTruncated>");
        let parsed = parse_list_page(body.as_bytes()).unwrap();
        assert!(parsed.keys.is_empty());
    }

    #[test]
    fn escaped_key_text_is_unescaped() {
        let body = page("<Contents><Key>hls/a&amp;b.ts</Key></Contents>");
        let parsed = parse_list_page(body.as_bytes()).unwrap();
        assert_eq!(parsed.keys, vec!["hls/a&b.ts"]);
    }

    #[test]
    fn non_listing_document_is_rejected() {
        assert!(parse_list_page(b"<Error><Code>AccessDenied</Code></Error>").is_err());
        assert!(parse_list_page(b"not xml at all").is_err());
    }
}
