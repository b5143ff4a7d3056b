//! Direct uploads to pre-signed storage URLs.

use bytes::Bytes;
use reqwest::header;

use crate::{ensure_success, HikeClient, Result};

impl HikeClient {
    /// PUT raw bytes to a pre-signed URL.
    ///
    /// The URL is absolute and points at object storage, not the backend,
    /// so no base URL is applied.
    pub async fn put_object(&self, upload_url: &str, body: Bytes, content_type: &str) -> Result<()> {
        let resp = self
            .http()
            .put(upload_url)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }
}

/// Query parameters that sign a URL rather than address the object.
const SIGNATURE_PARAMS: &[&str] = &["signature", "expires", "awsaccesskeyid", "key-pair-id", "policy"];
const SIGNATURE_PREFIXES: &[&str] = &["x-amz-", "x-goog-"];

fn is_signature_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SIGNATURE_PARAMS.contains(&key.as_str())
        || SIGNATURE_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// Public URL of an object uploaded through a pre-signed URL.
///
/// Signature parameters are removed from the query; every other parameter
/// is part of the object address and is kept. URLs that do not parse are
/// returned unchanged.
pub fn object_url(upload_url: &str) -> String {
    let Ok(mut url) = url::Url::parse(upload_url) else {
        return upload_url.to_string();
    };
    if url.query().is_none() {
        return upload_url.to_string();
    }

    let (signature, kept): (Vec<_>, Vec<_>) = url
        .query_pairs()
        .into_owned()
        .partition(|(key, _)| is_signature_param(key));
    if signature.is_empty() {
        return upload_url.to_string();
    }

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.to_string()
}
