//! Cloudflare Images REST client
//!
//! The site stores user uploads on Cloudflare Images and serves them
//! through the `imagedelivery.net` CDN. This crate owns the three touch
//! points: multipart upload, delete-by-id, and the public URL pattern.

use std::collections::HashMap;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

/// Delivery host for public image URLs.
pub const DELIVERY_HOST: &str = "imagedelivery.net";

/// Default variant served to browsers.
pub const DEFAULT_VARIANT: &str = "public";

static IMAGE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"imagedelivery\.net/[^/]+/([^/]+)").expect("invalid image id regex")
});

/// A stored image as reported by the upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    success: bool,
    result: Option<UploadedImage>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: i64,
    message: String,
}

/// Cloudflare Images client
#[derive(Clone)]
pub struct ImagesClient {
    client: Client,
    api_token: String,
    account_hash: String,
    base_url: String,
}

impl ImagesClient {
    /// Create a new client.
    ///
    /// `account_id` addresses the API; `account_hash` is the public hash
    /// embedded in delivery URLs.
    pub fn new(
        account_id: impl Into<String>,
        api_token: impl Into<String>,
        account_hash: impl Into<String>,
    ) -> Self {
        let account_id = account_id.into();
        let base_url = format!(
            "https://api.cloudflare.com/client/v4/accounts/{}/images/v1",
            account_id
        );
        Self {
            client: Client::new(),
            api_token: api_token.into(),
            account_hash: account_hash.into(),
            base_url,
        }
    }

    /// Create client from environment variables
    /// Reads CLOUDFLARE_ACCOUNT_ID, CLOUDFLARE_API_TOKEN and
    /// CLOUDFLARE_ACCOUNT_HASH.
    pub fn from_env() -> Result<Self> {
        let account_id =
            std::env::var("CLOUDFLARE_ACCOUNT_ID").context("CLOUDFLARE_ACCOUNT_ID not set")?;
        let api_token =
            std::env::var("CLOUDFLARE_API_TOKEN").context("CLOUDFLARE_API_TOKEN not set")?;
        let account_hash =
            std::env::var("CLOUDFLARE_ACCOUNT_HASH").context("CLOUDFLARE_ACCOUNT_HASH not set")?;
        Ok(Self::new(account_id, api_token, account_hash))
    }

    /// Upload an image, returning its opaque id.
    ///
    /// The bytes are relayed unmodified; validation happens before this
    /// call. Optional metadata is attached as a JSON form field.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        metadata: Option<&HashMap<String, String>>,
    ) -> Result<UploadedImage> {
        let mut form = Form::new().part(
            "file",
            Part::bytes(bytes).file_name(filename.to_owned()),
        );

        if let Some(meta) = metadata {
            let json = serde_json::to_string(meta).context("Failed to encode image metadata")?;
            form = form.text("metadata", json);
        }

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .multipart(form)
            .send()
            .await
            .context("Failed to send image upload request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("image upload failed ({}): {}", status, truncate(&error_text));
        }

        let body: UploadResponse = response
            .json()
            .await
            .context("Failed to parse upload response")?;

        if !body.success {
            let detail = body
                .errors
                .first()
                .map(|e| format!("{} ({})", e.message, e.code))
                .unwrap_or_else(|| "unknown error".to_string());
            anyhow::bail!("image upload rejected: {}", detail);
        }

        body.result.context("upload response missing result")
    }

    /// Delete an image by id.
    pub async fn delete(&self, image_id: &str) -> Result<()> {
        let url = format!("{}/{}", self.base_url, image_id);

        let response = self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await
            .context("Failed to send image delete request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("image delete failed ({}): {}", status, truncate(&error_text));
        }

        Ok(())
    }

    /// Public delivery URL for an image id.
    pub fn public_url(&self, image_id: &str) -> String {
        self.variant_url(image_id, DEFAULT_VARIANT)
    }

    /// Delivery URL for a specific variant.
    pub fn variant_url(&self, image_id: &str, variant: &str) -> String {
        format!(
            "https://{}/{}/{}/{}",
            DELIVERY_HOST, self.account_hash, image_id, variant
        )
    }
}

/// Extract the image id from a delivery URL.
///
/// Returns `None` for URLs that aren't Cloudflare Images deliveries, so
/// callers can skip cleanup for images hosted elsewhere.
pub fn extract_image_id(url: &str) -> Option<&str> {
    IMAGE_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn truncate(text: &str) -> String {
    // Avoid dumping whole upstream bodies into logs
    if text.len() > 500 {
        format!("{}...", &text[..500])
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ImagesClient {
        ImagesClient::new("acct", "token", "HASH123")
    }

    #[test]
    fn public_url_pattern() {
        assert_eq!(
            client().public_url("abc-def"),
            "https://imagedelivery.net/HASH123/abc-def/public"
        );
    }

    #[test]
    fn variant_url_pattern() {
        assert_eq!(
            client().variant_url("abc-def", "thumbnail"),
            "https://imagedelivery.net/HASH123/abc-def/thumbnail"
        );
    }

    #[test]
    fn extracts_id_from_delivery_url() {
        let url = "https://imagedelivery.net/HASH123/abc-def/public";
        assert_eq!(extract_image_id(url), Some("abc-def"));
    }

    #[test]
    fn url_roundtrip() {
        let url = client().public_url("f1e2d3");
        assert_eq!(extract_image_id(&url), Some("f1e2d3"));
    }

    #[test]
    fn foreign_urls_yield_none() {
        assert_eq!(extract_image_id("https://example.com/a/b/c.png"), None);
        assert_eq!(
            extract_image_id("https://x.supabase.co/storage/v1/object/public/img/a.png"),
            None
        );
    }
}
