use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::object_store::{ListRequest, ObjectPage, ObjectStore, ObjectStoreError, ObjectSummary};

const GCS_API_BASE: &str = "https://storage.googleapis.com";
const SERVICE: &str = "GCS";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListObjectsResponse {
    #[serde(default)]
    items: Vec<GcsObject>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GcsObject {
    name: String,
    /// The JSON API encodes uint64 as a string.
    #[serde(default)]
    size: Option<String>,
}

/// Google Cloud Storage JSON API client.
#[derive(Clone)]
pub struct GcsClient {
    client: reqwest::Client,
    base_url: String,
}

impl GcsClient {
    pub fn new(token: Option<String>) -> Result<Self, ObjectStoreError> {
        Self::with_base_url(token, GCS_API_BASE.to_string())
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(token: Option<String>, base_url: String) -> Result<Self, ObjectStoreError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ObjectStoreError::Service {
                    service: SERVICE,
                    status: 0,
                    message: "Invalid token format".to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        bucket: &str,
        key: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, ObjectStoreError> {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ObjectStoreError::Cancelled),
            response = request.send() => response?,
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(match key {
                Some(key) => ObjectStoreError::NoSuchKey {
                    key: key.to_string(),
                },
                None => ObjectStoreError::NoSuchBucket {
                    bucket: bucket.to_string(),
                },
            });
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Err(ObjectStoreError::Service {
            service: SERVICE,
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ObjectStore for GcsClient {
    async fn list_page(
        &self,
        request: ListRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<ObjectPage, ObjectStoreError> {
        let mut url = format!(
            "{}/storage/v1/b/{}/o?prefix={}",
            self.base_url,
            urlencoding::encode(request.bucket),
            urlencoding::encode(request.prefix)
        );
        if let Some(token) = request.continuation {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }

        let response = self
            .send(self.client.get(&url), request.bucket, None, cancel)
            .await?;
        let body: ListObjectsResponse =
            response.json().await.map_err(|e| ObjectStoreError::Service {
                service: SERVICE,
                status: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        tracing::debug!(
            bucket = request.bucket,
            prefix = request.prefix,
            count = body.items.len(),
            "fetched object page"
        );

        Ok(ObjectPage {
            objects: body
                .items
                .into_iter()
                .map(|o| {
                    let size = o.size.and_then(|s| s.parse().ok()).unwrap_or(0);
                    ObjectSummary::new(o.name, size)
                })
                .collect(),
            next: body.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ObjectStoreError> {
        let url = format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.base_url,
            urlencoding::encode(bucket),
            urlencoding::encode(key)
        );
        let response = self
            .send(self.client.get(&url), bucket, Some(key), cancel)
            .await?;
        Ok(response.bytes().await?.to_vec())
    }
}
