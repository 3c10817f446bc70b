use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::http::fetch;
use super::{Backend, BackendError};

pub const DEFAULT_TFC_ENDPOINT: &str = "https://app.terraform.io/api/v2";

#[derive(Debug, Deserialize)]
struct StateVersionBody {
    data: StateVersionData,
}

#[derive(Debug, Deserialize)]
struct StateVersionData {
    attributes: StateVersionAttributes,
}

#[derive(Debug, Deserialize)]
struct StateVersionAttributes {
    #[serde(rename = "hosted-state-download-url")]
    hosted_state_download_url: String,
}

/// Reads a workspace's current state: looks up the state version, then
/// downloads the hosted document it points at.
pub struct TfCloudReader {
    client: reqwest::Client,
    workspace_id: String,
    endpoint: String,
    token: Option<String>,
}

impl TfCloudReader {
    pub fn new(
        client: reqwest::Client,
        workspace_id: impl Into<String>,
        endpoint: &str,
        token: Option<String>,
    ) -> Self {
        Self {
            client,
            workspace_id: workspace_id.into(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn download_url(&self, cancel: &CancellationToken) -> Result<String, BackendError> {
        let url = format!(
            "{}/workspaces/{}/current-state-version",
            self.endpoint, self.workspace_id
        );

        let mut request = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/vnd.api+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let body = fetch(request, &url, cancel).await.map_err(|err| match err {
            BackendError::Status { status, .. } => {
                BackendError::TfCloud(format!("status code: {status}"))
            }
            other => other,
        })?;

        let parsed: StateVersionBody = serde_json::from_slice(&body)
            .map_err(|e| BackendError::TfCloud(format!("failed to parse response: {e}")))?;
        Ok(parsed.data.attributes.hosted_state_download_url)
    }
}

#[async_trait]
impl Backend for TfCloudReader {
    async fn read(&self, cancel: &CancellationToken) -> Result<Vec<u8>, BackendError> {
        let download_url = self.download_url(cancel).await?;
        tracing::debug!(
            workspace = %self.workspace_id,
            url = %download_url,
            "found state download URL"
        );
        fetch(self.client.get(&download_url), &download_url, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let reader = TfCloudReader::new(
            reqwest::Client::new(),
            "ws-123",
            "https://tfe.example.com/api/v2/",
            None,
        );
        assert_eq!(reader.endpoint, "https://tfe.example.com/api/v2");
    }

    #[test]
    fn test_parse_state_version_body() {
        let body: StateVersionBody = serde_json::from_value(serde_json::json!({
            "data": {
                "id": "sv-1",
                "attributes": {
                    "hosted-state-download-url": "https://archivist.example.com/v1/object/abc",
                    "serial": 3
                }
            }
        }))
        .unwrap();
        assert_eq!(
            body.data.attributes.hosted_state_download_url,
            "https://archivist.example.com/v1/object/abc"
        );
    }
}
