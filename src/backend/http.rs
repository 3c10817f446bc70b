use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;

use super::{Backend, BackendError};

/// Fetches a state document with a single GET.
pub struct HttpReader {
    client: reqwest::Client,
    url: String,
    headers: HeaderMap,
}

impl HttpReader {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        headers: &IndexMap<String, String>,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            client,
            url: url.into(),
            headers: header_map(headers)?,
        })
    }
}

pub(crate) fn header_map(headers: &IndexMap<String, String>) -> Result<HeaderMap, BackendError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let invalid = || BackendError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// GETs `url`, failing on any non-2xx status, and races the request against `cancel`.
pub(crate) async fn fetch(
    request: reqwest::RequestBuilder,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, BackendError> {
    let send = async {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok::<_, BackendError>(response.bytes().await?.to_vec())
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BackendError::Cancelled),
        result = send => result,
    }
}

#[async_trait]
impl Backend for HttpReader {
    async fn read(&self, cancel: &CancellationToken) -> Result<Vec<u8>, BackendError> {
        tracing::debug!(url = %self.url, "fetching state over HTTP");
        let request = self.client.get(&self.url).headers(self.headers.clone());
        fetch(request, &self.url, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map_accepts_valid_pairs() {
        let headers = IndexMap::from([
            ("Authorization".to_string(), "Basic dXNlcjpwYXNz".to_string()),
            ("X-Team".to_string(), "platform".to_string()),
        ]);
        let map = header_map(&headers).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["x-team"], "platform");
    }

    #[test]
    fn test_header_map_rejects_bad_value() {
        let headers = IndexMap::from([("X-Token".to_string(), "line\nbreak".to_string())]);
        let err = header_map(&headers).unwrap_err();
        assert_eq!(err.to_string(), "invalid header 'X-Token'");
    }

    #[tokio::test]
    async fn test_cancelled_fetch_returns_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let reader =
            HttpReader::new(reqwest::Client::new(), "http://127.0.0.1:9/state", &IndexMap::new())
                .unwrap();

        let err = reader.read(&cancel).await.unwrap_err();
        assert!(matches!(err, BackendError::Cancelled));
    }
}
