use std::time::Duration;

use explorer_core::{make_data_url, Manifest, ManifestId, ManifestQuery, QueryResponse, TagSet};
use explorer_logging::explorer_debug;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{FailureKind, RequestError};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_body_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:6026/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

/// The backend calls the explorer depends on.
#[async_trait::async_trait]
pub trait ManifestApi: Send + Sync {
    /// `POST /query`. `None` sends the default query (`{"limit": 10}`).
    async fn query_manifests(
        &self,
        query: Option<ManifestQuery>,
    ) -> Result<QueryResponse, RequestError>;

    /// `GET /suggest/{id}`.
    async fn suggest_tags(&self, id: ManifestId) -> Result<TagSet, RequestError>;

    /// `GET /m/{id}`.
    async fn get_manifest(&self, id: ManifestId) -> Result<Manifest, RequestError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
    max_body_bytes: u64,
}

impl ApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, RequestError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base_url,
            client,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute download link for a manifest's data.
    pub fn data_url(&self, id: ManifestId) -> Result<Url, RequestError> {
        self.endpoint(make_data_url(id).trim_start_matches('/'))
    }

    fn endpoint(&self, path: &str) -> Result<Url, RequestError> {
        self.base_url
            .join(path)
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, RequestError> {
        let status = response.status();
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_body_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_body_bytes,
                    },
                    format!("content length {content_len}"),
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > self.max_body_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_body_bytes,
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            return Err(RequestError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )
            .with_body(body));
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| RequestError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ManifestApi for ApiClient {
    async fn query_manifests(
        &self,
        query: Option<ManifestQuery>,
    ) -> Result<QueryResponse, RequestError> {
        let query = query.unwrap_or_default();
        let url = self.endpoint("query")?;
        explorer_debug!("POST {} limit={}", url, query.limit);
        let response = self
            .client
            .post(url)
            .json(&query)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }

    async fn suggest_tags(&self, id: ManifestId) -> Result<TagSet, RequestError> {
        let url = self.endpoint(&format!("suggest/{id}"))?;
        explorer_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }

    async fn get_manifest(&self, id: ManifestId) -> Result<Manifest, RequestError> {
        let url = self.endpoint(&format!("m/{id}"))?;
        explorer_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }
}

// Relative joins only keep the base path when it ends in a slash.
fn parse_base_url(raw: &str) -> Result<Url, RequestError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(RequestError::new(
            FailureKind::InvalidUrl,
            format!("{raw} cannot be a base url"),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return RequestError::new(FailureKind::Decode, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(ClientSettings {
            base_url: base.to_string(),
            ..ClientSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let api = client("http://localhost:6026/hoard");
        assert_eq!(api.base_url().as_str(), "http://localhost:6026/hoard/");
        assert_eq!(
            api.endpoint("query").unwrap().as_str(),
            "http://localhost:6026/hoard/query"
        );
    }

    #[test]
    fn data_url_joins_relative_download_path() {
        let api = client("http://localhost:6026");
        assert_eq!(
            api.data_url(ManifestId(7)).unwrap().as_str(),
            "http://localhost:6026/d/7"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiClient::new(ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
