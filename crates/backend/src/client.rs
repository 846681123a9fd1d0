use std::time::Duration;

use bytes::{Bytes, BytesMut};
use headcount_core::history::HistoryRequests;
use headcount_core::types::{HistoryCount, HistoryRecord, FALLBACK_CONTENT_TYPE};
use headcount_core::urls;
use reqwest::multipart::{Form, Part};

use crate::error::BackendError;

/// Name of the multipart field the backend reads the image from.
pub const UPLOAD_FIELD: &str = "file";

/// HTTP client for the detection backend.
///
/// Cheap to clone: the inner [`reqwest::Client`] shares its connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    detect_url: String,
    base_url: String,
}

/// A backend JSON answer relayed as-is, whatever its status.
#[derive(Debug, Clone)]
pub struct RelayedJson {
    pub status: u16,
    pub body: serde_json::Value,
}

/// A fully buffered image and its declared content type.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub content_type: String,
    pub bytes: Bytes,
}

/// One page of history plus the filtered total.
#[derive(Debug, Clone)]
pub struct HistoryFetch {
    pub records: Vec<HistoryRecord>,
    pub count: u64,
}

impl BackendClient {
    /// Create a client for the backend behind `detect_url`.
    ///
    /// * `detect_url` - Full detect endpoint, e.g.
    ///   `http://localhost:8386/api/v1/detect`. Other routes are derived
    ///   from it.
    /// * `timeout` - Applied to every outbound request.
    pub fn new(detect_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, detect_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, detect_url: impl Into<String>) -> Self {
        let detect_url = detect_url.into();
        let base_url = urls::backend_base_url(&detect_url).to_string();
        Self {
            client,
            detect_url,
            base_url,
        }
    }

    pub fn detect_url(&self) -> &str {
        &self.detect_url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Backend URL of a stored result image.
    pub fn image_url(&self, filename: &str) -> Result<String, BackendError> {
        Ok(urls::image_url(&self.base_url, filename)?)
    }

    /// Forward an image to `POST /detect` as a single-part multipart upload.
    ///
    /// The backend's status and JSON body are returned unchanged, including
    /// non-2xx answers. Only a body that is not JSON is an error.
    pub async fn detect(
        &self,
        bytes: Bytes,
        filename: String,
        content_type: &str,
    ) -> Result<RelayedJson, BackendError> {
        let length = bytes.len() as u64;
        // Bytes clones share the buffer, so rebuilding the part is free.
        let make_part = |bytes: Bytes| {
            Part::stream_with_length(reqwest::Body::from(bytes), length).file_name(filename.clone())
        };
        let part = match make_part(bytes.clone()).mime_str(content_type) {
            Ok(part) => part,
            Err(_) => {
                tracing::warn!(
                    content_type,
                    "Unparsable upload content type, sending octet-stream"
                );
                make_part(bytes).mime_str(FALLBACK_CONTENT_TYPE)?
            }
        };
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(&self.detect_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let raw = response.bytes().await?;
        let body = serde_json::from_slice(&raw)
            .map_err(|e| BackendError::Malformed(format!("detect response is not JSON: {e}")))?;

        tracing::debug!(status, "Backend detect response received");
        Ok(RelayedJson { status, body })
    }

    /// Fetch `GET /images/{filename}` into memory, refusing bodies larger
    /// than `max_bytes`. Nothing is returned unless the backend answered 2xx.
    pub async fn fetch_image(
        &self,
        filename: &str,
        max_bytes: usize,
    ) -> Result<FetchedImage, BackendError> {
        let url = self.image_url(filename)?;
        tracing::info!(%url, "Proxying image request");

        let response = Self::ensure_success(self.client.get(&url).send().await?)?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();

        let bytes = Self::read_capped(response, max_bytes).await?;
        Ok(FetchedImage {
            content_type,
            bytes,
        })
    }

    /// `GET /history?{query}`.
    pub async fn list_history(&self, query: &str) -> Result<Vec<HistoryRecord>, BackendError> {
        self.get_json(&Self::with_query(&format!("{}/history", self.base_url), query))
            .await
    }

    /// `GET /history/count?{query}`.
    pub async fn count_history(&self, query: &str) -> Result<u64, BackendError> {
        let count: HistoryCount = self
            .get_json(&Self::with_query(
                &format!("{}/history/count", self.base_url),
                query,
            ))
            .await?;
        Ok(count.count)
    }

    /// Issue the list and count requests concurrently.
    ///
    /// Fails as soon as either request fails; a partial result is never
    /// returned.
    pub async fn fetch_history(
        &self,
        requests: &HistoryRequests,
    ) -> Result<HistoryFetch, BackendError> {
        let (records, count) = tokio::try_join!(
            self.list_history(&requests.list),
            self.count_history(&requests.count),
        )?;
        Ok(HistoryFetch { records, count })
    }

    // ---- private helpers ----

    fn with_query(url: &str, query: &str) -> String {
        if query.is_empty() {
            url.to_string()
        } else {
            format!("{url}?{query}")
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, BackendError> {
        tracing::debug!(%url, "Backend GET");
        let response = Self::ensure_success(self.client.get(url).send().await?)?;
        let raw = response.bytes().await?;
        serde_json::from_slice(&raw).map_err(|e| BackendError::Malformed(e.to_string()))
    }

    /// Return the response unchanged on 2xx, otherwise an
    /// [`BackendError::Upstream`] carrying status and reason.
    fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        Ok(response)
    }

    async fn read_capped(
        mut response: reqwest::Response,
        max_bytes: usize,
    ) -> Result<Bytes, BackendError> {
        if response
            .content_length()
            .is_some_and(|len| len > max_bytes as u64)
        {
            return Err(BackendError::TooLarge { limit: max_bytes });
        }

        let mut buf = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            if buf.len() + chunk.len() > max_bytes {
                return Err(BackendError::TooLarge { limit: max_bytes });
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}
