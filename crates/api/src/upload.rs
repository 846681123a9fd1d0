//! Building the outbound upload from a buffered request body.
//!
//! Browsers send `multipart/form-data`; scripts sometimes post the raw image
//! with an `image/*` content type. Both end up as one [`UploadEnvelope`]
//! holding the image bytes, a normalized filename and the declared type.

use axum::body::Body;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use bytes::Bytes;
use headcount_backend::client::UPLOAD_FIELD;
use headcount_core::types::{
    normalize_upload_filename, DEFAULT_UPLOAD_FILENAME, FALLBACK_CONTENT_TYPE,
};

use crate::stream::{self, StreamError};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Body(#[from] StreamError),

    #[error("Malformed multipart body: {0}")]
    Rejected(#[from] MultipartRejection),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Multipart body contains no parts")]
    Empty,
}

/// One image ready to be forwarded. Built once per request and moved into
/// the outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEnvelope {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: String,
}

fn is_multipart(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
}

impl UploadEnvelope {
    /// Buffer the request body (at most `limit` bytes) and build the
    /// envelope from it and the inbound `Content-Type`.
    pub async fn from_request(request: Request, limit: usize) -> Result<Self, UploadError> {
        let (parts, body) = request.into_parts();
        let buffered = stream::read_to_bytes(body, limit).await?;
        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match content_type.as_deref() {
            Some(ct) if is_multipart(ct) => {
                let request = Request::from_parts(parts, Body::from(buffered));
                let multipart = Multipart::from_request(request, &()).await?;
                Self::from_multipart(multipart).await
            }
            declared => Ok(Self::raw(buffered, declared)),
        }
    }

    /// The whole body is the image.
    fn raw(body: Bytes, content_type: Option<&str>) -> Self {
        Self {
            bytes: body,
            filename: DEFAULT_UPLOAD_FILENAME.to_string(),
            content_type: content_type
                .map(str::trim)
                .filter(|ct| !ct.is_empty())
                .unwrap_or(FALLBACK_CONTENT_TYPE)
                .to_string(),
        }
    }

    /// Pick the image part out of a multipart body.
    ///
    /// Preference: first part carrying a filename, then the part named
    /// `file`, then the first part.
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, UploadError> {
        let mut best: Option<(u8, Self)> = None;
        while let Some(field) = multipart.next_field().await? {
            let rank = if field.file_name().is_some() {
                0
            } else if field.name() == Some(UPLOAD_FIELD) {
                1
            } else {
                2
            };
            let filename = field
                .file_name()
                .map(normalize_upload_filename)
                .unwrap_or_else(|| DEFAULT_UPLOAD_FILENAME.to_string());
            let content_type = field
                .content_type()
                .unwrap_or(FALLBACK_CONTENT_TYPE)
                .to_string();
            let bytes = field.bytes().await?;

            if best.as_ref().map_or(true, |(best_rank, _)| rank < *best_rank) {
                best = Some((
                    rank,
                    Self {
                        bytes,
                        filename,
                        content_type,
                    },
                ));
            }
            if rank == 0 {
                break;
            }
        }

        best.map(|(_, envelope)| envelope).ok_or(UploadError::Empty)
    }
}
