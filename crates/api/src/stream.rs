//! Request body buffering.
//!
//! The upload proxy has to know the full payload before it can build the
//! outbound multipart envelope, so the inbound body stream is drained into a
//! single [`Bytes`] buffer first.

use axum::body::Body;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Failed to read request body: {0}")]
    Read(String),
}

/// Drain `body` into memory, failing once more than `limit` bytes arrive.
pub async fn read_to_bytes(body: Body, limit: usize) -> Result<Bytes, StreamError> {
    let collected = Limited::new(body, limit).collect().await.map_err(|err| {
        if err.downcast_ref::<LengthLimitError>().is_some() {
            StreamError::TooLarge { limit }
        } else {
            StreamError::Read(err.to_string())
        }
    })?;
    Ok(collected.to_bytes())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use futures::stream;

    use super::*;

    #[tokio::test]
    async fn chunks_are_concatenated_in_order() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"ab")),
            Ok(Bytes::from_static(b"cd")),
            Ok(Bytes::from_static(b"e")),
        ];
        let body = Body::from_stream(stream::iter(chunks));

        let bytes = read_to_bytes(body, 1024).await.unwrap();

        assert_eq!(&bytes[..], b"abcde");
    }

    #[tokio::test]
    async fn empty_body_is_empty_buffer() {
        let bytes = read_to_bytes(Body::empty(), 16).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let body = Body::from(vec![0u8; 32]);

        let err = read_to_bytes(body, 16).await.unwrap_err();

        assert_matches!(err, StreamError::TooLarge { limit: 16 });
    }

    #[tokio::test]
    async fn stream_errors_are_reported() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"ab")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer went away")),
        ];
        let body = Body::from_stream(stream::iter(chunks));

        let err = read_to_bytes(body, 1024).await.unwrap_err();

        assert_matches!(err, StreamError::Read(msg) if msg.contains("peer went away"));
    }
}
