//! REST client for the person-detection backend.
//!
//! Wraps the backend HTTP API (detection upload, result image retrieval,
//! history listing and counting) using [`reqwest`].

pub mod client;
pub mod error;

pub use client::{BackendClient, FetchedImage, HistoryFetch, RelayedJson};
pub use error::BackendError;
