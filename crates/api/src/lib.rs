//! Headcount gateway server library.
//!
//! Exposes the building blocks (config, state, error handling, body
//! buffering, upload repackaging, routes) so integration tests and the
//! binary entrypoint can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod stream;
pub mod upload;
