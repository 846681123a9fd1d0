//! Domain types and pure logic for the headcount gateway.
//!
//! Nothing in this crate performs I/O: the backend client and the HTTP
//! server build on top of it, and every function here can be unit tested
//! without a runtime.

pub mod error;
pub mod history;
pub mod types;
pub mod urls;
