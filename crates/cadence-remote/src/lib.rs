//! # Cadence Remote
//!
//! REST client for the remote service that tasks act against.
//!
//! Contract:
//! - `GET  {base}/subtargets` with `Authorization: Bearer <credential>`
//!   → `{"data": [{"id", "name", "access_token"?}]}`
//! - `POST {base}/targets/{target}/actions` with `Authorization: Bearer <sub-credential>`
//!   and `{"message": ...}` → HTTP 200 on success, anything else is a diagnostic.

pub mod http;

pub use http::HttpRemoteClient;
