//! # Cadence Gateway
//!
//! Thin HTTP layer over [`cadence_scheduler::TaskRegistry`]:
//! an HTML console (submit, watch logs, stop) plus a small JSON API.

pub mod error;
pub mod pages;
pub mod routes;
pub mod server;
pub mod upload;

pub use server::{AppState, build_router, start};
