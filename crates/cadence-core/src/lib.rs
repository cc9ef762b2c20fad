//! # Cadence Core
//!
//! Shared building blocks for the Cadence workspace:
//! - `config` — TOML configuration (`~/.cadence/config.toml`)
//! - `error` — error taxonomy shared by every crate
//! - `traits` — the remote action client seam
//! - `types` — plain data passed across that seam

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::CadenceConfig;
pub use error::{CadenceError, RemoteError, Result};
pub use traits::RemoteActionClient;
pub use types::{ActionOutcome, SubTarget};
