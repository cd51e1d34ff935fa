//! relay-core — configuration and shared error type for the relay workspace.

pub mod config;
pub mod error;

pub use config::{HooksConfig, RelayConfig, SplitConfig};
pub use error::{RelayError, Result};
