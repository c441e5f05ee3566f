//! Shared foundation for the Trailwise travel assistant.
//!
//! Provides the top-level error type, TOML configuration, and value types
//! used across the workspace crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{DialogueConfig, GeneralConfig, TrailwiseConfig};
pub use error::{Result, TrailwiseError};
pub use types::{Sentiment, Timestamp};
