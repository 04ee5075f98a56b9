//! Error types for the map engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Failed to load map image {url}: {message}")]
    ImageLoad { url: String, message: String },

    #[error("Map image load for {url} was superseded by a newer request")]
    Superseded { url: String },

    #[error("Map image {url} has unusable dimensions {width}x{height}")]
    InvalidDimensions { url: String, width: f64, height: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, MapError>;
