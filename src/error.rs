//! Error types for the show.
//!
//! Only setup failures (bad configuration, missing canvas context) reach the
//! host. Everything that can go wrong while the animation runs is recovered
//! locally and logged.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised by configuration, asset loading and drawing surfaces
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShowError {
    /// The configuration document could not be parsed or failed validation
    #[error("invalid configuration: {0}")]
    Config(String),
    /// An image failed to load; its slot is treated as permanently empty
    #[error("asset unavailable: {url}")]
    AssetUnavailable { url: String },
    /// The drawing surface refused an operation
    #[error("drawing surface error: {0}")]
    Surface(String),
    /// Reading pixels back for sampling failed (e.g. a tainted canvas)
    #[error("could not rasterize image: {0}")]
    Raster(String),
}

pub type ShowResult<T> = Result<T, ShowError>;

impl From<ShowError> for JsValue {
    fn from(err: ShowError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<serde_yaml::Error> for ShowError {
    fn from(err: serde_yaml::Error) -> Self {
        ShowError::Config(format!("YAML parse error: {}", err))
    }
}
