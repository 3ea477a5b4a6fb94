//! Errors on the gallery/UI message channel.

/// A gallery or UI message could not cross the wire
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// JSON encoding or decoding of a `GalleryToUi`/`UiToGallery` message
    #[error("Gallery message JSON error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Input that is not a gallery message at all, such as a blank line
    #[error("Not a gallery message: {0}")]
    InvalidFormat(String),
}
