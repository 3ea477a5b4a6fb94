//! IPC message protocol for Sfumato
//!
//! Defines the messages exchanged between the gallery engine and a UI
//! layer. Messages travel as JSON with a `type` tag and a `data` payload.

mod error;
mod input;
mod messages;

pub use error::IpcError;
pub use input::{Modifiers, MouseButton, MouseEvent};
pub use messages::*;

impl GalleryToUi {
    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl UiToGallery {
    /// Parse a message from the UI
    pub fn from_json(json: &str) -> Result<Self, IpcError> {
        let trimmed = json.trim();
        if trimmed.is_empty() {
            return Err(IpcError::InvalidFormat("empty message".to_string()));
        }
        Ok(serde_json::from_str(trimmed)?)
    }

    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}
