//! Common response envelopes.

use serde::Serialize;
use utoipa::ToSchema;

/// Simple message payload for endpoints with nothing else to return
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
