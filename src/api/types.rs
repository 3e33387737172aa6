//! API request and response types

use crate::frame::Frame;
use crate::state_machine::{CardView, DismissReason};
use serde::{Deserialize, Serialize};

/// Request to mount a frame as a new card
#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub frame: Frame,
    /// URL the frame was loaded from
    pub url: String,
}

/// Response for a newly mounted card
#[derive(Debug, Serialize)]
pub struct CreateCardResponse {
    pub card_id: String,
    pub view: CardView,
}

/// Request to replace the input field text
#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub text: String,
}

/// Request to close a link prompt without continuing
#[derive(Debug, Deserialize)]
pub struct DismissRequest {
    pub reason: DismissReason,
}

/// Response for queued gestures
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
