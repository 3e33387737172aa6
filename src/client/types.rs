//! Request and response bodies exchanged with the frame proxy

use crate::frame::Frame;
use serde::{Deserialize, Serialize};

/// Payload sent for `post` and `post_redirect` presses.
///
/// `input_text` is captured at dispatch time; `state` is copied verbatim from the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameActionBody {
    pub button_index: u8,
    pub input_text: String,
    pub post_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Result of `postFrameAction`: the next frame plus its context URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameActionResponse {
    pub state: FrameActionState,
    pub frame: Frame,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameActionState {
    pub context: FrameContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameContext {
    pub url: String,
}

impl FrameActionResponse {
    pub fn new(url: impl Into<String>, frame: Frame) -> Self {
        Self {
            state: FrameActionState {
                context: FrameContext { url: url.into() },
            },
            frame,
        }
    }

    pub fn context_url(&self) -> &str {
        &self.state.context.url
    }
}

/// Wire envelope of `postFrameRedirect`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RedirectEnvelope {
    pub response: RedirectResponse,
}

/// HTTP-style outcome of a redirect action. Only 302 counts as success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

pub const REDIRECT_FOUND: u16 = 302;

impl RedirectResponse {
    pub fn found(location: impl Into<String>) -> Self {
        Self {
            status: REDIRECT_FOUND,
            location: Some(location.into()),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            location: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == REDIRECT_FOUND
    }
}
