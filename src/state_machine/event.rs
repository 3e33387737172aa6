//! Events that can occur on a frame card

use super::state::ActionFailure;
use crate::client::{FrameActionBody, FrameActionResponse, RedirectResponse};
use serde::{Deserialize, Serialize};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User gestures
    ButtonPressed {
        index: u8,
    },
    InputChanged {
        text: String,
    },
    NavigateBack,
    NavigateForward,
    PromptContinue {
        index: u8,
    },
    PromptDismiss {
        index: u8,
        reason: DismissReason,
    },
    DismissError,

    // Request outcomes
    ActionResolved {
        button_index: u8,
        /// Generation the request was dispatched from
        generation: u64,
        /// Body as it was sent
        body: FrameActionBody,
        response: FrameActionResponse,
    },
    RedirectResolved {
        button_index: u8,
        generation: u64,
        response: RedirectResponse,
    },
    RequestFailed {
        button_index: u8,
        generation: u64,
        request: RequestKind,
        failure: ActionFailure,
    },
}

/// How an open link prompt was closed without continuing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissReason {
    Cancel,
    OutsideClick,
    Escape,
}

/// Which collaborator a failed request went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Action,
    Redirect,
}
