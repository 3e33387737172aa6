//! Effects produced by state transitions

use crate::client::FrameActionBody;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call `postFrameAction` (spawns as background task)
    PostAction {
        button_index: u8,
        generation: u64,
        body: FrameActionBody,
    },

    /// Call `postFrameRedirect` (spawns as background task)
    PostRedirect {
        button_index: u8,
        generation: u64,
        body: FrameActionBody,
    },

    /// Open a confirmed URL in a new, unrelated browsing context
    OpenUrl { url: String },

    /// Publish the new view to the rendering surface
    NotifyView,

    /// Report a failure to the rendering surface
    NotifyError { message: String },
}

impl Effect {
    pub fn post_action(button_index: u8, generation: u64, body: FrameActionBody) -> Self {
        Effect::PostAction {
            button_index,
            generation,
            body,
        }
    }

    pub fn post_redirect(button_index: u8, generation: u64, body: FrameActionBody) -> Self {
        Effect::PostRedirect {
            button_index,
            generation,
            body,
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn is_network(&self) -> bool {
        matches!(self, Effect::PostAction { .. } | Effect::PostRedirect { .. })
    }
}
