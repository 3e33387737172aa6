//! Frame and button types (camelCase wire form)

use serde::{Deserialize, Serialize};

/// Producers may send at most this many buttons. Not enforced here.
pub const MAX_BUTTONS: usize = 4;

/// Aspect ratio assumed when the document omits one
pub const DEFAULT_ASPECT_RATIO: &str = "1.91:1";

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

/// A server-described interactive card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub image_url: String,
    /// "W:H" form, e.g. "1.91:1"
    #[serde(default = "default_aspect_ratio")]
    pub image_aspect_ratio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<FrameInput>,
    #[serde(default)]
    pub buttons: Vec<Button>,
    pub post_url: String,
    /// Opaque server token, round-tripped verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Single-line text field; `text` is its label/placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub text: String,
}

/// An action button. `index` is 1-based and stable within a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub index: u8,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ButtonKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Which protocol a button press runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    /// Direct external navigation behind the leaving-app prompt
    Link,
    /// Server call returning the next frame
    Post,
    /// Server call returning a redirect location
    PostRedirect,
    /// Deferred mint flow (stub)
    Mint,
}

impl ButtonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonKind::Link => "link",
            ButtonKind::Post => "post",
            ButtonKind::PostRedirect => "post_redirect",
            ButtonKind::Mint => "mint",
        }
    }

    /// Buttons that can open the outbound link prompt
    pub fn leaves_app(self) -> bool {
        matches!(self, ButtonKind::Link | ButtonKind::PostRedirect)
    }
}

impl Button {
    /// URL the link prompt shows before any network exchange.
    ///
    /// Only `link` buttons know their destination up front.
    pub fn initial_link_url(&self) -> Option<String> {
        match self.kind {
            ButtonKind::Link => self.target.clone(),
            _ => None,
        }
    }
}

impl Frame {
    /// True iff the frame has an input field or at least one button
    pub fn has_intents(&self) -> bool {
        self.input.is_some() || !self.buttons.is_empty()
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    pub fn button(&self, index: u8) -> Option<&Button> {
        self.buttons.iter().find(|b| b.index == index)
    }

    /// Target for `post`/`post_redirect`: the button override, else the frame's `postUrl`
    pub fn resolve_post_url(&self, button: &Button) -> String {
        button
            .target
            .clone()
            .unwrap_or_else(|| self.post_url.clone())
    }
}
