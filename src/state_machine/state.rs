//! Card state types

use super::history::{History, HistoryEntry};
use crate::frame::view::FrameView;
use crate::frame::{Button, Frame};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Session - current frame, input text, history
// ============================================================================

/// The frame lineage of one card. `current_frame` is only ever replaced whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    initial_frame: Frame,
    source_url: String,
    current_frame: Frame,
    input_text: String,
    history: History,
}

impl Session {
    pub fn new(frame: Frame, source_url: impl Into<String>) -> Self {
        Self {
            initial_frame: frame.clone(),
            source_url: source_url.into(),
            current_frame: frame,
            input_text: String::new(),
            history: History::new(),
        }
    }

    pub fn current_frame(&self) -> &Frame {
        &self.current_frame
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// URL of the frame being shown: the committed context URL, or where the card was loaded from
    pub fn context_url(&self) -> &str {
        self.history
            .current()
            .map_or(self.source_url.as_str(), |entry| entry.url.as_str())
    }

    /// Commit a successful `post`: record it, show its frame, clear the input field.
    pub fn commit(&mut self, entry: HistoryEntry) -> usize {
        self.current_frame = entry.frame.clone();
        self.input_text.clear();
        self.history.commit(entry)
    }

    pub fn back(&mut self) -> bool {
        if !self.history.back() {
            return false;
        }
        self.restore();
        true
    }

    pub fn forward(&mut self) -> bool {
        if !self.history.forward() {
            return false;
        }
        self.restore();
        true
    }

    fn restore(&mut self) {
        self.current_frame = self
            .history
            .current()
            .map_or_else(|| self.initial_frame.clone(), |entry| entry.frame.clone());
        self.input_text.clear();
    }
}

// ============================================================================
// Outbound link prompt - per button, never part of history
// ============================================================================

/// "Leaving app" confirmation attached to a `link` or `post_redirect` button
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPrompt {
    pub open: bool,
    /// Shown verbatim as plain text while open
    pub url: Option<String>,
}

impl LinkPrompt {
    fn for_button(button: &Button) -> Self {
        Self {
            open: false,
            url: button.initial_link_url(),
        }
    }
}

/// Prompts of the currently mounted buttons, keyed by button index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Prompts(BTreeMap<u8, LinkPrompt>);

impl Prompts {
    /// Fresh, closed prompts for every button that can leave the app
    pub fn mount(frame: &Frame) -> Self {
        Self(
            frame
                .buttons
                .iter()
                .filter(|b| b.kind.leaves_app())
                .map(|b| (b.index, LinkPrompt::for_button(b)))
                .collect(),
        )
    }

    pub fn get(&self, index: u8) -> Option<&LinkPrompt> {
        self.0.get(&index)
    }

    pub fn is_open(&self, index: u8) -> bool {
        self.get(index).is_some_and(|p| p.open)
    }

    /// Open the prompt of a mounted button. Returns false if it has none.
    pub fn open(&mut self, index: u8, url: Option<String>) -> bool {
        let Some(prompt) = self.0.get_mut(&index) else {
            return false;
        };
        prompt.open = true;
        if url.is_some() {
            prompt.url = url;
        }
        true
    }

    pub fn close(&mut self, index: u8) {
        if let Some(prompt) = self.0.get_mut(&index) {
            prompt.open = false;
        }
    }

    pub fn as_map(&self) -> &BTreeMap<u8, LinkPrompt> {
        &self.0
    }
}

// ============================================================================
// Failures surfaced to the user
// ============================================================================

/// Why a network-path action did not take effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureKind {
    /// Request rejected or never completed
    Transport,
    /// Redirect answered with something other than 302
    UnexpectedStatus { status: u16 },
    /// Response did not have the expected shape
    MalformedResponse,
}

/// Recoverable error state shown on the card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFailure {
    pub button_index: u8,
    pub kind: FailureKind,
    pub message: String,
}

impl ActionFailure {
    pub fn new(button_index: u8, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            button_index,
            kind,
            message: message.into(),
        }
    }

    pub fn transport(button_index: u8, message: impl Into<String>) -> Self {
        Self::new(button_index, FailureKind::Transport, message)
    }

    pub fn malformed(button_index: u8, message: impl Into<String>) -> Self {
        Self::new(button_index, FailureKind::MalformedResponse, message)
    }

    pub fn unexpected_status(button_index: u8, status: u16) -> Self {
        Self::new(
            button_index,
            FailureKind::UnexpectedStatus { status },
            format!("Redirect returned status {status}, expected 302"),
        )
    }
}

// ============================================================================
// Card State
// ============================================================================

/// Everything one mounted frame card owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardState {
    pub session: Session,
    pub prompts: Prompts,
    /// Buttons with a request outstanding
    pub in_flight: BTreeSet<u8>,
    /// Bumped whenever the displayed frame is replaced (its buttons unmount)
    pub generation: u64,
    pub last_error: Option<ActionFailure>,
}

impl CardState {
    pub fn new(frame: Frame, source_url: impl Into<String>) -> Self {
        let prompts = Prompts::mount(&frame);
        Self {
            session: Session::new(frame, source_url),
            prompts,
            in_flight: BTreeSet::new(),
            generation: 0,
            last_error: None,
        }
    }

    /// The displayed frame changed: drop per-button state of the old one
    pub fn remount(&mut self) {
        self.prompts = Prompts::mount(self.session.current_frame());
        self.in_flight.clear();
        self.generation += 1;
    }

    pub fn view(&self, context: &CardContext) -> CardView {
        let frame = self.session.current_frame();
        let history = self.session.history();
        CardView {
            card_id: context.card_id.clone(),
            current_frame: frame.clone(),
            derived: FrameView::derive(frame, self.session.context_url()),
            input_text: self.session.input_text().to_string(),
            history: history.entries().to_vec(),
            current_index: history.current_index(),
            can_go_back: history.can_go_back(),
            can_go_forward: history.can_go_forward(),
            prompts: self.prompts.as_map().clone(),
            in_flight: self.in_flight.iter().copied().collect(),
            generation: self.generation,
            last_error: self.last_error.clone(),
        }
    }
}

/// Context for a card (immutable configuration)
#[derive(Debug, Clone)]
pub struct CardContext {
    pub card_id: String,
}

impl CardContext {
    pub fn new(card_id: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
        }
    }
}

/// Snapshot of every field the rendering surface binds to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub card_id: String,
    pub current_frame: Frame,
    #[serde(flatten)]
    pub derived: FrameView,
    pub input_text: String,
    pub history: Vec<HistoryEntry>,
    /// -1 before any committed action
    pub current_index: i64,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub prompts: BTreeMap<u8, LinkPrompt>,
    pub in_flight: Vec<u8>,
    pub generation: u64,
    pub last_error: Option<ActionFailure>,
}
