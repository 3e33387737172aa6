//! Branching back/forward history of committed frame transitions

use crate::client::FrameActionBody;
use crate::frame::Frame;
use serde::{Deserialize, Serialize};

/// One committed `post` transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Payload that was sent
    pub body: FrameActionBody,
    /// Context URL returned by the server
    pub url: String,
    /// Frame the server returned, restored on back/forward
    pub frame: Frame,
}

/// Linear history with a cursor. `None` means "initial frame, nothing committed yet".
///
/// `entries[0..=cursor]` is always the causal path from the initial frame to the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cursor as the signed index the rendering surface binds to (-1 before any commit)
    pub fn current_index(&self) -> i64 {
        self.cursor
            .and_then(|c| i64::try_from(c).ok())
            .unwrap_or(-1)
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    /// Commit a new entry after the cursor. A back-navigated cursor drops the
    /// stale forward branch first. Returns the new cursor.
    pub fn commit(&mut self, entry: HistoryEntry) -> usize {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next < self.len() {
            self.entries.truncate(next);
        }
        self.entries.push(entry);
        self.cursor = Some(next);
        next
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.len()
    }

    /// Step back one entry. Returns false at the initial frame.
    pub fn back(&mut self) -> bool {
        match self.cursor {
            None => false,
            Some(0) => {
                self.cursor = None;
                true
            }
            Some(c) => {
                self.cursor = Some(c - 1);
                true
            }
        }
    }

    /// Step forward one entry. Returns false at the newest entry.
    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor = Some(self.cursor.map_or(0, |c| c + 1));
        true
    }
}
