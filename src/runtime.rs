//! Runtime for mounted frame cards
//!
//! One task per card owns its state; gestures and request outcomes arrive as events.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::CardRuntime;
pub use traits::*;

use crate::frame::Frame;
use crate::state_machine::{CardContext, CardState, CardView, Event};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch, RwLock};
use tokio_util::sync::CancellationToken;

/// Type alias for the runtime the manager spawns
pub type ProductionRuntime = CardRuntime<Arc<dyn FrameClient>>;

/// Manager for all mounted cards
pub struct RuntimeManager {
    client: Arc<dyn FrameClient>,
    cards: RwLock<HashMap<String, CardHandle>>,
}

/// Handle to interact with a running card
#[derive(Clone)]
pub struct CardHandle {
    pub event_tx: mpsc::Sender<Event>,
    pub broadcast_tx: broadcast::Sender<CardEvent>,
    pub view_rx: watch::Receiver<CardView>,
    pub cancel: CancellationToken,
}

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum CardEvent {
    Init { view: CardView },
    View { view: CardView },
    /// User confirmed an outbound link
    OpenUrl { url: String },
    Error { message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Card not found: {0}")]
    CardNotFound(String),
    #[error("Card {0} is no longer running")]
    CardClosed(String),
}

impl RuntimeManager {
    pub fn new(client: Arc<dyn FrameClient>) -> Self {
        Self {
            client,
            cards: RwLock::new(HashMap::new()),
        }
    }

    /// Mount a frame as a new card and start its runtime
    pub async fn create_card(&self, frame: Frame, source_url: &str) -> (String, CardView) {
        let card_id = uuid::Uuid::new_v4().to_string();
        let context = CardContext::new(&card_id);
        let state = CardState::new(frame, source_url);
        let view = state.view(&context);

        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let (view_tx, view_rx) = watch::channel(view.clone());
        let cancel = CancellationToken::new();

        let runtime: ProductionRuntime = CardRuntime::new(
            context,
            state,
            self.client.clone(),
            event_rx,
            event_tx.clone(),
            broadcast_tx.clone(),
            view_tx,
            cancel.clone(),
        );

        let id = card_id.clone();
        tokio::spawn(async move {
            runtime.run().await;
            tracing::info!(card_id = %id, "Card runtime finished");
        });

        let mounted = {
            let mut cards = self.cards.write().await;
            cards.insert(
                card_id.clone(),
                CardHandle {
                    event_tx,
                    broadcast_tx,
                    view_rx,
                    cancel,
                },
            );
            cards.len()
        };

        tracing::info!(card_id = %card_id, source_url = %source_url, mounted, "Card mounted");
        (card_id, view)
    }

    async fn handle(&self, card_id: &str) -> Result<CardHandle, RuntimeError> {
        self.cards
            .read()
            .await
            .get(card_id)
            .cloned()
            .ok_or_else(|| RuntimeError::CardNotFound(card_id.to_string()))
    }

    /// Send an event to a card
    pub async fn send_event(&self, card_id: &str, event: Event) -> Result<(), RuntimeError> {
        let handle = self.handle(card_id).await?;
        handle
            .event_tx
            .send(event)
            .await
            .map_err(|_| RuntimeError::CardClosed(card_id.to_string()))
    }

    /// Subscribe to card updates, with the view current at subscription time
    pub async fn subscribe(
        &self,
        card_id: &str,
    ) -> Result<(CardView, broadcast::Receiver<CardEvent>), RuntimeError> {
        let handle = self.handle(card_id).await?;
        // Subscribe first so no update between the two reads is lost
        let rx = handle.broadcast_tx.subscribe();
        let view = handle.view_rx.borrow().clone();
        Ok((view, rx))
    }

    /// Latest published view of a card
    pub async fn view(&self, card_id: &str) -> Result<CardView, RuntimeError> {
        let handle = self.handle(card_id).await?;
        let view = handle.view_rx.borrow().clone();
        Ok(view)
    }

    /// Unmount a card: stop its runtime and drop any in-flight results
    pub async fn close_card(&self, card_id: &str) -> Result<(), RuntimeError> {
        let handle = self
            .cards
            .write()
            .await
            .remove(card_id)
            .ok_or_else(|| RuntimeError::CardNotFound(card_id.to_string()))?;
        handle.cancel.cancel();
        tracing::info!(card_id = %card_id, "Card unmounted");
        Ok(())
    }

    #[allow(dead_code)] // Used by tests
    pub async fn card_count(&self) -> usize {
        self.cards.read().await.len()
    }
}
