//! Card runtime executor

use super::traits::FrameClient;
use super::CardEvent;

use crate::client::{FrameActionBody, FrameError};
use crate::state_machine::{
    transition, ActionFailure, CardContext, CardState, CardView, Effect, Event, RequestKind,
    TransitionError,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Generic card runtime that can work with any frame client implementation
pub struct CardRuntime<C>
where
    C: FrameClient + 'static,
{
    context: CardContext,
    state: CardState,
    client: Arc<C>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<CardEvent>,
    /// Latest view, for readers that don't hold a subscription
    view_tx: watch::Sender<CardView>,
    /// Cancelled when the card unmounts
    cancel: CancellationToken,
}

impl<C> CardRuntime<C>
where
    C: FrameClient + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: CardContext,
        state: CardState,
        client: C,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<CardEvent>,
        view_tx: watch::Sender<CardView>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            context,
            state,
            client: Arc::new(client),
            event_rx,
            event_tx,
            broadcast_tx,
            view_tx,
            cancel,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(card_id = %self.context.card_id, "Starting card runtime");

        // Process events in a loop - no recursion
        loop {
            tokio::select! {
                biased;

                () = self.cancel.cancelled() => break,

                Some(event) = self.event_rx.recv() => {
                    if let Err(e) = self.process_event(event) {
                        tracing::warn!(card_id = %self.context.card_id, error = %e, "Event rejected");
                    }
                }

                else => break,
            }
        }

        tracing::info!(card_id = %self.context.card_id, "Card runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        if let Event::ButtonPressed { index } = &event {
            if let Some(button) = self.state.session.current_frame().button(*index) {
                tracing::debug!(
                    card_id = %self.context.card_id,
                    button_index = index,
                    kind = button.kind.as_str(),
                    "Button pressed"
                );
            }
        }

        // Pure state transition
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                // Transition errors are user-facing (e.g., "request in flight")
                let _ = self.broadcast_tx.send(CardEvent::Error {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }

        Ok(())
    }

    /// Execute an effect. Network effects run in the background and report back as events.
    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::PostAction {
                button_index,
                generation,
                body,
            } => self.spawn_action(button_index, generation, body),

            Effect::PostRedirect {
                button_index,
                generation,
                body,
            } => self.spawn_redirect(button_index, generation, body),

            Effect::OpenUrl { url } => {
                tracing::info!(card_id = %self.context.card_id, url = %url, "Opening confirmed URL");
                let _ = self.broadcast_tx.send(CardEvent::OpenUrl { url });
            }

            Effect::NotifyView => {
                let view = self.state.view(&self.context);
                self.view_tx.send_replace(view.clone());
                let _ = self.broadcast_tx.send(CardEvent::View { view });
            }

            Effect::NotifyError { message } => {
                let _ = self.broadcast_tx.send(CardEvent::Error { message });
            }
        }
    }

    fn spawn_action(&self, button_index: u8, generation: u64, body: FrameActionBody) {
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        let cancel = self.cancel.clone();
        let card_id = self.context.card_id.clone();

        tokio::spawn(async move {
            tracing::info!(card_id = %card_id, button_index, "Posting frame action (background)");

            // Race request against unmount
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    tracing::debug!(card_id = %card_id, button_index, "Card unmounted, dropping frame action");
                }

                result = client.post_action(&body) => {
                    let event = match result {
                        Ok(response) => Event::ActionResolved {
                            button_index,
                            generation,
                            body,
                            response,
                        },
                        Err(e) => Event::RequestFailed {
                            button_index,
                            generation,
                            request: RequestKind::Action,
                            failure: request_failure(button_index, &e),
                        },
                    };
                    let _ = event_tx.send(event).await;
                }
            }
        });
    }

    fn spawn_redirect(&self, button_index: u8, generation: u64, body: FrameActionBody) {
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();
        let cancel = self.cancel.clone();
        let card_id = self.context.card_id.clone();

        tokio::spawn(async move {
            tracing::info!(card_id = %card_id, button_index, "Posting frame redirect (background)");

            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    tracing::debug!(card_id = %card_id, button_index, "Card unmounted, dropping frame redirect");
                }

                result = client.post_redirect(&body) => {
                    let event = match result {
                        Ok(response) => Event::RedirectResolved {
                            button_index,
                            generation,
                            response,
                        },
                        Err(e) => Event::RequestFailed {
                            button_index,
                            generation,
                            request: RequestKind::Redirect,
                            failure: request_failure(button_index, &e),
                        },
                    };
                    let _ = event_tx.send(event).await;
                }
            }
        });
    }
}

/// Undecodable bodies are reported apart from transport failures
fn request_failure(button_index: u8, error: &FrameError) -> ActionFailure {
    if error.kind.is_malformed() {
        ActionFailure::malformed(button_index, &error.message)
    } else {
        ActionFailure::transport(button_index, &error.message)
    }
}
