//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use crate::client::{FrameActionBody, FrameActionResponse, FrameError, RedirectResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Frame Client
// ============================================================================

/// Mock frame client that returns queued responses
pub struct MockFrameClient {
    actions: Mutex<VecDeque<Result<FrameActionResponse, FrameError>>>,
    redirects: Mutex<VecDeque<Result<RedirectResponse, FrameError>>>,
    /// Record of all request bodies sent, in order
    pub requests: Mutex<Vec<FrameActionBody>>,
}

impl MockFrameClient {
    pub fn new() -> Self {
        Self {
            actions: Mutex::new(VecDeque::new()),
            redirects: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a `post` response
    pub fn queue_action(&self, response: FrameActionResponse) {
        self.actions.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_action_error(&self, error: FrameError) {
        self.actions.lock().unwrap().push_back(Err(error));
    }

    /// Queue a `post_redirect` response
    pub fn queue_redirect(&self, response: RedirectResponse) {
        self.redirects.lock().unwrap().push_back(Ok(response));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<FrameActionBody> {
        self.requests.lock().unwrap().clone()
    }

    fn next_action(&self) -> Result<FrameActionResponse, FrameError> {
        self.actions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FrameError::network("No mock response queued")))
    }

    fn next_redirect(&self) -> Result<RedirectResponse, FrameError> {
        self.redirects
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FrameError::network("No mock response queued")))
    }
}

impl Default for MockFrameClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FrameClient for MockFrameClient {
    async fn post_action(&self, body: &FrameActionBody) -> Result<FrameActionResponse, FrameError> {
        self.requests.lock().unwrap().push(body.clone());
        self.next_action()
    }

    async fn post_redirect(&self, body: &FrameActionBody) -> Result<RedirectResponse, FrameError> {
        self.requests.lock().unwrap().push(body.clone());
        self.next_redirect()
    }
}

// ============================================================================
// Delayed Mock Frame Client (for in-flight testing)
// ============================================================================

use std::time::Duration;
use tokio::sync::Notify;

/// Mock frame client with configurable delay
pub struct DelayedMockFrameClient {
    inner: MockFrameClient,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockFrameClient {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockFrameClient::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_action(&self, response: FrameActionResponse) {
        self.inner.queue_action(response);
    }

    pub fn recorded_requests(&self) -> Vec<FrameActionBody> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl FrameClient for DelayedMockFrameClient {
    async fn post_action(&self, body: &FrameActionBody) -> Result<FrameActionResponse, FrameError> {
        self.inner.requests.lock().unwrap().push(body.clone());
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next_action()
    }

    async fn post_redirect(&self, body: &FrameActionBody) -> Result<RedirectResponse, FrameError> {
        self.inner.requests.lock().unwrap().push(body.clone());
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next_redirect()
    }
}

// ============================================================================
// Test Runtime Builder
// ============================================================================

use crate::frame::Frame;
use crate::runtime::{CardEvent, CardRuntime};
use crate::state_machine::{CardContext, CardState, CardView, Event};
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Helper for building test runtimes with minimal boilerplate
pub struct TestRuntime<C: FrameClient + 'static> {
    pub event_tx: mpsc::Sender<Event>,
    pub broadcast_rx: broadcast::Receiver<CardEvent>,
    pub view_rx: watch::Receiver<CardView>,
    pub client: Arc<C>,
    pub cancel: CancellationToken,
    pub runtime_handle: tokio::task::JoinHandle<()>,
}

impl TestRuntime<MockFrameClient> {
    /// Create a test runtime with an instant mock
    pub fn new(frame: Frame) -> TestRuntimeBuilder<MockFrameClient> {
        TestRuntimeBuilder {
            card_id: "test-card".to_string(),
            frame,
            client: MockFrameClient::new(),
        }
    }
}

pub struct TestRuntimeBuilder<C> {
    card_id: String,
    frame: Frame,
    client: C,
}

impl<C: FrameClient + 'static> TestRuntimeBuilder<C> {
    pub fn client<D: FrameClient + 'static>(self, client: D) -> TestRuntimeBuilder<D> {
        TestRuntimeBuilder {
            card_id: self.card_id,
            frame: self.frame,
            client,
        }
    }

    pub fn build(self) -> TestRuntime<C> {
        let client = Arc::new(self.client);
        let context = CardContext::new(&self.card_id);
        let state = CardState::new(self.frame, "https://frames.example/start");

        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, broadcast_rx) = broadcast::channel(128);
        let (view_tx, view_rx) = watch::channel(state.view(&context));
        let cancel = CancellationToken::new();

        let runtime = CardRuntime::new(
            context,
            state,
            client.clone(),
            event_rx,
            event_tx.clone(),
            broadcast_tx,
            view_tx,
            cancel.clone(),
        );

        let handle = tokio::spawn(async move {
            runtime.run().await;
        });

        TestRuntime {
            event_tx,
            broadcast_rx,
            view_rx,
            client,
            cancel,
            runtime_handle: handle,
        }
    }
}

impl<C: FrameClient + 'static> TestRuntime<C> {
    pub async fn send(&self, event: Event) {
        self.event_tx
            .send(event)
            .await
            .expect("Failed to send event");
    }

    pub async fn press(&self, index: u8) {
        self.send(Event::ButtonPressed { index }).await;
    }

    /// Wait for a published view matching `pred`
    pub async fn wait_for_view(
        &mut self,
        pred: impl Fn(&CardView) -> bool,
        timeout: Duration,
    ) -> Option<CardView> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.broadcast_rx.recv()).await {
                Ok(Ok(CardEvent::View { view })) if pred(&view) => return Some(view),
                _ => continue,
            }
        }
        None
    }

    /// Wait for an `Error` event with timeout
    pub async fn wait_for_error(&mut self, timeout: Duration) -> Option<String> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.broadcast_rx.recv()).await {
                Ok(Ok(CardEvent::Error { message })) => return Some(message),
                _ => continue,
            }
        }
        None
    }

    /// Wait for an `OpenUrl` event with timeout
    pub async fn wait_for_open_url(&mut self, timeout: Duration) -> Option<String> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.broadcast_rx.recv()).await {
                Ok(Ok(CardEvent::OpenUrl { url })) => return Some(url),
                _ => continue,
            }
        }
        None
    }

    /// Latest view published through the watch channel
    pub fn view(&self) -> CardView {
        self.view_rx.borrow().clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Button, ButtonKind, FrameInput, DEFAULT_ASPECT_RATIO};
    use crate::runtime::{RuntimeError, RuntimeManager};
    use crate::state_machine::{DismissReason, FailureKind};

    const WAIT: Duration = Duration::from_secs(2);

    fn button(index: u8, kind: ButtonKind, target: Option<&str>) -> Button {
        Button {
            index,
            title: format!("Button {index}"),
            kind,
            target: target.map(str::to_string),
        }
    }

    fn frame(image: &str, buttons: Vec<Button>) -> Frame {
        Frame {
            title: None,
            image_url: format!("https://frames.example/{image}.png"),
            image_aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            input: Some(FrameInput {
                text: "Say something".to_string(),
            }),
            buttons,
            post_url: "https://frames.example/api".to_string(),
            state: Some("opaque-token".to_string()),
        }
    }

    #[tokio::test]
    async fn test_mock_frame_client() {
        let mock = MockFrameClient::new();
        mock.queue_redirect(RedirectResponse::found("https://elsewhere.example"));

        let body = FrameActionBody {
            button_index: 1,
            input_text: String::new(),
            post_url: "https://frames.example/api".to_string(),
            state: None,
        };
        let response = mock.post_redirect(&body).await.unwrap();
        assert!(response.is_found());

        // Nothing queued for either endpoint anymore
        assert!(mock.post_redirect(&body).await.is_err());
        assert!(mock.post_action(&body).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 3);
    }

    /// Integration test: a post commits the returned frame to history
    #[tokio::test]
    async fn test_post_commits_frame() {
        let next = frame("next", vec![button(1, ButtonKind::Post, None)]);
        let mut rt = TestRuntime::new(frame("start", vec![button(1, ButtonKind::Post, None)])).build();
        rt.client
            .queue_action(FrameActionResponse::new("https://frames.example/next", next.clone()));

        rt.send(Event::InputChanged {
            text: "gm".to_string(),
        })
        .await;
        rt.press(1).await;

        let view = rt
            .wait_for_view(|v| v.current_index == 0, WAIT)
            .await
            .expect("No committed view");
        assert_eq!(view.current_frame, next);
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.history[0].url, "https://frames.example/next");
        assert!(view.input_text.is_empty());
        assert!(view.can_go_back);
        assert_eq!(view.derived.source_host.as_deref(), Some("frames.example"));

        let requests = rt.client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].input_text, "gm");
        assert_eq!(requests[0].state.as_deref(), Some("opaque-token"));

        assert_eq!(rt.view(), view);
    }

    /// Integration test: a 302 opens the prompt, continue opens the location
    #[tokio::test]
    async fn test_redirect_then_continue_opens_url() {
        let mut rt =
            TestRuntime::new(frame("start", vec![button(2, ButtonKind::PostRedirect, None)])).build();
        rt.client
            .queue_redirect(RedirectResponse::found("https://elsewhere.example/claim"));

        rt.press(2).await;
        let view = rt
            .wait_for_view(|v| v.prompts.get(&2).is_some_and(|p| p.open), WAIT)
            .await
            .expect("Prompt never opened");
        assert_eq!(
            view.prompts[&2].url.as_deref(),
            Some("https://elsewhere.example/claim")
        );
        assert_eq!(view.current_index, -1);

        rt.send(Event::PromptContinue { index: 2 }).await;
        let url = rt.wait_for_open_url(WAIT).await;
        assert_eq!(url.as_deref(), Some("https://elsewhere.example/claim"));
        assert!(!rt.view().prompts[&2].open);
    }

    /// Integration test: link buttons never reach the collaborators
    #[tokio::test]
    async fn test_link_is_local() {
        let mut rt = TestRuntime::new(frame(
            "start",
            vec![button(1, ButtonKind::Link, Some("https://docs.example"))],
        ))
        .build();

        rt.press(1).await;
        rt.send(Event::PromptDismiss {
            index: 1,
            reason: DismissReason::Escape,
        })
        .await;
        rt.press(1).await;
        rt.send(Event::PromptContinue { index: 1 }).await;

        let url = rt.wait_for_open_url(WAIT).await;
        assert_eq!(url.as_deref(), Some("https://docs.example"));
        assert!(rt.client.recorded_requests().is_empty());
    }

    /// Integration test: transport failure surfaces an error and keeps the frame
    #[tokio::test]
    async fn test_post_failure_surfaces_error() {
        let start = frame("start", vec![button(1, ButtonKind::Post, None)]);
        let mut rt = TestRuntime::new(start.clone()).build();
        rt.client
            .queue_action_error(FrameError::server_error("Proxy returned 502"));

        rt.press(1).await;
        let message = rt.wait_for_error(WAIT).await;
        assert_eq!(message.as_deref(), Some("Proxy returned 502"));

        let view = rt.view();
        assert_eq!(view.current_frame, start);
        assert!(view.in_flight.is_empty());
        let error = view.last_error.expect("No error recorded");
        assert_eq!(error.kind, FailureKind::Transport);

        rt.send(Event::DismissError).await;
        let view = rt
            .wait_for_view(|v| v.last_error.is_none(), WAIT)
            .await
            .expect("Error never dismissed");
        assert!(view.history.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_response_is_malformed() {
        let mut rt = TestRuntime::new(frame("start", vec![button(1, ButtonKind::Post, None)])).build();
        rt.client
            .queue_action_error(FrameError::malformed("missing field `frame`"));

        rt.press(1).await;
        assert!(rt.wait_for_error(WAIT).await.is_some());
        let error = rt.view().last_error.expect("No error recorded");
        assert_eq!(error.kind, FailureKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_non_302_redirect_is_unexpected_status() {
        let mut rt =
            TestRuntime::new(frame("start", vec![button(1, ButtonKind::PostRedirect, None)])).build();
        rt.client.queue_redirect(RedirectResponse::status(200));

        rt.press(1).await;
        assert!(rt.wait_for_error(WAIT).await.is_some());
        let view = rt.view();
        assert!(!view.prompts[&1].open);
        assert_eq!(
            view.last_error.map(|e| e.kind),
            Some(FailureKind::UnexpectedStatus { status: 200 })
        );
    }

    /// Integration test: a second press while the first is outstanding is rejected
    #[tokio::test]
    async fn test_second_press_rejected_while_in_flight() {
        let client = DelayedMockFrameClient::new(Duration::from_millis(200));
        client.queue_action(FrameActionResponse::new(
            "https://frames.example/next",
            frame("next", vec![]),
        ));

        let start = frame("start", vec![button(1, ButtonKind::Post, None)]);
        let mut rt = TestRuntime::new(start).client(client).build();

        rt.press(1).await;
        rt.client.request_started.notified().await;
        rt.press(1).await;

        let message = rt.wait_for_error(WAIT).await;
        assert_eq!(
            message.as_deref(),
            Some("Button 1 already has a request in flight")
        );

        rt.wait_for_view(|v| v.current_index == 0, WAIT)
            .await
            .expect("First press never committed");
        assert_eq!(rt.client.recorded_requests().len(), 1);
    }

    /// Integration test: unmounting drops the in-flight result
    #[tokio::test]
    async fn test_unmount_drops_in_flight_result() {
        let client = DelayedMockFrameClient::new(Duration::from_millis(200));
        client.queue_action(FrameActionResponse::new(
            "https://frames.example/next",
            frame("next", vec![]),
        ));

        let rt = TestRuntime::new(frame("start", vec![button(1, ButtonKind::Post, None)]))
            .client(client)
            .build();

        rt.press(1).await;
        rt.client.request_started.notified().await;
        rt.cancel.cancel();

        tokio::time::timeout(WAIT, rt.runtime_handle)
            .await
            .expect("Runtime did not stop")
            .unwrap();
        assert_eq!(rt.view_rx.borrow().current_index, -1);
    }

    #[tokio::test]
    async fn test_manager_lifecycle() {
        let client = Arc::new(MockFrameClient::new());
        client.queue_action(FrameActionResponse::new(
            "https://frames.example/next",
            frame("next", vec![]),
        ));
        let manager = RuntimeManager::new(client.clone());

        let (card_id, view) = manager
            .create_card(
                frame("start", vec![button(1, ButtonKind::Post, None)]),
                "https://frames.example/start",
            )
            .await;
        assert_eq!(view.card_id, card_id);
        assert_eq!(manager.card_count().await, 1);

        let (initial, mut rx) = manager.subscribe(&card_id).await.unwrap();
        assert_eq!(initial.current_index, -1);

        manager
            .send_event(&card_id, Event::ButtonPressed { index: 1 })
            .await
            .unwrap();

        let committed = tokio::time::timeout(WAIT, async {
            loop {
                if let Ok(CardEvent::View { view }) = rx.recv().await {
                    if view.current_index == 0 {
                        return view;
                    }
                }
            }
        })
        .await
        .expect("No committed view");
        assert_eq!(committed.history.len(), 1);
        assert_eq!(manager.view(&card_id).await.unwrap(), committed);

        manager.close_card(&card_id).await.unwrap();
        assert_eq!(manager.card_count().await, 0);
        assert_eq!(
            manager.view(&card_id).await,
            Err(RuntimeError::CardNotFound(card_id.clone()))
        );
        assert_eq!(
            manager.close_card(&card_id).await,
            Err(RuntimeError::CardNotFound(card_id))
        );
    }
}
