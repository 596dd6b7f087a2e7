//! Shared helpers for driving the server flows without a socket

#![allow(dead_code)]

use cookos::agent::{GenerationClient, MockGenerationClient, RoleInvoker};
use cookos::config::ModelConfig;
use cookos::server::{self, AppState, EventSink, JobStatus, ServerEvent};
use cookos::session::InMemoryCookSessionStore;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

/// One connection's worth of state: sink, receiver and cancellation token
pub struct Harness {
    pub state: AppState,
    pub sink: EventSink,
    pub events: UnboundedReceiver<ServerEvent>,
    pub cancel: CancellationToken,
}

impl Harness {
    pub fn offline() -> Self {
        Self::with_invoker(RoleInvoker::offline(ModelConfig::default()))
    }

    pub fn with_client(client: Arc<dyn GenerationClient>) -> Self {
        Self::with_invoker(RoleInvoker::new(Some(client), ModelConfig::default()))
    }

    pub fn with_mock(mock: &MockGenerationClient) -> Self {
        Self::with_client(Arc::new(mock.clone()))
    }

    fn with_invoker(invoker: RoleInvoker) -> Self {
        let state = AppState::new(invoker, Arc::new(InMemoryCookSessionStore::new()));
        let (sink, events) = EventSink::channel();
        Self {
            state,
            sink,
            events,
            cancel: CancellationToken::new(),
        }
    }

    /// Dispatch a frame and wait for the flow it starts to finish
    pub async fn send(&mut self, frame: serde_json::Value) -> Vec<ServerEvent> {
        let text = frame.to_string();
        if let Some(handle) =
            server::dispatch(&self.state, &self.sink, &self.cancel, &text).await
        {
            handle.await.expect("flow task panicked");
        }
        self.drain()
    }

    /// Everything emitted so far
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}

pub fn job_start(prompt: &str, location_key: &str) -> serde_json::Value {
    json!({"event": "job:start", "data": {"prompt": prompt, "locationKey": location_key}})
}

pub fn cook_start(prompt: &str, location_key: &str) -> serde_json::Value {
    json!({"event": "cook:start", "data": {"prompt": prompt, "locationKey": location_key}})
}

pub fn cook_next(session_id: &str) -> serde_json::Value {
    json!({"event": "cook:next", "data": {"sessionId": session_id}})
}

pub fn statuses(events: &[ServerEvent]) -> Vec<JobStatus> {
    events
        .iter()
        .filter_map(|event| match event {
            ServerEvent::Status(status) => Some(*status),
            _ => None,
        })
        .collect()
}

pub fn errors(events: &[ServerEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            ServerEvent::Error(payload) => Some(payload.message.clone()),
            _ => None,
        })
        .collect()
}

/// Content of every `agent:message`, in order
pub fn message_contents(events: &[ServerEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            ServerEvent::AgentMessage(message) => Some(message.content.clone()),
            _ => None,
        })
        .collect()
}

pub fn session_id(events: &[ServerEvent]) -> Option<String> {
    events.iter().find_map(|event| match event {
        ServerEvent::CookReady(ready) => Some(ready.session_id.clone()),
        _ => None,
    })
}
