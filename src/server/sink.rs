use super::protocol::{AgentMessage, ErrorPayload, JobStatus, ServerEvent};
use tokio::sync::mpsc;
use tracing::trace;

/// Ordered outbound event queue of one connection.
///
/// Events are delivered in the order they are emitted. Once the connection
/// is gone, emitting is a silent no-op.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end, for tests and the socket writer
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: ServerEvent) {
        if self.tx.send(event).is_err() {
            trace!("Dropping event for closed connection");
        }
    }

    pub fn status(&self, status: JobStatus) {
        self.emit(ServerEvent::Status(status));
    }

    pub fn message(&self, message: AgentMessage) {
        self.emit(ServerEvent::AgentMessage(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(ServerEvent::Error(ErrorPayload {
            message: message.into(),
        }));
    }
}
