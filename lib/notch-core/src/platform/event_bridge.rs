use crate::platform::NotchEvent;
use tokio::sync::mpsc;

/// Receiving end of the controller's outbound events.
pub struct EventBridge {
    sender: mpsc::UnboundedSender<NotchEvent>,
    receiver: mpsc::UnboundedReceiver<NotchEvent>,
}

impl EventBridge {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn dispatcher(&self) -> EventDispatcher {
        EventDispatcher::new(self.sender.clone())
    }

    pub async fn next_event(&mut self) -> Option<NotchEvent> {
        self.receiver.recv().await
    }

    /// Blocks the current thread until an event arrives. Must not be called from
    /// within an async context.
    pub fn blocking_next_event(&mut self) -> Option<NotchEvent> {
        self.receiver.blocking_recv()
    }

    pub fn try_next_event(&mut self) -> Option<NotchEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Default for EventBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct EventDispatcher {
    sender: mpsc::UnboundedSender<NotchEvent>,
}

impl EventDispatcher {
    pub fn new(sender: mpsc::UnboundedSender<NotchEvent>) -> Self {
        Self { sender }
    }

    pub fn send(&self, event: NotchEvent) {
        // If send fails, then the host has stopped listening.
        let _ = self.sender.send(event);
    }
}
