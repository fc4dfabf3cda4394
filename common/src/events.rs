use tokio::sync::broadcast;

/// Structured event fan-out, replacing the callback-member pattern
/// (`OnMatchCreated`, `OnTierChange`, ...) found in callback-heavy designs.
/// Each component owns one `EventBus<Event>` and publishes through it;
/// subscribers register with the tick driver rather than being stored on
/// the emitting object.
pub struct EventBus<T: Clone> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone> EventBus<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }

    /// Publishing never blocks; a lagging or absent subscriber simply misses
    /// events rather than stalling the owning component's tick.
    pub fn publish(&self, event: T) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone> Default for EventBus<T> {
    fn default() -> Self {
        Self::new(256)
    }
}
