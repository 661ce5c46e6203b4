use std::sync::{
    mpsc::{self, Receiver, Sender},
    Mutex,
};

use crate::QueryEvent;

/// Trait for consuming events.
///
/// Emitting never fails and never blocks the statement being built.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: QueryEvent);
}

/// Channel-based event sink.
///
/// Sends events through a standard mpsc channel. A dropped receiver is ignored.
pub struct ChannelSink {
    sender: Sender<QueryEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<QueryEvent>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                sender,
            },
            receiver,
        )
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: QueryEvent) {
        let _ = self.sender.send(event);
    }
}

/// No-op event sink.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: QueryEvent) {}
}

/// Collector sink that stores all events for inspection.
#[derive(Default)]
pub struct CollectorSink {
    events: Mutex<Vec<QueryEvent>>,
}

impl CollectorSink {
    pub fn events(&self) -> Vec<QueryEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events of the `NullComparison` kind, in emission order.
    pub fn null_comparisons(&self) -> Vec<QueryEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, QueryEvent::NullComparison { .. }))
            .collect()
    }
}

impl EventSink for CollectorSink {
    fn emit(&self, event: QueryEvent) {
        self.events.lock().unwrap().push(event);
    }
}
