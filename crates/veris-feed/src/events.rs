//! Event emission.
//!
//! Consensus publications, blocked swaps, and manipulation signals are
//! pushed to subscribers over a broadcast channel. Emission is lossy: with
//! no subscribers (or a lagging one) events are dropped, never buffered
//! unboundedly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use veris_types::events::{Event, EventType};

/// Event bus for broadcasting feed events to subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    sequence: Arc<AtomicU64>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit a typed payload under the given event type.
    pub fn emit<P: Serialize>(&self, event_type: EventType, timestamp: u64, payload: &P) {
        self.sequence.fetch_add(1, Ordering::SeqCst);
        let event = Event {
            event_type,
            timestamp,
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        };
        // Ignore send errors (no subscribers).
        let _ = self.sender.send(event);
    }

    /// Subscribe to events. Returns a receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Total events emitted since creation.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veris_types::events::ConsensusReached;

    #[test]
    fn test_emit_and_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(
            EventType::ConsensusReached,
            1_700_000_000,
            &ConsensusReached {
                pool: [1u8; 32],
                price: 2105,
                total_stake: 30,
                attestation_count: 3,
                confidence: 9094,
            },
        );

        let event = rx.try_recv().expect("receive event");
        assert_eq!(event.event_type, EventType::ConsensusReached);
        assert_eq!(event.timestamp, 1_700_000_000);
        assert_eq!(
            event.payload.get("confidence").and_then(|v| v.as_u64()),
            Some(9094)
        );
        assert_eq!(bus.sequence(), 1);
    }

    #[test]
    fn test_emit_without_subscribers_is_lossy() {
        let bus = EventBus::new(16);
        bus.emit(
            EventType::SwapBlocked,
            1_700_000_000,
            &serde_json::json!({}),
        );
        assert_eq!(bus.sequence(), 1);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        // broadcast::channel panics on zero capacity; the bus clamps.
        let bus = EventBus::new(0);
        bus.emit(
            EventType::SwapBlocked,
            1_700_000_000,
            &serde_json::json!({}),
        );
        assert_eq!(bus.sequence(), 1);
    }
}
