//! Presentation events and the observer registry.
//!
//! Observers register with the controller and receive events on an
//! unbounded channel. Unregistering is explicit; dropping the receiver also
//! detaches the observer on the next emit.

use super::action::RejectReason;
use super::phases::PhaseKind;
use super::types::TokenId;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseEvent {
    /// The selected token changed (`None` when cleared).
    SelectionChanged(Option<TokenId>),
    /// A request was refused; state is unchanged.
    ValidationRejected(RejectReason),
    /// A new phase became active.
    PhaseChanged(PhaseKind),
}

/// Handle identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("subscription {}", _0)]
pub struct SubscriptionId(u64);

/// An observer registration: its id plus the event stream.
#[derive(Debug)]
pub struct Subscription {
    /// Id to pass to `unsubscribe`.
    pub id: SubscriptionId,
    /// Incoming events, in emission order.
    pub events: mpsc::UnboundedReceiver<PhaseEvent>,
}

impl Subscription {
    /// Drains every event received so far without waiting.
    pub fn drain(&mut self) -> Vec<PhaseEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Registered observers.
#[derive(Debug, Default)]
pub struct Observers {
    next_id: u64,
    senders: Vec<(SubscriptionId, mpsc::UnboundedSender<PhaseEvent>)>,
}

impl Observers {
    /// Registers a new observer.
    #[instrument(skip(self))]
    pub fn subscribe(&mut self) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.push((id, tx));
        debug!(%id, "Observer registered");
        Subscription { id, events: rx }
    }

    /// Removes an observer. Returns false if it was not registered.
    #[instrument(skip(self))]
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.senders.len();
        self.senders.retain(|(sid, _)| *sid != id);
        before != self.senders.len()
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    /// Returns true if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Sends an event to every observer, pruning closed ones.
    pub fn emit(&mut self, event: PhaseEvent) {
        self.senders.retain(|(id, tx)| {
            let open = tx.send(event.clone()).is_ok();
            if !open {
                debug!(%id, "Observer went away");
            }
            open
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_reach_every_observer_in_order() {
        let mut observers = Observers::default();
        let mut a = observers.subscribe();
        let mut b = observers.subscribe();
        observers.emit(PhaseEvent::SelectionChanged(Some(TokenId(1))));
        observers.emit(PhaseEvent::PhaseChanged(PhaseKind::InPlay));

        let expected = vec![
            PhaseEvent::SelectionChanged(Some(TokenId(1))),
            PhaseEvent::PhaseChanged(PhaseKind::InPlay),
        ];
        assert_eq!(a.drain(), expected);
        assert_eq!(b.drain(), expected);
    }

    #[test]
    fn test_unsubscribe_is_deterministic() {
        let mut observers = Observers::default();
        let mut sub = observers.subscribe();
        assert!(observers.unsubscribe(sub.id));
        assert!(!observers.unsubscribe(sub.id));
        observers.emit(PhaseEvent::SelectionChanged(None));
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let mut observers = Observers::default();
        let sub = observers.subscribe();
        drop(sub);
        observers.emit(PhaseEvent::SelectionChanged(None));
        assert!(observers.is_empty());
    }
}
