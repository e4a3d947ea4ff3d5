//! Broadcast fan-out of committed transitions.
//!
//! Every event is logged and pushed into a bounded tokio broadcast channel.
//! Sending never blocks: with no subscribers the event is only logged, and
//! subscribers that fall behind lose the oldest events.

use expensa_core::workflow::{Actor, ExpenseStatus, TransitionEvent, TransitionSink};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Transition sink backed by a broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<TransitionEvent>,
}

impl BroadcastNotifier {
    /// Creates a notifier buffering `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribes to events committed from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TransitionEvent> {
        self.tx.subscribe()
    }
}

impl TransitionSink for BroadcastNotifier {
    fn emit(&self, event: &TransitionEvent) {
        info!(
            expense_id = %event.expense_id,
            requester_id = %event.requester_id,
            status = %event.new_status,
            level = event.approval_level,
            "Transition notification"
        );
        if let Ok(receivers) = self.tx.send(event.clone()) {
            debug!(receivers, "Notification delivered to subscribers");
        }
    }
}

/// Returns true if `actor` should hear about `event`: the requester always
/// does, and an approver does when the expense now waits on their level.
#[must_use]
pub fn is_relevant(event: &TransitionEvent, actor: &Actor) -> bool {
    if event.requester_id == actor.user_id {
        return true;
    }
    let open = !matches!(
        event.new_status,
        ExpenseStatus::FullyApproved | ExpenseStatus::Rejected
    );
    open && actor.level() == event.approval_level + 1
}
