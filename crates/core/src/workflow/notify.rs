//! Notification seam for committed transitions.
//!
//! The engine never delivers notifications; the persistence layer hands
//! each committed [`TransitionEvent`] to a sink after the commit.

use std::sync::{Arc, Mutex};

use crate::workflow::types::TransitionEvent;

/// Receiver of transition facts. Implementations must not block.
pub trait TransitionSink: Send + Sync {
    /// Called once per committed transition.
    fn emit(&self, event: &TransitionEvent);
}

/// Sink that keeps events in memory, for tests and local inspection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransitionSink {
    events: Arc<Mutex<Vec<TransitionEvent>>>,
}

impl InMemoryTransitionSink {
    /// Returns a copy of the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<TransitionEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TransitionSink for InMemoryTransitionSink {
    fn emit(&self, event: &TransitionEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
