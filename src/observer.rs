//! Synchronous observer registry for knowledge base change notifications.
//!
//! The knowledge base publishes [`Event`]s whenever rules, orderings, or the
//! derived proof set change. Subscribers are invoked synchronously, in
//! registration order, and must not mutate the knowledge base from within
//! the callback — there is no re-entrancy protection, by design: the
//! contract is "don't," not "can't."

use crate::proof::RuleId;

/// A change notification published by the knowledge base.
#[derive(Debug, Clone)]
pub enum Event {
    RulesAdded(Vec<RuleId>),
    RulesDeleted(Vec<RuleId>),
    OrderingChanged,
    /// The proof set was rebuilt. `added` is true when the rebuild followed
    /// an insertion (as opposed to a deletion or preference change).
    Updated { added: bool },
}

/// Opaque handle returned by [`ObserverRegistry::subscribe`], used to
/// detach a callback later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

/// A registry of `Event` callbacks, invoked in registration order.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: usize,
    callbacks: Vec<(ObserverId, Box<dyn FnMut(&Event)>)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        ObserverRegistry {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: Box<dyn FnMut(&Event)>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) {
        self.callbacks.retain(|(cb_id, _)| *cb_id != id);
    }

    pub fn emit(&mut self, event: Event) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(&event);
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("subscriber_count", &self.callbacks.len())
            .finish()
    }
}
