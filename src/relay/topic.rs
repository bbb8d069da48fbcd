use std::collections::HashSet;

use crate::client::ClientId;

/// A named gossip channel for CRDT update propagation.
///
/// A topic is created lazily on first subscribe and keeps a set of subscriber
/// identifiers. A topic with zero subscribers is not an error state and is
/// allowed to linger.
#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    pub subscribers: HashSet<ClientId>,
}

impl Topic {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashSet::new(),
        }
    }

    /// Adds a subscriber. Already-subscribed clients are left as-is.
    pub fn subscribe(&mut self, id: ClientId) {
        self.subscribers.insert(id);
    }

    /// Removes a subscriber. Unknown clients are a no-op.
    pub fn unsubscribe(&mut self, id: &ClientId) {
        self.subscribers.remove(id);
    }
}
