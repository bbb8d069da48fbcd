use std::collections::HashSet;

use crate::client::ClientId;

/// A named presence group for WebRTC session negotiation.
///
/// Same lifecycle rules as a topic: created lazily on first join, members
/// removed individually, and an empty room may linger.
#[derive(Debug, Default)]
pub struct Room {
    pub name: String,
    pub members: HashSet<ClientId>,
}

impl Room {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: HashSet::new(),
        }
    }

    /// Adds a member. Already-joined clients are left as-is.
    pub fn join(&mut self, id: ClientId) {
        self.members.insert(id);
    }

    /// Removes a member, reporting whether it was actually present.
    pub fn leave(&mut self, id: &ClientId) -> bool {
        self.members.remove(id)
    }
}
