//! Generation of node and link ids for elements the user did not name

use chrono::Utc;

use crate::model::{LinkId, Network, NodeId};

/// Monotonic id source, seeded from wall-clock seconds.
///
/// The seed keeps generated ids recognizably time-like (`node_1756...`), the
/// counter guarantees that two generations within the same second never
/// collide. Ids already present in the network are skipped, so loading a file
/// that happens to contain counter-shaped ids is safe.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        // Unix epoch seconds; negative only for pre-1970 clocks.
        let seed = Utc::now().timestamp().max(0) as u64;
        Self { next: seed }
    }

    /// Fixed-seed sequence, for deterministic ids.
    pub fn starting_at(seed: u64) -> Self {
        Self { next: seed }
    }

    pub fn next_node_id(&mut self, network: &Network) -> NodeId {
        loop {
            let id = NodeId::new(format!("node_{}", self.bump()));
            if network.node(&id).is_none() {
                return id;
            }
        }
    }

    pub fn next_link_id(&mut self, network: &Network) -> LinkId {
        loop {
            let id = LinkId::new(format!("link_{}", self.bump()));
            if network.link(&id).is_none() {
                return id;
            }
        }
    }

    fn bump(&mut self) -> u64 {
        let n = self.next;
        self.next += 1;
        n
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
