//! Collaborator seams: token naming and the opportunity queue.
//!
//! The engine never waits on either. Queue consumers provide their own
//! concurrency safety; both traits take `&self`.

use parking_lot::Mutex;
use std::collections::HashMap;

/// Resolves a token address to a display name.
pub trait NameLookup: Send + Sync {
    /// `None` when the address is unknown.
    fn name_for(&self, address: &[u8]) -> Option<String>;
}

/// Receives accepted cycles and is triggered once per tick.
pub trait OpportunityQueue: Send + Sync {
    /// Queue a trade order `[src, ..., src]` found at `timestamp`.
    fn enqueue(&self, order: &[usize], timestamp: u64);

    /// Let the consumer drain whatever was queued for `timestamp`.
    fn process(&self, timestamp: u64);
}

/// A queued trade order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedOpportunity {
    pub order: Vec<usize>,
    pub timestamp: u64,
}

/// Queue that keeps everything in memory, for replay and tests.
#[derive(Debug, Default)]
pub struct InMemoryQueue {
    pending: Mutex<Vec<QueuedOpportunity>>,
    processed: Mutex<Vec<QueuedOpportunity>>,
    process_calls: Mutex<Vec<u64>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Vec<QueuedOpportunity> {
        self.pending.lock().clone()
    }

    pub fn processed(&self) -> Vec<QueuedOpportunity> {
        self.processed.lock().clone()
    }

    /// Timestamps `process` was called with, in call order.
    pub fn process_calls(&self) -> Vec<u64> {
        self.process_calls.lock().clone()
    }
}

impl OpportunityQueue for InMemoryQueue {
    fn enqueue(&self, order: &[usize], timestamp: u64) {
        self.pending.lock().push(QueuedOpportunity {
            order: order.to_vec(),
            timestamp,
        });
    }

    fn process(&self, timestamp: u64) {
        let drained: Vec<_> = self.pending.lock().drain(..).collect();
        tracing::debug!(timestamp, drained = drained.len(), "Processing queued opportunities");
        self.processed.lock().extend(drained);
        self.process_calls.lock().push(timestamp);
    }
}

/// Fixed address-to-name table.
#[derive(Debug, Clone, Default)]
pub struct StaticNames {
    names: HashMap<Vec<u8>, String>,
}

impl StaticNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: impl Into<Vec<u8>>, name: impl Into<String>) {
        self.names.insert(address.into(), name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<A: Into<Vec<u8>>, S: Into<String>> FromIterator<(A, S)> for StaticNames {
    fn from_iter<I: IntoIterator<Item = (A, S)>>(iter: I) -> Self {
        let mut names = Self::new();
        for (address, name) in iter {
            names.insert(address, name);
        }
        names
    }
}

impl NameLookup for StaticNames {
    fn name_for(&self, address: &[u8]) -> Option<String> {
        self.names.get(address).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_on_process() {
        let queue = InMemoryQueue::new();
        queue.enqueue(&[0, 1, 2, 0], 5);
        assert_eq!(queue.pending().len(), 1);

        queue.process(5);
        queue.process(6);

        assert!(queue.pending().is_empty());
        assert_eq!(
            queue.processed(),
            vec![QueuedOpportunity { order: vec![0, 1, 2, 0], timestamp: 5 }]
        );
        assert_eq!(queue.process_calls(), vec![5, 6]);
    }

    #[test]
    fn test_static_names() {
        let names: StaticNames = [(vec![0xaa], "WETH"), (vec![0xbb], "USDC")].into_iter().collect();
        assert_eq!(names.len(), 2);
        assert_eq!(names.name_for(&[0xaa]).as_deref(), Some("WETH"));
        assert_eq!(names.name_for(&[0xcc]), None);
    }
}
