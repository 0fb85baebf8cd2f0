use std::collections::{HashMap, VecDeque};

use super::types::AircraftDetails;

pub const DEFAULT_CAPACITY: usize = 256;

/// Details looked up per aircraft identifier. Identifiers turn over as
/// aircraft leave the corridor, so the oldest entry is dropped once the cache
/// is full.
#[derive(Debug)]
pub struct EnrichmentCache {
    capacity: usize,
    entries: HashMap<String, AircraftDetails>,
    order: VecDeque<String>,
}

impl Default for EnrichmentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EnrichmentCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&AircraftDetails> {
        self.entries.get(identifier)
    }

    pub fn insert(&mut self, identifier: &str, details: AircraftDetails) {
        if self.entries.insert(identifier.to_string(), details).is_some() {
            return;
        }
        self.order.push_back(identifier.to_string());
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                log::debug!("Evicting enrichment for {}", oldest);
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
