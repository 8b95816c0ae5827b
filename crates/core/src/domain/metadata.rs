// Item metadata: open audit mapping, merge-only

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Recognized audit keys, grouped by the operation that writes them
pub mod keys {
    // release
    pub const LAST_RELEASE_REASON: &str = "lastReleaseReason";
    pub const LAST_RELEASED_BY: &str = "lastReleasedBy";
    pub const LAST_RELEASED_AT: &str = "lastReleasedAt";

    // redistribution
    pub const REDISTRIBUTED_FROM: &str = "redistributedFrom";
    pub const REDISTRIBUTED_AT: &str = "redistributedAt";

    // priority boost
    pub const BOOSTED_AT: &str = "boostedAt";
    pub const PREVIOUS_PRIORITY: &str = "previousPriority";
    pub const BOOST_REASON: &str = "boostReason";
}

/// String-keyed JSON mapping attached to every item.
///
/// Entries are only ever added or overwritten key-by-key through [`Metadata::merge`];
/// there is no API to replace the whole map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Merge `other` into `self`. Keys present in both take `other`'s value.
    pub fn merge(&mut self, other: &Metadata) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
