//! Publication change detection.
//!
//! Compares each newly observed publication key with the last one. The first
//! observation only establishes a baseline; later observations signal a change
//! whenever the key differs.

use serde::{Deserialize, Serialize};

use crate::models::PublicationKey;

/// Outcome of feeding one publication key to the detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Detection {
    /// First observation; nothing to compare against
    Baseline(PublicationKey),
    /// Same key as the previous observation
    Unchanged,
    /// A new list superseded the previous one
    Changed {
        previous: PublicationKey,
        current: PublicationKey,
    },
}

impl Detection {
    /// Whether subscribers should be notified.
    pub fn is_change(&self) -> bool {
        matches!(self, Detection::Changed { .. })
    }
}

/// Two-state detector: uninitialized, or holding a baseline key.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    baseline: Option<PublicationKey>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last observed key, if any.
    pub fn baseline(&self) -> Option<&PublicationKey> {
        self.baseline.as_ref()
    }

    /// Record a newly observed key and report what happened.
    pub fn observe(&mut self, current: PublicationKey) -> Detection {
        match self.baseline.replace(current.clone()) {
            None => Detection::Baseline(current),
            Some(previous) if previous == current => Detection::Unchanged,
            Some(previous) => Detection::Changed { previous, current },
        }
    }
}
