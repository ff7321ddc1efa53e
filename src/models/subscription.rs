//! Subscription data structures.

use serde::{Deserialize, Serialize};

/// Opaque notification target supplied by the transport (e.g. a chat id).
pub type RecipientId = i64;

/// A recipient watching one applicant code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub recipient: RecipientId,
    pub code: String,
}
