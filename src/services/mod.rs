//! Service layer for the rank watcher.
//!
//! This module contains the building blocks of the lookup pipeline:
//! - Page fetching (`PageFetcher`, `HttpFetcher`)
//! - List extraction (`ListExtractor`, `MarkerExtractor`)
//! - Eligibility filtering and ranking (`filter_eligible`, `EligibleSubset`)
//! - Subscriptions (`SubscriptionRegistry`)
//! - Delivery (`Notifier`, `ConsoleNotifier`)

mod extractor;
mod fetcher;
mod notifier;
mod ranking;
mod registry;

pub use extractor::{ListExtractor, MarkerExtractor};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use notifier::{ConsoleNotifier, Notifier};
pub use ranking::{EligibleSubset, filter_eligible};
pub use registry::SubscriptionRegistry;
