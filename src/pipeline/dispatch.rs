// src/pipeline/dispatch.rs

//! Notification fan-out.
//!
//! Renders one message per subscription from a single extracted list and
//! delivers them through a bounded pool of concurrent deliveries. A failed
//! delivery is logged and counted; it never stops the others.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::Result;
use crate::models::{ListSnapshot, MessagesConfig, RecipientId, Subscription};
use crate::pipeline::lookup::report_for;
use crate::services::Notifier;

/// Counts from one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Delivers update notifications to subscribers.
#[derive(Clone)]
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    messages: MessagesConfig,
    max_concurrent: usize,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, messages: MessagesConfig, max_concurrent: usize) -> Self {
        Self {
            notifier,
            messages,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Render the update text for one subscription.
    pub fn render(&self, snapshot: &Result<ListSnapshot>, code: &str) -> String {
        match snapshot {
            Ok(snapshot) => self.messages.update_notice(code, &report_for(snapshot, code)),
            Err(e) => self.messages.update_failure(code, e),
        }
    }

    /// Notify every subscription about the list in `snapshot`.
    ///
    /// A failed fetch is reported to each subscriber as an error message.
    pub async fn dispatch(
        &self,
        snapshot: &Result<ListSnapshot>,
        subscriptions: Vec<Subscription>,
    ) -> DispatchSummary {
        let jobs: Vec<(RecipientId, String)> = subscriptions
            .into_iter()
            .map(|sub| {
                let text = self.render(snapshot, &sub.code);
                (sub.recipient, text)
            })
            .collect();

        let mut summary = DispatchSummary {
            attempted: jobs.len(),
            ..DispatchSummary::default()
        };

        let mut deliveries = stream::iter(jobs)
            .map(|(recipient, text)| async move {
                let result = self.notifier.deliver(recipient, &text).await;
                (recipient, result)
            })
            .buffer_unordered(self.max_concurrent);

        while let Some((recipient, result)) = deliveries.next().await {
            match result {
                Ok(()) => summary.delivered += 1,
                Err(error) => {
                    summary.failed += 1;
                    log::warn!("Failed to notify recipient {}: {}", recipient, error);
                }
            }
        }

        log::info!(
            "Dispatched {} notifications ({} failed)",
            summary.delivered,
            summary.failed
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{ListMetadata, StudentRecord};
    use crate::testing::RecordingNotifier;

    fn snapshot() -> ListSnapshot {
        let record = |code: &str, score: &str| StudentRecord {
            code: code.to_string(),
            total_score: score.to_string(),
            eligible: true,
            ..StudentRecord::default()
        };
        ListSnapshot {
            metadata: ListMetadata {
                seats: 2,
                date: "01.08.2025".to_string(),
                time: "09:00:00".to_string(),
                program: "09.03.02".to_string(),
            },
            records: vec![record("111", "290"), record("222", "280"), record("333", "270")],
        }
    }

    fn subs(pairs: &[(RecipientId, &str)]) -> Vec<Subscription> {
        pairs
            .iter()
            .map(|(recipient, code)| Subscription {
                recipient: *recipient,
                code: code.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_each_subscriber_gets_own_report() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = Dispatcher::new(notifier.clone(), MessagesConfig::default(), 4);

        let summary = dispatcher
            .dispatch(&Ok(snapshot()), subs(&[(1, "111"), (2, "333")]))
            .await;

        assert_eq!(
            summary,
            DispatchSummary {
                attempted: 2,
                delivered: 2,
                failed: 0
            }
        );
        let deliveries = notifier.deliveries();
        assert!(deliveries[0].1.contains("1/2"));
        assert!(deliveries[1].1.contains("3/2"));
        assert!(deliveries[1].1.contains("280"));
    }

    #[tokio::test]
    async fn test_failed_delivery_is_isolated() {
        let notifier = Arc::new(RecordingNotifier::failing_for(vec![2]));
        let dispatcher = Dispatcher::new(notifier.clone(), MessagesConfig::default(), 1);

        let summary = dispatcher
            .dispatch(&Ok(snapshot()), subs(&[(1, "111"), (2, "222"), (3, "333")]))
            .await;

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.failed, 1);
        let recipients: Vec<RecipientId> = notifier.deliveries().iter().map(|d| d.0).collect();
        assert_eq!(recipients, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_missing_code_gets_error_text() {
        let notifier = Arc::new(RecordingNotifier::default());
        let messages = MessagesConfig {
            update_error: "ERR {code}: {error}".to_string(),
            ..MessagesConfig::default()
        };
        let dispatcher = Dispatcher::new(notifier.clone(), messages, 2);

        dispatcher
            .dispatch(&Ok(snapshot()), subs(&[(5, "999")]))
            .await;

        let deliveries = notifier.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert!(deliveries[0].1.starts_with("ERR 999: "));
    }

    #[tokio::test]
    async fn test_fetch_failure_reaches_every_subscriber() {
        let notifier = Arc::new(RecordingNotifier::default());
        let messages = MessagesConfig {
            update_error: "ERR {code}".to_string(),
            ..MessagesConfig::default()
        };
        let dispatcher = Dispatcher::new(notifier.clone(), messages, 2);

        let summary = dispatcher
            .dispatch(&Err(AppError::NoDataFound), subs(&[(1, "111"), (2, "222")]))
            .await;

        assert_eq!(summary.delivered, 2);
        assert_eq!(
            notifier.deliveries(),
            vec![(1, "ERR 111".to_string()), (2, "ERR 222".to_string())]
        );
    }

    #[tokio::test]
    async fn test_no_subscribers() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = Dispatcher::new(notifier, MessagesConfig::default(), 2);
        let summary = dispatcher.dispatch(&Ok(snapshot()), Vec::new()).await;
        assert_eq!(summary, DispatchSummary::default());
    }
}
