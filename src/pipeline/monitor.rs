// src/pipeline/monitor.rs

//! Monitoring service.
//!
//! Owns the subscription registry and the monitor state, answers interactive
//! lookups, and runs the background poll loop that notifies subscribers when a
//! new list is published.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::{AppError, Result};
use crate::models::{Config, MessagesConfig, PositionReport, PublicationKey, RecipientId};
use crate::pipeline::detect::{ChangeDetector, Detection};
use crate::pipeline::dispatch::{DispatchSummary, Dispatcher};
use crate::pipeline::lookup::PositionLookup;
use crate::services::{HttpFetcher, MarkerExtractor, Notifier, SubscriptionRegistry};

/// Result of a subscribe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// New subscription
    Subscribed,
    /// The recipient already watched this code
    AlreadySubscribed,
    /// The recipient switched from another code
    Replaced { previous: String },
}

/// Result of one poll cycle.
#[derive(Debug)]
pub enum TickOutcome {
    /// First successful check; baseline recorded silently
    Baseline(PublicationKey),
    /// Publication key unchanged
    Unchanged,
    /// A new list was published and subscribers were notified
    Changed {
        previous: PublicationKey,
        current: PublicationKey,
        /// Publication time of the new list, when the key parses as one
        published: Option<NaiveDateTime>,
        summary: DispatchSummary,
    },
    /// Fetch or parse failed; state left untouched
    Failed(AppError),
}

/// Point-in-time view of the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorStatus {
    pub active: bool,
    pub last_key: Option<PublicationKey>,
    pub last_checked: Option<DateTime<Utc>>,
    pub subscribers: usize,
}

#[derive(Debug, Default)]
struct MonitorState {
    detector: ChangeDetector,
    active: bool,
    /// Bumped on every start so a stopped loop never resumes
    generation: u64,
    last_checked: Option<DateTime<Utc>>,
}

struct Inner {
    lookup: PositionLookup,
    dispatcher: Dispatcher,
    registry: SubscriptionRegistry,
    state: RwLock<MonitorState>,
    messages: MessagesConfig,
    interval: Duration,
}

/// Handle to the monitoring service; clones share the same state.
#[derive(Clone)]
pub struct MonitorService {
    inner: Arc<Inner>,
}

impl MonitorService {
    /// Create a service around an existing lookup pipeline and notifier.
    pub fn new(config: &Config, lookup: PositionLookup, notifier: Arc<dyn Notifier>) -> Self {
        let dispatcher = Dispatcher::new(
            notifier,
            config.messages.clone(),
            config.monitor.max_concurrent_deliveries,
        );

        Self {
            inner: Arc::new(Inner {
                lookup,
                dispatcher,
                registry: SubscriptionRegistry::new(),
                state: RwLock::new(MonitorState::default()),
                messages: config.messages.clone(),
                interval: Duration::from_secs(config.monitor.interval_secs.max(1)),
            }),
        }
    }

    /// Create a service that fetches the configured URL over HTTP.
    pub fn from_config(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(config)?;
        let extractor = MarkerExtractor::new(&config.source)?;
        let lookup = PositionLookup::new(Arc::new(fetcher), Arc::new(extractor));
        Ok(Self::new(config, lookup, notifier))
    }

    // --- Interactive requests ---

    /// Look up an applicant's rank and the cutoff score.
    pub async fn parse_position(&self, code: &str) -> Result<PositionReport> {
        self.inner.lookup.parse_position(code).await
    }

    /// Look up an applicant and render the reply text, including errors.
    pub async fn lookup_reply(&self, code: &str) -> String {
        let result = self.parse_position(code).await;
        match &result {
            Err(e) if e.is_page_error() => log::warn!("Lookup for {} failed: {}", code, e),
            Err(e) => log::debug!("Lookup for {} rejected: {}", code, e),
            Ok(_) => {}
        }
        self.inner.messages.lookup_reply(code, &result)
    }

    /// Watch `code` for `recipient` and make sure monitoring is running.
    pub fn subscribe(&self, recipient: RecipientId, code: &str) -> SubscribeOutcome {
        let code = code.trim();
        let outcome = match self.inner.registry.subscribe(recipient, code) {
            None => SubscribeOutcome::Subscribed,
            Some(previous) if previous == code => SubscribeOutcome::AlreadySubscribed,
            Some(previous) => SubscribeOutcome::Replaced { previous },
        };
        log::info!("Recipient {} watches {} ({:?})", recipient, code, outcome);

        self.start_monitoring();
        outcome
    }

    /// Subscribe and render the acknowledgement text.
    pub fn subscribe_reply(&self, recipient: RecipientId, code: &str) -> String {
        let already = self.subscribe(recipient, code) == SubscribeOutcome::AlreadySubscribed;
        self.inner
            .messages
            .subscribe_reply(code.trim(), already, self.inner.interval.as_secs())
    }

    /// Stop notifying `recipient`. Returns whether it was subscribed.
    pub fn unsubscribe(&self, recipient: RecipientId) -> bool {
        let removed = self.inner.registry.unsubscribe(recipient).is_some();
        if removed {
            log::info!("Recipient {} unsubscribed", recipient);
        }
        removed
    }

    /// Unsubscribe and render the acknowledgement text.
    pub fn unsubscribe_reply(&self, recipient: RecipientId) -> String {
        let removed = self.unsubscribe(recipient);
        self.inner.messages.unsubscribe_reply(removed)
    }

    pub fn is_subscribed(&self, recipient: RecipientId) -> bool {
        self.inner.registry.is_subscribed(recipient)
    }

    pub fn status(&self) -> MonitorStatus {
        let state = self.read_state();
        MonitorStatus {
            active: state.active,
            last_key: state.detector.baseline().cloned(),
            last_checked: state.last_checked,
            subscribers: self.inner.registry.len(),
        }
    }

    // --- Background polling ---

    /// Start the poll loop. Returns `false` if it was already running or no
    /// Tokio runtime is available.
    pub fn start_monitoring(&self) -> bool {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("Cannot start monitoring outside a Tokio runtime");
            return false;
        };

        let generation = {
            let mut state = self.write_state();
            if state.active {
                return false;
            }
            state.active = true;
            state.generation += 1;
            state.generation
        };

        log::info!(
            "Monitoring started, checking every {}s",
            self.inner.interval.as_secs()
        );
        let service = self.clone();
        runtime.spawn(async move { service.run_loop(generation).await });
        true
    }

    /// Ask the poll loop to exit at its next tick. In-flight work finishes.
    pub fn stop_monitoring(&self) {
        self.write_state().active = false;
        log::info!("Monitoring stop requested");
    }

    pub fn is_monitoring(&self) -> bool {
        self.read_state().active
    }

    async fn run_loop(self, generation: u64) {
        let period = self.inner.interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !self.is_current(generation) {
                log::info!("Monitoring loop exited");
                break;
            }
            self.check_for_updates().await;
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        let state = self.read_state();
        state.active && state.generation == generation
    }

    /// Run one poll cycle: fetch metadata, compare publication keys, and
    /// notify subscribers on change.
    pub async fn check_for_updates(&self) -> TickOutcome {
        let key = match self
            .inner
            .lookup
            .fetch_metadata()
            .await
            .and_then(|metadata| metadata.publication_key())
        {
            Ok(key) => key,
            Err(e) => {
                log::warn!("Update check failed: {}", e);
                return TickOutcome::Failed(e);
            }
        };

        let detection = {
            let mut state = self.write_state();
            state.last_checked = Some(Utc::now());
            state.detector.observe(key)
        };

        match detection {
            Detection::Baseline(key) => {
                log::info!("Baseline publication: {}", key);
                TickOutcome::Baseline(key)
            }
            Detection::Unchanged => {
                log::debug!("List unchanged");
                TickOutcome::Unchanged
            }
            Detection::Changed { previous, current } => {
                let published = current.timestamp();
                match published {
                    Some(at) => log::info!(
                        "List updated: {} -> {} (published {})",
                        previous,
                        current,
                        at.format("%Y-%m-%d %H:%M:%S")
                    ),
                    None => log::info!("List updated: {} -> {}", previous, current),
                }
                let summary = self.notify_subscribers().await;
                TickOutcome::Changed {
                    previous,
                    current,
                    published,
                    summary,
                }
            }
        }
    }

    /// Fetch the list once and notify every current subscriber.
    pub async fn notify_subscribers(&self) -> DispatchSummary {
        let subscriptions = self.inner.registry.snapshot();
        if subscriptions.is_empty() {
            log::debug!("No subscribers to notify");
            return DispatchSummary::default();
        }

        let snapshot = self.inner.lookup.fetch_snapshot().await;
        if let Err(e) = &snapshot {
            log::warn!("Could not read updated list: {}", e);
        }
        self.inner.dispatcher.dispatch(&snapshot, subscriptions).await
    }

    fn read_state(&self) -> RwLockReadGuard<'_, MonitorState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, MonitorState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
