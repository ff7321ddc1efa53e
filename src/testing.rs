//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{MIN_COLUMNS, RecipientId};
use crate::services::{Notifier, PageFetcher};

/// One `tr.data-row` with the code, eligibility mark and total score filled in.
pub fn row(code: &str, eligible: bool, score: &str) -> String {
    let mut cells: Vec<String> = (0..MIN_COLUMNS).map(|_| String::new()).collect();
    cells[0] = "1".to_string();
    cells[1] = code.to_string();
    cells[2] = "1".to_string();
    cells[5] = if eligible { "✓".to_string() } else { String::new() };
    cells[7] = score.to_string();
    let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
    format!(r#"<tr class="data-row">{tds}</tr>"#)
}

/// A ranking page with metadata cells and a 16-column table holding `rows`.
pub fn page(seats: &str, date: &str, time: &str, rows: &[String]) -> String {
    let headers: String = (0..MIN_COLUMNS).map(|i| format!("<th>h{i}</th>")).collect();
    format!(
        r#"<table>
  <tr><td>Конкурсная группа - 09.03.02_Информационные_системы_и_технологии</td></tr>
  <tr><td>Всего мест: {seats}.</td></tr>
  <tr><td>Дата формирования - {date}. Время формирования - {time}.</td></tr>
</table>
<table class="list">
  <tr class="header-row">{headers}</tr>
  {rows}
</table>"#,
        rows = rows.concat()
    )
}

/// Fetcher replaying canned responses; the last one repeats forever.
pub struct StaticFetcher {
    responses: Mutex<VecDeque<Option<String>>>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    /// Always return `html`.
    pub fn new(html: impl Into<String>) -> Self {
        Self::sequence(vec![Some(html.into())])
    }

    /// Return each entry in turn; `None` simulates a network failure.
    pub fn sequence(responses: Vec<Option<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        let next = if responses.len() > 1 {
            responses.pop_front().flatten()
        } else {
            responses.front().cloned().flatten()
        };
        next.ok_or_else(|| AppError::malformed("simulated fetch failure"))
    }
}

/// Notifier that records every delivery and can be told to fail for some recipients.
#[derive(Default)]
pub struct RecordingNotifier {
    pub delivered: Mutex<Vec<(RecipientId, String)>>,
    pub failing: Vec<RecipientId>,
}

impl RecordingNotifier {
    pub fn failing_for(failing: Vec<RecipientId>) -> Self {
        Self {
            failing,
            ..Self::default()
        }
    }

    pub fn deliveries(&self) -> Vec<(RecipientId, String)> {
        let mut delivered = self.delivered.lock().unwrap().clone();
        delivered.sort();
        delivered
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, recipient: RecipientId, text: &str) -> Result<()> {
        if self.failing.contains(&recipient) {
            return Err(AppError::delivery(recipient, "recipient unreachable"));
        }
        self.delivered
            .lock()
            .unwrap()
            .push((recipient, text.to_string()));
        Ok(())
    }
}
