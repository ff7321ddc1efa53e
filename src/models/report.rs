//! Position report and outbound message rendering.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{ListMetadata, MessagesConfig};

/// Result of one applicant lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PositionReport {
    /// Applicant code that was looked up
    pub code: String,

    /// 1-based rank within the eligible subset
    pub rank: usize,

    /// Number of eligible applicants on the list
    pub eligible_count: usize,

    /// Minimum score within the seat count
    pub cutoff_score: u32,

    #[serde(flatten)]
    pub metadata: ListMetadata,
}

impl PositionReport {
    /// Rank against the seat count, e.g. "69/107".
    pub fn position(&self) -> String {
        format!("{}/{}", self.rank, self.metadata.seats)
    }

    /// Whether the applicant currently falls within the seat count.
    pub fn within_seats(&self) -> bool {
        self.rank <= self.metadata.seats as usize
    }

    /// Marker rendered for `{within}`.
    fn within_mark(&self) -> &'static str {
        if self.within_seats() { "✅" } else { "⚠️" }
    }

    /// Format the report using a template.
    ///
    /// Supported placeholders:
    /// - `{code}`, `{position}`, `{rank}`, `{seats}`, `{eligible}`
    /// - `{cutoff}`, `{date}`, `{time}`, `{program}`
    /// - `{within}`: ✅ inside the seat count, ⚠️ outside it
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{code}", &self.code)
            .replace("{position}", &self.position())
            .replace("{rank}", &self.rank.to_string())
            .replace("{seats}", &self.metadata.seats.to_string())
            .replace("{eligible}", &self.eligible_count.to_string())
            .replace("{cutoff}", &self.cutoff_score.to_string())
            .replace("{date}", &self.metadata.date)
            .replace("{time}", &self.metadata.time)
            .replace("{program}", &self.metadata.program)
            .replace("{within}", self.within_mark())
    }
}

impl MessagesConfig {
    /// Reply to an interactive lookup.
    pub fn lookup_reply(&self, code: &str, result: &Result<PositionReport, AppError>) -> String {
        match result {
            Ok(report) => report.format(&self.position),
            Err(e) => fill_error(&self.lookup_error, code, e),
        }
    }

    /// Notification sent to a subscriber after the list changed.
    pub fn update_notice(&self, code: &str, result: &Result<PositionReport, AppError>) -> String {
        match result {
            Ok(report) => self.update.replace("{report}", &report.format(&self.position)),
            Err(e) => self.update_failure(code, e),
        }
    }

    /// Notification sent when the updated list could not be read.
    pub fn update_failure(&self, code: &str, error: &AppError) -> String {
        fill_error(&self.update_error, code, error)
    }

    /// Acknowledgement for a subscribe request.
    pub fn subscribe_reply(&self, code: &str, already: bool, interval_secs: u64) -> String {
        let template = if already {
            &self.already_subscribed
        } else {
            &self.subscribed
        };
        template
            .replace("{code}", code)
            .replace("{interval_min}", &(interval_secs / 60).max(1).to_string())
    }

    /// Acknowledgement for an unsubscribe request.
    pub fn unsubscribe_reply(&self, was_subscribed: bool) -> String {
        if was_subscribed {
            self.unsubscribed.clone()
        } else {
            self.not_subscribed.clone()
        }
    }
}

fn fill_error(template: &str, code: &str, error: &AppError) -> String {
    template
        .replace("{code}", code)
        .replace("{error}", &error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> PositionReport {
        PositionReport {
            code: "3838475".to_string(),
            rank: 69,
            eligible_count: 240,
            cutoff_score: 251,
            metadata: ListMetadata {
                seats: 107,
                date: "31.07.2025".to_string(),
                time: "10:01:01".to_string(),
                program: "09.03.02 Информационные системы".to_string(),
            },
        }
    }

    #[test]
    fn test_position() {
        let report = sample_report();
        assert_eq!(report.position(), "69/107");
        assert!(report.within_seats());
    }

    #[test]
    fn test_format() {
        let report = sample_report();
        let result = report.format("[{code}] {position} >= {cutoff} ({date} {time})");
        assert_eq!(result, "[3838475] 69/107 >= 251 (31.07.2025 10:01:01)");
    }

    #[test]
    fn test_within_placeholder() {
        let mut report = sample_report();
        assert_eq!(report.format("{position} {within}"), "69/107 ✅");

        report.rank = 108;
        assert!(!report.within_seats());
        assert_eq!(report.format("{position} {within}"), "108/107 ⚠️");
    }

    #[test]
    fn test_update_notice_wraps_report() {
        let messages = MessagesConfig::default();
        let text = messages.update_notice("3838475", &Ok(sample_report()));
        assert!(text.contains("69/107"));
        assert!(text.contains("251"));
    }

    #[test]
    fn test_error_messages_carry_code_and_reason() {
        let messages = MessagesConfig::default();
        let err = Err(AppError::rank_not_found("3838475"));
        let text = messages.update_notice("3838475", &err);
        assert!(text.contains("3838475"));
        let text = messages.lookup_reply("3838475", &Err(AppError::NoDataFound));
        assert!(text.contains(&AppError::NoDataFound.to_string()));
    }

    #[test]
    fn test_subscribe_reply_interval() {
        let messages = MessagesConfig {
            subscribed: "{code} every {interval_min}".to_string(),
            ..MessagesConfig::default()
        };
        assert_eq!(messages.subscribe_reply("12", false, 300), "12 every 5");
        assert_eq!(messages.subscribe_reply("12", false, 10), "12 every 1");
    }
}
