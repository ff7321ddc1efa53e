//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Ranking page location and extraction rules
    #[serde(default)]
    pub source: SourceConfig,

    /// Polling and delivery behavior
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Outbound message templates
    #[serde(default)]
    pub messages: MessagesConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }

        let url = Url::parse(&self.source.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "source.url must be http(s), got {}",
                url.scheme()
            )));
        }
        if self.source.default_seats == 0 || self.source.default_seats >= MAX_SEATS {
            return Err(AppError::validation(format!(
                "source.default_seats must be within 1..{}",
                MAX_SEATS
            )));
        }
        if self.source.eligibility_glyph.is_empty() {
            return Err(AppError::validation("source.eligibility_glyph is empty"));
        }
        self.source.markers.validate()?;

        if self.monitor.interval_secs == 0 {
            return Err(AppError::validation("monitor.interval_secs must be > 0"));
        }
        if self.monitor.max_concurrent_deliveries == 0 {
            return Err(AppError::validation(
                "monitor.max_concurrent_deliveries must be > 0",
            ));
        }
        Ok(())
    }
}

/// Upper bound (exclusive) for a plausible seat count.
pub const MAX_SEATS: u32 = 1000;

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Ranking page location and extraction rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the published ranking list
    #[serde(default = "defaults::source_url")]
    pub url: String,

    /// Seat count used when the page does not state a plausible one
    #[serde(default = "defaults::default_seats")]
    pub default_seats: u32,

    /// Glyph marking a row as holding top passing priority
    #[serde(default = "defaults::eligibility_glyph")]
    pub eligibility_glyph: String,

    /// Text markers preceding the metadata values
    #[serde(default)]
    pub markers: MarkerConfig,

    /// CSS selectors locating the ranking table
    #[serde(default)]
    pub table: TableConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: defaults::source_url(),
            default_seats: defaults::default_seats(),
            eligibility_glyph: defaults::eligibility_glyph(),
            markers: MarkerConfig::default(),
            table: TableConfig::default(),
        }
    }
}

/// Text markers that precede each metadata value in the page cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Precedes the seat count ("Всего мест: 107.")
    #[serde(default = "defaults::seats_marker")]
    pub seats: String,

    /// Precedes the publication date
    #[serde(default = "defaults::date_marker")]
    pub date: String,

    /// Terminates the publication date
    #[serde(default = "defaults::date_end_marker")]
    pub date_end: String,

    /// Precedes the publication time
    #[serde(default = "defaults::time_marker")]
    pub time: String,

    /// Precedes the competition group label
    #[serde(default = "defaults::program_marker")]
    pub program: String,
}

impl MarkerConfig {
    fn validate(&self) -> Result<()> {
        let markers = [
            ("seats", &self.seats),
            ("date", &self.date),
            ("date_end", &self.date_end),
            ("time", &self.time),
            ("program", &self.program),
        ];
        for (name, value) in markers {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "source.markers.{name} is empty"
                )));
            }
        }
        Ok(())
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            seats: defaults::seats_marker(),
            date: defaults::date_marker(),
            date_end: defaults::date_end_marker(),
            time: defaults::time_marker(),
            program: defaults::program_marker(),
        }
    }
}

/// CSS selectors locating the ranking table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Header cells, relative to a `table`
    #[serde(default = "defaults::header_cell_selector")]
    pub header_cell_selector: String,

    /// Data rows, relative to a `table`
    #[serde(default = "defaults::data_row_selector")]
    pub data_row_selector: String,

    /// Cells, relative to a data row
    #[serde(default = "defaults::cell_selector")]
    pub cell_selector: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            header_cell_selector: defaults::header_cell_selector(),
            data_row_selector: defaults::data_row_selector(),
            cell_selector: defaults::cell_selector(),
        }
    }
}

/// Polling and delivery behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between poll cycles
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Upper bound on simultaneous deliveries per change
    #[serde(default = "defaults::max_concurrent_deliveries")]
    pub max_concurrent_deliveries: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            max_concurrent_deliveries: defaults::max_concurrent_deliveries(),
        }
    }
}

/// Outbound message templates.
///
/// Report templates accept the placeholders of
/// [`PositionReport::format`](crate::models::PositionReport::format);
/// error templates accept `{code}` and `{error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "defaults::msg_position")]
    pub position: String,
    /// Wraps a rendered report as `{report}`
    #[serde(default = "defaults::msg_update")]
    pub update: String,
    #[serde(default = "defaults::msg_lookup_error")]
    pub lookup_error: String,
    #[serde(default = "defaults::msg_update_error")]
    pub update_error: String,
    #[serde(default = "defaults::msg_subscribed")]
    pub subscribed: String,
    #[serde(default = "defaults::msg_already_subscribed")]
    pub already_subscribed: String,
    #[serde(default = "defaults::msg_unsubscribed")]
    pub unsubscribed: String,
    #[serde(default = "defaults::msg_not_subscribed")]
    pub not_subscribed: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            position: defaults::msg_position(),
            update: defaults::msg_update(),
            lookup_error: defaults::msg_lookup_error(),
            update_error: defaults::msg_update_error(),
            subscribed: defaults::msg_subscribed(),
            already_subscribed: defaults::msg_already_subscribed(),
            unsubscribed: defaults::msg_unsubscribed(),
            not_subscribed: defaults::msg_not_subscribed(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; rankwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Source defaults
    pub fn source_url() -> String {
        "https://mgsu.ru/2025/ks/bs/list.php?p=000000012_09.03.02_Informatsionnye_sistemy_i_tekhnologii_Ochnaya_Byudzhet_Obshchiy%20konkurs.html".into()
    }
    pub fn default_seats() -> u32 {
        107
    }
    pub fn eligibility_glyph() -> String {
        "✓".into()
    }
    pub fn seats_marker() -> String {
        "Всего мест:".into()
    }
    pub fn date_marker() -> String {
        "Дата формирования - ".into()
    }
    pub fn date_end_marker() -> String {
        ". Время формирования".into()
    }
    pub fn time_marker() -> String {
        "Время формирования - ".into()
    }
    pub fn program_marker() -> String {
        "Конкурсная группа - ".into()
    }
    pub fn header_cell_selector() -> String {
        "tr.header-row th".into()
    }
    pub fn data_row_selector() -> String {
        "tr.data-row".into()
    }
    pub fn cell_selector() -> String {
        "td".into()
    }

    // Monitor defaults
    pub fn interval() -> u64 {
        300
    }
    pub fn max_concurrent_deliveries() -> usize {
        8
    }

    // Message defaults
    pub fn msg_position() -> String {
        concat!(
            "Информация о студенте с кодом {code}:\n",
            "🎯 Позиция: {position} {within}\n",
            "📚 Количество бюджетных мест: {seats}\n",
            "📊 Минимальный проходной балл: {cutoff}\n",
            "📅 Дата создания: {date}\n",
            "⏰ Время создания: {time}\n",
            "🎓 Направление: {program}"
        )
        .into()
    }
    pub fn msg_update() -> String {
        "🔔 Список обновлён!\n\n{report}".into()
    }
    pub fn msg_lookup_error() -> String {
        "Ошибка при получении информации: {error}".into()
    }
    pub fn msg_update_error() -> String {
        "❌ Не удалось получить обновлённую информацию для кода {code}: {error}".into()
    }
    pub fn msg_subscribed() -> String {
        "✅ Подписка на код {code} оформлена.\n\nСписок проверяется каждые {interval_min} мин.".into()
    }
    pub fn msg_already_subscribed() -> String {
        "ℹ️ Вы уже подписаны на код {code}.\n\nСписок проверяется каждые {interval_min} мин.".into()
    }
    pub fn msg_unsubscribed() -> String {
        "❌ Подписка на обновления списка отменена.".into()
    }
    pub fn msg_not_subscribed() -> String {
        "ℹ️ У вас нет активной подписки на обновления списка.".into()
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
