//! Ranking list extraction.
//!
//! Turns the raw page markup into list metadata and student records. The
//! marker heuristics live behind [`ListExtractor`] so ranking code never
//! touches the document tree.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{
    ListMetadata, ListSnapshot, MAX_SEATS, MIN_COLUMNS, MarkerConfig, SourceConfig, StudentRecord,
};
use crate::utils::{after_marker, element_text};

/// Extracts a ranking list from page markup.
pub trait ListExtractor: Send + Sync {
    /// Extract only the scalar metadata (seats, publication date/time, program).
    fn extract_metadata(&self, html: &str) -> Result<ListMetadata>;

    /// Extract the metadata and every qualifying table row.
    fn extract(&self, html: &str) -> Result<ListSnapshot>;
}

/// Extractor driven by text markers and configured CSS selectors.
pub struct MarkerExtractor {
    markers: MarkerConfig,
    eligibility_glyph: String,
    default_seats: u32,
    cell_any: Selector,
    table: Selector,
    header_cell: Selector,
    data_row: Selector,
    row_cell: Selector,
}

impl MarkerExtractor {
    /// Create an extractor from the source configuration.
    pub fn new(source: &SourceConfig) -> Result<Self> {
        Ok(Self {
            markers: source.markers.clone(),
            eligibility_glyph: source.eligibility_glyph.clone(),
            default_seats: source.default_seats,
            cell_any: Self::parse_selector("td")?,
            table: Self::parse_selector("table")?,
            header_cell: Self::parse_selector(&source.table.header_cell_selector)?,
            data_row: Self::parse_selector(&source.table.data_row_selector)?,
            row_cell: Self::parse_selector(&source.table.cell_selector)?,
        })
    }

    fn metadata_from(&self, document: &Html) -> ListMetadata {
        let cells: Vec<String> = document
            .select(&self.cell_any)
            .map(|cell| element_text(&cell))
            .collect();

        let seats = self.extract_seats(&cells);
        let (date, time) = self.extract_publication(&cells);
        let program = self.extract_program(&cells);

        ListMetadata {
            seats,
            date,
            time,
            program,
        }
    }

    /// Seat count from the last cell carrying the seats marker.
    fn extract_seats(&self, cells: &[String]) -> u32 {
        let parsed = last_containing(cells, &self.markers.seats)
            .and_then(|text| parse_seats(text, &self.markers.seats));

        match parsed {
            Some(seats) => seats,
            None => {
                log::debug!(
                    "Seat count not found or implausible, using default {}",
                    self.default_seats
                );
                self.default_seats
            }
        }
    }

    /// Publication date and time; empty strings when the cell is missing.
    fn extract_publication(&self, cells: &[String]) -> (String, String) {
        let date_marker = self.markers.date.trim();
        let time_marker = self.markers.time.trim();

        let Some(text) = cells
            .iter()
            .rev()
            .find(|text| text.contains(date_marker) && text.contains(time_marker))
        else {
            return (String::new(), String::new());
        };

        let date = after_marker(text, date_marker)
            .and_then(|rest| {
                rest.find(self.markers.date_end.trim())
                    .map(|end| rest[..end].trim().to_string())
            })
            .unwrap_or_default();

        let time = after_marker(text, time_marker)
            .map(|rest| match rest.find('.') {
                Some(end) => rest[..end].trim().to_string(),
                None => rest.trim().to_string(),
            })
            .unwrap_or_default();

        (date, time)
    }

    /// Competition group label with underscores turned into spaces.
    fn extract_program(&self, cells: &[String]) -> String {
        let marker = self.markers.program.trim();
        last_containing(cells, marker)
            .and_then(|text| after_marker(text, marker))
            .map(|rest| rest.trim().replace('_', " "))
            .unwrap_or_default()
    }

    fn records_from(&self, document: &Html) -> Result<Vec<StudentRecord>> {
        let mut records = Vec::new();

        for table in document.select(&self.table) {
            let header_count = table
                .select(&self.header_cell)
                .filter(|cell| belongs_to(cell, &table))
                .count();
            if header_count < MIN_COLUMNS {
                continue;
            }

            for row in table
                .select(&self.data_row)
                .filter(|row| belongs_to(row, &table))
            {
                let cells: Vec<String> = row
                    .select(&self.row_cell)
                    .map(|cell| element_text(&cell))
                    .collect();
                if let Some(record) = StudentRecord::from_cells(&cells, &self.eligibility_glyph) {
                    records.push(record);
                }
            }
        }

        if records.is_empty() {
            return Err(AppError::NoDataFound);
        }
        Ok(records)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

impl ListExtractor for MarkerExtractor {
    fn extract_metadata(&self, html: &str) -> Result<ListMetadata> {
        let document = Html::parse_document(html);
        Ok(self.metadata_from(&document))
    }

    fn extract(&self, html: &str) -> Result<ListSnapshot> {
        let document = Html::parse_document(html);
        let metadata = self.metadata_from(&document);
        let records = self.records_from(&document)?;
        log::debug!(
            "Extracted {} rows, {} seats, published {} {}",
            records.len(),
            metadata.seats,
            metadata.date,
            metadata.time
        );
        Ok(ListSnapshot { metadata, records })
    }
}

fn last_containing<'a>(cells: &'a [String], marker: &str) -> Option<&'a str> {
    cells
        .iter()
        .rev()
        .find(|text| text.contains(marker))
        .map(String::as_str)
}

/// Parse "Всего мест: 107." style text; `None` unless within (0, MAX_SEATS).
fn parse_seats(text: &str, marker: &str) -> Option<u32> {
    let rest = after_marker(text, marker)?;
    let number = rest.split('.').next().unwrap_or_default().trim();
    let seats: u32 = number.parse().ok()?;
    (seats > 0 && seats < MAX_SEATS).then_some(seats)
}

/// Whether `table` is the nearest enclosing table of `element`.
fn belongs_to(element: &ElementRef<'_>, table: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .find(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| el.name() == "table")
        })
        .is_some_and(|node| node.id() == table.id())
}
