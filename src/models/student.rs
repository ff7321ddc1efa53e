//! Student record parsed from one row of the ranking table.

use serde::{Deserialize, Serialize};

/// Minimum number of cells a row must have to be mapped into a record.
pub const MIN_COLUMNS: usize = 16;

/// One row of the published ranking table.
///
/// Fields are filled by column position; header text is never consulted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StudentRecord {
    /// Row number as printed (column 0)
    pub number: String,

    /// Unique applicant code, compared as an exact string (column 1)
    pub code: String,

    /// Application priority (column 2)
    pub priority: String,

    /// Admission consent marker (column 3)
    pub admission_consent: String,

    /// Top passing priority (column 4)
    pub top_passing_priority: String,

    /// Raw text of the "is top passing priority" cell (column 5)
    pub eligibility_mark: String,

    /// Main top priority (column 6)
    pub main_top_priority: String,

    /// Total score text (column 7)
    pub total_score: String,

    /// Sum of subject scores (column 8)
    pub subject_score: String,

    /// Mathematics (column 9)
    pub math: String,

    /// Informatics / physics (column 10)
    pub informatics: String,

    /// Russian language (column 11)
    pub russian: String,

    /// Individual achievements (column 12)
    pub achievements: String,

    /// Basis for admission without exams (column 13)
    pub no_exam_basis: String,

    /// Preferential right, part 9 (column 14)
    pub preferential_right_9: String,

    /// Preferential right, part 10 (column 15)
    pub preferential_right_10: String,

    /// Offer number, present only on rows wider than the minimum (column 16)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_number: Option<String>,

    /// Whether the row counts toward rank
    pub eligible: bool,
}

impl StudentRecord {
    /// Build a record from trimmed cell texts.
    ///
    /// Returns `None` when fewer than [`MIN_COLUMNS`] cells are given.
    pub fn from_cells(cells: &[String], eligibility_glyph: &str) -> Option<Self> {
        if cells.len() < MIN_COLUMNS {
            return None;
        }

        let cell = |idx: usize| cells[idx].clone();
        let eligibility_mark = cell(5);
        let eligible = !eligibility_glyph.is_empty() && eligibility_mark.contains(eligibility_glyph);

        Some(Self {
            number: cell(0),
            code: cell(1),
            priority: cell(2),
            admission_consent: cell(3),
            top_passing_priority: cell(4),
            eligibility_mark,
            main_top_priority: cell(6),
            total_score: cell(7),
            subject_score: cell(8),
            math: cell(9),
            informatics: cell(10),
            russian: cell(11),
            achievements: cell(12),
            no_exam_basis: cell(13),
            preferential_right_9: cell(14),
            preferential_right_10: cell(15),
            offer_number: cells.get(16).cloned(),
            eligible,
        })
    }

    /// Total score as a number; unparsable text counts as zero.
    pub fn score(&self) -> u32 {
        self.total_score.trim().parse().unwrap_or(0)
    }
}
