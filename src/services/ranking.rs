//! Eligibility filtering and rank calculation.

use crate::models::StudentRecord;

/// Records counted toward rank, in table order.
#[derive(Debug, Clone, Default)]
pub struct EligibleSubset<'a> {
    records: Vec<&'a StudentRecord>,
}

/// Keep only records flagged as holding top passing priority.
///
/// Stable: eligible records keep their relative table order.
pub fn filter_eligible(records: &[StudentRecord]) -> EligibleSubset<'_> {
    EligibleSubset {
        records: records.iter().filter(|r| r.eligible).collect(),
    }
}

impl<'a> EligibleSubset<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a StudentRecord> + '_ {
        self.records.iter().copied()
    }

    /// 1-based position of the first record whose code equals `code` exactly.
    pub fn find_rank(&self, code: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.code == code)
            .map(|idx| idx + 1)
    }

    /// Score of the last applicant within `seats`.
    ///
    /// With fewer eligible records than seats the last record's score is used;
    /// an empty subset yields 0.
    pub fn cutoff_score(&self, seats: u32) -> u32 {
        let boundary = (seats as usize).min(self.records.len());
        match boundary.checked_sub(1) {
            Some(idx) => self.records[idx].score(),
            None => 0,
        }
    }
}
