// src/pipeline/lookup.rs

//! Applicant lookup pipeline: fetch → parse → extract → filter → rank.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{ListMetadata, ListSnapshot, PositionReport};
use crate::services::{ListExtractor, PageFetcher, filter_eligible};

/// Runs the lookup pipeline against the configured ranking page.
#[derive(Clone)]
pub struct PositionLookup {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn ListExtractor>,
}

impl PositionLookup {
    pub fn new(fetcher: Arc<dyn PageFetcher>, extractor: Arc<dyn ListExtractor>) -> Self {
        Self { fetcher, extractor }
    }

    /// Fetch the page and extract the full list.
    pub async fn fetch_snapshot(&self) -> Result<ListSnapshot> {
        let html = self.fetcher.fetch().await?;
        self.extractor.extract(&html)
    }

    /// Fetch the page and extract only its metadata.
    pub async fn fetch_metadata(&self) -> Result<ListMetadata> {
        let html = self.fetcher.fetch().await?;
        self.extractor.extract_metadata(&html)
    }

    /// Look up the rank and cutoff score for an applicant code.
    pub async fn parse_position(&self, code: &str) -> Result<PositionReport> {
        let snapshot = self.fetch_snapshot().await?;
        report_for(&snapshot, code)
    }
}

/// Compute an applicant's report from an already extracted list.
pub fn report_for(snapshot: &ListSnapshot, code: &str) -> Result<PositionReport> {
    let code = code.trim();
    let subset = filter_eligible(&snapshot.records);
    let rank = subset
        .find_rank(code)
        .ok_or_else(|| AppError::rank_not_found(code))?;

    Ok(PositionReport {
        code: code.to_string(),
        rank,
        eligible_count: subset.len(),
        cutoff_score: subset.cutoff_score(snapshot.metadata.seats),
        metadata: snapshot.metadata.clone(),
    })
}
