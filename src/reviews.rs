//! In-memory rating and review store.
//!
//! Records are created on first submission and live until the store is
//! dropped. Nothing is persisted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// A single user-submitted review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub rating: f64,
    pub review: String,
}

/// Aggregate view of one workshop's reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub rating: f64,
    pub total_reviews: usize,
    pub reviews: Vec<ReviewEntry>,
}

impl ReviewSummary {
    fn empty() -> Self {
        Self {
            rating: 0.0,
            total_reviews: 0,
            reviews: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReviewError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
}

#[derive(Debug, Default)]
struct ReviewRecord {
    average: f64,
    entries: Vec<ReviewEntry>,
}

impl ReviewRecord {
    fn push(&mut self, entry: ReviewEntry) {
        self.entries.push(entry);
        let sum: f64 = self.entries.iter().map(|e| e.rating).sum();
        self.average = sum / self.entries.len() as f64;
    }
}

/// Workshop id → accumulated reviews.
#[derive(Debug, Default)]
pub struct ReviewStore {
    records: Mutex<HashMap<String, ReviewRecord>>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, ReviewRecord>> {
        // The map holds no cross-entry invariant a panicking writer could break.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a review and recompute the workshop's average rating.
    ///
    /// Blank ids and blank review text count as missing. Validation happens
    /// before the map is touched, so a rejected submission changes nothing.
    pub fn submit(
        &self,
        workshop_id: Option<&str>,
        rating: Option<f64>,
        review: Option<&str>,
    ) -> Result<(), ReviewError> {
        let workshop_id = workshop_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ReviewError::MissingField("workshop_id"))?;
        let rating = rating
            .filter(|r| r.is_finite())
            .ok_or(ReviewError::MissingField("rating"))?;
        let review = review
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ReviewError::MissingField("review"))?;

        self.records()
            .entry(workshop_id.to_string())
            .or_default()
            .push(ReviewEntry {
                rating,
                review: review.to_string(),
            });
        Ok(())
    }

    /// Current summary for a workshop; zeros when nothing was submitted.
    pub fn summary(&self, workshop_id: &str) -> ReviewSummary {
        match self.records().get(workshop_id) {
            Some(record) => ReviewSummary {
                rating: record.average,
                total_reviews: record.entries.len(),
                reviews: record.entries.clone(),
            },
            None => ReviewSummary::empty(),
        }
    }

    /// Number of workshops with at least one review.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
