//! Solve record model
//!
//! - A record is immutable once created, except for its DNF / +2 flags
//! - The stored elapsed time is never rewritten; penalties only change
//!   the effective time used by statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::PLUS_TWO_PENALTY_SECS;
use crate::types::ValidationError;

/// A single timed solve attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveRecord {
    /// Log-assigned id, unique within one log (0 until appended)
    id: u64,
    /// Raw measured time in seconds, before penalty
    elapsed_seconds: f64,
    /// Move sequence that produced the solved state (may be empty)
    scramble: String,
    /// Set at creation, never supplied by the caller
    created_at: DateTime<Utc>,
    /// Did not finish: excluded from every numeric aggregate
    is_dnf: bool,
    /// 2-second penalty
    has_plus_two: bool,
}

impl SolveRecord {
    /// Create a clean (no penalty) record timestamped now
    pub fn create(elapsed_seconds: f64, scramble: impl Into<String>) -> Result<Self, ValidationError> {
        if !elapsed_seconds.is_finite() {
            return Err(ValidationError::NonFiniteTime);
        }
        if elapsed_seconds < 0.0 {
            return Err(ValidationError::NegativeTime { value: elapsed_seconds });
        }

        Ok(Self {
            id: 0,
            elapsed_seconds,
            scramble: scramble.into(),
            created_at: Utc::now(),
            is_dnf: false,
            has_plus_two: false,
        })
    }

    /// Set both penalty flags at creation
    pub fn with_penalty(mut self, is_dnf: bool, has_plus_two: bool) -> Self {
        self.set_penalty(is_dnf, has_plus_two);
        self
    }

    /// Toggle the penalty flags (the only mutation a record allows)
    pub fn set_penalty(&mut self, is_dnf: bool, has_plus_two: bool) {
        self.is_dnf = is_dnf;
        self.has_plus_two = has_plus_two;
    }

    pub(crate) fn assign_id(&mut self, id: u64) {
        self.id = id;
    }

    /// Time used by statistics: `None` for a DNF, +2 seconds when penalised
    pub fn effective_time(&self) -> Option<f64> {
        if self.is_dnf {
            return None;
        }
        if self.has_plus_two {
            Some(self.elapsed_seconds + PLUS_TWO_PENALTY_SECS)
        } else {
            Some(self.elapsed_seconds)
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn scramble(&self) -> &str {
        &self.scramble
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_dnf(&self) -> bool {
        self.is_dnf
    }

    pub fn has_plus_two(&self) -> bool {
        self.has_plus_two
    }

    /// Short display form: `12.34s`, `14.34s (+2)` or `DNF (12.34s)`
    pub fn display_time(&self) -> String {
        if self.is_dnf {
            format!("DNF ({:.2}s)", self.elapsed_seconds)
        } else if self.has_plus_two {
            format!("{:.2}s (+2)", self.elapsed_seconds + PLUS_TWO_PENALTY_SECS)
        } else {
            format!("{:.2}s", self.elapsed_seconds)
        }
    }
}

/// Solve as submitted by a client.
///
/// Accepts the legacy field names (`time`, `dnf`, `plus2`) as aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct SolveSubmission {
    #[serde(alias = "time", alias = "elapsedSeconds")]
    pub elapsed_seconds: f64,
    #[serde(default)]
    pub scramble: Option<String>,
    #[serde(default, alias = "dnf", alias = "isDNF")]
    pub is_dnf: bool,
    #[serde(default, alias = "plus2", alias = "hasPlusTwo")]
    pub has_plus_two: bool,
}

impl SolveSubmission {
    pub fn into_record(self) -> Result<SolveRecord, ValidationError> {
        Ok(SolveRecord::create(self.elapsed_seconds, self.scramble.unwrap_or_default())?
            .with_penalty(self.is_dnf, self.has_plus_two))
    }
}

// =============================================================================
// TESTS
// =============================================================================
