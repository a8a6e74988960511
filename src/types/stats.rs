//! Statistics snapshot types
//!
//! Snapshots are derived, never stored: every read recomputes one from the log.

use serde::{Serialize, Serializer};
use crate::{TARGET_THRESHOLDS, TRIM_THRESHOLD, WINDOW_SIZES};

/// A time aggregate or the "N/A" sentinel (never a numeric zero)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Time(f64),
    NotAvailable,
}

impl StatValue {
    pub fn from_option(value: Option<f64>) -> Self {
        value.map(StatValue::Time).unwrap_or(StatValue::NotAvailable)
    }

    pub fn seconds(&self) -> Option<f64> {
        match self {
            StatValue::Time(secs) => Some(*secs),
            StatValue::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, StatValue::Time(_))
    }
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatValue::Time(secs) => write!(f, "{:.2}s", secs),
            StatValue::NotAvailable => write!(f, "N/A"),
        }
    }
}

impl Serialize for StatValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Label for a rolling window: `mo3` below the trim threshold, `ao5` and up otherwise
pub fn window_label(window: usize) -> String {
    if window < TRIM_THRESHOLD {
        format!("mo{}", window)
    } else {
        format!("ao{}", window)
    }
}

/// Rolling mean (moN) or trimmed mean (aoN) over the most recent N times
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowAverage {
    pub label: String,
    pub window: usize,
    pub value: StatValue,
}

/// Share of non-DNF solves below a sub-N target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetProgress {
    pub threshold_secs: u32,
    pub below: usize,
    pub percentage: f64,
}

/// Everything a reader sees about a solve log at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSnapshot {
    /// Length of the log, DNFs included
    pub total_solves: usize,
    pub dnf_count: usize,
    pub best_single: StatValue,
    pub worst_single: StatValue,
    pub session_mean: StatValue,
    pub averages: Vec<WindowAverage>,
    pub targets: Vec<TargetProgress>,
}

impl StatisticsSnapshot {
    /// Snapshot with every numeric field N/A
    pub fn not_available(total_solves: usize, dnf_count: usize) -> Self {
        Self {
            total_solves,
            dnf_count,
            best_single: StatValue::NotAvailable,
            worst_single: StatValue::NotAvailable,
            session_mean: StatValue::NotAvailable,
            averages: WINDOW_SIZES
                .iter()
                .map(|&window| WindowAverage {
                    label: window_label(window),
                    window,
                    value: StatValue::NotAvailable,
                })
                .collect(),
            targets: TARGET_THRESHOLDS
                .iter()
                .map(|&threshold_secs| TargetProgress {
                    threshold_secs,
                    below: 0,
                    percentage: 0.0,
                })
                .collect(),
        }
    }

    /// Rolling average for a window size (N/A for windows not reported)
    pub fn average(&self, window: usize) -> StatValue {
        self.averages
            .iter()
            .find(|a| a.window == window)
            .map(|a| a.value)
            .unwrap_or(StatValue::NotAvailable)
    }

    /// Multi-line plain-text summary
    pub fn to_parseable_string(&self) -> String {
        let mut lines = vec![
            format!("solves={} dnf={}", self.total_solves, self.dnf_count),
            format!(
                "best={} | worst={} | mean={}",
                self.best_single, self.worst_single, self.session_mean
            ),
        ];
        let averages: Vec<String> = self
            .averages
            .iter()
            .map(|a| format!("{}={}", a.label, a.value))
            .collect();
        lines.push(averages.join(" | "));
        lines.join("\n")
    }
}
