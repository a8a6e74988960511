//! Statistics engine: derives a snapshot from a solve log
//!
//! Pure and read-only. DNFs count toward `total_solves` and nothing else;
//! every numeric aggregate works on effective times (+2 applied).

use crate::{TARGET_THRESHOLDS, TRIM_THRESHOLD, WINDOW_SIZES};
use crate::types::{
    SolveRecord, StatValue, StatisticsSnapshot, TargetProgress, WindowAverage, window_label,
};

/// Computes statistics snapshots
#[derive(Debug, Default)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute the full snapshot for records in chronological order
    pub fn compute<'a, I>(&self, records: I) -> StatisticsSnapshot
    where
        I: IntoIterator<Item = &'a SolveRecord>,
    {
        let mut total_solves = 0;
        let mut times = Vec::new();
        for record in records {
            total_solves += 1;
            if let Some(t) = record.effective_time() {
                times.push(t);
            }
        }
        let dnf_count = total_solves - times.len();

        if times.is_empty() {
            return StatisticsSnapshot::not_available(total_solves, dnf_count);
        }

        let best = times.iter().copied().fold(f64::INFINITY, f64::min);
        let worst = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let averages = WINDOW_SIZES
            .iter()
            .map(|&window| WindowAverage {
                label: window_label(window),
                window,
                value: StatValue::from_option(rolling_average(&times, window)),
            })
            .collect();

        StatisticsSnapshot {
            total_solves,
            dnf_count,
            best_single: StatValue::Time(best),
            worst_single: StatValue::Time(worst),
            session_mean: StatValue::from_option(mean(&times)),
            averages,
            targets: target_progress(&times),
        }
    }
}

/// Rolling average of the most recent `window` times.
///
/// Below the trim threshold this is a plain mean (moN); at or above it the
/// single best and single worst are dropped first (aoN). `None` when there
/// are fewer than `window` times.
pub fn rolling_average(times: &[f64], window: usize) -> Option<f64> {
    if window == 0 || times.len() < window {
        return None;
    }
    let recent = &times[times.len() - window..];

    if window < TRIM_THRESHOLD {
        return mean(recent);
    }

    let mut sorted = recent.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    mean(&sorted[1..window - 1])
}

/// Arithmetic mean, `None` for an empty slice.
///
/// Accumulated as a running mean so finite inputs never overflow to infinity.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut running = 0.0;
    for (i, &value) in values.iter().enumerate() {
        running += (value - running) / (i + 1) as f64;
    }
    Some(running)
}

fn target_progress(times: &[f64]) -> Vec<TargetProgress> {
    TARGET_THRESHOLDS
        .iter()
        .map(|&threshold_secs| {
            let below = times.iter().filter(|&&t| t < threshold_secs as f64).count();
            let percentage = if times.is_empty() {
                0.0
            } else {
                below as f64 / times.len() as f64 * 100.0
            };
            TargetProgress { threshold_secs, below, percentage }
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(secs: f64) -> SolveRecord {
        SolveRecord::create(secs, "").unwrap()
    }

    fn approx(value: StatValue, expected: f64) {
        let secs = value.seconds().expect("expected a time, got N/A");
        assert!((secs - expected).abs() < 1e-9, "expected {}, got {}", expected, secs);
    }

    #[test]
    fn test_empty_log() {
        let records: Vec<SolveRecord> = Vec::new();
        let snap = StatisticsEngine::new().compute(&records);
        assert_eq!(snap.total_solves, 0);
        assert_eq!(snap.best_single, StatValue::NotAvailable);
        assert_eq!(snap.session_mean, StatValue::NotAvailable);
    }

    #[test]
    fn test_ao5_trims_best_and_worst() {
        let records: Vec<_> = [10.0, 12.0, 9.0, 11.0, 20.0].into_iter().map(solve).collect();
        let snap = StatisticsEngine::new().compute(&records);
        approx(snap.average(5), 11.0);
        assert_eq!(snap.average(5).to_string(), "11.00s");
        approx(snap.best_single, 9.0);
        approx(snap.worst_single, 20.0);
        approx(snap.session_mean, 12.4);
    }

    #[test]
    fn test_mo3_uses_most_recent() {
        let records: Vec<_> = [30.0, 10.0, 11.0, 12.0].into_iter().map(solve).collect();
        let snap = StatisticsEngine::new().compute(&records);
        approx(snap.average(3), 11.0);
        assert_eq!(snap.average(5), StatValue::NotAvailable);
    }

    #[test]
    fn test_rolling_average_boundaries() {
        assert_eq!(rolling_average(&[1.0, 2.0], 3), None);
        assert_eq!(rolling_average(&[1.0], 0), None);
        // ao5 over exactly five values keeps the middle three
        assert_eq!(rolling_average(&[5.0, 1.0, 3.0, 2.0, 4.0], 5), Some(3.0));
    }

    #[test]
    fn test_mean_of_huge_times_stays_finite() {
        let huge = f64::MAX / 2.0;
        assert_eq!(mean(&[huge, huge, huge]), Some(huge));
        assert_eq!(mean(&[f64::MAX, f64::MAX]), Some(f64::MAX));
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_dnf_only_counts_toward_total() {
        let records = vec![
            solve(5.0).with_penalty(true, false),
            solve(10.0),
            solve(1.0).with_penalty(true, false),
        ];
        let snap = StatisticsEngine::new().compute(&records);
        assert_eq!(snap.total_solves, 3);
        assert_eq!(snap.dnf_count, 2);
        approx(snap.best_single, 10.0);
        approx(snap.worst_single, 10.0);
    }

    #[test]
    fn test_target_progress() {
        let records: Vec<_> = [9.0, 14.0, 19.0, 25.0].into_iter().map(solve).collect();
        let snap = StatisticsEngine::new().compute(&records);
        let below: Vec<usize> = snap.targets.iter().map(|t| t.below).collect();
        assert_eq!(below, vec![1, 2, 3]);
        assert!((snap.targets[0].percentage - 25.0).abs() < 1e-9);
    }
}
