//! Solve log: one user's ordered, capped collection of solves
//!
//! - Insertion order is chronological order
//! - Length never exceeds the capacity; appends past it evict from the front
//! - Every failed operation leaves the log untouched

use std::collections::VecDeque;
use serde::Serialize;
use crate::MAX_SOLVES_PER_USER;
use crate::types::{IndexError, SolveRecord};

/// Result of an append
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Appended {
    /// Final index of the inserted record
    pub index: usize,
    /// Id assigned to the inserted record
    pub id: u64,
    /// Records dropped from the front to stay within capacity
    pub evicted_count: usize,
}

impl Appended {
    /// Whether the append pushed older solves out
    pub fn evicted(&self) -> bool {
        self.evicted_count > 0
    }
}

/// Ordered solve log with FIFO eviction
#[derive(Debug, Clone)]
pub struct SolveLog {
    records: VecDeque<SolveRecord>,
    capacity: usize,
    next_id: u64,
}

impl Default for SolveLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SolveLog {
    /// Create a log with the default capacity (1000)
    pub fn new() -> Self {
        Self::with_capacity(MAX_SOLVES_PER_USER)
    }

    /// Create a log with a custom capacity (at least 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    /// Append a record, evicting the oldest if over capacity
    pub fn append(&mut self, mut record: SolveRecord) -> Appended {
        let id = self.next_id;
        self.next_id += 1;
        record.assign_id(id);
        self.records.push_back(record);

        let evicted_count = self.prune();

        Appended {
            index: self.records.len() - 1,
            id,
            evicted_count,
        }
    }

    /// Drop records from the front until within capacity
    fn prune(&mut self) -> usize {
        let mut evicted = 0;
        while self.records.len() > self.capacity {
            self.records.pop_front();
            evicted += 1;
        }
        evicted
    }

    fn check_index(&self, index: usize) -> Result<(), IndexError> {
        if index >= self.records.len() {
            return Err(IndexError::OutOfRange { index, len: self.records.len() });
        }
        Ok(())
    }

    /// Remove the record at `index`
    pub fn delete_at(&mut self, index: usize) -> Result<SolveRecord, IndexError> {
        self.check_index(index)?;
        self.records
            .remove(index)
            .ok_or(IndexError::OutOfRange { index, len: self.records.len() })
    }

    /// Remove the record at `index` only if it is still the one with `expected_id`
    pub fn delete_at_checked(&mut self, index: usize, expected_id: u64) -> Result<SolveRecord, IndexError> {
        self.check_index(index)?;
        if self.records[index].id() != expected_id {
            return Err(IndexError::Stale { index, expected_id });
        }
        self.delete_at(index)
    }

    /// Remove every listed index, or nothing if any index is bad
    pub fn delete_many(&mut self, indices: &[usize]) -> Result<usize, IndexError> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        for pair in sorted.windows(2) {
            if pair[0] == pair[1] {
                return Err(IndexError::Duplicate { index: pair[0] });
            }
        }
        if let Some(&last) = sorted.last() {
            self.check_index(last)?;
        }

        // Highest first so earlier indices stay valid
        for &index in sorted.iter().rev() {
            self.records.remove(index);
        }
        Ok(sorted.len())
    }

    /// Remove everything, returning how many records were dropped
    pub fn clear(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        removed
    }

    /// Toggle the penalty flags of the record at `index`
    pub fn set_penalty(&mut self, index: usize, is_dnf: bool, has_plus_two: bool) -> Result<&SolveRecord, IndexError> {
        self.check_index(index)?;
        let record = &mut self.records[index];
        record.set_penalty(is_dnf, has_plus_two);
        Ok(record)
    }

    /// Point-in-time copy of the log (oldest first)
    pub fn snapshot(&self) -> Vec<SolveRecord> {
        self.records.iter().cloned().collect()
    }

    /// All records (oldest first)
    pub fn records(&self) -> impl Iterator<Item = &SolveRecord> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SolveRecord> {
        self.records.get(index)
    }

    pub fn last(&self) -> Option<&SolveRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
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

    fn times(log: &SolveLog) -> Vec<f64> {
        log.records().map(|r| r.elapsed_seconds()).collect()
    }

    #[test]
    fn test_append_returns_index_and_id() {
        let mut log = SolveLog::new();
        let first = log.append(solve(10.0));
        let second = log.append(solve(11.0));
        assert_eq!((first.index, first.id), (0, 1));
        assert_eq!((second.index, second.id), (1, 2));
        assert!(!second.evicted());
    }

    #[test]
    fn test_append_evicts_oldest_at_capacity() {
        let mut log = SolveLog::with_capacity(3);
        for t in [1.0, 2.0, 3.0] {
            log.append(solve(t));
        }
        let appended = log.append(solve(4.0));
        assert!(appended.evicted());
        assert_eq!(appended.evicted_count, 1);
        assert_eq!(appended.index, 2);
        assert_eq!(times(&log), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_delete_shifts_later_records() {
        let mut log = SolveLog::new();
        for t in [1.0, 2.0, 3.0] {
            log.append(solve(t));
        }
        let removed = log.delete_at(1).unwrap();
        assert_eq!(removed.elapsed_seconds(), 2.0);
        assert_eq!(times(&log), vec![1.0, 3.0]);
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let mut log = SolveLog::new();
        log.append(solve(1.0));
        assert_eq!(log.delete_at(1), Err(IndexError::OutOfRange { index: 1, len: 1 }));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_checked_delete_detects_shift() {
        let mut log = SolveLog::new();
        let a = log.append(solve(1.0));
        let b = log.append(solve(2.0));
        log.delete_at(0).unwrap();
        // Caller saw solve `b` at index 1; it has moved to index 0
        assert_eq!(
            log.delete_at_checked(0, a.id),
            Err(IndexError::Stale { index: 0, expected_id: a.id })
        );
        assert_eq!(log.delete_at_checked(0, b.id).unwrap().id(), b.id);
        assert!(log.is_empty());
    }

    #[test]
    fn test_delete_many_is_all_or_nothing() {
        let mut log = SolveLog::new();
        for t in [1.0, 2.0, 3.0, 4.0] {
            log.append(solve(t));
        }
        assert_eq!(log.delete_many(&[0, 9]), Err(IndexError::OutOfRange { index: 9, len: 4 }));
        assert_eq!(log.delete_many(&[2, 2]), Err(IndexError::Duplicate { index: 2 }));
        assert_eq!(log.len(), 4);

        assert_eq!(log.delete_many(&[3, 0]), Ok(2));
        assert_eq!(times(&log), vec![2.0, 3.0]);
    }

    #[test]
    fn test_ids_are_not_reused_after_clear() {
        let mut log = SolveLog::new();
        log.append(solve(1.0));
        assert_eq!(log.clear(), 1);
        assert_eq!(log.append(solve(2.0)).id, 2);
    }

    #[test]
    fn test_set_penalty() {
        let mut log = SolveLog::new();
        log.append(solve(8.0));
        let record = log.set_penalty(0, false, true).unwrap();
        assert_eq!(record.effective_time(), Some(10.0));
        assert_eq!(log.set_penalty(5, true, false).err(), Some(IndexError::OutOfRange { index: 5, len: 1 }));
    }
}
