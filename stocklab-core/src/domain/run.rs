//! Run (streak) records produced by trend detection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a price streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunDirection {
    Up,
    Down,
}

/// Best streak observed in one direction.
///
/// `length == 0` means no streak of that direction was ever observed; the
/// start/end dates are `None` in that case. A streak of length N spans N+1
/// bars: `start` is the bar before the first move, `end` the last bar of the
/// streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub direction: RunDirection,
    pub length: usize,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl RunRecord {
    /// Empty record for a direction (no streak observed yet).
    pub fn empty(direction: RunDirection) -> Self {
        Self {
            direction,
            length: 0,
            start: None,
            end: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_has_no_dates() {
        let rec = RunRecord::empty(RunDirection::Up);
        assert_eq!(rec.length, 0);
        assert!(rec.start.is_none());
        assert!(rec.end.is_none());
    }
}
