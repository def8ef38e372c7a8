//! Longest upward/downward run detection.
//!
//! Single left-to-right pass over closes starting at index 1. A strictly
//! greater close extends the up streak, strictly less extends the down
//! streak, and an equal close resets both: flat days break streaks, they
//! never extend or count toward either direction. A gap (NaN close on either
//! side of a step) also resets both.

use crate::domain::{Bar, RunDirection, RunRecord};

/// Output of run detection: per-row streak columns plus the best record per
/// direction.
///
/// `up_trend[i]` / `down_trend[i]` hold the active streak length at row i
/// (0 where no streak is active). Up and down records are tracked
/// independently; ties keep the earliest-found best.
#[derive(Debug, Clone)]
pub struct RunAnalysis {
    pub up_trend: Vec<u32>,
    pub down_trend: Vec<u32>,
    pub longest_up: RunRecord,
    pub longest_down: RunRecord,
}

/// Detect streaks and the longest run in each direction.
pub fn detect_runs(bars: &[Bar]) -> RunAnalysis {
    let n = bars.len();
    let mut up_trend = vec![0u32; n];
    let mut down_trend = vec![0u32; n];
    let mut longest_up = RunRecord::empty(RunDirection::Up);
    let mut longest_down = RunRecord::empty(RunDirection::Down);

    let mut up_streak = 0usize;
    let mut up_start = None;
    let mut down_streak = 0usize;
    let mut down_start = None;

    for i in 1..n {
        let prev = bars[i - 1].close;
        let curr = bars[i].close;

        if curr.is_nan() || prev.is_nan() {
            up_streak = 0;
            down_streak = 0;
            continue;
        }

        if curr > prev {
            if up_streak == 0 {
                up_start = Some(bars[i - 1].date);
            }
            up_streak += 1;
            up_trend[i] = up_streak as u32;
            if up_streak > longest_up.length {
                longest_up.length = up_streak;
                longest_up.start = up_start;
                longest_up.end = Some(bars[i].date);
            }
        } else {
            up_streak = 0;
        }

        if curr < prev {
            if down_streak == 0 {
                down_start = Some(bars[i - 1].date);
            }
            down_streak += 1;
            down_trend[i] = down_streak as u32;
            if down_streak > longest_down.length {
                longest_down.length = down_streak;
                longest_down.start = down_start;
                longest_down.end = Some(bars[i].date);
            }
        } else {
            down_streak = 0;
        }
    }

    RunAnalysis {
        up_trend,
        down_trend,
        longest_up,
        longest_down,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn monotonic_rise_is_one_long_up_run() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let analysis = detect_runs(&bars);
        assert_eq!(analysis.longest_up.length, 4);
        assert_eq!(analysis.longest_up.start, Some(bars[0].date));
        assert_eq!(analysis.longest_up.end, Some(bars[4].date));
        assert_eq!(analysis.longest_down.length, 0);
        assert_eq!(analysis.up_trend, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn monotonic_fall_is_one_long_down_run() {
        let bars = make_bars(&[10.0, 8.0, 7.0, 3.0, 1.0]);
        let analysis = detect_runs(&bars);
        assert_eq!(analysis.longest_down.length, 4);
        assert_eq!(analysis.longest_up.length, 0);
        assert!(analysis.longest_up.start.is_none());
        assert_eq!(analysis.down_trend, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn zigzag_tracks_both_directions() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0]);
        let analysis = detect_runs(&bars);
        // Opening run 1->2->3 is length 2; closing run 1->2->3->4 is 3.
        assert_eq!(analysis.longest_up.length, 3);
        assert_eq!(analysis.longest_up.end, Some(bars[7].date));
        assert_eq!(analysis.longest_down.length, 2);
        assert_eq!(analysis.up_trend, vec![0, 1, 2, 0, 0, 1, 2, 3]);
        assert_eq!(analysis.down_trend, vec![0, 0, 0, 1, 2, 0, 0, 0]);
    }

    #[test]
    fn flat_days_break_streaks() {
        let bars = make_bars(&[1.0, 2.0, 2.0, 3.0]);
        let analysis = detect_runs(&bars);
        // The equal close at index 2 resets; neither step around it joins up.
        assert_eq!(analysis.up_trend, vec![0, 1, 0, 1]);
        assert_eq!(analysis.longest_up.length, 1);
    }

    #[test]
    fn constant_series_records_nothing() {
        let bars = make_bars(&[5.0, 5.0, 5.0, 5.0]);
        let analysis = detect_runs(&bars);
        assert_eq!(analysis.longest_up.length, 0);
        assert_eq!(analysis.longest_down.length, 0);
        assert!(analysis.up_trend.iter().all(|&v| v == 0));
        assert!(analysis.down_trend.iter().all(|&v| v == 0));
    }

    #[test]
    fn ties_keep_earliest_best() {
        // Two up runs of length 2; the first one must win.
        let bars = make_bars(&[1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
        let analysis = detect_runs(&bars);
        assert_eq!(analysis.longest_up.length, 2);
        assert_eq!(analysis.longest_up.start, Some(bars[0].date));
        assert_eq!(analysis.longest_up.end, Some(bars[2].date));
    }

    #[test]
    fn gap_resets_both_streaks() {
        let mut bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        bars[2].close = f64::NAN;
        let analysis = detect_runs(&bars);
        // Steps touching the NaN close count for neither direction.
        assert_eq!(analysis.up_trend, vec![0, 1, 0, 0, 1]);
        assert_eq!(analysis.longest_up.length, 1);
    }

    #[test]
    fn short_series_are_quiet() {
        assert_eq!(detect_runs(&[]).longest_up.length, 0);
        let one = make_bars(&[10.0]);
        let analysis = detect_runs(&one);
        assert_eq!(analysis.up_trend, vec![0]);
        assert_eq!(analysis.longest_down.length, 0);
    }
}
