//! Completion counter shared by batch workers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counts finished positions across rayon workers.
#[derive(Debug)]
pub struct ProgressTracker {
    total: u64,
    completed: AtomicU64,
    started: Instant,
}

impl ProgressTracker {
    /// Tracker for a batch of `total` positions.
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self {
            total,
            completed: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Count one finished position, simulated or skipped.
    pub fn position_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot with a linear ETA.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn progress(&self) -> Progress {
        let completed = self.completed.load(Ordering::Relaxed);
        let remaining = self.total.saturating_sub(completed);
        let eta_secs = if completed == 0 {
            0
        } else {
            let per_position = self.started.elapsed().as_secs_f64() / completed as f64;
            (per_position * remaining as f64) as u64
        };

        Progress {
            total: self.total,
            completed,
            eta_secs,
        }
    }
}

/// Point-in-time batch progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Positions in the batch.
    pub total: u64,
    /// Positions finished.
    pub completed: u64,
    /// Estimated seconds until the batch finishes.
    pub eta_secs: u64,
}

impl Progress {
    /// Share of positions finished, in percent. An empty batch is complete.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 * 100.0 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_completed_positions() {
        let tracker = ProgressTracker::new(8);
        for _ in 0..4 {
            tracker.position_completed();
        }

        let progress = tracker.progress();
        assert_eq!(progress.total, 8);
        assert_eq!(progress.completed, 4);
        assert!((progress.percentage() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn nothing_done_has_no_eta() {
        let progress = ProgressTracker::new(3).progress();
        assert_eq!(progress.eta_secs, 0);
        assert!(progress.percentage().abs() < f64::EPSILON);
    }

    #[test]
    fn empty_batch_is_complete() {
        let progress = ProgressTracker::new(0).progress();
        assert!((progress.percentage() - 100.0).abs() < f64::EPSILON);
    }
}
