use std::thread::sleep;
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use crate::util::stop_soon;

#[derive(Debug, Default)]
pub struct Stats {
    attempts: AtomicU64,
    generations: AtomicU64,
    crashes: AtomicU64,
    crashed_rows: AtomicU64,
    skipped_crash: AtomicU64,
    skipped_zero: AtomicU64,
    memo_size: AtomicU64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attempts(&self, n: u64) {
        self.attempts.store(n, Ordering::Relaxed);
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn inc_generations(&self) {
        self.generations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn generations(&self) -> u64 {
        self.generations.load(Ordering::Relaxed)
    }

    pub fn inc_crashes(&self) {
        self.crashes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn crashes(&self) -> u64 {
        self.crashes.load(Ordering::Relaxed)
    }

    pub fn set_crashed_rows(&self, n: u64) {
        self.crashed_rows.store(n, Ordering::Relaxed);
    }

    pub fn crashed_rows(&self) -> u64 {
        self.crashed_rows.load(Ordering::Relaxed)
    }

    pub fn set_skips(&self, known_crash: u64, known_zero: u64) {
        self.skipped_crash.store(known_crash, Ordering::Relaxed);
        self.skipped_zero.store(known_zero, Ordering::Relaxed);
    }

    pub fn set_memo_size(&self, n: u64) {
        self.memo_size.store(n, Ordering::Relaxed);
    }

    pub fn report(&self, duration: Duration) {
        while !stop_soon() {
            sleep(duration);

            let attempts = self.attempts.load(Ordering::Relaxed);
            let generations = self.generations.load(Ordering::Relaxed);
            let crashes = self.crashes.load(Ordering::Relaxed);
            let crashed_rows = self.crashed_rows.load(Ordering::Relaxed);
            let skipped_crash = self.skipped_crash.load(Ordering::Relaxed);
            let skipped_zero = self.skipped_zero.load(Ordering::Relaxed);
            let memo_size = self.memo_size.load(Ordering::Relaxed);
            log::info!(
                "calls: {}, generations: {}, crashes: {} over {} rows, skip crash/zero {}/{}, memo: {}",
                attempts,
                generations,
                crashes,
                crashed_rows,
                skipped_crash,
                skipped_zero,
                memo_size
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = Stats::new();
        stats.inc_generations();
        stats.inc_generations();
        stats.inc_crashes();
        stats.set_attempts(40);
        assert_eq!(stats.generations(), 2);
        assert_eq!(stats.crashes(), 1);
        assert_eq!(stats.attempts(), 40);
    }
}
