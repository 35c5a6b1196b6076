//! Shared state between supervisor and test child.
//!
//! One anonymous `MAP_SHARED` page (or more, if the struct ever outgrows a
//! page) created before the first fork and inherited by every test child.
//! The child records which call it is about to make plus a tentative
//! crash classification; the supervisor reads that flight record back after
//! reaping the child. Crash counters and the stop word are written by the
//! supervisor only.

use std::ptr;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};

use crate::memo::{Outcome, ARGS_LEN};
use crate::util::page_align;

/// Upper bound on catalog rows tracked by the per-row crash counters.
pub const MAX_CATALOG: usize = 512;

#[repr(C)]
struct RawContext {
    // Flight record, written by the child before every invocation.
    hash: AtomicU64,
    nr: AtomicU64,
    args: [AtomicU64; ARGS_LEN],
    spec_idx: AtomicU64,
    tentative: AtomicU64,
    // Child-written tallies, read by the supervisor and stats reporter.
    counter: AtomicU64,
    skipped_crash: AtomicU64,
    skipped_errno_zero: AtomicU64,
    // Supervisor-owned.
    stop: AtomicU32,
    crash_count: [AtomicU32; MAX_CATALOG],
}

/// Everything the supervisor knows about the call in flight when a child
/// died, copied out of the shared page in one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightRecord {
    pub hash: u64,
    pub nr: u64,
    pub args: [u64; ARGS_LEN],
    pub spec_idx: usize,
    pub tentative: Option<Outcome>,
}

pub struct SharedContext {
    raw: *mut RawContext,
    map_len: usize,
}

// The mapping is shared memory accessed only through atomics.
unsafe impl Send for SharedContext {}
unsafe impl Sync for SharedContext {}

impl SharedContext {
    pub fn new() -> nix::Result<Self> {
        let map_len = page_align(std::mem::size_of::<RawContext>());
        let raw = unsafe {
            mmap(
                ptr::null_mut(),
                map_len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED | MapFlags::MAP_ANONYMOUS,
                -1,
                0,
            )?
        } as *mut RawContext;
        // Zero-filled mapping is a valid all-zero RawContext.
        Ok(Self { raw, map_len })
    }

    #[inline]
    fn raw(&self) -> &RawContext {
        unsafe { &*self.raw }
    }

    // ---- child side ----

    /// Record the call about to be issued. Tentative outcome is set to
    /// `Crashed` so that a fatal signal leaves the right classification
    /// behind; the child downgrades it after the call returns.
    pub fn record_attempt(&self, hash: u64, nr: u64, args: &[u64; ARGS_LEN], spec_idx: usize) {
        let raw = self.raw();
        raw.hash.store(hash, Ordering::Relaxed);
        raw.nr.store(nr, Ordering::Relaxed);
        for (slot, &arg) in raw.args.iter().zip(args.iter()) {
            slot.store(arg, Ordering::Relaxed);
        }
        raw.spec_idx.store(spec_idx as u64, Ordering::Relaxed);
        raw.tentative
            .store(Outcome::Crashed.as_u64(), Ordering::Relaxed);
    }

    /// Counts a call that returned control, whatever its error code.
    pub fn inc_completed(&self) {
        self.raw().counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_skipped_crash(&self) {
        self.raw().skipped_crash.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_skipped_errno_zero(&self) {
        self.raw().skipped_errno_zero.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_tentative(&self, outcome: Outcome) {
        self.raw()
            .tentative
            .store(outcome.as_u64(), Ordering::Relaxed);
    }

    // ---- supervisor side ----

    /// Copy the flight record out and reset the tentative word so a stale
    /// record is never attributed to the next child.
    pub fn take_flight_record(&self) -> FlightRecord {
        let raw = self.raw();
        let mut args = [0u64; ARGS_LEN];
        for (out, slot) in args.iter_mut().zip(raw.args.iter()) {
            *out = slot.load(Ordering::Relaxed);
        }
        let record = FlightRecord {
            hash: raw.hash.load(Ordering::Relaxed),
            nr: raw.nr.load(Ordering::Relaxed),
            args,
            spec_idx: raw.spec_idx.load(Ordering::Relaxed) as usize,
            tentative: Outcome::from_u64(raw.tentative.load(Ordering::Relaxed)),
        };
        raw.tentative.store(u64::MAX, Ordering::Relaxed);
        record
    }

    pub fn completed(&self) -> u64 {
        self.raw().counter.load(Ordering::Relaxed)
    }

    pub fn skipped_crashes(&self) -> u64 {
        self.raw().skipped_crash.load(Ordering::Relaxed)
    }

    pub fn skipped_errno_zero(&self) -> u64 {
        self.raw().skipped_errno_zero.load(Ordering::Relaxed)
    }

    /// Bump the per-row crash counter; returns the new count.
    pub fn bump_crash_count(&self, spec_idx: usize) -> u32 {
        debug_assert!(spec_idx < MAX_CATALOG);
        self.raw().crash_count[spec_idx].fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn crash_count(&self, spec_idx: usize) -> u32 {
        self.raw().crash_count[spec_idx].load(Ordering::Relaxed)
    }

    // ---- both sides ----

    /// Stop word lives in the shared page so a request raised in the
    /// supervisor is visible inside an already-forked child.
    pub fn request_stop(&self) {
        self.raw().stop.store(1, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.raw().stop.load(Ordering::Relaxed) != 0
    }
}

impl Drop for SharedContext {
    fn drop(&mut self) {
        unsafe {
            munmap(self.raw as *mut libc::c_void, self.map_len).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_fits_its_mapping() {
        let ctx = SharedContext::new().unwrap();
        assert!(std::mem::size_of::<RawContext>() <= ctx.map_len);
        assert_eq!(ctx.map_len % crate::util::page_size(), 0);
    }

    #[test]
    fn flight_record_round_trips_and_resets() {
        let ctx = SharedContext::new().unwrap();
        let args = [1, 2, 3, 4, 5, 6];
        ctx.record_attempt(42, 7, &args, 3);
        ctx.set_tentative(Outcome::ErrnoZero);

        let rec = ctx.take_flight_record();
        assert_eq!(rec.hash, 42);
        assert_eq!(rec.nr, 7);
        assert_eq!(rec.args, args);
        assert_eq!(rec.spec_idx, 3);
        assert_eq!(rec.tentative, Some(Outcome::ErrnoZero));

        // Second read sees the reset word, not the stale outcome.
        assert_eq!(ctx.take_flight_record().tentative, None);
    }

    #[test]
    fn attempt_defaults_to_crashed_until_downgraded() {
        let ctx = SharedContext::new().unwrap();
        ctx.record_attempt(1, 2, &[0; ARGS_LEN], 0);
        assert_eq!(ctx.take_flight_record().tentative, Some(Outcome::Crashed));
    }

    #[test]
    fn crash_counters_are_per_row() {
        let ctx = SharedContext::new().unwrap();
        assert_eq!(ctx.bump_crash_count(5), 1);
        assert_eq!(ctx.bump_crash_count(5), 2);
        assert_eq!(ctx.crash_count(5), 2);
        assert_eq!(ctx.crash_count(6), 0);
    }

    #[test]
    fn tallies_are_independent() {
        let ctx = SharedContext::new().unwrap();
        ctx.inc_completed();
        ctx.inc_skipped_crash();
        ctx.inc_skipped_crash();
        ctx.inc_skipped_errno_zero();
        assert_eq!(ctx.completed(), 1);
        assert_eq!(ctx.skipped_crashes(), 2);
        assert_eq!(ctx.skipped_errno_zero(), 1);
    }

    #[test]
    fn stop_word_toggles() {
        let ctx = SharedContext::new().unwrap();
        assert!(!ctx.stop_requested());
        ctx.request_stop();
        assert!(ctx.stop_requested());
    }
}
