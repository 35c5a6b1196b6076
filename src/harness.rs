//! Generation supervisor and test child.
//!
//! A generation forks one child which keeps sweeping the catalog in freshly
//! shuffled order until told to stop, each row under a short interval timer.
//! Any fatal signal raised by a call kills the child mid-generation; the
//! supervisor reaps it, reads
//! the flight record out of the shared context, books the crash and forks
//! the next generation with the crashed combination memoized.

use std::convert::TryFrom;
use std::time::Duration;

use nix::sys::signal::{kill, sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, setgroups, setresgid, setresuid, ForkResult, Gid, Pid, Uid};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::catalog::SyscallSpec;
use crate::config::Config;
use crate::context::SharedContext;
use crate::memo::{Outcome, OutcomeMemo};
use crate::permute::{Invoke, Permuter, RawSyscall};
use crate::stats::Stats;
use crate::values::ValueTable;

/// Child exit code when it could not set itself up (distinct from the
/// 128+signal codes used by the fault handlers).
const EXIT_NO_RESOURCE: i32 = 3;

/// Rounds of random pairwise swaps before each catalog pass.
const SHUFFLE_PASSES: usize = 5;

/// Signals that indicate the call in flight brought the child down.
const FAULT_SIGNALS: [Signal; 5] = [
    Signal::SIGILL,
    Signal::SIGTRAP,
    Signal::SIGFPE,
    Signal::SIGBUS,
    Signal::SIGSEGV,
];

/// Signals the child converts into an immediate exit so a sweep cannot
/// wedge the generation.
const CHILD_EXIT_SIGNALS: [Signal; 8] = [
    Signal::SIGILL,
    Signal::SIGTRAP,
    Signal::SIGFPE,
    Signal::SIGBUS,
    Signal::SIGSEGV,
    Signal::SIGALRM,
    Signal::SIGINT,
    Signal::SIGHUP,
];

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("fork failed: {0}")]
    Fork(nix::Error),
    #[error("waitpid failed: {0}")]
    Wait(nix::Error),
}

/// Why a test child stopped, decoded from its wait status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Walked the whole catalog and exited 0.
    NormalExit,
    /// A fault handler fired while a call was in flight.
    FaultSignal(Signal),
    /// The per-row interval timer expired; the call never returned.
    WatchdogTimeout,
    /// Child exited before sweeping anything.
    ChildResource,
    /// Exited with an unexpected code.
    Exited(i32),
    /// Killed by a signal outside the handled set.
    Killed(Signal),
}

fn decode_termination(status: WaitStatus) -> TerminationReason {
    match status {
        WaitStatus::Exited(_, 0) => TerminationReason::NormalExit,
        WaitStatus::Exited(_, EXIT_NO_RESOURCE) => TerminationReason::ChildResource,
        WaitStatus::Exited(_, code) if code > 128 => {
            match Signal::try_from(code - 128) {
                Ok(Signal::SIGALRM) => TerminationReason::WatchdogTimeout,
                Ok(sig) if FAULT_SIGNALS.contains(&sig) => TerminationReason::FaultSignal(sig),
                _ => TerminationReason::Exited(code),
            }
        }
        WaitStatus::Exited(_, code) => TerminationReason::Exited(code),
        WaitStatus::Signaled(_, sig, _) if FAULT_SIGNALS.contains(&sig) => {
            TerminationReason::FaultSignal(sig)
        }
        WaitStatus::Signaled(_, sig, _) => TerminationReason::Killed(sig),
        _ => TerminationReason::Exited(-1),
    }
}

impl TerminationReason {
    /// A crash means the flight record names the combination that was
    /// in-kernel when the child died.
    fn is_crash(self) -> bool {
        matches!(
            self,
            TerminationReason::FaultSignal(_) | TerminationReason::WatchdogTimeout
        )
    }
}

extern "C" fn fault_handler(sig: libc::c_int) {
    // Nothing here is async-signal-unsafe: encode the signal in the exit
    // code and leave without unwinding.
    unsafe { libc::_exit(128 + sig) }
}

pub struct Harness<'a> {
    values: &'a ValueTable,
    ctx: &'a SharedContext,
    config: &'a Config,
}

impl<'a> Harness<'a> {
    pub fn new(values: &'a ValueTable, ctx: &'a SharedContext, config: &'a Config) -> Self {
        Self {
            values,
            ctx,
            config,
        }
    }

    /// Run one fork/test/reap cycle. The child keeps testing passes until a
    /// stop is requested or it dies, so a generation that never crashes ends
    /// only on the budget or an external stop. The memo gains a `Crashed`
    /// entry when the child died mid-call; `stats` is only touched on the
    /// parent side.
    pub fn run_generation(
        &mut self,
        catalog: &[SyscallSpec],
        memo: &mut OutcomeMemo,
        rng: &mut SmallRng,
        stats: &Stats,
    ) -> Result<TerminationReason, HarnessError> {
        let snapshot = memo.snapshot();
        let child_seed = rng.gen::<u64>();

        let child = match unsafe { fork() }.map_err(HarnessError::Fork)? {
            ForkResult::Child => {
                let code = self.child_main(catalog, snapshot, child_seed);
                unsafe { libc::_exit(code) }
            }
            ForkResult::Parent { child } => child,
        };

        let status = reap(child)?;
        let reason = decode_termination(status);
        stats.inc_generations();

        if reason.is_crash() || matches!(reason, TerminationReason::Killed(_)) {
            self.book_crash(reason, catalog, memo, stats);
        }
        Ok(reason)
    }

    /// Book the combination named by the flight record after a child died.
    /// The tentative word is `Crashed` only while a call is in kernel, so a
    /// child killed between calls books nothing.
    fn book_crash(
        &self,
        reason: TerminationReason,
        catalog: &[SyscallSpec],
        memo: &mut OutcomeMemo,
        stats: &Stats,
    ) {
        let rec = self.ctx.take_flight_record();
        if rec.tentative == Some(Outcome::Crashed) && rec.spec_idx < catalog.len() {
            let spec = &catalog[rec.spec_idx];
            let count = self.ctx.bump_crash_count(rec.spec_idx);
            stats.inc_crashes();
            info!(
                "{}({:#x},{:#x},{:#x},{:#x},{:#x},{:#x}) -> {:?} (crash {} of {})",
                spec.name(),
                rec.args[0],
                rec.args[1],
                rec.args[2],
                rec.args[3],
                rec.args[4],
                rec.args[5],
                reason,
                count,
                self.config.max_crashes,
            );
            memo.insert(rec.hash, rec.nr, rec.args, Outcome::Crashed);
        }
    }

    /// Entry point of the forked child; only `_exit` leaves it.
    fn child_main(&self, catalog: &[SyscallSpec], mut memo: OutcomeMemo, seed: u64) -> i32 {
        if prepare_child(self.config).is_err() {
            return EXIT_NO_RESOURCE;
        }
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..catalog.len()).collect();
        while !self.ctx.stop_requested() && !self.budget_exhausted() {
            shuffle_order(&mut order, &mut rng);
            self.test_pass(catalog, &order, &mut memo, &mut rng, &mut RawSyscall, true);
        }
        0
    }

    fn budget_exhausted(&self) -> bool {
        match self.config.ops {
            Some(limit) => self.ctx.completed() >= limit,
            None => false,
        }
    }

    /// One full pass over the catalog in the given order, clearing the
    /// pass-local memo findings at the end.
    ///
    /// `arm_watchdog` is off in tests so a wedged fake invoker cannot kill
    /// the test runner.
    pub(crate) fn test_pass<I: Invoke>(
        &self,
        catalog: &[SyscallSpec],
        order: &[usize],
        memo: &mut OutcomeMemo,
        rng: &mut SmallRng,
        invoker: &mut I,
        arm_watchdog: bool,
    ) {
        for &idx in order {
            if self.ctx.stop_requested() {
                return;
            }
            if self.budget_exhausted() {
                return;
            }
            let spec = &catalog[idx];
            if self.ctx.crash_count(idx) >= self.config.max_crashes {
                continue;
            }
            if arm_watchdog {
                if let Err(e) =
                    arm_interval_timer(Duration::from_millis(self.config.call_timeout_ms))
                {
                    warn!("cannot arm watchdog for {}, skipping row: {}", spec.name(), e);
                    continue;
                }
            }
            let mut p = Permuter::new(self.values, self.ctx, &mut *invoker);
            p.sweep(spec, idx, memo, rng);
            if arm_watchdog {
                disarm_interval_timer();
            }
        }
        // Session-local findings do not carry across passes.
        memo.clear();
    }
}

/// Random pairwise swaps, several passes, so consecutive passes walk the
/// catalog in different orders.
fn shuffle_order(order: &mut [usize], rng: &mut SmallRng) {
    let n = order.len();
    if n < 2 {
        return;
    }
    for _ in 0..SHUFFLE_PASSES {
        for i in 0..n {
            let j = rng.gen_range(0..n);
            order.swap(i, j);
        }
    }
}

fn reap(child: Pid) -> Result<WaitStatus, HarnessError> {
    loop {
        match waitpid(child, None) {
            Ok(status) => return Ok(status),
            Err(nix::Error::Sys(nix::errno::Errno::EINTR)) => continue,
            Err(e) => {
                // Leave no orphan behind before bailing out.
                kill(child, Signal::SIGKILL).ok();
                return Err(HarnessError::Wait(e));
            }
        }
    }
}

/// Install fault handlers, neuter core dumps and shed privileges. Runs in
/// the child between fork and the first sweep.
fn prepare_child(config: &Config) -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(fault_handler),
        SaFlags::SA_NODEFER,
        SigSet::empty(),
    );
    for &sig in &CHILD_EXIT_SIGNALS {
        unsafe { sigaction(sig, &action)? };
    }

    // A child that dies by design every few milliseconds must not litter
    // the filesystem with cores.
    unsafe {
        libc::prctl(libc::PR_SET_DUMPABLE, 0, 0, 0, 0);
    }

    if config.drop_privileges && Uid::effective().is_root() {
        let uid = Uid::from_raw(config.unprivileged_id);
        let gid = Gid::from_raw(config.unprivileged_id);
        setgroups(&[gid])?;
        setresgid(gid, gid, gid)?;
        setresuid(uid, uid, uid)?;
    }
    Ok(())
}

/// Real interval timer; SIGALRM lands in the fault handler, so a call that
/// never returns takes the child down instead of the run.
fn arm_interval_timer(timeout: Duration) -> nix::Result<()> {
    set_itimer(libc::timeval {
        tv_sec: timeout.as_secs() as libc::time_t,
        tv_usec: timeout.subsec_micros() as libc::suseconds_t,
    })
}

fn disarm_interval_timer() {
    set_itimer(libc::timeval {
        tv_sec: 0,
        tv_usec: 0,
    })
    .ok();
}

// The timeout is armed both one-shot and as the re-fire interval; the fault
// handler exits on first delivery so the interval only matters if that
// delivery is lost.
fn set_itimer(value: libc::timeval) -> nix::Result<()> {
    let timer = libc::itimerval {
        it_interval: value,
        it_value: value,
    };
    let ret = unsafe { libc::setitimer(libc::ITIMER_REAL, &timer, std::ptr::null_mut()) };
    nix::errno::Errno::result(ret).map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ARG_FD, ARG_INT};
    use crate::guard::GuardPages;
    use crate::memo::{combo_hash, ARGS_LEN};

    struct CountingInvoker {
        calls: usize,
    }

    impl Invoke for CountingInvoker {
        fn invoke(&mut self, _nr: u64, _args: &[u64; ARGS_LEN]) -> i64 {
            self.calls += 1;
            -1
        }
    }

    fn small_catalog() -> Vec<SyscallSpec> {
        vec![
            SyscallSpec::new(9000, "alpha", &[ARG_FD]),
            SyscallSpec::new(9001, "beta", &[ARG_INT]),
        ]
    }

    fn fixture() -> (GuardPages, SharedContext, Config) {
        let mut config = Config::default();
        config.drop_privileges = false;
        (
            GuardPages::new().unwrap(),
            SharedContext::new().unwrap(),
            config,
        )
    }

    #[test]
    fn decode_maps_handler_exit_codes() {
        let pid = Pid::from_raw(1);
        assert_eq!(
            decode_termination(WaitStatus::Exited(pid, 0)),
            TerminationReason::NormalExit
        );
        assert_eq!(
            decode_termination(WaitStatus::Exited(pid, EXIT_NO_RESOURCE)),
            TerminationReason::ChildResource
        );
        assert_eq!(
            decode_termination(WaitStatus::Exited(pid, 128 + libc::SIGSEGV)),
            TerminationReason::FaultSignal(Signal::SIGSEGV)
        );
        assert_eq!(
            decode_termination(WaitStatus::Exited(pid, 128 + libc::SIGALRM)),
            TerminationReason::WatchdogTimeout
        );
        assert_eq!(
            decode_termination(WaitStatus::Signaled(pid, Signal::SIGBUS, false)),
            TerminationReason::FaultSignal(Signal::SIGBUS)
        );
        assert_eq!(
            decode_termination(WaitStatus::Signaled(pid, Signal::SIGKILL, false)),
            TerminationReason::Killed(Signal::SIGKILL)
        );
        assert_eq!(
            decode_termination(WaitStatus::Exited(pid, 7)),
            TerminationReason::Exited(7)
        );
    }

    #[test]
    fn shuffle_keeps_a_permutation() {
        let mut order: Vec<usize> = (0..50).collect();
        let mut rng = SmallRng::seed_from_u64(3);
        shuffle_order(&mut order, &mut rng);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn capped_rows_are_skipped() {
        let (guard, ctx, config) = fixture();
        let values = ValueTable::new(&guard, -1);
        let catalog = small_catalog();
        let harness = Harness::new(&values, &ctx, &config);
        for _ in 0..config.max_crashes {
            ctx.bump_crash_count(0);
        }

        let mut memo = OutcomeMemo::new();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut invoker = CountingInvoker { calls: 0 };
        harness.test_pass(&catalog, &[0, 1], &mut memo, &mut rng, &mut invoker, false);
        // Row 0 (4 fd values) is capped out; only row 1 (9 int values) runs.
        assert_eq!(invoker.calls, 9);
    }

    #[test]
    fn pass_clears_session_memo() {
        let (guard, ctx, config) = fixture();
        let values = ValueTable::new(&guard, -1);
        let catalog = small_catalog();
        let harness = Harness::new(&values, &ctx, &config);

        let mut memo = OutcomeMemo::new();
        memo.insert(1, 9000, [0; ARGS_LEN], Outcome::ErrnoZero);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut invoker = CountingInvoker { calls: 0 };
        harness.test_pass(&catalog, &[0, 1], &mut memo, &mut rng, &mut invoker, false);
        assert!(memo.is_empty());
    }

    #[test]
    fn stop_request_halts_the_pass() {
        let (guard, ctx, config) = fixture();
        let values = ValueTable::new(&guard, -1);
        let catalog = small_catalog();
        let harness = Harness::new(&values, &ctx, &config);
        ctx.request_stop();

        let mut memo = OutcomeMemo::new();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut invoker = CountingInvoker { calls: 0 };
        harness.test_pass(&catalog, &[0, 1], &mut memo, &mut rng, &mut invoker, false);
        assert_eq!(invoker.calls, 0);
    }

    #[test]
    fn ops_budget_stops_the_pass_between_rows() {
        let (guard, ctx, mut config) = fixture();
        config.ops = Some(1);
        let values = ValueTable::new(&guard, -1);
        let catalog = small_catalog();
        let harness = Harness::new(&values, &ctx, &config);

        let mut memo = OutcomeMemo::new();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut invoker = CountingInvoker { calls: 0 };
        harness.test_pass(&catalog, &[0, 1], &mut memo, &mut rng, &mut invoker, false);
        // The first row finishes its sweep; the second never starts.
        assert_eq!(invoker.calls, 4);
    }

    #[test]
    fn booked_crash_is_skipped_by_the_next_generation() {
        let (guard, ctx, config) = fixture();
        let values = ValueTable::new(&guard, -1);
        let catalog = small_catalog();
        let harness = Harness::new(&values, &ctx, &config);
        let stats = Stats::new();
        let mut memo = OutcomeMemo::new();

        // The child died with this combination in kernel.
        let mut args = [0u64; ARGS_LEN];
        args[0] = values.resolve(ARG_FD).unwrap()[1];
        let nr = catalog[0].nr();
        ctx.record_attempt(combo_hash(nr, &args), nr, &args, 0);

        harness.book_crash(
            TerminationReason::FaultSignal(Signal::SIGSEGV),
            &catalog,
            &mut memo,
            &stats,
        );
        assert_eq!(memo.lookup(nr, &args), Some(Outcome::Crashed));
        assert_eq!(ctx.crash_count(0), 1);
        assert_eq!(stats.crashes(), 1);

        // The next child inherits a snapshot and skips that exact tuple.
        let mut inherited = memo.snapshot();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut invoker = CountingInvoker { calls: 0 };
        harness.test_pass(&catalog, &[0, 1], &mut inherited, &mut rng, &mut invoker, false);
        let tuples =
            values.resolve(ARG_FD).unwrap().len() + values.resolve(ARG_INT).unwrap().len();
        assert_eq!(invoker.calls, tuples - 1);
        assert_eq!(ctx.skipped_crashes(), 1);
    }

    #[test]
    fn kill_mid_call_books_like_a_crash() {
        let (guard, ctx, config) = fixture();
        let values = ValueTable::new(&guard, -1);
        let catalog = small_catalog();
        let harness = Harness::new(&values, &ctx, &config);
        let stats = Stats::new();
        let mut memo = OutcomeMemo::new();

        let args = [7u64, 0, 0, 0, 0, 0];
        let nr = catalog[1].nr();
        ctx.record_attempt(combo_hash(nr, &args), nr, &args, 1);
        harness.book_crash(
            TerminationReason::Killed(Signal::SIGKILL),
            &catalog,
            &mut memo,
            &stats,
        );
        assert_eq!(memo.lookup(nr, &args), Some(Outcome::Crashed));
        assert_eq!(ctx.crash_count(1), 1);

        // A second reap with no call in flight books nothing.
        harness.book_crash(
            TerminationReason::Killed(Signal::SIGKILL),
            &catalog,
            &mut memo,
            &stats,
        );
        assert_eq!(ctx.crash_count(1), 1);
        assert_eq!(stats.crashes(), 1);
    }

    #[test]
    fn failed_timer_arm_is_reported() {
        // tv_usec past a full second is EINVAL.
        assert!(set_itimer(libc::timeval {
            tv_sec: 0,
            tv_usec: 2_000_000,
        })
        .is_err());
    }
}
