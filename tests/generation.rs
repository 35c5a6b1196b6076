//! End-to-end generation cycle against the live kernel, restricted to rows
//! whose invalid values are harmless (bad fds only).

use rand::rngs::SmallRng;
use rand::SeedableRng;
use sysinval::catalog::{SyscallSpec, ARG_FD, ARG_INT};
use sysinval::config::Config;
use sysinval::context::SharedContext;
use sysinval::guard::GuardPages;
use sysinval::harness::{Harness, TerminationReason};
use sysinval::memo::OutcomeMemo;
use sysinval::stats::Stats;
use sysinval::values::ValueTable;

// Kept as the sole test in this binary: the generation forks, and forking
// next to unrelated allocating test threads is not safe.
#[test]
fn generation_sweeps_fork_and_reap_cleanly() {
    let catalog = vec![
        SyscallSpec::new(libc::SYS_close as u64, "close", &[ARG_FD]),
        SyscallSpec::new(libc::SYS_flock as u64, "flock", &[ARG_FD, ARG_INT]),
    ];

    let guard = GuardPages::new().unwrap();
    let values = ValueTable::new(&guard, -1);
    let ctx = SharedContext::new().unwrap();
    let mut config = Config::default();
    config.drop_privileges = false;
    config.ops = Some(200);

    let mut harness = Harness::new(&values, &ctx, &config);
    let mut memo = OutcomeMemo::new();
    let mut rng = SmallRng::seed_from_u64(11);
    let stats = Stats::new();

    // Bad-fd probes return EBADF; nothing here can fault the child, so the
    // first generation runs passes until the ops budget lands and later
    // generations exit at once with the budget already spent.
    for _ in 0..2 {
        let reason = harness
            .run_generation(&catalog, &mut memo, &mut rng, &stats)
            .unwrap();
        assert_eq!(reason, TerminationReason::NormalExit);
    }

    assert_eq!(stats.generations(), 2);
    assert_eq!(stats.crashes(), 0);
    // 4 fd values for close plus 4 * 9 for flock per pass; five passes hit
    // the budget of 200 exactly.
    assert_eq!(ctx.completed(), 200);
    assert_eq!(ctx.crash_count(0), 0);
    assert_eq!(ctx.crash_count(1), 0);
}
