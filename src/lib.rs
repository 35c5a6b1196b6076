//! Syscall invalid-argument stressor.
//!
//! Feeds every catalogued syscall systematically invalid argument
//! permutations from a disposable forked child, under the assumption that
//! each call may take the child down. Combinations that crash the child or
//! unexpectedly return zero are memoized so the run keeps probing new
//! ground instead of retrying known outcomes.

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod catalog;
pub mod config;
pub mod context;
pub mod guard;
pub mod harness;
pub mod memo;
pub mod permute;
pub mod stats;
pub mod util;
pub mod values;

use std::os::raw::c_int;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use nix::sys::socket::{socket, AddressFamily, SockFlag, SockType};
use rand::{rngs::SmallRng, SeedableRng};

use crate::config::Config;
use crate::context::{SharedContext, MAX_CATALOG};
use crate::guard::GuardPages;
use crate::harness::{Harness, TerminationReason};
use crate::memo::OutcomeMemo;
use crate::stats::Stats;
use crate::util::{stop_req, stop_soon};
use crate::values::ValueTable;

/// Final tallies of one run.
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub attempts: u64,
    pub generations: u64,
    pub crashes: u64,
    pub crashed_rows: usize,
    pub skipped_known_crash: u64,
    pub skipped_known_zero: u64,
}

pub fn start(config: Config) -> anyhow::Result<Summary> {
    config.check().context("config error")?;

    let catalog = &*catalog::SYSCALLS;
    anyhow::ensure!(
        catalog.len() <= MAX_CATALOG,
        "catalog exceeds the crash counter capacity"
    );
    log::info!("catalog: {} rows", catalog.len());

    let guard = GuardPages::new().context("failed to map guard pages")?;
    // A live socket fd seeds the sockfd value table; without one those
    // slots fall back to plain bad fds.
    let probe_sockfd = socket(
        AddressFamily::Unix,
        SockType::Stream,
        SockFlag::empty(),
        None,
    )
    .unwrap_or(-1);
    let values = ValueTable::new(&guard, probe_sockfd);

    let ctx = Arc::new(SharedContext::new().context("failed to map shared context")?);
    let stats = Arc::new(Stats::new());

    setup_signal_handler(Arc::clone(&ctx));
    if config.report_interval > 0 {
        let stats = Arc::clone(&stats);
        let interval = Duration::from_secs(config.report_interval);
        thread::spawn(move || stats.report(interval));
    }
    if let Some(total) = config.duration {
        let ctx = Arc::clone(&ctx);
        thread::spawn(move || {
            let step = Duration::from_millis(100);
            let mut left = total;
            while !stop_soon() && left > Duration::from_secs(0) {
                let slice = step.min(left);
                thread::sleep(slice);
                left -= slice;
            }
            if !stop_soon() {
                log::info!("time budget exhausted, stopping");
                stop_req();
                ctx.request_stop();
            }
        });
    }

    let mut memo = OutcomeMemo::new();
    let mut rng = SmallRng::from_entropy();
    let mut harness = Harness::new(&values, &ctx, &config);

    while !stop_soon() && !ctx.stop_requested() {
        if let Some(limit) = config.ops {
            if ctx.completed() >= limit {
                log::info!("ops budget exhausted, stopping");
                break;
            }
        }
        let reason = harness
            .run_generation(catalog, &mut memo, &mut rng, &stats)
            .context("generation failed")?;
        stats.set_attempts(ctx.completed());
        stats.set_skips(ctx.skipped_crashes(), ctx.skipped_errno_zero());
        stats.set_memo_size(memo.len() as u64);
        stats.set_crashed_rows(count_crashed_rows(&ctx, catalog.len()) as u64);

        match reason {
            TerminationReason::ChildResource => {
                anyhow::bail!("test child could not set itself up");
            }
            TerminationReason::Killed(sig) => {
                log::warn!("test child killed externally by {:?}", sig);
            }
            _ => {}
        }
    }

    stop_req();
    ctx.request_stop();

    let summary = Summary {
        attempts: ctx.completed(),
        generations: stats.generations(),
        crashes: stats.crashes(),
        crashed_rows: count_crashed_rows(&ctx, catalog.len()),
        skipped_known_crash: ctx.skipped_crashes(),
        skipped_known_zero: ctx.skipped_errno_zero(),
    };
    log::info!(
        "done: {} calls over {} generations, {} crashes on {} of {} rows, skipped {} known-crash and {} known-zero combinations",
        summary.attempts,
        summary.generations,
        summary.crashes,
        summary.crashed_rows,
        catalog.len(),
        summary.skipped_known_crash,
        summary.skipped_known_zero
    );
    for (idx, spec) in catalog.iter().enumerate() {
        let count = ctx.crash_count(idx);
        if count > 0 {
            log::info!("  {}: {} crashes", spec.name(), count);
        }
    }
    Ok(summary)
}

fn count_crashed_rows(ctx: &SharedContext, catalog_len: usize) -> usize {
    (0..catalog_len).filter(|&i| ctx.crash_count(i) > 0).count()
}

fn setup_signal_handler(ctx: Arc<SharedContext>) {
    use signal_hook::consts::TERM_SIGNALS;
    use signal_hook::iterator::exfiltrator::WithOrigin;
    use signal_hook::iterator::SignalsInfo;

    fn named_signal(sig: c_int) -> String {
        signal_hook::low_level::signal_name(sig)
            .map(|n| format!("{}({})", n, sig))
            .unwrap_or_else(|| sig.to_string())
    }

    thread::spawn(move || {
        let mut signals = SignalsInfo::<WithOrigin>::new(TERM_SIGNALS).unwrap();
        if let Some(info) = signals.into_iter().next() {
            let from = if let Some(p) = info.process {
                format!("(pid: {}, uid: {})", p.pid, p.uid)
            } else {
                "unknown".to_string()
            };
            log::info!(
                "{} recved, from: {}, waiting for the current generation...",
                named_signal(info.signal),
                from
            );
            stop_req();
            ctx.request_stop();
        }
    });
}
