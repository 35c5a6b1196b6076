use std::time::Duration;

use env_logger::{Env, TimestampPrecision};
use structopt::StructOpt;
use sysinval::{config::Config, start};

#[derive(Debug, StructOpt)]
struct Settings {
    /// Stop after issuing this many syscalls.
    #[structopt(long, short = "n")]
    ops: Option<u64>,
    /// Stop after this many seconds.
    #[structopt(long, short = "t")]
    timeout: Option<u64>,
    /// Per-syscall watchdog in milliseconds.
    #[structopt(long, default_value = "100")]
    call_timeout: u64,
    /// Retire a syscall after this many crashes.
    #[structopt(long, default_value = "10")]
    max_crashes: u32,
    /// Keep root privileges in the test child.
    #[structopt(long)]
    keep_privileges: bool,
    /// uid/gid assumed by the test child when dropping root.
    #[structopt(long, default_value = "65534")]
    unprivileged_id: u32,
    /// Stats report interval in seconds, 0 to disable.
    #[structopt(long, default_value = "10")]
    report_interval: u64,
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_args();

    let log_env = Env::new()
        .filter_or("SYSINVAL_LOG", "info")
        .default_write_style_or("auto");
    env_logger::Builder::from_env(log_env)
        .format_timestamp(Some(TimestampPrecision::Seconds))
        .init();

    let config = Config {
        ops: settings.ops,
        duration: settings.timeout.map(Duration::from_secs),
        call_timeout_ms: settings.call_timeout,
        max_crashes: settings.max_crashes,
        drop_privileges: !settings.keep_privileges,
        unprivileged_id: settings.unprivileged_id,
        report_interval: settings.report_interval,
    };

    start(config).map(|_| ())
}
