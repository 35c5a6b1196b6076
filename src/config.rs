use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Stop after this many issued calls; `None` runs until the duration
    /// elapses or a stop is requested.
    pub ops: Option<u64>,
    /// Wall-clock budget for the whole run.
    pub duration: Option<Duration>,
    /// Interval timer per catalog row inside the test child.
    pub call_timeout_ms: u64,
    /// A row that crashed this many times is retired for the rest of the run.
    pub max_crashes: u32,
    /// Shed root before sweeping when running privileged.
    pub drop_privileges: bool,
    /// uid/gid the test child assumes when shedding root.
    pub unprivileged_id: u32,
    /// Stats report interval, seconds. 0 disables the reporter.
    pub report_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ops: None,
            duration: None,
            call_timeout_ms: 100,
            max_crashes: 10,
            drop_privileges: true,
            unprivileged_id: 65534,
            report_interval: 10,
        }
    }
}

impl Config {
    pub fn check(&self) -> anyhow::Result<()> {
        if self.call_timeout_ms == 0 {
            anyhow::bail!("call timeout must be non-zero");
        }
        if self.max_crashes == 0 {
            anyhow::bail!("max crashes per row must be non-zero");
        }
        if self.ops == Some(0) {
            anyhow::bail!("ops budget must be non-zero when set");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_check() {
        assert!(Config::default().check().is_ok());
    }

    #[test]
    fn zero_budgets_are_rejected() {
        let mut config = Config::default();
        config.ops = Some(0);
        assert!(config.check().is_err());
        let mut config = Config::default();
        config.call_timeout_ms = 0;
        assert!(config.check().is_err());
    }
}
