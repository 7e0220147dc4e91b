use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

/// Timing (and, with the `cli` feature, memory) for one finished pipeline stage.
#[derive(Debug, Clone)]
pub struct StageStats {
    pub stage: String,
    pub elapsed: Duration,
    pub memory_mb: Option<u64>,
}

/// Records per-stage wall time of an analysis run. Disabled monitors do nothing.
pub struct StageMonitor {
    enabled: bool,
    started: Instant,
    stage_started: Instant,
    stages: Vec<StageStats>,
    #[cfg(feature = "cli")]
    system: Option<(System, Pid)>,
}

impl StageMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            started: now,
            stage_started: now,
            stages: Vec::new(),
            #[cfg(feature = "cli")]
            system: if enabled {
                sysinfo::get_current_pid()
                    .ok()
                    .map(|pid| (System::new_all(), pid))
            } else {
                None
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Closes the current stage under `stage` and starts timing the next one.
    pub fn finish_stage(&mut self, stage: &str) {
        if !self.enabled {
            return;
        }

        let now = Instant::now();
        let stats = StageStats {
            stage: stage.to_string(),
            elapsed: now.duration_since(self.stage_started),
            memory_mb: self.memory_mb(),
        };
        self.stage_started = now;

        match stats.memory_mb {
            Some(mb) => tracing::info!(
                "📊 {} - Time: {:?}, Memory: {}MB",
                stats.stage,
                stats.elapsed,
                mb
            ),
            None => tracing::info!("📊 {} - Time: {:?}", stats.stage, stats.elapsed),
        }
        self.stages.push(stats);
    }

    pub fn stages(&self) -> &[StageStats] {
        &self.stages
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        let peak = self.stages.iter().filter_map(|s| s.memory_mb).max();
        match peak {
            Some(peak) => tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                self.started.elapsed(),
                peak
            ),
            None => tracing::info!("📊 Final Stats - Total Time: {:?}", self.started.elapsed()),
        }
    }

    #[cfg(feature = "cli")]
    fn memory_mb(&mut self) -> Option<u64> {
        let (system, pid) = self.system.as_mut()?;
        system.refresh_all();
        system
            .process(*pid)
            .map(|process| process.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn memory_mb(&mut self) -> Option<u64> {
        None
    }
}

impl Default for StageMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
