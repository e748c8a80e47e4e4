use std::time::Instant;

/// Running totals for the repeat loop. Only the orchestrator mutates these.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CycleStats {
    pub count: u64,
    /// SOL, counted as twice the configured buy per successful cycle.
    pub total_volume: f64,
    pub elapsed_seconds: f64,
}

impl CycleStats {
    /// Records one finished iteration. Failed cycles pass `0.0`.
    pub fn record(&mut self, volume_sol: f64, started_at: Instant) {
        self.count += 1;
        self.total_volume += volume_sol;
        self.elapsed_seconds = started_at.elapsed().as_secs_f64();
    }

    pub fn average_interval_seconds(&self) -> Option<f64> {
        if self.count > 1 {
            Some(self.elapsed_seconds / (self.count - 1) as f64)
        } else {
            None
        }
    }

    /// `HH:MM:SS`
    pub fn running_time(&self) -> String {
        let total = self.elapsed_seconds.max(0.0) as u64;
        format!(
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}
