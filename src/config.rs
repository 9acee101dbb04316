use embassy_time::Duration;
use serde::{Deserialize, Serialize};

/// Scheduler tuning
///
/// All durations are in milliseconds. Missing fields take their defaults,
/// so a partial JSON document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Length of a commanded cross-fade
    pub smoothing_duration_ms: u64,
    /// Cross-fade commanded changes and smooth animations
    pub fading_enabled: bool,
    /// First idle wait after a tick without frames
    pub idle_wait_min_ms: u64,
    /// Longest idle wait
    pub idle_wait_max_ms: u64,
    /// Growth of the idle wait per consecutive idle tick
    pub idle_wait_multiplier: u32,
    /// Dispatch attempts before the device is considered lost
    pub dispatch_attempts: u32,
    /// Pause between dispatch attempts
    pub retry_backoff_ms: u64,
    /// Queue depth warning covers this much buffered output time
    pub queue_warning_window_ms: u64,
    /// Queue depth warning threshold while latency is unknown
    pub queue_warning_fallback: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            smoothing_duration_ms: 350,
            fading_enabled: true,
            idle_wait_min_ms: 1,
            idle_wait_max_ms: 128,
            idle_wait_multiplier: 2,
            dispatch_attempts: 5,
            retry_backoff_ms: 5000,
            queue_warning_window_ms: 1000,
            queue_warning_fallback: 100,
        }
    }
}

impl SchedulerConfig {
    pub fn smoothing_duration(&self) -> Duration {
        Duration::from_millis(self.smoothing_duration_ms)
    }

    pub fn idle_wait_min(&self) -> Duration {
        Duration::from_millis(self.idle_wait_min_ms)
    }

    pub fn idle_wait_max(&self) -> Duration {
        Duration::from_millis(self.idle_wait_max_ms.max(self.idle_wait_min_ms))
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Number of queued frames that triggers the depth warning
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn queue_warning_threshold(&self, average_latency_ms: f64) -> usize {
        if average_latency_ms > 0.0 {
            ((self.queue_warning_window_ms as f64 / average_latency_ms).round() as usize).max(1)
        } else {
            self.queue_warning_fallback
        }
    }
}
