use embassy_time::Duration;

use crate::command::Transform;
use crate::error::Result;
use crate::queue::LedQueue;

/// Cross-fade settings captured at the start of a tick
#[derive(Debug, Clone, Copy)]
pub(crate) struct FadeTiming {
    pub(crate) enabled: bool,
    pub(crate) duration: Duration,
    /// Device time per frame, in milliseconds
    pub(crate) factor_time: f64,
}

impl FadeTiming {
    /// Fade progress covered by one output frame
    #[allow(clippy::cast_precision_loss)]
    fn step(&self) -> f64 {
        let duration_ms = self.duration.as_micros() as f64 / 1000.0;
        if duration_ms <= 0.0 {
            return 0.0;
        }
        self.factor_time / duration_ms
    }
}

/// Queue a smooth transition from the last shown frame to a transformed target
///
/// Pending frames are dropped and the newest one becomes the baseline the
/// transform applies to, so rapid commands collapse into one transition.
pub(crate) fn crossfade(
    queue: &mut LedQueue,
    transform: &Transform,
    timing: &FadeTiming,
) -> Result<()> {
    let start = queue.last_processed().clone();
    let mut target = queue
        .drain_frames()
        .pop()
        .unwrap_or_else(|| start.clone());
    transform.apply(&mut target)?;

    if timing.enabled {
        for opacity in fade_steps(timing.step()) {
            queue.push_frame(&start.faded(&target, opacity)?)?;
        }
    }
    queue.push_frame(&target)
}

/// Opacities `0, step, 2 * step, ...` strictly below 1
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn fade_steps(step: f64) -> impl Iterator<Item = f64> {
    let count = if step > 0.0 && step.is_finite() {
        (1.0 / step).ceil() as usize
    } else {
        0
    };
    (0..count)
        .map(move |index| index as f64 * step)
        .take_while(|opacity| *opacity < 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_steps_cover_unit_interval() {
        let steps: Vec<f64> = fade_steps(0.25).collect();
        assert_eq!(steps, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_fade_steps_uneven_step() {
        let steps: Vec<f64> = fade_steps(0.4).collect();
        assert_eq!(steps.len(), 3);
        assert!(steps.iter().all(|opacity| *opacity < 1.0));
    }

    #[test]
    fn test_fade_steps_without_timing() {
        assert_eq!(fade_steps(0.0).count(), 0);
        assert_eq!(fade_steps(f64::NAN).count(), 0);
    }
}
