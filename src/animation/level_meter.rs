use super::{ANIMATION_NAME_LEVEL_METER, Animation, DEFAULT_SMOOTHING_CONSTANT};
use crate::color::{BlendMode, Color};
use crate::device::ReadOnlyDeviceConfiguration;
use crate::error::Result;
use crate::filter::ScaledAverage;
use crate::layer::Layer;

/// Audio-reactive bar lighting a share of the strip by the average intensity
///
/// Intensities are expected in `[0, 1]`; louder input is clamped.
#[derive(Debug, Clone)]
pub struct LevelMeterAnimation {
    frame: Layer,
    color: Color,
    level: f64,
    smoothing: ScaledAverage,
}

impl LevelMeterAnimation {
    pub fn new(device: ReadOnlyDeviceConfiguration, color: Color) -> Result<Self> {
        let frame =
            Layer::filled(device.light_count(), BlendMode::Combine, Color::TRANSPARENT)?;
        Ok(Self {
            frame,
            color,
            level: 0.0,
            smoothing: ScaledAverage::new(device, DEFAULT_SMOOTHING_CONSTANT)?,
        })
    }

    pub fn level(&self) -> f64 {
        self.level
    }
}

impl Animation for LevelMeterAnimation {
    fn name(&self) -> &'static str {
        ANIMATION_NAME_LEVEL_METER
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn next_frame(&mut self) -> Result<Layer> {
        let count = self.frame.pixel_count();
        let lit = ((count as f64) * self.level).round() as usize;
        self.frame.fill(Color::TRANSPARENT);
        for index in 0..lit.min(count) {
            self.frame.set_pixel(index, self.color)?;
        }
        Ok(self.frame.clone())
    }

    fn smoothing(&self) -> Option<&ScaledAverage> {
        Some(&self.smoothing)
    }

    fn uses_audio(&self) -> bool {
        true
    }

    #[allow(clippy::cast_precision_loss)]
    fn update_audio(&mut self, snapshot: &[f64]) {
        self.level = if snapshot.is_empty() {
            0.0
        } else {
            (snapshot.iter().sum::<f64>() / snapshot.len() as f64).clamp(0.0, 1.0)
        };
    }
}
