//! Animation contract consumed by the scheduler, plus reference animations.
//!
//! The scheduler only talks to animations through [`Animation`]. Frames are
//! pulled when the queue is empty and the requested delay has elapsed.

mod fade;
mod flash;
mod level_meter;

use embassy_time::Duration;
pub use fade::SimpleFadeAnimation;
pub use flash::FlashAnimation;
pub use level_meter::LevelMeterAnimation;

use crate::error::{Error, Result};
use crate::filter::ScaledAverage;
use crate::layer::Layer;

/// Default smoothing time constant, in milliseconds
pub const DEFAULT_SMOOTHING_CONSTANT: f64 = 283.0;

const ANIMATION_NAME_FADE: &str = "fade";
const ANIMATION_NAME_FLASH: &str = "flash";
const ANIMATION_NAME_LEVEL_METER: &str = "level_meter";

pub trait Animation: Send {
    /// Short name used in logs and status queries
    fn name(&self) -> &'static str;

    /// Produce the next frame
    fn next_frame(&mut self) -> Result<Layer>;

    /// Desired time between frames; zero asks for a frame every tick
    fn requested_delay(&self) -> Duration {
        Duration::from_millis(0)
    }

    /// Filter used to smooth every frame onto the displayed one
    ///
    /// Returning `Some` opts into continuous smoothing.
    fn smoothing(&self) -> Option<&ScaledAverage> {
        None
    }

    /// Ask for a one-time cross-fade from the previous frame on activation
    fn request_smooth_crossfade(&self) -> bool {
        false
    }

    /// One-shot animations report completion so their overlay can be removed
    fn is_finished(&self) -> bool {
        false
    }

    /// Whether the animation consumes audio snapshots
    fn uses_audio(&self) -> bool {
        false
    }

    /// Hand in the latest audio intensities
    fn update_audio(&mut self, _snapshot: &[f64]) {}
}

/// Visual intensity presets shared by the reference animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationStyle {
    Soft,
    #[default]
    Moderate,
    Bright,
}

impl AnimationStyle {
    /// Color shift per 50 ms of device time
    pub const fn color_shift_amount(self) -> f64 {
        match self {
            AnimationStyle::Soft => 3.0,
            AnimationStyle::Moderate => 12.0,
            AnimationStyle::Bright => 30.0,
        }
    }
}

/// Smooth `next` onto the `displayed` frame
///
/// Every channel moves one filter step towards the new frame. Brightness
/// rises immediately and only decays smoothly.
pub fn filter_onto(displayed: &Layer, next: &Layer, filter: &ScaledAverage) -> Result<Layer> {
    if displayed.pixel_count() != next.pixel_count() {
        return Err(Error::pixel_count_mismatch(
            "DisplayedFrame",
            "Animation frame must have the same number of pixels as the displayed frame.",
        ));
    }
    let pixels = displayed
        .iter()
        .zip(next)
        .map(|(shown, target)| {
            let brightness = filter
                .filter_u8(shown.brightness(), target.brightness())
                .max(target.brightness());
            target
                .with_r(filter.filter_u8(shown.r(), target.r()))
                .with_g(filter.filter_u8(shown.g(), target.g()))
                .with_b(filter.filter_u8(shown.b(), target.b()))
                .set_brightness(brightness)
        })
        .collect();
    Layer::from_pixels(pixels, next.blend_mode())
}
