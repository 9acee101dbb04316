use super::{ANIMATION_NAME_FADE, Animation, AnimationStyle};
use crate::color::{BlendMode, Color};
use crate::device::ReadOnlyDeviceConfiguration;
use crate::error::Result;
use crate::int_fraction::IntFraction;
use crate::layer::Layer;

/// Reference time the style shift amounts are tuned for, in milliseconds
const SHIFT_REFERENCE_MS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShiftPhase {
    /// Red fading into green
    Red,
    /// Green fading into blue
    Green,
    /// Blue fading into red
    Blue,
}

/// Whole-strip color cycle: red to green to blue and back to red
///
/// The shift per frame follows the device time factor, so the cycle keeps
/// the same real-time speed at any frame rate.
#[derive(Debug, Clone)]
pub struct SimpleFadeAnimation {
    device: ReadOnlyDeviceConfiguration,
    frame: Layer,
    style: AnimationStyle,
    phase: ShiftPhase,
    channels: [u8; 3],
    pending_shift: IntFraction,
    smooth_crossfade: bool,
}

impl SimpleFadeAnimation {
    pub fn new(device: ReadOnlyDeviceConfiguration) -> Result<Self> {
        let frame = Layer::with_mode(device.light_count(), BlendMode::Combine)?;
        Ok(Self {
            device,
            frame,
            style: AnimationStyle::default(),
            phase: ShiftPhase::Red,
            channels: [u8::MAX, 0, 0],
            pending_shift: IntFraction::default(),
            smooth_crossfade: false,
        })
    }

    /// Start after an already shown frame, cross-fading from it
    ///
    /// Only the blend mode of `previous` is kept. The cross-fade itself
    /// starts from whatever the scheduler last showed on the queue.
    pub fn with_previous_frame(
        device: ReadOnlyDeviceConfiguration,
        previous: &Layer,
    ) -> Result<Self> {
        let mut animation = Self::new(device)?;
        animation.frame.set_blend_mode(previous.blend_mode());
        animation.smooth_crossfade = true;
        Ok(animation)
    }

    #[must_use]
    pub fn with_style(mut self, style: AnimationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn current_color(&self) -> Color {
        let [r, g, b] = self.channels;
        Color::new(r, g, b)
    }

    fn shift(&mut self) {
        self.pending_shift +=
            self.style.color_shift_amount() * (self.device.factor_time() / SHIFT_REFERENCE_MS);
        let amount = u8::try_from(self.pending_shift.take_int().clamp(0, 255)).unwrap_or(u8::MAX);

        let (falling, rising, next) = match self.phase {
            ShiftPhase::Red => (0, 1, ShiftPhase::Green),
            ShiftPhase::Green => (1, 2, ShiftPhase::Blue),
            ShiftPhase::Blue => (2, 0, ShiftPhase::Red),
        };
        self.channels[falling] = self.channels[falling].saturating_sub(amount);
        self.channels[rising] = self.channels[rising].saturating_add(amount);
        if self.channels[falling] == 0 && self.channels[rising] == u8::MAX {
            self.phase = next;
        }
    }
}

impl Animation for SimpleFadeAnimation {
    fn name(&self) -> &'static str {
        ANIMATION_NAME_FADE
    }

    fn next_frame(&mut self) -> Result<Layer> {
        self.shift();
        self.frame.fill(self.current_color());
        Ok(self.frame.clone())
    }

    fn request_smooth_crossfade(&self) -> bool {
        self.smooth_crossfade
    }
}
