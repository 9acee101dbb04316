use embassy_time::Duration;

use super::{ANIMATION_NAME_FLASH, Animation};
use crate::color::{BlendMode, Color};
use crate::error::Result;
use crate::layer::Layer;

/// One-shot animation flashing a color a fixed number of times
///
/// Each flash is one lit frame followed by one transparent frame. After the
/// last dark frame the animation reports itself finished.
#[derive(Debug, Clone)]
pub struct FlashAnimation {
    frame: Layer,
    color: Color,
    remaining: u32,
    lit: bool,
    interval: Duration,
}

impl FlashAnimation {
    pub fn new(light_count: usize, color: Color, flashes: u32, interval: Duration) -> Result<Self> {
        Ok(Self {
            frame: Layer::filled(light_count, BlendMode::Combine, Color::TRANSPARENT)?,
            color,
            remaining: flashes,
            lit: false,
            interval,
        })
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Animation for FlashAnimation {
    fn name(&self) -> &'static str {
        ANIMATION_NAME_FLASH
    }

    fn next_frame(&mut self) -> Result<Layer> {
        if self.lit {
            self.lit = false;
            self.remaining = self.remaining.saturating_sub(1);
            self.frame.fill(Color::TRANSPARENT);
        } else if self.remaining > 0 {
            self.lit = true;
            self.frame.fill(self.color);
        }
        Ok(self.frame.clone())
    }

    fn requested_delay(&self) -> Duration {
        self.interval
    }

    fn is_finished(&self) -> bool {
        self.remaining == 0 && !self.lit
    }
}
