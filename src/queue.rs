//! Per-channel animation queue.

use std::collections::VecDeque;

use embassy_time::Duration;

use crate::animation::Animation;
use crate::color::{BlendMode, Color};
use crate::error::{Error, Result};
use crate::layer::Layer;

/// State of one composition channel
///
/// Holds the live target frame, a snapshot of the last frame that reached
/// the output, pending frames in FIFO order and the active animation.
pub struct LedQueue {
    lights: Layer,
    last_processed: Layer,
    frames: VecDeque<Layer>,
    animation: Option<Box<dyn Animation>>,
    blend_mode: BlendMode,
    idle_time: Duration,
    force_frame_request: bool,
}

impl LedQueue {
    /// Create a queue of dark lights
    ///
    /// With `clear` the lights are fully transparent instead of black.
    pub fn new(light_count: usize, clear: bool) -> Result<Self> {
        let fill = if clear {
            Color::TRANSPARENT
        } else {
            Color::BLACK
        };
        Ok(Self::from_frame(&Layer::filled(
            light_count,
            BlendMode::Combine,
            fill,
        )?))
    }

    /// Create a queue that continues from an already shown frame
    pub fn from_frame(frame: &Layer) -> Self {
        Self {
            lights: frame.clone(),
            last_processed: frame.clone(),
            frames: VecDeque::new(),
            animation: None,
            blend_mode: BlendMode::Combine,
            idle_time: Duration::from_millis(0),
            force_frame_request: false,
        }
    }

    pub fn light_count(&self) -> usize {
        self.lights.pixel_count()
    }

    /// Live target frame
    pub fn lights(&self) -> &Layer {
        &self.lights
    }

    pub fn set_lights(&mut self, lights: Layer) -> Result<()> {
        self.check_count("Lights", &lights)?;
        self.lights = lights;
        Ok(())
    }

    /// Apply an in-place edit to the live target frame
    pub(crate) fn update_lights<R>(&mut self, edit: impl FnOnce(&mut Layer) -> R) -> R {
        edit(&mut self.lights)
    }

    /// Snapshot of the last frame taken from this queue
    pub fn last_processed(&self) -> &Layer {
        &self.last_processed
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) {
        self.blend_mode = blend_mode;
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Append a copy of `frame`
    pub fn push_frame(&mut self, frame: &Layer) -> Result<()> {
        self.check_count("NextFrame", frame)?;
        self.frames.push_back(frame.clone());
        Ok(())
    }

    /// Append a copy of the live target frame
    pub fn push_current(&mut self) {
        self.frames.push_back(self.lights.clone());
    }

    /// Repeat the newest pending frame, or the live target when none is pending
    ///
    /// Forces a queue to take part in the next composition without waiting
    /// for its animation.
    pub fn push_last_frame(&mut self) {
        let frame = self.frames.back().unwrap_or(&self.lights).clone();
        self.frames.push_back(frame);
    }

    /// Take the oldest pending frame, stamped with the current blend mode
    pub fn pop_frame(&mut self) -> Option<Layer> {
        let mut frame = self.frames.pop_front()?;
        frame.set_blend_mode(self.blend_mode);
        Some(frame)
    }

    /// Take every pending frame, oldest first
    pub fn drain_frames(&mut self) -> Vec<Layer> {
        self.frames.drain(..).collect()
    }

    /// Copy the live target into the last processed snapshot
    pub fn mark_as_processed(&mut self) {
        self.last_processed = self.lights.clone();
    }

    pub fn clear_queue(&mut self) {
        self.frames.clear();
    }

    /// True only without an animation, pending frames, or visible lights
    pub fn lights_have_no_effect(&self) -> bool {
        self.animation.is_none() && self.frames.is_empty() && !self.lights.has_effect()
    }

    pub fn is_animation_active(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation(&self) -> Option<&dyn Animation> {
        self.animation.as_deref()
    }

    pub fn animation_mut(&mut self) -> Option<&mut (dyn Animation + 'static)> {
        self.animation.as_deref_mut()
    }

    /// Replace the active animation, returning the previous one
    pub fn set_animation(
        &mut self,
        animation: Option<Box<dyn Animation>>,
    ) -> Option<Box<dyn Animation>> {
        core::mem::replace(&mut self.animation, animation)
    }

    pub fn take_animation(&mut self) -> Option<Box<dyn Animation>> {
        self.animation.take()
    }

    /// Time spent idle since the last frame left this queue
    pub fn idle_time(&self) -> Duration {
        self.idle_time
    }

    pub fn add_idle_time(&mut self, idle: Duration) {
        self.idle_time += idle;
    }

    pub fn reset_idle_time(&mut self) {
        self.idle_time = Duration::from_millis(0);
    }

    pub fn force_frame_request(&self) -> bool {
        self.force_frame_request
    }

    pub fn set_force_frame_request(&mut self, force: bool) {
        self.force_frame_request = force;
    }

    fn check_count(&self, param: &'static str, frame: &Layer) -> Result<()> {
        if frame.pixel_count() == self.light_count() {
            return Ok(());
        }
        Err(Error::pixel_count_mismatch(
            param,
            format!(
                "{param} must contain same number of LEDs (has {}, expected {})",
                frame.pixel_count(),
                self.light_count()
            ),
        ))
    }
}

impl core::fmt::Debug for LedQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LedQueue")
            .field("lights", &self.lights)
            .field("frames", &self.frames.len())
            .field("animation", &self.animation.as_ref().map(|a| a.name()))
            .field("blend_mode", &self.blend_mode)
            .field("idle_time", &self.idle_time)
            .field("force_frame_request", &self.force_frame_request)
            .finish_non_exhaustive()
    }
}
