//! Background composition loop.
//!
//! The scheduler owns every queue. Command handlers reach it only through
//! a [`CommandSender`], so queue state never needs a lock.
//!
//! # Usage
//!
//! ```ignore
//! let (commands, receiver) = command_channel();
//! let scheduler = Scheduler::new(DummyOutput::new()?, SchedulerConfig::default(), receiver)?;
//! let thread = SchedulerThread::spawn(scheduler)?;
//!
//! commands.fill(QueueTarget::Base, Color::AZURE)?;
//! thread.stop()?;
//! ```

mod compose;
mod crossfade;
mod runner;

use embassy_time::{Duration, Instant};
use log::{debug, error, info, warn};

pub use compose::compose;
pub use runner::SchedulerThread;

use crate::animation::{Animation, filter_onto};
use crate::audio::{AudioInput, SilentAudioInput};
use crate::channel::Wake;
use crate::color::Color;
use crate::command::{Command, CommandReceiver, CommandSender, QueueStatus, QueueTarget, Transform};
use crate::config::SchedulerConfig;
use crate::device::ReadOnlyDeviceConfiguration;
use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::output::OutputDevice;
use crate::queue::LedQueue;
use crossfade::{FadeTiming, crossfade};

/// Index of the base queue; overlays follow in creation order
const BASE_QUEUE: usize = 0;

/// Result of one scheduler iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A composed frame reached the output
    Dispatched,
    /// Nothing to show; wait this long before the next tick
    ///
    /// The wait is not credited to the queues until it has passed, see
    /// [`Scheduler::add_idle_time`].
    Idle(Duration),
    /// The command channel was cancelled
    Cancelled,
}

/// Composition loop state
pub struct Scheduler<O: OutputDevice> {
    // External dependencies and configuration
    output: O,
    device: ReadOnlyDeviceConfiguration,
    audio: Box<dyn AudioInput>,
    commands: CommandReceiver,
    config: SchedulerConfig,

    // Queues
    base: LedQueue,
    overlays: Vec<(String, LedQueue)>,

    // Internal state
    fading_enabled: bool,
    audio_users: usize,
    idle_wait: Duration,
    depth_warning_shown: bool,
}

impl<O: OutputDevice> Scheduler<O> {
    /// Create a scheduler driving `output`
    ///
    /// Initializes the output if needed. The base queue starts dark.
    pub fn new(mut output: O, config: SchedulerConfig, commands: CommandReceiver) -> Result<Self> {
        if !output.is_initialized() {
            output.initialize()?;
        }
        let device = output.configuration();
        let base = LedQueue::new(device.light_count(), false)?;
        info!(
            "scheduler ready on {} with {} lights",
            output.identifier(),
            device.light_count()
        );
        Ok(Self {
            output,
            device,
            audio: Box::new(SilentAudioInput::default()),
            commands,
            fading_enabled: config.fading_enabled,
            idle_wait: config.idle_wait_min(),
            config,
            base,
            overlays: Vec::new(),
            audio_users: 0,
            depth_warning_shown: false,
        })
    }

    /// Use `audio` as the capture source for audio-reactive animations
    #[must_use]
    pub fn with_audio(mut self, audio: Box<dyn AudioInput>) -> Self {
        self.audio = audio;
        self
    }

    /// Another handle for sending commands to this scheduler
    pub fn command_sender(&self) -> CommandSender {
        CommandSender::from(self.commands.sender())
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn fading_enabled(&self) -> bool {
        self.fading_enabled
    }

    pub fn base(&self) -> &LedQueue {
        &self.base
    }

    pub fn overlay(&self, name: &str) -> Option<&LedQueue> {
        self.overlays
            .iter()
            .find(|(overlay, _)| overlay == name)
            .map(|(_, queue)| queue)
    }

    /// Overlay names in creation order
    pub fn overlay_names(&self) -> Vec<String> {
        self.overlays.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Number of active animations consuming audio
    pub fn audio_users(&self) -> usize {
        self.audio_users
    }

    /// Wait used by the next idle tick
    pub fn idle_wait(&self) -> Duration {
        self.idle_wait
    }

    /// Whether the queued-frame warning is currently raised
    pub fn depth_warning_active(&self) -> bool {
        self.depth_warning_shown
    }

    /// Run one iteration of the loop
    ///
    /// Handles pending commands, pulls due animation frames, composes one
    /// frame from every queue and sends it to the output. Only an
    /// unrecoverable output failure is returned as an error.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.commands.is_cancelled() {
            return Ok(TickOutcome::Cancelled);
        }
        let started = Instant::now();

        self.process_commands();
        self.feed_audio();
        self.advance_animations();

        let frames = self.drain_frames()?;
        self.remove_finished_overlays();

        let outcome = match compose(&frames)? {
            Some(frame) => {
                self.dispatch(&frame, started.elapsed())?;
                self.idle_wait = self.config.idle_wait_min();
                TickOutcome::Dispatched
            }
            None => {
                let wait = self.idle_wait;
                self.idle_wait = (wait * self.config.idle_wait_multiplier.max(1))
                    .min(self.config.idle_wait_max());
                TickOutcome::Idle(wait)
            }
        };

        self.track_queue_depth();
        Ok(outcome)
    }

    /// Credit time spent between ticks to every queue
    ///
    /// Animation delays are measured against this time, so callers driving
    /// `tick` by hand pass the time they actually waited.
    pub fn add_idle_time(&mut self, elapsed: Duration) {
        for queue in self.queues_mut() {
            queue.add_idle_time(elapsed);
        }
    }

    /// Run until cancelled or the output is lost
    pub fn run(&mut self) -> Result<()> {
        info!("scheduler started on {}", self.output.identifier());
        let result = self.run_loop();
        self.halt_all();
        if let Err(err) = self.output.shutdown() {
            warn!("failed to shut down {}: {err}", self.output.identifier());
        }
        match &result {
            Ok(()) => info!("scheduler stopped"),
            Err(err) => error!("scheduler stopped: {err}"),
        }
        result
    }

    fn run_loop(&mut self) -> Result<()> {
        loop {
            match self.tick()? {
                TickOutcome::Dispatched => {}
                TickOutcome::Idle(wait) => {
                    // A command cuts the wait short
                    let started = Instant::now();
                    let wake = self.commands.wait(wait);
                    self.add_idle_time(started.elapsed());
                    if wake == Wake::Cancelled {
                        return Ok(());
                    }
                }
                TickOutcome::Cancelled => return Ok(()),
            }
        }
    }

    fn queues_mut(&mut self) -> impl Iterator<Item = &mut LedQueue> {
        core::iter::once(&mut self.base).chain(self.overlays.iter_mut().map(|(_, queue)| queue))
    }

    fn queue_at(&mut self, index: usize) -> Option<&mut LedQueue> {
        if index == BASE_QUEUE {
            Some(&mut self.base)
        } else {
            self.overlays.get_mut(index - 1).map(|(_, queue)| queue)
        }
    }

    fn find_queue(&self, target: &QueueTarget) -> Option<usize> {
        match target {
            QueueTarget::Base => Some(BASE_QUEUE),
            QueueTarget::Overlay(name) => self
                .overlays
                .iter()
                .position(|(overlay, _)| overlay == name)
                .map(|index| index + 1),
        }
    }

    /// Find a queue, creating a transparent overlay on first reference
    fn resolve_queue(&mut self, target: &QueueTarget) -> Result<usize> {
        if let Some(index) = self.find_queue(target) {
            return Ok(index);
        }
        let QueueTarget::Overlay(name) = target else {
            return Ok(BASE_QUEUE);
        };
        let queue = LedQueue::new(self.device.light_count(), true)?;
        self.overlays.push((name.clone(), queue));
        debug!("created overlay '{name}'");
        Ok(self.overlays.len())
    }

    fn fade_timing(&self) -> FadeTiming {
        FadeTiming {
            enabled: self.fading_enabled,
            duration: self.config.smoothing_duration(),
            factor_time: self.device.factor_time(),
        }
    }

    fn process_commands(&mut self) {
        while let Ok(command) = self.commands.try_receive() {
            debug!("command: {command:?}");
            if let Err(err) = self.apply_command(command) {
                warn!("command failed: {err}");
            }
        }
    }

    fn apply_command(&mut self, command: Command) -> Result<()> {
        if let Some((target, transform)) = command.transform() {
            let index = self.resolve_queue(target)?;
            let timing = self.fade_timing();
            return match self.queue_at(index) {
                Some(queue) => crossfade(queue, &transform, &timing),
                None => Ok(()),
            };
        }
        match command {
            Command::PlayAnimation { target, animation } => {
                let index = self.resolve_queue(&target)?;
                self.play_animation(index, animation)
            }
            Command::StopAnimation { target } => {
                if let Some(index) = self.find_queue(&target) {
                    self.stop_animation(index);
                }
                Ok(())
            }
            Command::SetBlendMode { target, mode } => {
                let index = self.resolve_queue(&target)?;
                if let Some(queue) = self.queue_at(index) {
                    queue.set_blend_mode(mode);
                }
                self.refresh_all_queues();
                Ok(())
            }
            Command::CreateOverlay { name, mode } => {
                let index = self.resolve_queue(&QueueTarget::Overlay(name))?;
                if let Some(queue) = self.queue_at(index) {
                    queue.set_blend_mode(mode);
                }
                Ok(())
            }
            Command::DestroyOverlay { name } => {
                if let Some(index) = self.find_queue(&QueueTarget::Overlay(name)) {
                    self.remove_overlay(index);
                    self.refresh_all_queues();
                }
                Ok(())
            }
            Command::ClearOverlays => {
                while !self.overlays.is_empty() {
                    self.remove_overlay(self.overlays.len());
                }
                self.refresh_all_queues();
                Ok(())
            }
            Command::SetFading(enabled) => {
                self.fading_enabled = enabled;
                Ok(())
            }
            Command::Query { target, reply } => {
                // The asker may have given up waiting
                let _ = reply.send(self.status(&target));
                Ok(())
            }
            Command::ListOverlays { reply } => {
                let _ = reply.send(self.overlay_names());
                Ok(())
            }
            Command::SetPixelRange { .. }
            | Command::SetBrightnessRange { .. }
            | Command::Fill { .. }
            | Command::ShowFrame { .. } => Ok(()),
        }
    }

    fn status(&self, target: &QueueTarget) -> Option<QueueStatus> {
        let queue = match target {
            QueueTarget::Base => &self.base,
            QueueTarget::Overlay(name) => self.overlay(name)?,
        };
        Some(QueueStatus {
            target: target.clone(),
            animation: queue.animation().map(|animation| animation.name()),
            blend_mode: queue.blend_mode(),
            pending_frames: queue.len(),
            has_effect: queue.lights().has_effect(),
            lights: queue.lights().clone(),
        })
    }

    /// Replace the queue's animation with `animation`
    fn play_animation(&mut self, index: usize, animation: Box<dyn Animation>) -> Result<()> {
        self.stop_animation(index);
        if animation.uses_audio() {
            self.acquire_audio()?;
        }
        let force = animation.requested_delay() > Duration::from_millis(0)
            || animation.request_smooth_crossfade();
        let name = animation.name();
        match self.queue_at(index) {
            Some(queue) => {
                queue.set_force_frame_request(force);
                queue.set_animation(Some(animation));
                info!("playing animation '{name}'");
            }
            None => self.release_animation(animation.as_ref()),
        }
        Ok(())
    }

    fn stop_animation(&mut self, index: usize) {
        let previous = self.queue_at(index).and_then(LedQueue::take_animation);
        if let Some(animation) = previous {
            debug!("stopped animation '{}'", animation.name());
            self.release_animation(animation.as_ref());
        }
    }

    fn acquire_audio(&mut self) -> Result<()> {
        if self.audio_users == 0 && !self.audio.is_capturing() {
            self.audio.start()?;
            info!("audio capture started");
        }
        self.audio_users += 1;
        Ok(())
    }

    fn release_animation(&mut self, animation: &dyn Animation) {
        if !animation.uses_audio() {
            return;
        }
        self.audio_users = self.audio_users.saturating_sub(1);
        if self.audio_users == 0 && self.audio.is_capturing() {
            self.audio.stop();
            info!("audio capture stopped");
        }
    }

    fn feed_audio(&mut self) {
        if self.audio_users == 0 {
            return;
        }
        let snapshot = self.audio.snapshot().to_vec();
        for queue in self.queues_mut() {
            if let Some(animation) = queue.animation_mut() {
                if animation.uses_audio() {
                    animation.update_audio(&snapshot);
                }
            }
        }
    }

    fn advance_animations(&mut self) {
        let timing = self.fade_timing();
        let failures: Vec<(usize, Error)> = self
            .queues_mut()
            .enumerate()
            .filter_map(|(index, queue)| {
                advance_animation(queue, &timing)
                    .err()
                    .map(|err| (index, err))
            })
            .collect();
        for (index, err) in failures {
            warn!("animation failed, resetting queue to transparent: {err}");
            self.stop_animation(index);
            if let Some(queue) = self.queue_at(index) {
                queue.update_lights(|lights| lights.fill(Color::TRANSPARENT));
                queue.push_current();
            }
        }
    }

    /// Take at most one frame from every queue
    ///
    /// Once any queue has a frame, idle queues contribute their last shown
    /// frame so they stay part of the composition.
    fn drain_frames(&mut self) -> Result<Vec<Layer>> {
        let update_needed = self.queues_mut().any(|queue| !queue.is_empty());
        let mut frames = Vec::new();
        for queue in self.queues_mut() {
            if let Some(frame) = queue.pop_frame() {
                queue.reset_idle_time();
                queue.set_lights(frame.clone())?;
                queue.mark_as_processed();
                frames.push(frame);
            } else if update_needed {
                let mut frame = queue.last_processed().clone();
                frame.set_blend_mode(queue.blend_mode());
                frames.push(frame);
            }
        }
        Ok(frames)
    }

    /// Drop overlays that show nothing or whose one-shot animation finished
    fn remove_finished_overlays(&mut self) {
        let mut removed_overriding = false;
        let mut index = self.overlays.len();
        while index > 0 {
            let (_, queue) = &self.overlays[index - 1];
            let finished = queue.animation().is_some_and(|animation| animation.is_finished());
            if finished || queue.lights_have_no_effect() {
                removed_overriding |= queue.blend_mode().is_overriding();
                self.remove_overlay(index);
            }
            index -= 1;
        }
        if removed_overriding {
            self.refresh_all_queues();
        }
    }

    /// Halt and remove the overlay at queue `index`
    fn remove_overlay(&mut self, index: usize) {
        if index == BASE_QUEUE || index > self.overlays.len() {
            return;
        }
        self.stop_animation(index);
        let (name, mut queue) = self.overlays.remove(index - 1);
        queue.clear_queue();
        debug!("removed overlay '{name}'");
    }

    /// Queue one more copy of every queue's newest frame to force recomposition
    fn refresh_all_queues(&mut self) {
        for queue in self.queues_mut() {
            queue.push_last_frame();
        }
    }

    fn halt_all(&mut self) {
        for index in 0..=self.overlays.len() {
            self.stop_animation(index);
        }
    }

    /// Send `frame`, retrying transient failures with device re-initialization
    fn dispatch(&mut self, frame: &Layer, processing_time: Duration) -> Result<()> {
        let attempts = self.config.dispatch_attempts.max(1);
        for attempt in 1..=attempts {
            match self.output.update_all(frame, Some(processing_time)) {
                Ok(true) => return Ok(()),
                Ok(false) => {
                    warn!("{} did not accept the frame", self.output.identifier());
                    return Ok(());
                }
                Err(Error::Io(err)) => {
                    warn!(
                        "failed to update {} (attempt {attempt} of {attempts}): {err}",
                        self.output.identifier()
                    );
                    if attempt == attempts {
                        break;
                    }
                    if self.commands.sleep(self.config.retry_backoff()) {
                        return Ok(());
                    }
                    if let Err(err) = self.reconnect() {
                        error!("failed to reconnect to {}: {err}", self.output.identifier());
                        return Err(Error::device_unavailable(format!(
                            "{} could not be re-initialized: {err}",
                            self.output.identifier()
                        )));
                    }
                }
                Err(err) => return Err(err),
            }
        }
        error!(
            "giving up on {} after {attempts} attempts",
            self.output.identifier()
        );
        Err(Error::device_unavailable(format!(
            "{} failed after {attempts} attempts",
            self.output.identifier()
        )))
    }

    fn reconnect(&mut self) -> Result<()> {
        if let Err(err) = self.output.shutdown() {
            warn!("failed to shut down {}: {err}", self.output.identifier());
        }
        self.output.initialize()?;
        info!("reconnected to {}", self.output.identifier());
        Ok(())
    }

    fn track_queue_depth(&mut self) {
        let depth: usize = self.queues_mut().map(|queue| queue.len()).sum();
        let threshold = self
            .config
            .queue_warning_threshold(self.device.average_latency());
        if depth >= threshold && !self.depth_warning_shown {
            warn!("output queue holds {depth} frames, more than {threshold}; animations may lag");
            self.depth_warning_shown = true;
        } else if depth < threshold && self.depth_warning_shown {
            info!("output queue now holds less than {threshold} frames");
            self.depth_warning_shown = false;
        }
    }
}

/// Pull the next frame from the queue's animation when one is due
fn advance_animation(queue: &mut LedQueue, timing: &FadeTiming) -> Result<()> {
    let Some(mut animation) = queue.take_animation() else {
        return Ok(());
    };
    let result = if queue.is_empty() && frame_due(queue, animation.as_ref()) {
        let rendered = render_next(queue, animation.as_mut(), timing);
        queue.set_force_frame_request(false);
        rendered
    } else {
        Ok(())
    };
    queue.set_animation(Some(animation));
    result
}

fn frame_due(queue: &LedQueue, animation: &dyn Animation) -> bool {
    let delay = animation.requested_delay();
    delay == Duration::from_millis(0)
        || queue.idle_time() >= delay
        || queue.force_frame_request()
}

fn render_next(
    queue: &mut LedQueue,
    animation: &mut dyn Animation,
    timing: &FadeTiming,
) -> Result<()> {
    let next = animation.next_frame()?;
    if timing.enabled {
        if let Some(filter) = animation.smoothing() {
            let filtered = filter_onto(queue.lights(), &next, filter)?;
            queue.set_lights(filtered)?;
            queue.push_current();
            return Ok(());
        }
    }
    if queue.force_frame_request() && animation.request_smooth_crossfade() {
        return crossfade(queue, &Transform::Frame(next), timing);
    }
    queue.set_lights(next)?;
    queue.push_current();
    Ok(())
}
