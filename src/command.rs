//! Commands accepted by the scheduler and the handle used to send them.

use core::fmt;
use std::sync::mpsc;

use crate::animation::Animation;
use crate::bounds::PixelRange;
use crate::channel::{Receiver, Sender, channel};
use crate::color::{BlendMode, Color};
use crate::error::{Error, Result};
use crate::layer::Layer;

/// Queue a command applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueueTarget {
    /// The base channel, which always exists
    Base,
    /// A named overlay, created on first reference
    Overlay(String),
}

impl QueueTarget {
    pub fn overlay(name: impl Into<String>) -> Self {
        Self::Overlay(name.into())
    }
}

impl fmt::Display for QueueTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueTarget::Base => f.write_str("base"),
            QueueTarget::Overlay(name) => write!(f, "overlay '{name}'"),
        }
    }
}

/// Change applied to a queue's target frame through a cross-fade
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Fill(Color),
    PixelRange { range: PixelRange, color: Color },
    BrightnessRange { range: PixelRange, brightness: u8 },
    Frame(Layer),
}

impl Transform {
    /// Apply the change to `layer`
    pub fn apply(&self, layer: &mut Layer) -> Result<()> {
        match self {
            Transform::Fill(color) => {
                layer.fill(*color);
                Ok(())
            }
            Transform::PixelRange { range, color } => layer.fill_range(*range, *color),
            Transform::BrightnessRange { range, brightness } => {
                layer.set_brightness_range(*range, *brightness)
            }
            Transform::Frame(frame) => {
                if frame.pixel_count() != layer.pixel_count() {
                    return Err(Error::pixel_count_mismatch(
                        "Frame",
                        "Frame must have the same number of pixels as the queue.",
                    ));
                }
                let mode = layer.blend_mode();
                *layer = frame.clone();
                layer.set_blend_mode(mode);
                Ok(())
            }
        }
    }
}

/// Snapshot of one queue, returned by status queries
#[derive(Debug, Clone, PartialEq)]
pub struct QueueStatus {
    pub target: QueueTarget,
    pub animation: Option<&'static str>,
    pub blend_mode: BlendMode,
    pub pending_frames: usize,
    pub has_effect: bool,
    pub lights: Layer,
}

/// Operations that can be performed on the scheduler
pub enum Command {
    SetPixelRange {
        target: QueueTarget,
        range: PixelRange,
        color: Color,
    },
    SetBrightnessRange {
        target: QueueTarget,
        range: PixelRange,
        brightness: u8,
    },
    Fill {
        target: QueueTarget,
        color: Color,
    },
    /// Show a complete frame
    ShowFrame {
        target: QueueTarget,
        frame: Layer,
    },
    PlayAnimation {
        target: QueueTarget,
        animation: Box<dyn Animation>,
    },
    StopAnimation {
        target: QueueTarget,
    },
    SetBlendMode {
        target: QueueTarget,
        mode: BlendMode,
    },
    CreateOverlay {
        name: String,
        mode: BlendMode,
    },
    DestroyOverlay {
        name: String,
    },
    /// Remove every overlay
    ClearOverlays,
    /// Enable or disable cross-fades between commanded frames
    SetFading(bool),
    Query {
        target: QueueTarget,
        reply: mpsc::Sender<Option<QueueStatus>>,
    },
    ListOverlays {
        reply: mpsc::Sender<Vec<String>>,
    },
}

impl Command {
    /// Cross-faded change described by this command, if it is one
    pub(crate) fn transform(&self) -> Option<(&QueueTarget, Transform)> {
        match self {
            Command::SetPixelRange {
                target,
                range,
                color,
            } => Some((
                target,
                Transform::PixelRange {
                    range: *range,
                    color: *color,
                },
            )),
            Command::SetBrightnessRange {
                target,
                range,
                brightness,
            } => Some((
                target,
                Transform::BrightnessRange {
                    range: *range,
                    brightness: *brightness,
                },
            )),
            Command::Fill { target, color } => Some((target, Transform::Fill(*color))),
            Command::ShowFrame { target, frame } => Some((target, Transform::Frame(frame.clone()))),
            _ => None,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetPixelRange { target, range, .. } => {
                write!(f, "SetPixelRange({target}, {}..{})", range.start, range.end)
            }
            Command::SetBrightnessRange { target, range, .. } => {
                write!(f, "SetBrightnessRange({target}, {}..{})", range.start, range.end)
            }
            Command::Fill { target, color } => write!(f, "Fill({target}, {color})"),
            Command::ShowFrame { target, .. } => write!(f, "ShowFrame({target})"),
            Command::PlayAnimation { target, animation } => {
                write!(f, "PlayAnimation({target}, {})", animation.name())
            }
            Command::StopAnimation { target } => write!(f, "StopAnimation({target})"),
            Command::SetBlendMode { target, mode } => write!(f, "SetBlendMode({target}, {mode})"),
            Command::CreateOverlay { name, mode } => write!(f, "CreateOverlay({name}, {mode})"),
            Command::DestroyOverlay { name } => write!(f, "DestroyOverlay({name})"),
            Command::ClearOverlays => f.write_str("ClearOverlays"),
            Command::SetFading(enabled) => write!(f, "SetFading({enabled})"),
            Command::Query { target, .. } => write!(f, "Query({target})"),
            Command::ListOverlays { .. } => f.write_str("ListOverlays"),
        }
    }
}

/// Type alias for command receiver
pub type CommandReceiver = Receiver<Command>;

/// Create a command channel
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (sender, receiver) = channel();
    (CommandSender { inner: sender }, receiver)
}

impl From<Sender<Command>> for CommandSender {
    fn from(inner: Sender<Command>) -> Self {
        Self { inner }
    }
}

/// Handle used by command handlers to reach the scheduler
///
/// Sending never blocks. Queries wait only for the scheduler's reply.
#[derive(Clone)]
pub struct CommandSender {
    inner: Sender<Command>,
}

impl CommandSender {
    pub fn send(&self, command: Command) -> Result<()> {
        self.inner.send(command).map_err(|_| Error::Disconnected)
    }

    pub fn set_pixel_range(
        &self,
        target: QueueTarget,
        range: PixelRange,
        color: Color,
    ) -> Result<()> {
        self.send(Command::SetPixelRange {
            target,
            range,
            color,
        })
    }

    pub fn set_brightness_range(
        &self,
        target: QueueTarget,
        range: PixelRange,
        brightness: u8,
    ) -> Result<()> {
        self.send(Command::SetBrightnessRange {
            target,
            range,
            brightness,
        })
    }

    pub fn fill(&self, target: QueueTarget, color: Color) -> Result<()> {
        self.send(Command::Fill { target, color })
    }

    pub fn show_frame(&self, target: QueueTarget, frame: Layer) -> Result<()> {
        self.send(Command::ShowFrame { target, frame })
    }

    pub fn play_animation(&self, target: QueueTarget, animation: Box<dyn Animation>) -> Result<()> {
        self.send(Command::PlayAnimation { target, animation })
    }

    pub fn stop_animation(&self, target: QueueTarget) -> Result<()> {
        self.send(Command::StopAnimation { target })
    }

    pub fn set_blend_mode(&self, target: QueueTarget, mode: BlendMode) -> Result<()> {
        self.send(Command::SetBlendMode { target, mode })
    }

    pub fn create_overlay(&self, name: impl Into<String>, mode: BlendMode) -> Result<()> {
        self.send(Command::CreateOverlay {
            name: name.into(),
            mode,
        })
    }

    pub fn destroy_overlay(&self, name: impl Into<String>) -> Result<()> {
        self.send(Command::DestroyOverlay { name: name.into() })
    }

    pub fn clear_overlays(&self) -> Result<()> {
        self.send(Command::ClearOverlays)
    }

    pub fn set_fading(&self, enabled: bool) -> Result<()> {
        self.send(Command::SetFading(enabled))
    }

    /// Ask for a queue's status without waiting for the answer
    pub fn request_status(
        &self,
        target: QueueTarget,
    ) -> Result<mpsc::Receiver<Option<QueueStatus>>> {
        let (reply, answer) = mpsc::channel();
        self.send(Command::Query { target, reply })?;
        Ok(answer)
    }

    /// Query a queue's status, blocking until the scheduler answers
    ///
    /// Returns `None` for an overlay that does not exist.
    pub fn query(&self, target: QueueTarget) -> Result<Option<QueueStatus>> {
        self.request_status(target)?
            .recv()
            .map_err(|_| Error::Disconnected)
    }

    pub fn list_overlays(&self) -> Result<Vec<String>> {
        let (reply, answer) = mpsc::channel();
        self.send(Command::ListOverlays { reply })?;
        answer.recv().map_err(|_| Error::Disconnected)
    }

    /// Ask the scheduler loop to stop
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}
