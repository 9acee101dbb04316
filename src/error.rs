//! Error type shared by the compositor primitives and the scheduler.

use thiserror::Error;

/// Result type alias for compositor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the compositor
#[derive(Error, Debug)]
pub enum Error {
    /// A numeric argument is outside its accepted range
    #[error("{param}: {message}")]
    OutOfRange {
        param: &'static str,
        message: String,
    },

    #[error("Pixel index of {index} out of bounds. Pixel index must be within 0 to PixelCount-1 ({max}).")]
    IndexOutOfBounds { index: usize, max: usize },

    /// Two pixel sequences were combined with different lengths
    #[error("{message}")]
    PixelCountMismatch {
        param: &'static str,
        message: String,
    },

    #[error("Attempted to divide by zero.")]
    DivideByZero,

    #[error("unknown blend mode: {0}")]
    UnknownBlendMode(String),

    /// An animation failed while producing a frame
    #[error("animation error: {0}")]
    Animation(String),

    /// The output device could not be reached after all retries
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The scheduler thread is gone
    #[error("scheduler disconnected")]
    Disconnected,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn out_of_range(param: &'static str, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            param,
            message: message.into(),
        }
    }

    pub fn pixel_count_mismatch(param: &'static str, message: impl Into<String>) -> Self {
        Self::PixelCountMismatch {
            param,
            message: message.into(),
        }
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn device_unavailable(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable(msg.into())
    }

    /// Name of the offending parameter, if the error is a contract violation
    pub fn param(&self) -> Option<&'static str> {
        match self {
            Self::OutOfRange { param, .. } | Self::PixelCountMismatch { param, .. } => Some(param),
            Self::IndexOutOfBounds { .. } => Some("index"),
            Self::DivideByZero => Some("right"),
            _ => None,
        }
    }
}
