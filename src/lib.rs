pub mod animation;
pub mod audio;
pub mod bounds;
pub mod channel;
pub mod color;
pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod filter;
pub mod int_fraction;
pub mod layer;
pub mod math8;
pub mod output;
pub mod queue;
pub mod scheduler;

pub use animation::{
    Animation, AnimationStyle, FlashAnimation, LevelMeterAnimation, SimpleFadeAnimation,
};
pub use audio::{AudioInput, SilentAudioInput};
pub use bounds::PixelRange;
pub use color::{BlendMode, Color, Rgb};
pub use command::{
    Command, CommandReceiver, CommandSender, QueueStatus, QueueTarget, command_channel,
};
pub use config::SchedulerConfig;
pub use device::{DeviceConfiguration, ReadOnlyDeviceConfiguration, SharedDeviceConfiguration};
pub use error::{Error, Result};
pub use filter::ScaledAverage;
pub use int_fraction::IntFraction;
pub use layer::Layer;
pub use output::{DummyOutput, OutputDevice, SmartLedsOutput};
pub use queue::LedQueue;
pub use scheduler::{Scheduler, SchedulerThread, TickOutcome, compose};

pub use embassy_time::{Duration, Instant};
