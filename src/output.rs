//! Output device contract and the bundled devices.

use embassy_time::{Duration, Instant};
use log::debug;
use smart_leds::SmartLedsWrite;

use crate::color::Rgb;
use crate::device::{DeviceConfiguration, ReadOnlyDeviceConfiguration, SharedDeviceConfiguration};
use crate::error::{Error, Result};
use crate::layer::Layer;

/// Light count of the dummy test strand
pub const DUMMY_LIGHT_COUNT: usize = 50;
/// Length of the dummy test strand, in meters
pub const DUMMY_STRAND_LENGTH: f64 = 12.4;
/// Update rate reported by the dummy output, in milliseconds
pub const DUMMY_UPDATE_RATE_MS: f64 = 5.0;
const DUMMY_PACE: std::time::Duration = std::time::Duration::from_millis(5);

/// Abstract light output
///
/// Implement this trait to drive a physical strand. The scheduler is
/// generic over it. Updates return `Ok(false)` when the device declined
/// the frame and `Err` on I/O failure; only I/O failures are retried.
pub trait OutputDevice: Send {
    /// Name of the device, such as a port path
    fn identifier(&self) -> &str;

    fn is_initialized(&self) -> bool;

    fn initialize(&mut self) -> Result<()>;

    fn shutdown(&mut self) -> Result<()>;

    /// Live view of the device geometry and timing
    fn configuration(&self) -> ReadOnlyDeviceConfiguration;

    /// Send color and brightness of every light
    fn update_all(&mut self, frame: &Layer, processing_time: Option<Duration>) -> Result<bool>;

    /// Send only the color channels of every light
    fn update_color(&mut self, frame: &Layer, processing_time: Option<Duration>) -> Result<bool>;

    /// Send only the brightness of every light
    fn update_brightness(
        &mut self,
        frame: &Layer,
        processing_time: Option<Duration>,
    ) -> Result<bool>;
}

/// Reject frames that do not match the device light count
pub fn validate_frame(config: &DeviceConfiguration, frame: &Layer) -> Result<()> {
    if frame.pixel_count() == config.light_count() {
        return Ok(());
    }
    Err(Error::pixel_count_mismatch(
        "Lights",
        format!(
            "Lights must contain {} pixels to match the device, got {}.",
            config.light_count(),
            frame.pixel_count()
        ),
    ))
}

/// Which kind of update an output received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    All,
    Color,
    Brightness,
}

/// Output that accepts every frame and remembers the last one
#[derive(Debug)]
pub struct DummyOutput {
    config: SharedDeviceConfiguration,
    initialized: bool,
    last_frame: Option<(UpdateKind, Layer)>,
    frames_sent: u64,
    paced: bool,
}

impl DummyOutput {
    /// Dummy strand of 50 lights over 12.4 meters, updating every 5 ms
    pub fn new() -> Result<Self> {
        Self::with_configuration(DeviceConfiguration::new(
            DUMMY_LIGHT_COUNT,
            DUMMY_STRAND_LENGTH,
        )?)
    }

    pub fn with_configuration(mut config: DeviceConfiguration) -> Result<Self> {
        config.set_update_rate(DUMMY_UPDATE_RATE_MS, 0.0)?;
        Ok(Self {
            config: SharedDeviceConfiguration::new(config),
            initialized: false,
            last_frame: None,
            frames_sent: 0,
            paced: false,
        })
    }

    /// Block for the reported update rate on every frame, like a real strand
    #[must_use]
    pub fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    pub fn last_frame(&self) -> Option<&Layer> {
        self.last_frame.as_ref().map(|(_, frame)| frame)
    }

    pub fn last_update_kind(&self) -> Option<UpdateKind> {
        self.last_frame.as_ref().map(|(kind, _)| *kind)
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    fn record(&mut self, kind: UpdateKind, frame: &Layer) -> Result<bool> {
        validate_frame(&self.config.snapshot(), frame)?;
        if self.paced {
            std::thread::sleep(DUMMY_PACE);
        }
        self.last_frame = Some((kind, frame.clone()));
        self.frames_sent += 1;
        Ok(true)
    }
}

impl OutputDevice for DummyOutput {
    fn identifier(&self) -> &str {
        "/dev/null"
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.initialized = false;
        Ok(())
    }

    fn configuration(&self) -> ReadOnlyDeviceConfiguration {
        self.config.read_only()
    }

    fn update_all(&mut self, frame: &Layer, _processing_time: Option<Duration>) -> Result<bool> {
        self.record(UpdateKind::All, frame)
    }

    fn update_color(&mut self, frame: &Layer, _processing_time: Option<Duration>) -> Result<bool> {
        self.record(UpdateKind::Color, frame)
    }

    fn update_brightness(
        &mut self,
        frame: &Layer,
        _processing_time: Option<Duration>,
    ) -> Result<bool> {
        self.record(UpdateKind::Brightness, frame)
    }
}

/// Output writing frames to any `smart-leds` driver
///
/// Addressable strips cannot update channels separately, so every update
/// kind sends the full brightness-scaled frame. Write latency and the
/// processing hint feed the device timing figures.
pub struct SmartLedsOutput<W> {
    writer: W,
    identifier: String,
    config: SharedDeviceConfiguration,
    initialized: bool,
}

impl<W> SmartLedsOutput<W>
where
    W: SmartLedsWrite<Color = Rgb> + Send,
    W::Error: core::fmt::Debug,
{
    pub fn new(writer: W, identifier: impl Into<String>, config: DeviceConfiguration) -> Self {
        Self {
            writer,
            identifier: identifier.into(),
            config: SharedDeviceConfiguration::new(config),
            initialized: false,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn write(&mut self, frame: &Layer, processing_time: Option<Duration>) -> Result<bool> {
        validate_frame(&self.config.snapshot(), frame)?;
        let started = Instant::now();
        self.writer
            .write(frame.iter().map(crate::color::Color::to_rgb8))
            .map_err(|err| std::io::Error::other(format!("{err:?}")))?;
        let device_ms = duration_ms(started.elapsed());
        let render_ms = processing_time.map_or(0.0, duration_ms);
        self.config.set_update_rate(device_ms, render_ms)?;
        Ok(true)
    }
}

impl<W> OutputDevice for SmartLedsOutput<W>
where
    W: SmartLedsWrite<Color = Rgb> + Send,
    W::Error: core::fmt::Debug,
{
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn initialize(&mut self) -> Result<()> {
        debug!("initializing {}", self.identifier);
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        let light_count = self.config.snapshot().light_count();
        let dark = core::iter::repeat_n(Rgb::default(), light_count);
        self.writer
            .write(dark)
            .map_err(|err| std::io::Error::other(format!("{err:?}")))?;
        self.initialized = false;
        Ok(())
    }

    fn configuration(&self) -> ReadOnlyDeviceConfiguration {
        self.config.read_only()
    }

    fn update_all(&mut self, frame: &Layer, processing_time: Option<Duration>) -> Result<bool> {
        self.write(frame, processing_time)
    }

    fn update_color(&mut self, frame: &Layer, processing_time: Option<Duration>) -> Result<bool> {
        self.write(frame, processing_time)
    }

    fn update_brightness(
        &mut self,
        frame: &Layer,
        processing_time: Option<Duration>,
    ) -> Result<bool> {
        self.write(frame, processing_time)
    }
}

#[allow(clippy::cast_precision_loss)]
fn duration_ms(duration: Duration) -> f64 {
    duration.as_micros() as f64 / 1000.0
}
