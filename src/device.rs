//! Output device geometry and timing.

use core::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};

/// Update delay giving a time factor of 1 (one frame per millisecond)
const BASE_UPDATE_DELAY_MS: f64 = 1.0;
const BASE_STRAND_LENGTH: f64 = 1.0;
const BASE_LIGHTS_PER_METER: f64 = 1.0 / BASE_STRAND_LENGTH;
/// Weight of a new latency sample in the rolling averages
const LATENCY_FRESHNESS: f64 = 0.3;

/// Geometry and latency figures of an output device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceConfiguration {
    light_count: usize,
    strand_length: f64,
    lights_per_meter: f64,
    factor_fixed_size: f64,
    factor_scaled_size: f64,
    average_device_latency: f64,
    average_render_latency: f64,
    update_delay: f64,
    has_update_rate: bool,
}

impl DeviceConfiguration {
    /// Create a configuration for `light_count` lights over `strand_length` meters
    pub fn new(light_count: usize, strand_length: f64) -> Result<Self> {
        if light_count == 0 {
            return Err(Error::out_of_range(
                "LightCount",
                "LightCount must be greater than zero.",
            ));
        }
        if strand_length.is_nan() || strand_length <= 0.0 {
            return Err(Error::out_of_range(
                "StrandLength",
                "StrandLength must be greater than zero.",
            ));
        }
        #[allow(clippy::cast_precision_loss)]
        let lights_per_meter = light_count as f64 / strand_length;
        let factor_fixed_size = lights_per_meter / BASE_LIGHTS_PER_METER;
        Ok(Self {
            light_count,
            strand_length,
            lights_per_meter,
            factor_fixed_size,
            factor_scaled_size: factor_fixed_size * (strand_length / BASE_STRAND_LENGTH),
            average_device_latency: 0.0,
            average_render_latency: 0.0,
            update_delay: 0.0,
            has_update_rate: false,
        })
    }

    pub fn light_count(&self) -> usize {
        self.light_count
    }

    /// Lighted length of the strand in meters
    pub fn strand_length(&self) -> f64 {
        self.strand_length
    }

    pub fn lights_per_meter(&self) -> f64 {
        self.lights_per_meter
    }

    /// Multiplier keeping a fixed physical size regardless of light spacing
    pub fn factor_fixed_size(&self) -> f64 {
        self.factor_fixed_size
    }

    /// Multiplier keeping a size proportional to the strand length
    pub fn factor_scaled_size(&self) -> f64 {
        self.factor_scaled_size
    }

    pub fn average_device_latency(&self) -> f64 {
        self.average_device_latency
    }

    pub fn average_render_latency(&self) -> f64 {
        self.average_render_latency
    }

    /// Combined rolling average of device and render latency, in milliseconds
    pub fn average_latency(&self) -> f64 {
        self.average_device_latency + self.average_render_latency
    }

    /// Time per output frame relative to one millisecond
    ///
    /// Multiply per-millisecond movement by this to keep animation speed
    /// independent of the frame rate.
    pub fn factor_time(&self) -> f64 {
        self.update_delay / BASE_UPDATE_DELAY_MS
    }

    /// Clamp an index into `0..light_count`
    pub fn clip_index(&self, index: i64) -> usize {
        let max = self.light_count - 1;
        usize::try_from(index).map_or(0, |index| index.min(max))
    }

    /// Record the latest device and render delays, in milliseconds
    pub fn set_update_rate(&mut self, device_delay: f64, render_delay: f64) -> Result<()> {
        if device_delay.is_nan() || device_delay < 0.0 {
            return Err(Error::out_of_range(
                "DeviceDelay",
                "DeviceDelay must be greater than or equal to zero.",
            ));
        }
        if render_delay.is_nan() || render_delay < 0.0 {
            return Err(Error::out_of_range(
                "RenderDelay",
                "RenderDelay must be greater than or equal to zero.",
            ));
        }
        if self.has_update_rate {
            self.average_device_latency = device_delay * LATENCY_FRESHNESS
                + self.average_device_latency * (1.0 - LATENCY_FRESHNESS);
            self.average_render_latency = render_delay * LATENCY_FRESHNESS
                + self.average_render_latency * (1.0 - LATENCY_FRESHNESS);
        } else {
            self.average_device_latency = device_delay;
            self.average_render_latency = render_delay;
            self.has_update_rate = true;
        }
        self.update_delay = device_delay + render_delay;
        Ok(())
    }
}

impl fmt::Display for DeviceConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[DeviceConfiguration: LightCount={}, StrandLength={}, LightsPerMeter={}, \
             AverageLatency={}, FactorTime={}]",
            self.light_count,
            self.strand_length,
            self.lights_per_meter,
            self.average_latency(),
            self.factor_time()
        )
    }
}

/// Device configuration owned by an output and updated as it measures latency
#[derive(Debug, Clone)]
pub struct SharedDeviceConfiguration {
    inner: Arc<RwLock<DeviceConfiguration>>,
}

impl SharedDeviceConfiguration {
    pub fn new(config: DeviceConfiguration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn snapshot(&self) -> DeviceConfiguration {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_update_rate(&self, device_delay: f64, render_delay: f64) -> Result<()> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_update_rate(device_delay, render_delay)
    }

    /// View that can observe but never change the configuration
    pub fn read_only(&self) -> ReadOnlyDeviceConfiguration {
        ReadOnlyDeviceConfiguration {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Live, read-only view of a device configuration
#[derive(Debug, Clone)]
pub struct ReadOnlyDeviceConfiguration {
    inner: Arc<RwLock<DeviceConfiguration>>,
}

impl ReadOnlyDeviceConfiguration {
    pub fn snapshot(&self) -> DeviceConfiguration {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn light_count(&self) -> usize {
        self.snapshot().light_count()
    }

    pub fn factor_time(&self) -> f64 {
        self.snapshot().factor_time()
    }

    pub fn average_latency(&self) -> f64 {
        self.snapshot().average_latency()
    }
}

impl From<DeviceConfiguration> for ReadOnlyDeviceConfiguration {
    fn from(config: DeviceConfiguration) -> Self {
        SharedDeviceConfiguration::new(config).read_only()
    }
}
