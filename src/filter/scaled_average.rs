use core::fmt;

use crate::device::ReadOnlyDeviceConfiguration;
use crate::error::{Error, Result};

/// Exponential moving average scaled to the device frame rate
///
/// The time constant is expressed in the same units as the device time
/// factor (milliseconds), so the filter approaches its target at the same
/// real-time speed regardless of how fast frames are produced. The device
/// rate is read on every use.
#[derive(Debug, Clone)]
pub struct ScaledAverage {
    device: ReadOnlyDeviceConfiguration,
    time_constant: f64,
}

impl ScaledAverage {
    pub fn new(device: ReadOnlyDeviceConfiguration, constant: f64) -> Result<Self> {
        check_time_constant("Constant", constant)?;
        Ok(Self {
            device,
            time_constant: constant,
        })
    }

    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    pub fn set_time_constant(&mut self, time_constant: f64) -> Result<()> {
        check_time_constant("TimeConstant", time_constant)?;
        self.time_constant = time_constant;
        Ok(())
    }

    /// Share of the new value kept on each filter step, in `(0, 1]`
    pub fn weight_multiplier(&self) -> f64 {
        let update_rate = self.device.factor_time();
        if update_rate <= 0.0 || self.time_constant < update_rate {
            return 1.0;
        }
        1.0 / (((self.time_constant / update_rate) + 1.0) / 2.0)
    }

    /// Move `past` one step towards `new`
    pub fn filter(&self, past: f64, new: f64) -> f64 {
        let weight = self.weight_multiplier();
        (1.0 - weight) * past + weight * new
    }

    /// Integer variant, rounding towards `new` so the output never stalls
    #[allow(clippy::cast_possible_truncation)]
    pub fn filter_i32(&self, past: i32, new: i32) -> i32 {
        let filtered = self.filter(f64::from(past), f64::from(new));
        let stepped = if new > past {
            filtered.ceil()
        } else {
            filtered.floor()
        };
        stepped as i32
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn filter_u8(&self, past: u8, new: u8) -> u8 {
        self.filter_i32(i32::from(past), i32::from(new))
            .clamp(0, i32::from(u8::MAX)) as u8
    }
}

impl fmt::Display for ScaledAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ScaledAverage: TimeConstant={}, WeightMultiplier={}]",
            self.time_constant,
            self.weight_multiplier()
        )
    }
}

fn check_time_constant(param: &'static str, value: f64) -> Result<()> {
    if value.is_nan() || value < 0.0 {
        return Err(Error::out_of_range(
            param,
            format!("{param} must be greater than or equal to zero."),
        ));
    }
    Ok(())
}
