//! Fractional accumulator turning continuous rates into whole steps.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use crate::error::{Error, Result};

/// A real value split on demand into an integer part and a remainder
///
/// Add a per-frame rate each tick and call [`IntFraction::take_int`] to get
/// the whole number of steps to apply. The remainder carries over, so the
/// steps never drift from the accumulated rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntFraction {
    value: f64,
}

impl IntFraction {
    pub const fn new(value: f64) -> Self {
        Self { value }
    }

    /// Integer part, truncated toward zero
    #[allow(clippy::cast_possible_truncation)]
    pub fn int_value(self) -> i64 {
        self.value.trunc() as i64
    }

    /// The full stored value
    pub const fn decimal_value(self) -> f64 {
        self.value
    }

    /// Fractional remainder, with the sign of the value
    pub fn fraction(self) -> f64 {
        self.value - self.value.trunc()
    }

    /// Remove and return the integer part, keeping only the remainder
    pub fn take_int(&mut self) -> i64 {
        let taken = self.int_value();
        self.value = self.fraction();
        taken
    }

    pub fn increment(&mut self) {
        self.value += 1.0;
    }

    pub fn decrement(&mut self) {
        self.value -= 1.0;
    }

    /// Divide, failing when the divisor is zero
    pub fn checked_div(self, rhs: impl Into<IntFraction>) -> Result<IntFraction> {
        let rhs = rhs.into();
        if rhs.value == 0.0 {
            return Err(Error::DivideByZero);
        }
        Ok(Self::new(self.value / rhs.value))
    }
}

impl From<f64> for IntFraction {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for IntFraction {
    fn from(value: i32) -> Self {
        Self::new(f64::from(value))
    }
}

impl From<IntFraction> for f64 {
    fn from(value: IntFraction) -> Self {
        value.value
    }
}

impl PartialEq for IntFraction {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for IntFraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl PartialEq<f64> for IntFraction {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl PartialOrd<f64> for IntFraction {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.value.partial_cmp(other)
    }
}

macro_rules! impl_arithmetic {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<T: Into<IntFraction>> $trait<T> for IntFraction {
            type Output = IntFraction;

            fn $method(self, rhs: T) -> Self::Output {
                IntFraction::new(self.value $op rhs.into().value)
            }
        }

        impl<T: Into<IntFraction>> $assign_trait<T> for IntFraction {
            fn $assign_method(&mut self, rhs: T) {
                self.value = self.value $op rhs.into().value;
            }
        }
    };
}

impl_arithmetic!(Add, add, AddAssign, add_assign, +);
impl_arithmetic!(Sub, sub, SubAssign, sub_assign, -);
impl_arithmetic!(Mul, mul, MulAssign, mul_assign, *);

impl<T: Into<IntFraction>> Div<T> for IntFraction {
    type Output = IntFraction;

    /// # Panics
    ///
    /// Panics when dividing by zero. Use [`IntFraction::checked_div`] to
    /// handle it instead.
    fn div(self, rhs: T) -> Self::Output {
        match self.checked_div(rhs) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T: Into<IntFraction>> DivAssign<T> for IntFraction {
    fn div_assign(&mut self, rhs: T) {
        *self = *self / rhs;
    }
}

impl fmt::Display for IntFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[IntFraction: IntValue={}, DecimalValue={}]",
            self.int_value(),
            self.value
        )
    }
}
