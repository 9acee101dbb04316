mod blend_mode;
mod utils;

use core::fmt;

pub use blend_mode::BlendMode;
use smart_leds::RGB8;
pub use utils::{favor_channel, fade_channel, reduce_channel};

use crate::error::{Error, Result};
use crate::math8::scale8;

pub type Rgb = RGB8;

/// A single pixel: red, green, blue and a brightness channel
///
/// Colors are plain values. Every blend returns a new color, so named
/// constants can be handed out freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    brightness: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::with_brightness(0, 0, 0, 0);

    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const PURPLE: Color = Color::new(255, 0, 255);
    pub const AZURE: Color = Color::new(41, 146, 255);
    pub const ORANGE: Color = Color::new(255, 100, 0);
    pub const PINK: Color = Color::new(255, 0, 128);
    pub const AMBIENT: Color = Color::new(255, 100, 30);

    /// Create a color at full brightness
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self::with_brightness(r, g, b, u8::MAX)
    }

    pub const fn with_brightness(r: u8, g: u8, b: u8, brightness: u8) -> Self {
        Self {
            r,
            g,
            b,
            brightness,
        }
    }

    /// Create a color whose brightness is its strongest channel
    pub const fn derived(r: u8, g: u8, b: u8) -> Self {
        let mut brightness = r;
        if g > brightness {
            brightness = g;
        }
        if b > brightness {
            brightness = b;
        }
        Self::with_brightness(r, g, b, brightness)
    }

    /// Look up a named color, ignoring case
    pub fn named(name: &str) -> Option<Self> {
        let color = match name.trim().to_ascii_lowercase().as_str() {
            "transparent" => Self::TRANSPARENT,
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "yellow" => Self::YELLOW,
            "cyan" => Self::CYAN,
            "purple" => Self::PURPLE,
            "azure" => Self::AZURE,
            "orange" => Self::ORANGE,
            "pink" => Self::PINK,
            "ambient" => Self::AMBIENT,
            _ => return None,
        };
        Some(color)
    }

    pub const fn r(self) -> u8 {
        self.r
    }

    pub const fn g(self) -> u8 {
        self.g
    }

    pub const fn b(self) -> u8 {
        self.b
    }

    pub const fn brightness(self) -> u8 {
        self.brightness
    }

    pub const fn with_r(self, r: u8) -> Self {
        Self { r, ..self }
    }

    pub const fn with_g(self, g: u8) -> Self {
        Self { g, ..self }
    }

    pub const fn with_b(self, b: u8) -> Self {
        Self { b, ..self }
    }

    pub const fn set_brightness(self, brightness: u8) -> Self {
        Self { brightness, ..self }
    }

    /// Whether this color contributes anything when blended
    pub const fn has_effect(self) -> bool {
        self.r != 0 || self.g != 0 || self.b != 0 || self.brightness != 0
    }

    /// Blend `upper` onto this color using the given mode
    pub fn blend(self, upper: Color, mode: BlendMode) -> Color {
        match mode {
            BlendMode::Combine => self.map2(upper, u8::max),
            BlendMode::Favor => {
                if !upper.has_effect() {
                    return self;
                }
                let amount = upper.brightness;
                self.map2(upper, |lower, upper| favor_channel(lower, upper, amount))
            }
            BlendMode::Mask => {
                if upper.has_effect() {
                    upper
                } else {
                    self
                }
            }
            BlendMode::Replace => upper,
            BlendMode::Sum => self.map2(upper, u8::saturating_add),
        }
    }

    /// Combine `upper` onto this color, scaled by `opacity`
    pub fn blend_opacity(self, upper: Color, opacity: f64) -> Result<Color> {
        self.blend_opacity_with(upper, opacity, false)
    }

    /// Blend `upper` onto this color with `opacity` in `[0, 1]`
    ///
    /// Without `fade` the upper color is dimmed by `opacity` and combined with
    /// a per-channel maximum. With `fade` the result interpolates from this
    /// color towards `upper`.
    pub fn blend_opacity_with(self, upper: Color, opacity: f64, fade: bool) -> Result<Color> {
        check_opacity(opacity)?;
        let blended = if fade {
            self.map2(upper, |lower, upper| fade_channel(lower, upper, opacity))
        } else {
            self.map2(upper, |lower, upper| lower.max(reduce_channel(upper, opacity)))
        };
        Ok(blended)
    }

    /// Convert to an RGB8 value with brightness applied
    pub fn to_rgb8(self) -> Rgb {
        Rgb {
            r: scale8(self.r, self.brightness),
            g: scale8(self.g, self.brightness),
            b: scale8(self.b, self.brightness),
        }
    }

    fn map2(self, other: Color, f: impl Fn(u8, u8) -> u8) -> Color {
        Color {
            r: f(self.r, other.r),
            g: f(self.g, other.g),
            b: f(self.b, other.b),
            brightness: f(self.brightness, other.brightness),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Rgb> for Color {
    fn from(value: Rgb) -> Self {
        Self::new(value.r, value.g, value.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Color: R={:<3}, G={:<3}, B={:<3}, Brightness={:<3}]",
            self.r, self.g, self.b, self.brightness
        )
    }
}

/// Validate a blend opacity
pub(crate) fn check_opacity(opacity: f64) -> Result<()> {
    if (0.0..=1.0).contains(&opacity) {
        Ok(())
    } else {
        Err(Error::out_of_range(
            "Opacity",
            format!("Opacity must be a value between 0 and 1, got {opacity}."),
        ))
    }
}
