//! Fixed-length pixel container with a blend mode.

use core::fmt;
use core::iter::{Copied, FusedIterator};
use core::ops::{Index, IndexMut};
use core::slice;

use crate::bounds::{PixelRange, bounded};
use crate::color::{BlendMode, Color, check_opacity};
use crate::error::{Error, Result};

const MISMATCH_MESSAGE: &str =
    "UpperLayer must have the same number of pixels as this layer to blend together.";

/// A strip-sized frame of colors plus the mode used to compose it
///
/// The pixel count is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pixels: Vec<Color>,
    blend_mode: BlendMode,
}

impl Layer {
    /// Create a layer of default colors in `Combine` mode
    pub fn new(pixel_count: usize) -> Result<Self> {
        Self::with_mode(pixel_count, BlendMode::Combine)
    }

    pub fn with_mode(pixel_count: usize, blend_mode: BlendMode) -> Result<Self> {
        Self::filled(pixel_count, blend_mode, Color::default())
    }

    pub fn filled(pixel_count: usize, blend_mode: BlendMode, color: Color) -> Result<Self> {
        if pixel_count == 0 {
            return Err(Error::out_of_range(
                "PixelCount",
                "PixelCount must be greater than zero.",
            ));
        }
        Ok(Self {
            pixels: vec![color; pixel_count],
            blend_mode,
        })
    }

    /// Build a layer from existing pixels
    pub fn from_pixels(pixels: Vec<Color>, blend_mode: BlendMode) -> Result<Self> {
        if pixels.is_empty() {
            return Err(Error::out_of_range(
                "PixelCount",
                "PixelCount must be greater than zero.",
            ));
        }
        Ok(Self { pixels, blend_mode })
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) {
        self.blend_mode = blend_mode;
    }

    pub fn pixel(&self, index: usize) -> Result<Color> {
        self.pixels
            .get(index)
            .copied()
            .ok_or_else(|| self.index_error(index))
    }

    pub fn set_pixel(&mut self, index: usize, color: Color) -> Result<()> {
        let error = self.index_error(index);
        let slot = self.pixels.get_mut(index).ok_or(error)?;
        *slot = color;
        Ok(())
    }

    /// Independent snapshot of every pixel
    pub fn pixels(&self) -> Vec<Color> {
        self.pixels.clone()
    }

    /// Read-only iteration over the pixels
    pub fn iter(&self) -> Pixels<'_> {
        Pixels {
            inner: self.pixels.iter().copied(),
        }
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Set every pixel in `range` to `color`
    pub fn fill_range(&mut self, range: PixelRange, color: Color) -> Result<()> {
        let range = range.validate(self.pixel_count())?;
        bounded(&mut self.pixels, range).fill(color);
        Ok(())
    }

    /// Set the brightness of every pixel in `range`, keeping its color
    pub fn set_brightness_range(&mut self, range: PixelRange, brightness: u8) -> Result<()> {
        let range = range.validate(self.pixel_count())?;
        for pixel in bounded(&mut self.pixels, range) {
            *pixel = pixel.set_brightness(brightness);
        }
        Ok(())
    }

    pub fn has_effect(&self) -> bool {
        self.pixels.iter().any(|pixel| pixel.has_effect())
    }

    /// Blend `upper` onto this layer using this layer's own mode
    pub fn blend(&mut self, upper: &Layer) -> Result<()> {
        self.blend_with_mode(upper, self.blend_mode)
    }

    pub fn blend_with_mode(&mut self, upper: &Layer, mode: BlendMode) -> Result<()> {
        self.check_matching(upper)?;
        for (lower, upper) in self.pixels.iter_mut().zip(&upper.pixels) {
            *lower = lower.blend(*upper, mode);
        }
        Ok(())
    }

    /// Combine `upper` onto this layer scaled by `opacity`
    pub fn blend_opacity(&mut self, upper: &Layer, opacity: f64) -> Result<()> {
        self.blend_opacity_with(upper, opacity, false)
    }

    pub fn blend_opacity_with(&mut self, upper: &Layer, opacity: f64, fade: bool) -> Result<()> {
        self.check_matching(upper)?;
        check_opacity(opacity)?;
        for (lower, upper) in self.pixels.iter_mut().zip(&upper.pixels) {
            *lower = lower.blend_opacity_with(*upper, opacity, fade)?;
        }
        Ok(())
    }

    /// Fade from this layer towards `target`, returning the intermediate layer
    pub fn faded(&self, target: &Layer, opacity: f64) -> Result<Layer> {
        let mut layer = self.clone();
        layer.blend_opacity_with(target, opacity, true)?;
        Ok(layer)
    }

    fn check_matching(&self, upper: &Layer) -> Result<()> {
        if upper.pixel_count() == self.pixel_count() {
            Ok(())
        } else {
            Err(Error::pixel_count_mismatch("UpperLayer", MISMATCH_MESSAGE))
        }
    }

    fn index_error(&self, index: usize) -> Error {
        Error::IndexOutOfBounds {
            index,
            max: self.pixels.len() - 1,
        }
    }
}

impl Index<usize> for Layer {
    type Output = Color;

    fn index(&self, index: usize) -> &Self::Output {
        match self.pixels.get(index) {
            Some(pixel) => pixel,
            None => panic!("{}", self.index_error(index)),
        }
    }
}

impl IndexMut<usize> for Layer {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let error = self.index_error(index);
        match self.pixels.get_mut(index) {
            Some(pixel) => pixel,
            None => panic!("{error}"),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Layer: PixelCount={}, BlendMode={}, HasEffect={}]",
            self.pixel_count(),
            self.blend_mode,
            self.has_effect()
        )
    }
}

impl<'a> IntoIterator for &'a Layer {
    type Item = Color;
    type IntoIter = Pixels<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a layer's pixels, yielding colors by value
#[derive(Debug, Clone)]
pub struct Pixels<'a> {
    inner: Copied<slice::Iter<'a, Color>>,
}

impl Iterator for Pixels<'_> {
    type Item = Color;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Pixels<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Pixels<'_> {}

impl FusedIterator for Pixels<'_> {}
