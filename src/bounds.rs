use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Half-open range of pixel positions `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRange {
    pub start: usize,
    pub end: usize,
}

impl PixelRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Range covering a whole strip
    pub const fn full(count: usize) -> Self {
        Self { start: 0, end: count }
    }

    /// Get the number of pixels in the range
    pub const fn count(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(self) -> bool {
        self.count() == 0
    }

    /// Check the range against a strip of `pixel_count` pixels
    pub fn validate(self, pixel_count: usize) -> Result<Self> {
        if self.start > self.end || self.end > pixel_count {
            return Err(Error::out_of_range(
                "PixelRange",
                format!(
                    "Range {}..{} must lie within 0..{}.",
                    self.start, self.end, pixel_count
                ),
            ));
        }
        Ok(self)
    }
}

/// Get a slice of the pixels within the bounds
pub(crate) fn bounded<T>(pixels: &mut [T], range: PixelRange) -> &mut [T] {
    &mut pixels[range.start..range.end]
}
