/// Dim a channel by `opacity`, truncating
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn reduce_channel(value: u8, opacity: f64) -> u8 {
    (f64::from(value) * opacity) as u8
}

/// Interpolate a channel from `from` towards `to`
///
/// Equal channels stay exact at any opacity.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fade_channel(from: u8, to: u8, opacity: f64) -> u8 {
    let from = f64::from(from);
    let delta = f64::from(to) - from;
    (from + delta * opacity).clamp(0.0, 255.0) as u8
}

/// Weighted mix where `amount` (0-255) is the share of `upper`
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn favor_channel(lower: u8, upper: u8, amount: u8) -> u8 {
    let amount = amount as u16;
    let mixed = (upper as u16 * amount + lower as u16 * (255 - amount)) / 255;
    if mixed > 255 { 255 } else { mixed as u8 }
}
