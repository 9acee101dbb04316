use crate::color::{BlendMode, Color};
use crate::error::Result;
use crate::layer::Layer;

/// Merge drained frames into one output frame
///
/// Frames are given in queue order, base first. Additive modes (`Combine`,
/// `Sum`) are blended onto a transparent frame first, then overriding modes
/// (`Favor`, `Mask`, `Replace`) in the same order, so an overriding queue
/// always wins over the additive result. Returns `None` for no frames.
pub fn compose(frames: &[Layer]) -> Result<Option<Layer>> {
    let Some(first) = frames.first() else {
        return Ok(None);
    };
    let mut merged = Layer::filled(first.pixel_count(), BlendMode::Combine, Color::TRANSPARENT)?;

    let (overriding, additive): (Vec<&Layer>, Vec<&Layer>) = frames
        .iter()
        .partition(|frame| frame.blend_mode().is_overriding());
    for frame in additive.into_iter().chain(overriding) {
        merged.blend_with_mode(frame, frame.blend_mode())?;
    }
    Ok(Some(merged))
}
