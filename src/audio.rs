//! Audio capture collaborator.

/// Source of per-frequency-bin audio intensities
pub trait AudioInput: Send {
    fn is_capturing(&self) -> bool;

    fn start(&mut self) -> crate::Result<()>;

    fn stop(&mut self);

    /// Latest intensities; the length may change between calls
    fn snapshot(&self) -> &[f64];
}

/// Audio input that never hears anything
#[derive(Debug, Default)]
pub struct SilentAudioInput {
    capturing: bool,
}

impl AudioInput for SilentAudioInput {
    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn start(&mut self) -> crate::Result<()> {
        self.capturing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.capturing = false;
    }

    fn snapshot(&self) -> &[f64] {
        &[]
    }
}
