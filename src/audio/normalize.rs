//! Peak normalization

/// Target peak after normalization, leaving 5% headroom
pub const HEADROOM: f32 = 0.95;

/// Scale a buffer so its peak does not exceed the headroom target
///
/// A buffer whose peak is already within [-1, 1] is left untouched;
/// only clipping buffers are scaled, by `0.95 / peak`. Length is never
/// altered. Pure apart from the in-place write.
pub fn normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak > 1.0 {
        let scale = HEADROOM / peak;
        for s in samples.iter_mut() {
            *s *= scale;
        }
    }
}
