//! Signal-processing primitives
//!
//! Windowing, frame segmentation, the spectral transform, and pitch
//! detection. Everything here is pure and stateless apart from the FFT
//! plans cached inside `SpectralTransform`.

pub mod frame;
pub mod pitch;
pub mod transform;
pub mod window;

pub use frame::{segment, Frame, FrameIter};
pub use pitch::PitchDetector;
pub use transform::{SpectralFrame, SpectralTransform};
pub use window::hann;
