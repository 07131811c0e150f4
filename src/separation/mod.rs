//! Frequency-domain source separation
//!
//! Masking of spectral frames into four stems, overlap-add
//! reconstruction, and the parallel engine tying the stages together.

pub mod engine;
pub mod mask;
pub mod reconstruct;

pub use engine::{separate_buffer, NoProgress, Phase, ProgressObserver, SeparationConfig};
pub use mask::{mask_weight, separate, StemSpectra};
pub use reconstruct::OverlapAddReconstructor;
