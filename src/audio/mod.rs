//! Audio I/O and sample utilities
//!
//! WAV reading/encoding and peak normalization. Compressed formats are
//! out of scope; the pipeline accepts already-decoded PCM.

pub mod normalize;
pub mod wav;

pub use normalize::normalize;
pub use wav::{encode, read_mono, write_wav};
