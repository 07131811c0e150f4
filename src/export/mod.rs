//! Run manifest export

mod manifest;

pub use manifest::{write_manifest, ManifestJson, StemsJson, TrackJson};
