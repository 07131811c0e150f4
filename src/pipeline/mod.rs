//! Pipeline orchestration

mod orchestrator;

pub use orchestrator::{run, PipelineResult, StemWriteReport};
