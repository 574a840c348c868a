pub mod pipeline;

pub use pipeline::{PipelineError, RunOutput, SelectionPipeline};
