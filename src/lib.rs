pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod select;
pub mod weight;

pub use config::PipelineConfig;
pub use error::{FlowError, Result};
pub use pipeline::{run, PipelineOutput, PipelineSummary, TopN};
