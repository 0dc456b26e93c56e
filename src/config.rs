use serde::Deserialize;
use std::{fs, path::Path};
use tracing::debug;

use crate::error::{FlowError, Result};
use crate::pipeline::TopN;
use crate::process::LongitudeRepair;
use crate::schema::FilterConfig;
use crate::weight::VisualWeightMapper;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub top_n: TopN,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoordinateConfig {
    pub longitude_repair: LongitudeRepair,
}

/// Everything a pipeline run needs besides the input text. Every section
/// is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub render: RenderConfig,
    pub weights: VisualWeightMapper,
    pub coordinates: CoordinateConfig,
}

impl PipelineConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.weights.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FlowError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}
