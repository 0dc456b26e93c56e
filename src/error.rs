use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("unknown purpose `{0}` (expected leisure, business or total)")]
    UnknownPurpose(String),

    #[error("invalid year filter `{0}` (expected \"All\" or an integer year)")]
    InvalidYear(String),

    #[error("top-N must be one of {allowed:?}, got {got}")]
    InvalidTopN { got: usize, allowed: &'static [usize] },

    #[error("top-N must be one of {allowed:?}, got `{got}`")]
    UnparsableTopN { got: String, allowed: &'static [usize] },

    #[error("invalid weight range: {0}")]
    WeightRange(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;
