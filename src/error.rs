use thiserror::Error;

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid parameters given when building an index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("minimum degree must be at least 2, got {min_degree}")]
    MinDegreeTooSmall { min_degree: usize },
    #[error("minimum degree {min_degree} is too large, node capacity 2t-1 would overflow")]
    MinDegreeTooLarge { min_degree: usize },
}
