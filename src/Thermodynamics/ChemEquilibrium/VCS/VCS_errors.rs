use thiserror::Error;

/// errors of the VCS reaction adjustment core. They only arise while the problem is being set up
/// (building the equilibrium state, reading settings); the numerical entry points never fail
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("Invalid composition: {0}")]
    InvalidComposition(String),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type VcsResult<T> = Result<T, VcsError>;
