use thiserror::Error;

use crate::config::ConfigError;
use crate::datasource::SnapshotError;

/// Top-level error for consumers wiring the engine to real collaborators.
///
/// Business-logic edge cases never surface here: missing snapshot fields
/// degrade per field (fee 0, no PnL, static half-spread) instead of
/// erroring. Only configuration and collaborator faults are hard failures.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("snapshot source error: {0}")]
    Snapshot(#[from] SnapshotError),
}
