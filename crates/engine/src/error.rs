//! Execution engine errors.

use thiserror::Error;

use distcast_core::FrameError;

/// Engine-level failure.
///
/// Every variant is fatal for the dispatch call that observed it; retry policy,
/// if any, belongs to whoever owns the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine could not report how many partitions it can run at once.
    #[error("cannot determine engine parallelism: {0}")]
    Parallelism(String),

    /// Engine configuration was malformed (e.g. a bad environment variable).
    #[error("invalid engine configuration: {0}")]
    Config(String),

    /// The partitioning key column is missing or cannot be used as a key.
    #[error("invalid partition key `{column}`: {reason}")]
    InvalidPartitionKey { column: String, reason: String },

    /// A partition's output did not conform to the declared schema.
    #[error("partition output does not match declared schema: {0}")]
    SchemaMismatch(FrameError),

    /// A worker could not be started or died without reporting a result.
    #[error("worker failure: {0}")]
    Worker(String),

    /// Input rows could not be assembled.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl EngineError {
    pub fn parallelism(msg: impl Into<String>) -> Self {
        Self::Parallelism(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    pub fn invalid_key(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPartitionKey {
            column: column.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a partitioned transform: either the engine itself failed, or
/// one partition's transform failed with its own error, carried unchanged.
#[derive(Debug, Error)]
pub enum TransformError<E> {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("partition {partition} failed: {source}")]
    Partition {
        partition: usize,
        #[source]
        source: E,
    },
}

impl<E> TransformError<E> {
    /// Strip the partition context, returning the transform's own error.
    pub fn into_partition_error(self) -> Result<E, EngineError> {
        match self {
            TransformError::Partition { source, .. } => Ok(source),
            TransformError::Engine(e) => Err(e),
        }
    }
}
