//! Execution engine abstraction.
//!
//! An engine realizes a partitioned transform: it groups the input rows per
//! [`PartitionSpec`], runs a [`PartitionTransform`] once per partition (in
//! parallel, in any order, possibly on remote workers), conforms each output
//! to the declared schema and hands back a [`DistributedFrame`] that can be
//! materialized with [`ExecutionEngine::to_native`].
//!
//! Engines are resolved per call through an [`EngineFactory`] and dropped
//! when the call returns; nothing here is a process-wide singleton.

use std::num::NonZeroUsize;

use distcast_core::{Dataset, Frame, Schema};

use crate::error::{EngineError, TransformError};
use crate::partition::PartitionSpec;

/// A function applied independently to every partition.
///
/// Implementations must not rely on shared mutable state: partitions may run
/// concurrently and on workers that share no memory.
pub trait PartitionTransform: Sync {
    type Error: std::error::Error + Send + 'static;

    /// Transform the rows of one partition. `partition` is informational.
    fn apply(&self, partition: usize, rows: Frame) -> Result<Frame, Self::Error>;
}

/// Partition outputs that have not been materialized yet.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributedFrame {
    schema: Schema,
    partitions: Vec<Frame>,
}

impl DistributedFrame {
    pub fn new(schema: Schema, partitions: Vec<Frame>) -> Self {
        Self { schema, partitions }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn num_rows(&self) -> usize {
        self.partitions.iter().map(Frame::num_rows).sum()
    }

    pub fn into_parts(self) -> (Schema, Vec<Frame>) {
        (self.schema, self.partitions)
    }
}

/// Partitioned execution backend.
pub trait ExecutionEngine {
    /// Engine name, for logs.
    fn name(&self) -> &str;

    /// How many partitions the engine can process at once (at least one).
    fn current_parallelism(&self) -> Result<NonZeroUsize, EngineError>;

    /// Apply `transform` to every partition of `input` and conform each output
    /// to `schema`.
    ///
    /// Blocks until every partition finished. The first partition failure aborts
    /// the whole transform; no partial output is returned.
    fn transform<T>(
        &self,
        input: Dataset,
        transform: &T,
        schema: &Schema,
        spec: &PartitionSpec,
    ) -> Result<DistributedFrame, TransformError<T::Error>>
    where
        T: PartitionTransform;

    /// Materialize a distributed result as a single native frame.
    ///
    /// Row order across partitions is unspecified.
    fn to_native(&self, frame: DistributedFrame) -> Result<Frame, EngineError> {
        let (schema, partitions) = frame.into_parts();
        if partitions.is_empty() {
            return Ok(Frame::empty_like(&schema));
        }
        Ok(Frame::concat(partitions)?)
    }
}

/// Resolves the engine for one dispatch call from the input dataset.
pub trait EngineFactory {
    type Engine: ExecutionEngine;

    fn infer(&self, dataset: &Dataset) -> Result<Self::Engine, EngineError>;
}

impl<F, E> EngineFactory for F
where
    F: Fn(&Dataset) -> Result<E, EngineError>,
    E: ExecutionEngine,
{
    type Engine = E;

    fn infer(&self, dataset: &Dataset) -> Result<E, EngineError> {
        self(dataset)
    }
}
