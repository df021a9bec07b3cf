//! In-process engine running partitions on a rayon worker pool.

use std::num::NonZeroUsize;
use std::thread;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{Span, debug, info, warn};

use distcast_core::{Dataset, Frame, Schema};

use crate::config::EngineConfig;
use crate::engine::{DistributedFrame, EngineFactory, ExecutionEngine, PartitionTransform};
use crate::error::{EngineError, TransformError};
use crate::partition::PartitionSpec;

/// Engine that runs every partition inside the current process.
///
/// Partitions run on a dedicated pool of named worker threads. The first
/// failure stops the pool from starting further partitions; partitions
/// already running finish and their output is discarded.
#[derive(Debug, Clone)]
pub struct LocalEngine {
    name: String,
    workers: Option<NonZeroUsize>,
}

impl LocalEngine {
    /// Engine sized to the host's available parallelism.
    pub fn new() -> Self {
        Self {
            name: "local".to_string(),
            workers: None,
        }
    }

    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            name: config.name.clone(),
            workers: config.workers,
        }
    }
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionEngine for LocalEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_parallelism(&self) -> Result<NonZeroUsize, EngineError> {
        match self.workers {
            Some(workers) => Ok(workers),
            None => thread::available_parallelism()
                .map_err(|e| EngineError::parallelism(e.to_string())),
        }
    }

    fn transform<T>(
        &self,
        input: Dataset,
        transform: &T,
        schema: &Schema,
        spec: &PartitionSpec,
    ) -> Result<DistributedFrame, TransformError<T::Error>>
    where
        T: PartitionTransform,
    {
        let workers = self.current_parallelism()?;
        let frame = input.into_frame().map_err(EngineError::from)?;
        let parts = spec.split(&frame)?;
        drop(frame);

        info!(
            engine = %self.name,
            partitions = parts.len(),
            workers = workers.get(),
            "applying partitioned transform"
        );

        let outputs = run_partitions(&self.name, workers, parts, transform, schema)?;
        Ok(DistributedFrame::new(schema.clone(), outputs))
    }
}

fn run_one<T>(
    index: usize,
    rows: Frame,
    transform: &T,
    schema: &Schema,
) -> Result<Frame, TransformError<T::Error>>
where
    T: PartitionTransform,
{
    debug!(partition = index, rows = rows.num_rows(), "running partition");
    let out = transform
        .apply(index, rows)
        .map_err(|source| TransformError::Partition {
            partition: index,
            source,
        })?;
    out.conform(schema)
        .map_err(|e| EngineError::SchemaMismatch(e).into())
}

fn run_partitions<T>(
    name: &str,
    workers: NonZeroUsize,
    parts: Vec<Frame>,
    transform: &T,
    schema: &Schema,
) -> Result<Vec<Frame>, TransformError<T::Error>>
where
    T: PartitionTransform,
{
    let workers = workers.get().min(parts.len());
    // Worker threads do not inherit the caller's span.
    let parent = Span::current();
    let run = |(index, rows): (usize, Frame)| {
        parent.in_scope(|| {
            run_one(index, rows, transform, schema).inspect_err(|err| {
                warn!(partition = index, error = %err, "partition failed, aborting transform");
            })
        })
    };

    // Nothing to parallelize: run inline on the calling thread.
    if workers <= 1 {
        return parts.into_iter().enumerate().map(run).collect();
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name({
            let name = name.to_string();
            move |i| format!("{name}-worker-{i}")
        })
        .build()
        .map_err(|e| EngineError::worker(format!("failed to start worker pool: {e}")))?;

    // Indexed collect keeps partition order; the first error stops the rest.
    pool.install(|| parts.into_par_iter().enumerate().map(run).collect())
}

/// Factory inferring a [`LocalEngine`] for any dataset.
#[derive(Debug, Clone, Default)]
pub struct LocalEngineFactory {
    config: EngineConfig,
}

impl LocalEngineFactory {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Factory configured from `DISTCAST_*` environment variables.
    pub fn from_env() -> Result<Self, EngineError> {
        Ok(Self::new(EngineConfig::from_env()?))
    }
}

impl EngineFactory for LocalEngineFactory {
    type Engine = LocalEngine;

    fn infer(&self, dataset: &Dataset) -> Result<LocalEngine, EngineError> {
        debug!(
            engine = %self.config.name,
            chunks = dataset.num_chunks(),
            rows = dataset.num_rows(),
            "resolved local engine"
        );
        Ok(LocalEngine::from_config(&self.config))
    }
}
