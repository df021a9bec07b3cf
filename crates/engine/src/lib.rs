//! `distcast-engine`
//!
//! **Responsibility:** partitioned execution boundary.
//!
//! - Defines what an execution engine must offer (parallelism query,
//!   per-partition transform, materialization).
//! - Owns the key-atomic partitioning contract.
//! - Ships an in-process engine backed by scoped worker threads.

pub mod config;
pub mod engine;
pub mod error;
pub mod local;
pub mod partition;

pub use config::EngineConfig;
pub use engine::{DistributedFrame, EngineFactory, ExecutionEngine, PartitionTransform};
pub use error::{EngineError, TransformError};
pub use local::{LocalEngine, LocalEngineFactory};
pub use partition::{Balance, PartitionSpec, plan_partitions};
