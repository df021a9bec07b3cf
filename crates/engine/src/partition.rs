//! Partition planning and key-atomic row assignment.
//!
//! ## Contract
//!
//! A [`PartitionSpec`] groups rows by the value of its key column. Whatever
//! the [`Balance`] strategy, **all rows sharing a key land in exactly one
//! partition**, in their original relative order. The forecasting procedure
//! relies on this: it assumes every series it receives is complete.
//!
//! Balance only decides *which* partition owns a key:
//!
//! - `Coarse`: hash the key onto a partition. No look at group sizes, no
//!   rebalancing; sizes may be uneven.
//! - `Even`: place whole series, largest first, onto the currently
//!   least-loaded partition (by row count).

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use tracing::debug;

use distcast_core::{ColumnData, Frame};

use crate::engine::ExecutionEngine;
use crate::error::EngineError;

/// Trade-off between shuffle cost and partition size balance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Balance {
    #[default]
    Coarse,
    Even,
}

/// How rows are grouped onto partitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSpec {
    /// Grouping key column (one series per key value).
    pub by: String,
    /// Number of partitions.
    pub num: NonZeroUsize,
    pub balance: Balance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Key<'a> {
    Str(&'a str),
    Int(i64),
}

impl PartitionSpec {
    pub fn new(by: impl Into<String>, num: NonZeroUsize) -> Self {
        Self {
            by: by.into(),
            num,
            balance: Balance::Coarse,
        }
    }

    pub fn with_balance(mut self, balance: Balance) -> Self {
        self.balance = balance;
        self
    }

    /// Row indices owned by each partition (`num` entries, some possibly empty).
    pub fn assign(&self, frame: &Frame) -> Result<Vec<Vec<usize>>, EngineError> {
        let groups = self.groups(frame)?;
        let n = self.num.get();

        let owners: Vec<usize> = match self.balance {
            Balance::Coarse => groups.iter().map(|(key, _)| stable_hash(key) % n).collect(),
            Balance::Even => {
                let mut order: Vec<usize> = (0..groups.len()).collect();
                // Stable: equal-sized series keep first-appearance order.
                order.sort_by(|&a, &b| groups[b].1.len().cmp(&groups[a].1.len()));

                let mut load = vec![0usize; n];
                let mut owners = vec![0usize; groups.len()];
                for g in order {
                    let target = (0..n).min_by_key(|&p| (load[p], p)).unwrap_or(0);
                    load[target] += groups[g].1.len();
                    owners[g] = target;
                }
                owners
            }
        };

        let mut partitions = vec![Vec::new(); n];
        for ((_, rows), owner) in groups.into_iter().zip(owners) {
            partitions[owner].extend(rows);
        }
        Ok(partitions)
    }

    /// Split a frame into its non-empty partitions.
    pub fn split(&self, frame: &Frame) -> Result<Vec<Frame>, EngineError> {
        let parts: Vec<Frame> = self
            .assign(frame)?
            .into_iter()
            .filter(|rows| !rows.is_empty())
            .map(|rows| frame.take(&rows))
            .collect();

        debug!(
            by = %self.by,
            requested = self.num.get(),
            non_empty = parts.len(),
            rows = frame.num_rows(),
            "split frame into partitions"
        );
        Ok(parts)
    }

    /// Distinct keys in first-appearance order, each with its rows.
    fn groups<'a>(&self, frame: &'a Frame) -> Result<Vec<(Key<'a>, Vec<usize>)>, EngineError> {
        let column = frame
            .column(&self.by)
            .ok_or_else(|| EngineError::invalid_key(&self.by, "column not found"))?;

        let keys: Vec<Key<'a>> = match &column.data {
            ColumnData::Utf8(values) => values.iter().map(|v| Key::Str(v.as_str())).collect(),
            ColumnData::Int64(values) => values.iter().map(|&v| Key::Int(v)).collect(),
            other => {
                return Err(EngineError::invalid_key(
                    &self.by,
                    format!("type {} cannot be used as a grouping key", other.dtype()),
                ));
            }
        };

        let mut index: HashMap<Key<'a>, usize> = HashMap::new();
        let mut groups: Vec<(Key<'a>, Vec<usize>)> = Vec::new();
        for (row, key) in keys.into_iter().enumerate() {
            let g = *index.entry(key).or_insert_with(|| {
                groups.push((key, Vec::new()));
                groups.len() - 1
            });
            groups[g].1.push(row);
        }
        Ok(groups)
    }
}

/// Fixed-key hash: deterministic within one build, not across Rust releases.
fn stable_hash(key: &Key<'_>) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish() as usize
}

/// Choose the partition layout for a dispatch call.
///
/// An explicit count wins; otherwise the engine's current parallelism is used.
/// If the engine cannot report it, planning fails (there is no fallback).
pub fn plan_partitions<E>(
    engine: &E,
    by: &str,
    explicit: Option<NonZeroUsize>,
) -> Result<PartitionSpec, EngineError>
where
    E: ExecutionEngine,
{
    let num = match explicit {
        Some(num) => num,
        None => engine.current_parallelism()?,
    };
    debug!(engine = engine.name(), by, num = num.get(), explicit = explicit.is_some(), "planned partitions");
    Ok(PartitionSpec::new(by, num))
}
