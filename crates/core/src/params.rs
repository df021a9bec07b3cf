//! Forecast request parameters and caller credentials.
//!
//! These types cross the worker boundary: every partition receives its own
//! copy, so they are plain owned data with `serde` support.

use core::cmp::Ordering;
use core::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Default identifier column name.
pub const DEFAULT_ID_COL: &str = "unique_id";
/// Default time column name.
pub const DEFAULT_TIME_COL: &str = "ds";
/// Default target column name.
pub const DEFAULT_TARGET_COL: &str = "y";

/// A requested prediction-interval width, expressed as a percentage.
///
/// Integers and floats are kept apart because the level is rendered verbatim
/// into output column names: `80` yields `TimeGPT-lo-80`, while `80.0` yields
/// `TimeGPT-lo-80.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Int(i64),
    Float(f64),
}

impl Level {
    pub fn value(&self) -> f64 {
        match *self {
            Level::Int(v) => v as f64,
            Level::Float(v) => v,
        }
    }

    /// Numeric total order (ties keep their relative order under a stable sort).
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.value().total_cmp(&other.value())
    }
}

impl From<i64> for Level {
    fn from(value: i64) -> Self {
        Level::Int(value)
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Level::Int(value.into())
    }
}

impl From<u32> for Level {
    fn from(value: u32) -> Self {
        Level::Int(value.into())
    }
}

impl From<f64> for Level {
    fn from(value: f64) -> Self {
        Level::Float(value)
    }
}

impl core::fmt::Display for Level {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Level::Int(v) => write!(f, "{v}"),
            // Whole floats keep their trailing `.0`.
            Level::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Level::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Date-feature selection: either a switch or an explicit list of features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateFeatures {
    Flag(bool),
    Named(Vec<String>),
}

impl DateFeatures {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Named(names.into_iter().map(Into::into).collect())
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            DateFeatures::Flag(on) => *on,
            DateFeatures::Named(names) => !names.is_empty(),
        }
    }
}

impl From<bool> for DateFeatures {
    fn from(value: bool) -> Self {
        DateFeatures::Flag(value)
    }
}

/// Parameters forwarded, unchanged, to the forecasting procedure.
///
/// Only `level` (and the column bindings) are interpreted by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastParams {
    /// Number of steps to forecast.
    pub horizon: NonZeroUsize,
    /// Frequency alias of the series (inferred downstream when absent).
    pub freq: Option<String>,
    pub id_col: String,
    pub time_col: String,
    pub target_col: String,
    /// Prediction-interval levels; `None` requests point forecasts only.
    pub level: Option<Vec<Level>>,
    pub finetune_steps: u32,
    pub clean_ex_first: bool,
    pub validate_token: bool,
    pub add_history: bool,
    pub date_features: DateFeatures,
    pub date_features_to_one_hot: DateFeatures,
}

impl ForecastParams {
    pub fn new(horizon: NonZeroUsize) -> Self {
        Self {
            horizon,
            freq: None,
            id_col: DEFAULT_ID_COL.to_string(),
            time_col: DEFAULT_TIME_COL.to_string(),
            target_col: DEFAULT_TARGET_COL.to_string(),
            level: None,
            finetune_steps: 0,
            clean_ex_first: true,
            validate_token: false,
            add_history: false,
            date_features: DateFeatures::Flag(false),
            date_features_to_one_hot: DateFeatures::Flag(true),
        }
    }

    pub fn with_freq(mut self, freq: impl Into<String>) -> Self {
        self.freq = Some(freq.into());
        self
    }

    pub fn with_id_col(mut self, id_col: impl Into<String>) -> Self {
        self.id_col = id_col.into();
        self
    }

    pub fn with_time_col(mut self, time_col: impl Into<String>) -> Self {
        self.time_col = time_col.into();
        self
    }

    pub fn with_target_col(mut self, target_col: impl Into<String>) -> Self {
        self.target_col = target_col.into();
        self
    }

    pub fn with_levels<I, L>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Level>,
    {
        self.level = Some(levels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_finetune_steps(mut self, steps: u32) -> Self {
        self.finetune_steps = steps;
        self
    }

    pub fn with_clean_ex_first(mut self, on: bool) -> Self {
        self.clean_ex_first = on;
        self
    }

    pub fn with_validate_token(mut self, on: bool) -> Self {
        self.validate_token = on;
        self
    }

    pub fn with_add_history(mut self, on: bool) -> Self {
        self.add_history = on;
        self
    }

    pub fn with_date_features(mut self, features: impl Into<DateFeatures>) -> Self {
        self.date_features = features.into();
        self
    }

    pub fn with_date_features_to_one_hot(mut self, features: impl Into<DateFeatures>) -> Self {
        self.date_features_to_one_hot = features.into();
        self
    }

    /// Requested levels, treating an empty list like no levels at all.
    pub fn levels(&self) -> &[Level] {
        self.level.as_deref().unwrap_or(&[])
    }
}

/// Caller credentials for the forecasting service.
///
/// Cloned into every partition invocation; never shared between partitions.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub environment: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            environment: environment.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("environment", &self.environment)
            .finish()
    }
}
