//! `distcast-core`: data building blocks shared by the engine and the dispatcher.
//!
//! This crate contains **pure data** types (no execution or IO concerns):
//! frames, schemas, forecast parameters and credentials.

pub mod dataset;
pub mod error;
pub mod frame;
pub mod params;
pub mod schema;

pub use dataset::Dataset;
pub use error::{FrameError, FrameResult};
pub use frame::{Column, ColumnData, Frame};
pub use params::{Credentials, DateFeatures, ForecastParams, Level};
pub use schema::{DataType, Field, Schema, forecast_schema, POINT_FORECAST_COL};
