//! `distcast-forecast`
//!
//! **Responsibility:** partitioned forecast dispatch.
//!
//! This crate is intentionally **not** a forecasting model:
//! - The forecasting procedure is an opaque capability ([`Forecaster`]).
//! - It only distributes inference calls; nothing is trained here.
//! - Exogenous regressors are rejected, never silently dropped.

pub mod adapter;
pub mod client;
pub mod dispatcher;
pub mod validate;

pub use adapter::ForecastAdapter;
pub use client::{ClientError, ClientFactory, Forecaster};
pub use dispatcher::{DispatchError, DispatchStage, Dispatcher, ForecastRequest};
pub use validate::{PreconditionError, check_preconditions};
