//! Partitioned forecast dispatch (call-level orchestration).
//!
//! ## Dispatch Flow
//!
//! ```text
//! ForecastRequest
//!   ↓
//! 1. Validate preconditions (exogenous input, identifier column)
//!   ↓
//! 2. Build the output schema from the requested levels
//!   ↓
//! 3. Resolve an execution engine from the input dataset
//!   ↓
//! 4. Plan partitions (explicit count, or the engine's parallelism)
//!   ↓
//! 5. Submit the per-partition adapter and wait for every partition
//!   ↓
//! 6. Materialize the native result frame
//! ```
//!
//! Each step maps to a [`DispatchStage`]. Any step can fail the call; there is
//! no retry at this level and never a partial result. Validation runs before
//! the engine factory is touched, so a malformed request costs no engine work.
//!
//! The dispatcher holds no mutable state: every engine, schema and adapter is
//! created for one call and dropped when it returns.

use std::num::NonZeroUsize;

use thiserror::Error;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use distcast_core::{Credentials, Dataset, ForecastParams, Frame, forecast_schema};
use distcast_engine::{EngineError, EngineFactory, ExecutionEngine, TransformError, plan_partitions};

use crate::adapter::ForecastAdapter;
use crate::client::{ClientError, ClientFactory};
use crate::validate::{PreconditionError, check_preconditions};

/// Failure of a dispatch call.
///
/// `E` is the forecasting client's own error type; partition failures are
/// surfaced through [`DispatchError::Forecast`] without rewrapping.
#[derive(Debug, Error)]
pub enum DispatchError<E> {
    /// The request is malformed (e.g. no identifier column). Not retryable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request asks for something this mode does not support.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Engine resolution, planning, execution or materialization failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A partition's forecasting call failed.
    #[error(transparent)]
    Forecast(E),
}

impl<E> From<PreconditionError> for DispatchError<E> {
    fn from(value: PreconditionError) -> Self {
        match value {
            PreconditionError::MissingIdColumn { .. } => DispatchError::InvalidInput(value.to_string()),
            PreconditionError::ExogenousUnsupported => {
                DispatchError::UnsupportedFeature(value.to_string())
            }
        }
    }
}

impl<E> From<TransformError<E>> for DispatchError<E> {
    fn from(value: TransformError<E>) -> Self {
        match value.into_partition_error() {
            Ok(source) => DispatchError::Forecast(source),
            Err(engine) => DispatchError::Engine(engine),
        }
    }
}

/// Progress of a single dispatch call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DispatchStage {
    Validating,
    SchemaBuilt,
    EngineResolved,
    Partitioned,
    Submitted,
    Completed,
    Failed,
}

impl DispatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStage::Validating => "validating",
            DispatchStage::SchemaBuilt => "schema_built",
            DispatchStage::EngineResolved => "engine_resolved",
            DispatchStage::Partitioned => "partitioned",
            DispatchStage::Submitted => "submitted",
            DispatchStage::Completed => "completed",
            DispatchStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DispatchStage::Completed | DispatchStage::Failed)
    }
}

impl core::fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound forecast request.
#[derive(Debug, Clone)]
pub struct ForecastRequest {
    pub credentials: Credentials,
    pub dataset: Dataset,
    pub params: ForecastParams,
    /// Exogenous regressors. Always rejected in partitioned mode.
    pub exogenous: Option<Frame>,
    /// Partition count override; defaults to the engine's parallelism.
    pub num_partitions: Option<NonZeroUsize>,
}

impl ForecastRequest {
    pub fn new(credentials: Credentials, dataset: impl Into<Dataset>, params: ForecastParams) -> Self {
        Self {
            credentials,
            dataset: dataset.into(),
            params,
            exogenous: None,
            num_partitions: None,
        }
    }

    pub fn with_exogenous(mut self, exogenous: Frame) -> Self {
        self.exogenous = Some(exogenous);
        self
    }

    pub fn with_num_partitions(mut self, num: NonZeroUsize) -> Self {
        self.num_partitions = Some(num);
        self
    }
}

/// Dispatches forecast requests over a partitioned execution engine.
///
/// ## Generic Parameters
///
/// - `E`: resolves the engine for each call from the input dataset
/// - `F`: builds one forecasting client per partition from the caller's credentials
#[derive(Debug)]
pub struct Dispatcher<E, F> {
    engines: E,
    clients: F,
}

impl<E, F> Dispatcher<E, F> {
    pub fn new(engines: E, clients: F) -> Self {
        Self { engines, clients }
    }

    pub fn into_parts(self) -> (E, F) {
        (self.engines, self.clients)
    }
}

impl<E, F> Dispatcher<E, F>
where
    E: EngineFactory,
    F: ClientFactory,
{
    /// Forecast every series of the request's dataset.
    ///
    /// Blocks until all partitions completed. Returns the reassembled forecast
    /// frame, whose columns follow [`forecast_schema`] exactly; row order
    /// across series is unspecified.
    pub fn forecast(&self, request: ForecastRequest) -> Result<Frame, DispatchError<ClientError<F>>> {
        let dispatch_id = Uuid::now_v7();
        let span = info_span!("dispatch", %dispatch_id);
        let _guard = span.enter();

        let mut stage = DispatchStage::Validating;
        let result = self.run(request, &mut stage);

        match &result {
            Ok(frame) => info!(rows = frame.num_rows(), "forecast dispatch completed"),
            Err(err) => {
                warn!(failed_at = %stage, error = %err, "forecast dispatch failed");
                advance(&mut stage, DispatchStage::Failed);
            }
        }
        result
    }

    fn run(
        &self,
        request: ForecastRequest,
        stage: &mut DispatchStage,
    ) -> Result<Frame, DispatchError<ClientError<F>>> {
        let ForecastRequest {
            credentials,
            dataset,
            params,
            exogenous,
            num_partitions,
        } = request;

        check_preconditions(&dataset, &params.id_col, exogenous.as_ref())?;

        let schema = forecast_schema(&params.id_col, &params.time_col, params.level.as_deref());
        advance(stage, DispatchStage::SchemaBuilt);
        debug!(%schema, "built output schema");

        let engine = self.engines.infer(&dataset)?;
        advance(stage, DispatchStage::EngineResolved);

        let spec = plan_partitions(&engine, &params.id_col, num_partitions)?;
        advance(stage, DispatchStage::Partitioned);
        info!(
            engine = engine.name(),
            partitions = spec.num.get(),
            rows = dataset.num_rows(),
            horizon = params.horizon.get(),
            "submitting partitioned forecast"
        );

        let adapter = ForecastAdapter::new(&self.clients, credentials, params);
        let distributed = engine.transform(dataset, &adapter, &schema, &spec)?;
        advance(stage, DispatchStage::Submitted);

        let frame = engine.to_native(distributed)?;
        advance(stage, DispatchStage::Completed);
        Ok(frame)
    }
}

fn advance(stage: &mut DispatchStage, next: DispatchStage) {
    debug!(from = %stage, to = %next, "dispatch stage");
    *stage = next;
}
