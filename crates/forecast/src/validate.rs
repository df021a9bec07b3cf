//! Multi-series preconditions, checked before any engine work.

use thiserror::Error;

use distcast_core::{Dataset, Frame};

/// A request that cannot be dispatched as submitted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// Partitioned forecasting needs a series identifier to group rows by.
    #[error(
        "identifier column `{id_col}` not found; partitioned forecasting needs one \
         identifier per time series"
    )]
    MissingIdColumn { id_col: String },

    /// Exogenous regressors are not available for partitioned forecasting.
    #[error("exogenous variables are not supported for partitioned forecasting")]
    ExogenousUnsupported,
}

/// Check that `dataset` can be dispatched.
///
/// The capability check runs first: an exogenous frame is rejected whatever
/// else is wrong with the request.
pub fn check_preconditions(
    dataset: &Dataset,
    id_col: &str,
    exogenous: Option<&Frame>,
) -> Result<(), PreconditionError> {
    if exogenous.is_some() {
        return Err(PreconditionError::ExogenousUnsupported);
    }
    if !dataset.has_column(id_col) {
        return Err(PreconditionError::MissingIdColumn {
            id_col: id_col.to_string(),
        });
    }
    Ok(())
}
