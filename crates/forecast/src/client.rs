use distcast_core::{Credentials, ForecastParams, Frame};

/// The forecasting procedure, seen as an opaque capability.
///
/// Receives rows holding one or more *complete* series and the caller's
/// parameters, and returns the forecast rows. It knows nothing about
/// partitioning; ordering rows in time is its own responsibility.
pub trait Forecaster {
    type Error: std::error::Error + Send + 'static;

    fn forecast(&self, series: Frame, params: &ForecastParams) -> Result<Frame, Self::Error>;
}

/// Builds a forecasting client bound to a set of credentials.
///
/// Called once per partition: clients are never shared between partitions,
/// since partitions may run on workers that share no memory.
pub trait ClientFactory: Sync {
    type Client: Forecaster;

    fn connect(
        &self,
        credentials: Credentials,
    ) -> Result<Self::Client, <Self::Client as Forecaster>::Error>;
}

/// Error type of the clients built by factory `F`.
pub type ClientError<F> = <<F as ClientFactory>::Client as Forecaster>::Error;

impl<F, C> ClientFactory for F
where
    F: Fn(Credentials) -> Result<C, C::Error> + Sync,
    C: Forecaster,
{
    type Client = C;

    fn connect(&self, credentials: Credentials) -> Result<C, C::Error> {
        self(credentials)
    }
}
