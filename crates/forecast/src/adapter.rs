//! Per-partition forecast adapter.

use tracing::debug;

use distcast_core::{Credentials, ForecastParams, Frame};
use distcast_engine::PartitionTransform;

use crate::client::{ClientError, ClientFactory, Forecaster};

/// Delegation boundary between the engine and the forecasting procedure.
///
/// For every partition it builds a fresh client from its own copy of the
/// credentials and forwards the rows and parameters untouched. No retries and
/// no credential checks happen here; client errors surface as-is.
pub struct ForecastAdapter<'a, F> {
    clients: &'a F,
    credentials: Credentials,
    params: ForecastParams,
}

impl<'a, F> ForecastAdapter<'a, F>
where
    F: ClientFactory,
{
    pub fn new(clients: &'a F, credentials: Credentials, params: ForecastParams) -> Self {
        Self {
            clients,
            credentials,
            params,
        }
    }

    pub fn params(&self) -> &ForecastParams {
        &self.params
    }
}

impl<F> PartitionTransform for ForecastAdapter<'_, F>
where
    F: ClientFactory,
{
    type Error = ClientError<F>;

    fn apply(&self, partition: usize, rows: Frame) -> Result<Frame, Self::Error> {
        let client = self.clients.connect(self.credentials.clone())?;
        debug!(partition, rows = rows.num_rows(), "forecasting partition");
        client.forecast(rows, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distcast_core::Column;
    use std::num::NonZeroUsize;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, thiserror::Error, PartialEq)]
    enum FakeError {
        #[error("rejected token")]
        Rejected,
        #[error("upstream: {0}")]
        Upstream(String),
    }

    struct Recorder<'a> {
        seen: &'a Mutex<Vec<(Credentials, ForecastParams, usize)>>,
        credentials: Credentials,
        fail: bool,
    }

    impl Forecaster for Recorder<'_> {
        type Error = FakeError;

        fn forecast(&self, series: Frame, params: &ForecastParams) -> Result<Frame, FakeError> {
            self.seen
                .lock()
                .unwrap()
                .push((self.credentials.clone(), params.clone(), series.num_rows()));
            if self.fail {
                return Err(FakeError::Upstream("503".to_string()));
            }
            Ok(series)
        }
    }

    fn rows(n: usize) -> Frame {
        Frame::new(vec![Column::utf8("unique_id", (0..n).map(|_| "A"))]).unwrap()
    }

    fn params() -> ForecastParams {
        ForecastParams::new(NonZeroUsize::new(14).unwrap())
            .with_freq("H")
            .with_levels([80, 95])
            .with_add_history(true)
    }

    #[test]
    fn each_partition_gets_a_fresh_client() {
        let seen = Mutex::new(Vec::new());
        let connects = AtomicUsize::new(0);
        let factory = |credentials: Credentials| {
            connects.fetch_add(1, Ordering::SeqCst);
            Ok::<_, FakeError>(Recorder {
                seen: &seen,
                credentials,
                fail: false,
            })
        };

        let creds = Credentials::new("tok", "https://api.example.invalid");
        let adapter = ForecastAdapter::new(&factory, creds.clone(), params());

        adapter.apply(0, rows(3)).unwrap();
        adapter.apply(1, rows(2)).unwrap();

        assert_eq!(connects.load(Ordering::SeqCst), 2);
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 2);
        for (c, p, _) in &seen {
            assert_eq!(c, &creds);
            assert_eq!(p, &params());
        }
        assert_eq!(seen[0].2, 3);
        assert_eq!(seen[1].2, 2);
    }

    #[test]
    fn forecaster_errors_pass_through() {
        let seen = Mutex::new(Vec::new());
        let factory = |credentials: Credentials| {
            Ok::<_, FakeError>(Recorder {
                seen: &seen,
                credentials,
                fail: true,
            })
        };
        let adapter = ForecastAdapter::new(&factory, Credentials::new("t", "e"), params());

        assert_eq!(
            adapter.apply(0, rows(1)).unwrap_err(),
            FakeError::Upstream("503".to_string())
        );
    }

    #[test]
    fn connect_errors_pass_through() {
        let factory = |_credentials: Credentials| Err::<Recorder<'static>, _>(FakeError::Rejected);
        let adapter = ForecastAdapter::new(&factory, Credentials::new("bad", "e"), params());

        assert_eq!(adapter.apply(0, rows(1)).unwrap_err(), FakeError::Rejected);
    }
}
