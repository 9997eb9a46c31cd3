use std::sync::Arc;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use futures::future::BoxFuture;
use log::debug;

use crate::errors::{Error, Result};

const DEFAULT_RETRY_ATTEMPTS: usize = 3;
const DEFAULT_RETRY_MIN_DELAY: Duration = Duration::from_millis(500);

/// Builds a connection handle from a formatted connection string,
/// see [`crate::NodeConfig::dsn`].
///
/// The connector owns everything below the routing layer: establishing the
/// connection, liveness checking it and pooling sockets internally. It is
/// expected to either succeed or fail loudly, since any failure during
/// manager construction is fatal. Any matching closure qualifies:
///
/// ```
/// use futures::future::BoxFuture;
/// use replica_router::Result;
///
/// let connector = |dsn: &str| -> BoxFuture<'static, Result<String>> {
///     let dsn = dsn.to_owned();
///     Box::pin(async move { Ok(dsn) })
/// };
/// ```
pub trait Connector<T>: Send + Sync {
    fn connect(&self, dsn: &str) -> BoxFuture<'static, Result<T>>;
}

impl<T, F> Connector<T> for F
where
    F: Fn(&str) -> BoxFuture<'static, Result<T>> + Send + Sync,
{
    fn connect(&self, dsn: &str) -> BoxFuture<'static, Result<T>> {
        self(dsn)
    }
}

/// Wraps a connector with retry and exponential backoff.
///
/// Defaults to three attempts with growing delay; tune with
/// [`Backoff::with_backoff`].
pub struct Backoff<C> {
    inner: Arc<C>,
    backoff: ExponentialBuilder,
}

impl<C> Backoff<C> {
    pub fn new(connector: C) -> Self {
        Backoff {
            inner: Arc::new(connector),
            backoff: ExponentialBuilder::default()
                .with_min_delay(DEFAULT_RETRY_MIN_DELAY)
                .with_max_times(DEFAULT_RETRY_ATTEMPTS),
        }
    }

    pub fn with_backoff(mut self, backoff: ExponentialBuilder) -> Self {
        self.backoff = backoff;
        self
    }
}

impl<T, C> Connector<T> for Backoff<C>
where
    T: Send + 'static,
    C: Connector<T> + 'static,
{
    fn connect(&self, dsn: &str) -> BoxFuture<'static, Result<T>> {
        let inner = Arc::clone(&self.inner);
        let dsn = dsn.to_owned();
        let backoff = self.backoff;
        Box::pin(async move {
            let connect = move || inner.connect(&dsn);
            connect
                .retry(backoff)
                .sleep(tokio::time::sleep)
                .notify(|err: &Error, delay: Duration| {
                    debug!("retrying connection in {delay:?} after error: {err}");
                })
                .await
        })
    }
}
