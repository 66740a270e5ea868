pub mod approval;
pub mod campaigns;
pub mod estimator;
pub mod submissions;

use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::ledger::{PayoutLedger, TracingLedger};

const READ_ATTEMPTS: u32 = 3;
const READ_BACKOFF: Duration = Duration::from_millis(50);

/// Everything an operation needs besides its caller and arguments.
#[derive(Clone)]
pub struct ServiceContext {
    pub db: DatabaseConnection,
    pub ledger: Arc<dyn PayoutLedger>,
    pub request_timeout: Duration,
    pub campaign_moderation: bool,
    pub default_platform_fee_percent: f64,
}

impl ServiceContext {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            ledger: Arc::new(TracingLedger),
            request_timeout: Duration::from_secs(10),
            campaign_moderation: false,
            default_platform_fee_percent: 20.0,
        }
    }

    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            request_timeout: config.request_timeout,
            campaign_moderation: config.campaign_moderation,
            default_platform_fee_percent: config.default_platform_fee_percent,
            ..Self::new(db)
        }
    }

    pub fn with_ledger(mut self, ledger: Arc<dyn PayoutLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    /// Run one operation under the request timeout. An elapsed timeout drops
    /// the future, which rolls back any open transaction.
    pub async fn bounded<T, F>(&self, op: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        tokio::time::timeout(self.request_timeout, op)
            .await
            .map_err(|_| {
                AppError::TransientBackend(format!(
                    "operation timed out after {:?}",
                    self.request_timeout
                ))
            })?
    }

    /// Run a read-only operation, retrying transient failures with doubling backoff.
    pub async fn read_with_retry<T, F, Fut>(&self, mut op: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut backoff = READ_BACKOFF;
        let mut attempt = 1;

        loop {
            match self.bounded(op()).await {
                Err(e) if e.is_retryable() && attempt < READ_ATTEMPTS => {
                    tracing::warn!(attempt, error = %e, "Transient backend error, retrying read");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// Current time at the precision Postgres stores (microseconds).
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
