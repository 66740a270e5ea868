use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Amount owed to a creator for one approved submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutAccrual {
    pub submission_id: Uuid,
    pub campaign_id: Uuid,
    pub creator_id: Uuid,
    pub amount: f64,
    pub accrued_at: DateTime<Utc>,
}

/// Receives accruals once the approving transaction has committed.
pub trait PayoutLedger: Send + Sync {
    fn record_accrual(&self, accrual: &PayoutAccrual);
}

/// Default ledger: emits each accrual as a structured log event.
#[derive(Debug, Default, Clone)]
pub struct TracingLedger;

impl PayoutLedger for TracingLedger {
    fn record_accrual(&self, accrual: &PayoutAccrual) {
        tracing::info!(
            submission_id = %accrual.submission_id,
            campaign_id = %accrual.campaign_id,
            creator_id = %accrual.creator_id,
            amount = accrual.amount,
            "Payout accrued"
        );
    }
}

/// Keeps accruals in memory; used where the accruals need to be inspected.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    entries: Arc<Mutex<Vec<PayoutAccrual>>>,
}

impl MemoryLedger {
    pub fn entries(&self) -> Vec<PayoutAccrual> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl PayoutLedger for MemoryLedger {
    fn record_accrual(&self, accrual: &PayoutAccrual) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(accrual.clone());
        }
    }
}
