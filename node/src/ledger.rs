// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Tip claims: idempotency check, chain verification, receipt insertion and
//! totals aggregation.
//!
//! A claim moves `Validated -> {Duplicate | Verifying} -> {Credited | Rejected | Unavailable}`.
//! The receipt is written `pending`, then the store credits it and increments
//! the totals in one step. If that step fails the receipt is removed again.
//! Only a credited receipt answers a replay as a duplicate; a pending one is
//! waited on briefly and otherwise reported as in progress.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use frog_tips::claim::TipClaim;
use frog_tips::error::TipError;
use frog_tips::receipt::{PostRecord, TipReceipt};
use frog_tips::types::{ContentHash, TipTotals, TxId};
use frog_tips::verify::{verify_tip_tx, TipExpectation, VerifiedTip};

use crate::network::TxSource;
use crate::store::{StoreError, TipStore};
use crate::telemetry::{TIP_CLAIMS, TIP_ROLLBACKS, TIP_VERIFICATION_SECONDS};

/// Result of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit {
    pub txid: TxId,
    pub content_hash: ContentHash,
    pub totals: TipTotals,
    /// The txid had already been credited; nothing was applied this time.
    pub duplicate: bool,
}

/// How long a replay waits for a concurrent claim to finish crediting.
pub const SETTLE_ATTEMPTS: u32 = 20;
pub const SETTLE_INTERVAL: Duration = Duration::from_millis(25);

pub struct TipLedger {
    store: Arc<dyn TipStore>,
    chain: Arc<dyn TxSource>,
    contract_id: String,
    function_name: String,
    settle_attempts: u32,
    settle_interval: Duration,
}

fn storage(e: StoreError) -> TipError {
    TipError::internal(e.to_string())
}

impl TipLedger {
    pub fn new(
        store: Arc<dyn TipStore>,
        chain: Arc<dyn TxSource>,
        contract_id: impl Into<String>,
        function_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            chain,
            contract_id: contract_id.into(),
            function_name: function_name.into(),
            settle_attempts: SETTLE_ATTEMPTS,
            settle_interval: SETTLE_INTERVAL,
        }
    }

    pub fn with_settle_wait(mut self, attempts: u32, interval: Duration) -> Self {
        self.settle_attempts = attempts;
        self.settle_interval = interval;
        self
    }

    pub async fn claim(&self, claim: &TipClaim) -> Result<Credit, TipError> {
        self.load_post(&claim.content_hash).await?;

        if let Some(existing) = self.store.get_receipt(&claim.txid).await.map_err(storage)? {
            return self.replay(claim, existing).await;
        }

        let verified = self.verify(claim).await?;
        if verified.txid != claim.txid {
            tracing::warn!(requested = %claim.txid, reported = %verified.txid, "chain api reported a different txid");
        }

        let receipt = TipReceipt::new(claim, &verified, Utc::now());
        match self.store.insert_receipt(&receipt).await {
            Ok(()) => {}
            Err(StoreError::UniqueViolation) => {
                tracing::debug!(txid = %claim.txid, "lost insert race, resolving as replay");
                return self.resolve_lost_race(claim).await;
            }
            Err(e) => {
                metrics::increment_counter!(TIP_CLAIMS, "outcome" => "failed");
                return Err(storage(e));
            }
        }

        let totals = match self.store.increment_tip_totals(&receipt).await {
            Ok(totals) => totals,
            Err(e) => {
                tracing::error!(txid = %claim.txid, error = %e, "totals increment failed, rolling back receipt");
                metrics::increment_counter!(TIP_CLAIMS, "outcome" => "failed");
                self.roll_back_receipt(&claim.txid).await?;
                return Err(TipError::internal(format!("totals increment failed: {}", e)));
            }
        };

        metrics::increment_counter!(TIP_CLAIMS, "outcome" => "credited");
        tracing::info!(
            txid = %claim.txid,
            content_hash = %claim.content_hash,
            amount = %claim.amount,
            total = %totals.total,
            count = totals.count,
            "tip credited"
        );

        Ok(Credit {
            txid: claim.txid.clone(),
            content_hash: claim.content_hash.clone(),
            totals,
            duplicate: false,
        })
    }

    pub async fn receipt(&self, txid: &TxId) -> Result<TipReceipt, TipError> {
        self.store
            .get_receipt(txid)
            .await
            .map_err(storage)?
            .ok_or(TipError::ReceiptNotFound)
    }

    async fn load_post(&self, hash: &ContentHash) -> Result<PostRecord, TipError> {
        self.store
            .get_post(hash)
            .await
            .map_err(storage)?
            .ok_or(TipError::NotFound)
    }

    /// A receipt already exists: same intent is a duplicate once it is
    /// credited, anything else a conflict. Totals are read after the credit
    /// is observed, so they include it.
    async fn replay(&self, claim: &TipClaim, existing: TipReceipt) -> Result<Credit, TipError> {
        if !existing.matches(claim) {
            metrics::increment_counter!(TIP_CLAIMS, "outcome" => "mismatch");
            tracing::warn!(txid = %claim.txid, "txid replayed with a different payload");
            return Err(TipError::PayloadMismatch);
        }

        self.await_credit(existing).await?;
        let post = self.load_post(&claim.content_hash).await?;

        metrics::increment_counter!(TIP_CLAIMS, "outcome" => "duplicate");
        Ok(Credit {
            txid: claim.txid.clone(),
            content_hash: claim.content_hash.clone(),
            totals: post.totals,
            duplicate: true,
        })
    }

    /// Polls a pending receipt until it is credited. A receipt that vanishes
    /// was rolled back by its writer; neither case is a credit.
    async fn await_credit(&self, existing: TipReceipt) -> Result<(), TipError> {
        let txid = existing.txid.clone();
        let mut current = existing;
        let mut waited = 0;
        while !current.is_credited() {
            if waited == self.settle_attempts {
                return Err(self.in_progress(&txid, "still pending"));
            }
            waited += 1;
            tokio::time::sleep(self.settle_interval).await;
            current = match self.store.get_receipt(&txid).await.map_err(storage)? {
                Some(r) => r,
                None => return Err(self.in_progress(&txid, "rolled back by concurrent claim")),
            };
        }
        Ok(())
    }

    fn in_progress(&self, txid: &TxId, reason: &str) -> TipError {
        metrics::increment_counter!(TIP_CLAIMS, "outcome" => "in_progress");
        tracing::info!(%txid, reason, "concurrent claim not credited");
        TipError::ClaimInProgress
    }

    async fn resolve_lost_race(&self, claim: &TipClaim) -> Result<Credit, TipError> {
        match self.store.get_receipt(&claim.txid).await.map_err(storage)? {
            Some(existing) => self.replay(claim, existing).await,
            None => Err(self.in_progress(&claim.txid, "rolled back by concurrent claim")),
        }
    }

    async fn verify(&self, claim: &TipClaim) -> Result<VerifiedTip, TipError> {
        let started = Instant::now();
        let fetched = self.chain.fetch_tx(&claim.txid).await;
        metrics::histogram!(TIP_VERIFICATION_SECONDS, started.elapsed().as_secs_f64());

        let tx = fetched.map_err(|e| {
            metrics::increment_counter!(TIP_CLAIMS, "outcome" => "unavailable");
            tracing::warn!(txid = %claim.txid, error = %e, "chain api unavailable");
            TipError::VerificationUnavailable(e.to_string())
        })?;

        let expect = TipExpectation {
            contract_id: &self.contract_id,
            function_name: &self.function_name,
            post_id: claim.post_id,
            amount: claim.amount,
        };

        verify_tip_tx(&tx, &claim.txid, &expect).map_err(|rejection| {
            metrics::increment_counter!(TIP_CLAIMS, "outcome" => "rejected");
            tracing::info!(txid = %claim.txid, reason = %rejection, "tip tx rejected");
            TipError::VerificationFailed(rejection)
        })
    }

    /// Recovery step after a failed increment. Its own failure is reported,
    /// never swallowed.
    async fn roll_back_receipt(&self, txid: &TxId) -> Result<(), TipError> {
        metrics::increment_counter!(TIP_ROLLBACKS);
        self.store.delete_receipt(txid).await.map_err(|e| {
            tracing::error!(%txid, error = %e, "receipt rollback failed, receipt has no credit");
            TipError::internal(format!("receipt rollback failed: {}", e))
        })
    }
}
