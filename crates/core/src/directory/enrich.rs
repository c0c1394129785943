//! Background enrichment of clinic records from an external place lookup.
//!
//! A one-shot pass over the records loaded at startup: workers resolve a
//! place identifier where missing, fetch details, and merge them in under
//! the directory lock. Concurrency against the external service is bounded
//! by a counting semaphore. The pass is best-effort throughout; per-record
//! failures are logged and skipped, and the final persist failure leaves
//! in-memory state intact.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinSet;

use crate::Error;
use crate::directory::cache::DirectoryCache;
use crate::directory::record::ClinicRecord;

/// Fields the lookup collaborator can supply for one place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetails {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Vec<String>,
    pub photo_reference: Option<String>,
}

/// External place lookup consumed by the enrichment pass.
///
/// "Nothing matched" is a normal `Ok(None)` from `find_place`; errors are
/// reserved for transport and service failures. Either call may fail for one
/// record without affecting the rest of the pass.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    async fn find_place(&self, name: &str, address: &str) -> Result<Option<String>, Error>;
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, Error>;
}

impl DirectoryCache {
    /// Run one enrichment pass to completion, then persist.
    ///
    /// Operates on the snapshot taken at entry, by index; records that are
    /// already enriched are skipped, so re-running fills gaps only. At most
    /// `workers` external calls are in flight at once.
    pub async fn run_enrichment(&self, lookup: Arc<dyn PlaceLookup>, workers: usize) {
        let snapshot = self.snapshot().await;
        if snapshot.is_empty() {
            tracing::debug!("clinic directory empty, nothing to enrich");
            return;
        }

        let semaphore = Arc::new(Semaphore::new(workers.max(1)));
        let mut join_set = JoinSet::new();
        let mut skipped = 0usize;

        for (index, record) in snapshot.into_iter().enumerate() {
            if record.is_enriched() {
                skipped += 1;
                continue;
            }

            let permit = semaphore.clone().acquire_owned().await.unwrap();
            let lookup = Arc::clone(&lookup);
            let records = Arc::clone(&self.records);
            let photo_key = self.photo_key.clone();

            join_set.spawn(async move {
                // NOTE: Hold permit for task duration to enforce concurrency limit
                let _permit = permit;
                enrich_record(index, record, lookup, records, photo_key).await
            });
        }

        let mut enriched = 0usize;
        let mut unresolved = 0usize;
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(true) => enriched += 1,
                Ok(false) => unresolved += 1,
                Err(e) => {
                    unresolved += 1;
                    tracing::warn!(error = %e, "enrichment worker aborted");
                }
            }
        }

        tracing::info!(enriched, unresolved, skipped, "clinic enrichment pass complete");

        if enriched > 0
            && let Err(e) = self.persist().await
        {
            tracing::warn!(error = %e, "failed to persist enriched directory; durable copy is stale");
        }
    }

    /// Launch [`run_enrichment`](Self::run_enrichment) as a background task,
    /// retaining its handle. A no-op if a pass was already launched.
    pub async fn spawn_enrichment(self: &Arc<Self>, lookup: Arc<dyn PlaceLookup>, workers: usize) {
        let mut slot = self.enrichment.lock().await;
        if slot.is_some() {
            tracing::warn!("clinic enrichment already launched");
            return;
        }

        let cache = Arc::clone(self);
        let handle = tokio::spawn(async move {
            cache.run_enrichment(lookup, workers).await;
        });
        *slot = Some(handle);
        tracing::info!(workers, "clinic enrichment launched");
    }

    /// Wait for a launched enrichment pass to finish.
    pub async fn wait_enrichment(&self) {
        let handle = self.enrichment.lock().await.take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            tracing::warn!(error = %e, "enrichment task aborted");
        }
    }
}

/// Enrich one record. Returns whether a merge happened.
async fn enrich_record(
    index: usize,
    record: ClinicRecord,
    lookup: Arc<dyn PlaceLookup>,
    records: Arc<RwLock<Vec<ClinicRecord>>>,
    photo_key: Option<String>,
) -> bool {
    let place_id = if record.google_place_id.is_empty() {
        match lookup.find_place(&record.name, &record.address).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::debug!(clinic = %record.name, "place lookup found nothing");
                return false;
            }
            Err(e) => {
                tracing::warn!(clinic = %record.name, error = %e, "place lookup failed");
                return false;
            }
        }
    } else {
        record.google_place_id.clone()
    };

    let details = match lookup.place_details(&place_id).await {
        Ok(details) => details,
        Err(e) => {
            tracing::warn!(clinic = %record.name, error = %e, "place details fetch failed");
            return false;
        }
    };

    // One exclusive-lock acquisition per record, so readers observe the
    // merge all-or-nothing.
    let mut records = records.write().await;
    match records.get_mut(index) {
        Some(live) => {
            live.merge_details(&place_id, &details);
            if let Some(key) = photo_key.as_deref() {
                live.refresh_photo_url(key);
            }
            tracing::debug!(clinic = %live.name, place_id = %place_id, "clinic enriched");
            true
        }
        None => false,
    }
}
