//! In-memory clinic directory serving concurrent readers.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::Error;
use crate::directory::record::ClinicRecord;
use crate::directory::store::ClinicStore;

/// Shared, read-mostly view of the clinic directory.
///
/// Constructed once at startup and handed to request handlers by reference;
/// the enrichment pass (see [`run_enrichment`](Self::run_enrichment)) is the
/// only writer after load. Readers take the shared lock and always observe
/// each record either before or after its merge, never mid-write.
pub struct DirectoryCache {
    pub(crate) records: Arc<RwLock<Vec<ClinicRecord>>>,
    pub(crate) store: ClinicStore,
    pub(crate) photo_key: Option<String>,
    pub(crate) enrichment: Mutex<Option<JoinHandle<()>>>,
}

impl DirectoryCache {
    /// Load the directory from durable storage.
    ///
    /// An unreadable dataset leaves the cache empty: zero clinics is a
    /// serving state, not an error. Records that already carry a photo
    /// reference get their photo URL derived here when a credential is
    /// available.
    pub fn load(store: ClinicStore, photo_key: Option<String>) -> Self {
        let mut records = match store.read_all() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %store.path().display(), error = %e, "clinic dataset unreadable, starting empty");
                Vec::new()
            }
        };

        if let Some(key) = photo_key.as_deref() {
            for record in &mut records {
                record.refresh_photo_url(key);
            }
        }

        tracing::info!(clinics = records.len(), "clinic directory loaded");
        Self {
            records: Arc::new(RwLock::new(records)),
            store,
            photo_key,
            enrichment: Mutex::new(None),
        }
    }

    /// Clone of the full collection under the shared lock.
    pub async fn snapshot(&self) -> Vec<ClinicRecord> {
        self.records.read().await.clone()
    }

    /// Clone of the records matching `predicate`, under the shared lock.
    pub async fn snapshot_filtered(&self, predicate: impl Fn(&ClinicRecord) -> bool) -> Vec<ClinicRecord> {
        self.records.read().await.iter().filter(|record| predicate(record)).cloned().collect()
    }

    /// Number of records currently held.
    pub async fn clinic_count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Rewrite the durable CSV from the in-memory collection, under the
    /// exclusive lock so the written state reflects no half-applied merge.
    pub async fn persist(&self) -> Result<(), Error> {
        let records = self.records.write().await;
        self.store.write_all(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "clinic_id,name,address,phone_regular,phone_emergency,whatsapp,opening_hours,emergency_24h,website_url,applemap_url,latitude,longitude,rating,google_place_id,photo_reference\n";

    fn seed_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        for row in rows {
            file.write_all(row.as_bytes()).unwrap();
            file.write_all(b"\n").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_and_snapshot() {
        let file = seed_csv(&[
            "1,Happy Paws,Addr A,,,,,FALSE,,,,,,,",
            "2,Night Vet,Addr B,,,,,TRUE,,,,,,,",
        ]);
        let cache = DirectoryCache::load(ClinicStore::new(file.path()), None);

        assert_eq!(cache.clinic_count().await, 2);
        let all = cache.snapshot().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Happy Paws");
    }

    #[tokio::test]
    async fn test_load_unreadable_file_starts_empty() {
        let cache = DirectoryCache::load(ClinicStore::new("/nonexistent/clinics.csv"), None);
        assert_eq!(cache.clinic_count().await, 0);
        assert!(cache.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_derives_photo_urls_with_key() {
        let file = seed_csv(&["1,Happy Paws,Addr A,,,,,FALSE,,,,,,place1,places/place1/photos/x"]);
        let cache = DirectoryCache::load(ClinicStore::new(file.path()), Some("key1".into()));

        let all = cache.snapshot().await;
        assert!(all[0].photo_url.contains("places/place1/photos/x"));
        assert!(all[0].photo_url.contains("key=key1"));
    }

    #[tokio::test]
    async fn test_load_without_key_leaves_photo_url_empty() {
        let file = seed_csv(&["1,Happy Paws,Addr A,,,,,FALSE,,,,,,place1,places/place1/photos/x"]);
        let cache = DirectoryCache::load(ClinicStore::new(file.path()), None);
        assert!(cache.snapshot().await[0].photo_url.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_filtered_emergency() {
        let file = seed_csv(&[
            "1,Happy Paws,Addr A,,,,,FALSE,,,,,,,",
            "2,Night Vet,Addr B,,,,,TRUE,,,,,,,",
            "3,Day Clinic,Addr C,,,,,FALSE,,,,,,,",
        ]);
        let cache = DirectoryCache::load(ClinicStore::new(file.path()), None);

        let emergency = cache.snapshot_filtered(|record| record.emergency_24h).await;
        assert_eq!(emergency.len(), 1);
        assert_eq!(emergency[0].name, "Night Vet");
    }

    #[tokio::test]
    async fn test_persist_full_rewrite() {
        let file = seed_csv(&["1,Happy Paws,Addr A,,,,,FALSE,,,,,,,"]);
        let cache = DirectoryCache::load(ClinicStore::new(file.path()), None);

        cache.records.write().await[0].rating = "4.8".into();
        cache.persist().await.unwrap();

        let reread = ClinicStore::new(file.path()).read_all().unwrap();
        assert_eq!(reread.len(), 1);
        assert_eq!(reread[0].rating, "4.8");
    }
}
