//! Optional persistence of uploads and reports to an object store
//!
//! Writes go through a [`QuotaTracker`] so a free-tier bucket is never pushed
//! past its limits. Nothing in here can fail an analysis: problems are logged
//! and reported on the [`StorageReceipt`].

pub mod quota;

pub use quota::{QuotaTracker, Remaining, Usage};

use crate::config::{QuotaConfig, StorageBackend, StorageConfig};
use crate::error::{AnalyzerError, Result};
use crate::output::report::{AnalysisReport, StorageReceipt};
use chrono::{DateTime, Datelike, Utc};
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const MAX_NAME_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageStats {
    pub enabled: bool,
    pub backend: StorageBackend,
    /// Bucket URL or directory the objects live in
    pub location: String,
    pub prefix: String,
    pub usage: Usage,
    pub limits: QuotaConfig,
    pub remaining: Remaining,
}

pub struct StorageManager {
    store: Arc<dyn ObjectStore>,
    backend: StorageBackend,
    location: String,
    prefix: String,
    store_uploads: bool,
    store_results: bool,
    quota: QuotaTracker,
}

impl StorageManager {
    /// Open the configured backend and seed usage from what is already stored
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let (store, location) = build_store(config)?;
        let manager = Self::with_store(store, location, config);
        if let Err(e) = manager.refresh_usage().await {
            log::warn!("Could not read existing storage usage, starting from zero: {}", e);
        }

        log::info!(
            "Storage enabled: {:?} backend at {} (prefix {:?})",
            manager.backend,
            manager.location,
            manager.prefix
        );
        Ok(manager)
    }

    /// Wrap an existing store without listing it
    pub fn with_store(store: Arc<dyn ObjectStore>, location: String, config: &StorageConfig) -> Self {
        Self {
            store,
            backend: config.backend.clone(),
            location,
            prefix: config.prefix.trim_matches('/').to_string(),
            store_uploads: config.store_uploads,
            store_results: config.store_results,
            quota: QuotaTracker::new(config.quota.clone(), Utc::now()),
        }
    }

    /// Recount bytes, objects and this month's writes under the prefix
    pub async fn refresh_usage(&self) -> Result<()> {
        let now = Utc::now();
        let prefix = (!self.prefix.is_empty()).then(|| ObjectPath::from(self.prefix.as_str()));

        let objects: Vec<_> = self.store.list(prefix.as_ref()).try_collect().await?;

        let total_bytes: u64 = objects.iter().map(|meta| meta.size as u64).sum();
        let month = quota::month_key(now);
        let monthly_writes = objects
            .iter()
            .filter(|meta| quota::month_key(meta.last_modified) == month)
            .count() as u64;

        self.quota
            .seed(total_bytes, objects.len() as u64, monthly_writes, now)
            .await;

        log::debug!(
            "Storage usage: {} objects, {} bytes, {} writes this month",
            objects.len(),
            total_bytes,
            monthly_writes
        );
        Ok(())
    }

    /// Persist the upload and the finished report, recording the outcome on
    /// `report.metadata.storage`.
    pub async fn persist(&self, upload: Option<Vec<u8>>, report: &mut AnalysisReport) {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let mut receipt = StorageReceipt::default();

        if self.store_uploads {
            if let Some(bytes) = upload {
                let key = self.upload_key(&id, &report.metadata.source_name, now);
                match self.put(&key, bytes, now).await {
                    Ok(()) => receipt.upload_key = Some(key),
                    Err(e) => {
                        log::warn!("Upload not stored: {}", e);
                        receipt.skipped.push(format!("upload: {}", e));
                    }
                }
            }
        }

        if self.store_results {
            let key = self.analysis_key(&id, now);
            report.metadata.storage = Some(StorageReceipt {
                result_key: Some(key.clone()),
                ..receipt.clone()
            });

            let stored = match serde_json::to_vec_pretty(report) {
                Ok(json) => self.put(&key, json, now).await,
                Err(e) => Err(e.into()),
            };
            match stored {
                Ok(()) => receipt.result_key = Some(key),
                Err(e) => {
                    log::warn!("Analysis result not stored: {}", e);
                    receipt.skipped.push(format!("result: {}", e));
                }
            }
        }

        report.metadata.storage = Some(receipt);
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, now: DateTime<Utc>) -> Result<()> {
        let size = bytes.len() as u64;
        self.quota.reserve(size, now).await?;

        let path = ObjectPath::from(key);
        if let Err(e) = self.store.put(&path, PutPayload::from(bytes)).await {
            self.quota.release(size).await;
            return Err(e.into());
        }

        log::debug!("Stored {} ({} bytes)", key, size);
        Ok(())
    }

    pub async fn stats(&self) -> StorageStats {
        let usage = self.quota.usage(Utc::now()).await;
        StorageStats {
            enabled: true,
            backend: self.backend.clone(),
            location: self.location.clone(),
            prefix: self.prefix.clone(),
            remaining: self.quota.remaining(&usage),
            limits: self.quota.limits().clone(),
            usage,
        }
    }

    fn upload_key(&self, id: &str, source_name: &str, now: DateTime<Utc>) -> String {
        self.key("uploads", &format!("{}-{}", id, sanitize_name(source_name)), now)
    }

    fn analysis_key(&self, id: &str, now: DateTime<Utc>) -> String {
        self.key("analyses", &format!("{}.json", id), now)
    }

    fn key(&self, kind: &str, name: &str, now: DateTime<Utc>) -> String {
        let tail = format!("{}/{:04}/{:02}/{}", kind, now.year(), now.month(), name);
        if self.prefix.is_empty() {
            tail
        } else {
            format!("{}/{}", self.prefix, tail)
        }
    }
}

/// Build the object store for the configured backend and describe where it points
pub fn build_store(config: &StorageConfig) -> Result<(Arc<dyn ObjectStore>, String)> {
    match config.backend {
        StorageBackend::S3 => {
            let bucket = config.bucket.as_deref().ok_or_else(|| {
                AnalyzerError::Configuration("storage.bucket is required for the s3 backend".to_string())
            })?;

            let mut builder = AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .with_region(&config.region);
            if let Some(endpoint) = &config.endpoint {
                builder = builder.with_endpoint(endpoint).with_allow_http(true);
            }

            let store: Arc<dyn ObjectStore> = Arc::new(builder.build()?);
            Ok((store, format!("s3://{}", bucket)))
        }
        StorageBackend::Local => {
            std::fs::create_dir_all(&config.local_dir)?;
            let store: Arc<dyn ObjectStore> =
                Arc::new(LocalFileSystem::new_with_prefix(&config.local_dir)?);
            Ok((store, config.local_dir.display().to_string()))
        }
        StorageBackend::Memory => {
            let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
            Ok((store, "memory".to_string()))
        }
    }
}

/// Keep object names to a safe ASCII subset
pub fn sanitize_name(name: &str) -> String {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();

    let trimmed = sanitized.trim_matches('.');
    if trimmed.is_empty() {
        "document.pdf".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisEngine;
    use crate::config::AnalysisConfig;

    fn memory_config(quota: QuotaConfig) -> StorageConfig {
        StorageConfig {
            enabled: true,
            backend: StorageBackend::Memory,
            quota,
            ..StorageConfig::default()
        }
    }

    fn report() -> AnalysisReport {
        AnalysisEngine::new(&AnalysisConfig::default())
            .unwrap()
            .analyze("The committee approved the annual budget.", "minutes 2024.pdf")
            .unwrap()
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("minutes 2024.pdf"), "minutes_2024.pdf");
        assert_eq!(sanitize_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_name("C:\\docs\\résumé.pdf"), "r_sum_.pdf");
        assert_eq!(sanitize_name(".."), "document.pdf");
    }

    #[tokio::test]
    async fn test_persist_upload_and_result() {
        let config = memory_config(QuotaConfig::default());
        let (store, location) = build_store(&config).unwrap();
        let manager = StorageManager::with_store(store.clone(), location, &config);

        let mut report = report();
        manager.persist(Some(b"%PDF-1.4 fake".to_vec()), &mut report).await;

        let receipt = report.metadata.storage.clone().unwrap();
        let upload_key = receipt.upload_key.unwrap();
        let result_key = receipt.result_key.unwrap();
        assert!(receipt.skipped.is_empty());
        assert!(upload_key.starts_with("document-analyzer/uploads/"));
        assert!(upload_key.ends_with("-minutes_2024.pdf"));
        assert!(result_key.starts_with("document-analyzer/analyses/"));
        assert!(result_key.ends_with(".json"));

        let upload = store
            .get(&ObjectPath::from(upload_key.as_str()))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(upload.as_ref(), b"%PDF-1.4 fake");

        let saved = store
            .get(&ObjectPath::from(result_key.as_str()))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        let saved: AnalysisReport = serde_json::from_slice(&saved).unwrap();
        assert_eq!(saved.summary, report.summary);

        let stats = manager.stats().await;
        assert_eq!(stats.usage.object_count, 2);
        assert_eq!(stats.remaining.objects, 998);
    }

    #[tokio::test]
    async fn test_quota_skips_writes_without_failing() {
        let config = memory_config(QuotaConfig {
            max_object_bytes: 5,
            ..QuotaConfig::default()
        });
        let (store, location) = build_store(&config).unwrap();
        let manager = StorageManager::with_store(store, location, &config);

        let mut report = report();
        manager.persist(Some(b"%PDF-1.4 fake".to_vec()), &mut report).await;

        let receipt = report.metadata.storage.unwrap();
        assert!(receipt.upload_key.is_none());
        assert!(receipt.result_key.is_none());
        assert_eq!(receipt.skipped.len(), 2);
        assert!(receipt.skipped[0].starts_with("upload: Quota exceeded"));
        assert_eq!(manager.stats().await.usage.object_count, 0);
    }

    #[tokio::test]
    async fn test_refresh_usage_counts_existing_objects() {
        let config = memory_config(QuotaConfig::default());
        let (store, location) = build_store(&config).unwrap();
        store
            .put(
                &ObjectPath::from("document-analyzer/uploads/2024/01/a.pdf"),
                PutPayload::from(vec![0u8; 40]),
            )
            .await
            .unwrap();
        store
            .put(&ObjectPath::from("elsewhere/b.pdf"), PutPayload::from(vec![0u8; 10]))
            .await
            .unwrap();

        let manager = StorageManager::with_store(store, location, &config);
        manager.refresh_usage().await.unwrap();

        let stats = manager.stats().await;
        assert_eq!(stats.usage.object_count, 1);
        assert_eq!(stats.usage.total_bytes, 40);
        // InMemory stamps objects with the current time
        assert_eq!(stats.usage.monthly_writes, 1);
    }

    #[tokio::test]
    async fn test_local_backend_writes_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StorageConfig {
            enabled: true,
            backend: StorageBackend::Local,
            local_dir: dir.path().join("objects"),
            store_uploads: false,
            ..StorageConfig::default()
        };

        let manager = StorageManager::connect(&config).await.unwrap();
        let mut report = report();
        manager.persist(Some(b"%PDF-".to_vec()), &mut report).await;

        let receipt = report.metadata.storage.unwrap();
        assert!(receipt.upload_key.is_none());
        let result_key = receipt.result_key.unwrap();
        assert!(dir.path().join("objects").join(&result_key).exists());
    }

    #[test]
    fn test_s3_requires_bucket() {
        let config = StorageConfig {
            enabled: true,
            backend: StorageBackend::S3,
            bucket: None,
            ..StorageConfig::default()
        };
        assert!(matches!(build_store(&config), Err(AnalyzerError::Configuration(_))));
    }
}
