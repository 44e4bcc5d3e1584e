//! Recognition service - image recognition with cache fallback
//!
//! Wraps a VisionProvider and keeps a per-user cache of the last successful
//! result. Transient provider failures (timeout, API error, unparseable
//! output) fall back to the cache; a missing API key never does, since that
//! is a configuration problem the user has to fix.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::{self, Error};
use crate::domain::{RecognitionLog, RecognizedItem};
use crate::ports::{VisionError, VisionProvider};

/// Result of a recognition pass
#[derive(Debug, Serialize)]
pub struct RecognitionOutcome {
    pub items: Vec<RecognizedItem>,
    /// True when the items came from the cache instead of the provider
    pub from_cache: bool,
    /// Provider error that triggered the fallback, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// On-disk cache of the last successful recognition, one file per user
#[derive(Debug, Serialize, Deserialize)]
struct CachedRecognition {
    user_id: Uuid,
    cached_at: DateTime<Utc>,
    items: Vec<RecognizedItem>,
}

/// Recognition service
pub struct RecognitionService {
    repository: Arc<DuckDbRepository>,
    provider: Box<dyn VisionProvider>,
    larder_dir: PathBuf,
}

impl RecognitionService {
    pub fn new(
        repository: Arc<DuckDbRepository>,
        provider: Box<dyn VisionProvider>,
        larder_dir: &Path,
    ) -> Self {
        Self {
            repository,
            provider,
            larder_dir: larder_dir.to_path_buf(),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Recognize ingredients in an image and log the pass
    ///
    /// A successful pass refreshes the cache. On a transient provider
    /// failure the cached items are returned instead, marked `from_cache`.
    pub fn recognize(
        &self,
        user_id: Uuid,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<RecognitionOutcome> {
        let outcome = match self.provider.recognize(image_bytes, mime_type) {
            Ok(items) => {
                self.write_cache(user_id, &items)?;
                RecognitionOutcome {
                    items,
                    from_cache: false,
                    fallback_reason: None,
                }
            }
            Err(VisionError::MissingApiKey) => {
                return Err(Error::recognition(VisionError::MissingApiKey.to_string()).into());
            }
            Err(transient) => match self.read_cache(user_id) {
                Some(cached) => RecognitionOutcome {
                    items: cached.items,
                    from_cache: true,
                    fallback_reason: Some(transient.to_string()),
                },
                None => {
                    return Err(Error::recognition(format!(
                        "{} (no cached result to fall back to)",
                        transient
                    ))
                    .into())
                }
            },
        };

        let log = RecognitionLog::new(
            Uuid::new_v4(),
            user_id,
            Utc::now(),
            outcome.items.len() as i64,
        );
        self.repository.add_recognition_log(&log)?;

        Ok(outcome)
    }

    /// Latest recognition passes, newest first
    pub fn history(&self, user_id: Uuid, limit: usize) -> Result<Vec<RecognitionLog>> {
        self.repository
            .get_recognition_logs(&user_id.to_string(), limit)
    }

    fn cache_path(&self, user_id: Uuid) -> PathBuf {
        self.larder_dir
            .join(format!("recognition_cache_{}.json", user_id))
    }

    fn write_cache(&self, user_id: Uuid, items: &[RecognizedItem]) -> result::Result<()> {
        let cached = CachedRecognition {
            user_id,
            cached_at: Utc::now(),
            items: items.to_vec(),
        };
        let content = serde_json::to_string_pretty(&cached)?;
        std::fs::write(self.cache_path(user_id), content)?;
        Ok(())
    }

    fn read_cache(&self, user_id: Uuid) -> Option<CachedRecognition> {
        let content = std::fs::read_to_string(self.cache_path(user_id)).ok()?;
        serde_json::from_str(&content).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::vision_mock::MockVision;
    use crate::ports::VisionResult;
    use tempfile::TempDir;

    struct FailingVision(VisionError);

    impl VisionProvider for FailingVision {
        fn name(&self) -> &str {
            "failing"
        }

        fn recognize(&self, _: &[u8], _: &str) -> VisionResult<Vec<RecognizedItem>> {
            Err(match &self.0 {
                VisionError::MissingApiKey => VisionError::MissingApiKey,
                VisionError::Timeout(s) => VisionError::Timeout(s.clone()),
                VisionError::Api(s) => VisionError::Api(s.clone()),
                VisionError::NonJsonResponse(s) => VisionError::NonJsonResponse(s.clone()),
            })
        }
    }

    fn repo_in(dir: &TempDir) -> Arc<DuckDbRepository> {
        let repo = DuckDbRepository::new(&dir.path().join("test.duckdb")).unwrap();
        repo.ensure_schema().unwrap();
        Arc::new(repo)
    }

    #[test]
    fn test_successful_pass_fills_cache_and_logs() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        let service =
            RecognitionService::new(repo.clone(), Box::new(MockVision::new()), dir.path());
        let user_id = Uuid::new_v4();

        let outcome = service.recognize(user_id, b"img", "image/jpeg").unwrap();
        assert!(!outcome.from_cache);
        assert!(!outcome.items.is_empty());
        assert!(service.cache_path(user_id).exists());

        let logs = service.history(user_id, 10).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].items_count, outcome.items.len() as i64);
    }

    #[test]
    fn test_timeout_falls_back_to_cache() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        let user_id = Uuid::new_v4();

        // Warm the cache with a successful pass
        let ok_service =
            RecognitionService::new(repo.clone(), Box::new(MockVision::new()), dir.path());
        ok_service.recognize(user_id, b"img", "image/jpeg").unwrap();

        let failing = RecognitionService::new(
            repo.clone(),
            Box::new(FailingVision(VisionError::Timeout("30s".to_string()))),
            dir.path(),
        );
        let outcome = failing.recognize(user_id, b"img", "image/jpeg").unwrap();
        assert!(outcome.from_cache);
        assert!(outcome.fallback_reason.is_some());
        assert!(!outcome.items.is_empty());
    }

    #[test]
    fn test_transient_failure_without_cache_errors() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);

        let failing = RecognitionService::new(
            repo,
            Box::new(FailingVision(VisionError::Api("HTTP 500".to_string()))),
            dir.path(),
        );
        let result = failing.recognize(Uuid::new_v4(), b"img", "image/jpeg");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("no cached result"));
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Recognition(_))
        ));
    }

    #[test]
    fn test_missing_api_key_never_falls_back() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        let user_id = Uuid::new_v4();

        let ok_service =
            RecognitionService::new(repo.clone(), Box::new(MockVision::new()), dir.path());
        ok_service.recognize(user_id, b"img", "image/jpeg").unwrap();

        let failing = RecognitionService::new(
            repo,
            Box::new(FailingVision(VisionError::MissingApiKey)),
            dir.path(),
        );
        let result = failing.recognize(user_id, b"img", "image/jpeg");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("OPENAI_API_KEY"));
    }
}
