//! Health checks

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pd_api::ProjectStore;
use pd_core::clock::Clock;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn http_status(&self) -> StatusCode {
        if self.status.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Timeout for individual probes
    pub check_timeout: Duration,
    /// How long a report is served from cache
    pub cache_duration: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(5),
            cache_duration: Duration::from_secs(10),
        }
    }
}

struct CachedHealth {
    report: HealthReport,
    cached_at: Instant,
}

pub struct HealthChecker {
    config: HealthConfig,
    start_time: Instant,
    cache: RwLock<Option<CachedHealth>>,
    projects: Arc<dyn ProjectStore>,
    clock: Arc<dyn Clock>,
}

impl HealthChecker {
    pub fn new(config: HealthConfig, projects: Arc<dyn ProjectStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            cache: RwLock::new(None),
            projects,
            clock,
        }
    }

    /// Cached report, or a fresh one once the cache has aged out
    pub async fn check(&self) -> HealthReport {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.cached_at.elapsed() < self.config.cache_duration {
                    debug!("Returning cached health report");
                    return cached.report.clone();
                }
            }
        }

        let report = self.perform_checks().await;

        *self.cache.write().await = Some(CachedHealth {
            report: report.clone(),
            cached_at: Instant::now(),
        });

        report
    }

    async fn perform_checks(&self) -> HealthReport {
        let store = self.check_project_store().await;

        HealthReport {
            status: store.status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components: vec![store],
            timestamp: self.clock.now(),
        }
    }

    async fn check_project_store(&self) -> ComponentHealth {
        let start = Instant::now();

        let (status, message) =
            match tokio::time::timeout(self.config.check_timeout, self.projects.find_project(0)).await {
                Ok(Ok(_)) => (HealthStatus::Healthy, None),
                Ok(Err(e)) => {
                    warn!(error = %e, "Project store health probe failed");
                    (HealthStatus::Unhealthy, Some(e.to_string()))
                }
                Err(_) => {
                    warn!("Project store health probe timed out");
                    (HealthStatus::Degraded, Some("Timed out".to_string()))
                }
            };

        ComponentHealth {
            name: "project_store".to_string(),
            status,
            message,
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Liveness probe
pub async fn liveness() -> &'static str {
    "OK"
}

/// Readiness probe with component details
pub async fn readiness(State(checker): State<Arc<HealthChecker>>) -> (StatusCode, Json<HealthReport>) {
    let report = checker.check().await;
    (report.http_status(), Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pd_api::{MemoryProjectStore, StoreError};
    use pd_core::clock::FixedClock;
    use pd_core::traits::Id;
    use pd_models::{Milestone, Project, Push};

    struct BrokenStore;

    #[async_trait]
    impl ProjectStore for BrokenStore {
        async fn find_project(&self, _id: Id) -> Result<Option<Project>, StoreError> {
            Err(StoreError::Backend("connection refused".into()))
        }
        async fn pushes_for(&self, _project_id: Id) -> Result<Vec<Push>, StoreError> {
            Ok(vec![])
        }
        async fn milestones_for(&self, _project_id: Id) -> Result<Vec<Milestone>, StoreError> {
            Ok(vec![])
        }
        async fn insert_project(&self, project: Project) -> Result<Project, StoreError> {
            Ok(project)
        }
        async fn insert_push(&self, push: Push) -> Result<Push, StoreError> {
            Ok(push)
        }
        async fn insert_milestone(&self, milestone: Milestone) -> Result<Milestone, StoreError> {
            Ok(milestone)
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::on(2026, 1, 15).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let checker = HealthChecker::new(
            HealthConfig::default(),
            Arc::new(MemoryProjectStore::new()),
            clock(),
        );
        let report = checker.check().await;

        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.components[0].name, "project_store");
        assert_eq!(report.timestamp, clock().now());
    }

    #[tokio::test]
    async fn test_broken_store_is_unhealthy() {
        let checker = HealthChecker::new(HealthConfig::default(), Arc::new(BrokenStore), clock());
        let report = checker.check().await;

        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(report.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(report.components[0].message.as_deref().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_health_cache() {
        let checker = HealthChecker::new(
            HealthConfig {
                cache_duration: Duration::from_secs(60),
                ..Default::default()
            },
            Arc::new(MemoryProjectStore::new()),
            clock(),
        );

        let first = checker.check().await;
        let second = checker.check().await;
        assert_eq!(first.uptime_seconds, second.uptime_seconds);
        assert_eq!(first.timestamp, second.timestamp);
    }
}
