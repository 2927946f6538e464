//! Dependency probes behind `/health`.

use async_trait::async_trait;

use super::{Cache, Database};

#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Short component name shown in the health report
    fn component(&self) -> &'static str;

    /// True when the dependency answers
    async fn is_healthy(&self) -> bool;
}

#[async_trait]
impl HealthCheck for Database {
    fn component(&self) -> &'static str {
        "database"
    }

    async fn is_healthy(&self) -> bool {
        match self.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        }
    }
}

#[async_trait]
impl HealthCheck for Cache {
    fn component(&self) -> &'static str {
        "redis"
    }

    async fn is_healthy(&self) -> bool {
        match self.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = ?e, "Redis health check failed");
                false
            }
        }
    }
}
