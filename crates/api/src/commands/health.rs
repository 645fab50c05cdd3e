//! Liveness command

use serde::Serialize;

use crate::AppContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Healthy when the store answers a stats query.
pub async fn get_health(ctx: &AppContext) -> HealthStatus {
    match ctx.health_check().await {
        Ok(()) => HealthStatus { is_healthy: true, message: None },
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            HealthStatus { is_healthy: false, message: Some(err.label().to_string()) }
        }
    }
}
