//! Health check command

use crate::context::AppContext;
use crate::utils::health::HealthStatus;

/// Get application health status
///
/// # Example Response
/// ```json
/// {
///   "is_healthy": true,
///   "score": 1.0,
///   "message": null,
///   "components": [
///     { "name": "database", "is_healthy": true, "message": null },
///     { "name": "schema", "is_healthy": true, "message": "version 1" },
///     { "name": "session_store", "is_healthy": true, "message": "signed out" }
///   ],
///   "timestamp": 1792065600
/// }
/// ```
pub async fn get_app_health(context: &AppContext) -> HealthStatus {
    context.health_check().await
}
