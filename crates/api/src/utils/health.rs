//! Health report for the `health` command
//!
//! The report is a list of component checks (database, schema, session
//! mirror) folded into a score.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Share of healthy components needed for the whole report to be healthy
pub const HEALTHY_THRESHOLD: f64 = 0.8;

/// Overall health of the ERP backend
///
/// # Example
/// ```
/// use printshop_api::utils::health::{ComponentHealth, HealthStatus};
///
/// let mut status = HealthStatus::new()
///     .add_component(ComponentHealth::healthy("database"))
///     .add_component(ComponentHealth::unhealthy("schema", "not migrated"));
/// status.calculate_score();
///
/// assert_eq!(status.score, 0.5);
/// assert!(!status.is_healthy);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub is_healthy: bool,

    /// From 0.0 to 1.0: healthy components over total components
    pub score: f64,

    pub message: Option<String>,

    pub components: Vec<ComponentHealth>,

    /// Unix seconds when the checks ran
    pub timestamp: i64,
}

impl HealthStatus {
    /// Healthy, score 1.0, no components yet
    pub fn new() -> Self {
        Self {
            is_healthy: true,
            score: 1.0,
            message: None,
            components: Vec::new(),
            timestamp: Utc::now().timestamp(),
        }
    }

    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.components.push(component);
        self
    }

    /// Recompute `score` and `is_healthy` from the components
    ///
    /// Call after every component has been added. A report without
    /// components keeps its current values.
    pub fn calculate_score(&mut self) {
        if self.components.is_empty() {
            return;
        }

        let healthy_count = self.components.iter().filter(|c| c.is_healthy).count();

        self.score = healthy_count as f64 / self.components.len() as f64;
        self.is_healthy = self.score >= HEALTHY_THRESHOLD;
        self.message = if self.is_healthy { None } else { Some(self.failing_summary()) };
    }

    /// Unhealthy report for failures that happen before any check can run
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            is_healthy: false,
            score: 0.0,
            message: Some(message.into()),
            components: Vec::new(),
            timestamp: Utc::now().timestamp(),
        }
    }

    fn failing_summary(&self) -> String {
        let failing: Vec<&str> =
            self.components.iter().filter(|c| !c.is_healthy).map(|c| c.name.as_str()).collect();
        format!("degraded: {}", failing.join(", "))
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one component check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component identifier (`database`, `schema`, `session_store`)
    pub name: String,

    pub is_healthy: bool,

    /// Failure reason, or detail such as the schema version
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_status_is_healthy_and_empty() {
        let status = HealthStatus::new();
        assert!(status.is_healthy);
        assert_eq!(status.score, 1.0);
        assert!(status.message.is_none());
        assert!(status.components.is_empty());
        assert!(status.timestamp > 0);
    }

    #[test]
    fn test_calculate_score_all_healthy() {
        let mut status = HealthStatus::new()
            .add_component(ComponentHealth::healthy("database"))
            .add_component(ComponentHealth::healthy("schema").with_message("version 1"));

        status.calculate_score();

        assert_eq!(status.score, 1.0);
        assert!(status.is_healthy);
        assert!(status.message.is_none());
        assert_eq!(status.components[1].message.as_deref(), Some("version 1"));
    }

    #[test]
    fn test_degraded_report_names_failing_components() {
        let mut status = HealthStatus::new()
            .add_component(ComponentHealth::healthy("database"))
            .add_component(ComponentHealth::unhealthy("schema", "not migrated"))
            .add_component(ComponentHealth::unhealthy("session_store", "permission denied"));

        status.calculate_score();

        assert!(!status.is_healthy);
        assert_eq!(status.message.as_deref(), Some("degraded: schema, session_store"));
    }

    #[test]
    fn test_calculate_score_threshold() {
        let mut status = HealthStatus::new();
        for name in ["database", "schema", "session_store", "services"] {
            status = status.add_component(ComponentHealth::healthy(name));
        }
        status = status.add_component(ComponentHealth::unhealthy("audit", "error"));

        status.calculate_score();

        assert_eq!(status.score, 0.8);
        assert!(status.is_healthy);
    }

    #[test]
    fn test_unhealthy_constructor() {
        let status = HealthStatus::unhealthy("configuration missing");
        assert!(!status.is_healthy);
        assert_eq!(status.score, 0.0);
        assert_eq!(status.message.as_deref(), Some("configuration missing"));
    }
}
