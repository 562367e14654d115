use crate::config::AlertsConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Community alert model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub category: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_url: Option<String>,
    pub status: AlertStatus,
    pub confirmations: i32,
    pub reports: i32,
    pub last_confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
}

/// Alert lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "alert_status", rename_all = "UPPERCASE")]
pub enum AlertStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "RESOLVED")]
    Resolved,
}

impl AlertStatus {
    /// Parse the wire representation, e.g. from a query string
    pub fn parse(value: &str) -> Option<AlertStatus> {
        match value.to_uppercase().as_str() {
            "ACTIVE" => Some(AlertStatus::Active),
            "RESOLVED" => Some(AlertStatus::Resolved),
            _ => None,
        }
    }
}

/// Thresholds for closing an alert under community report pressure.
///
/// An alert resolves once reports exceed `max_reports` while also leading
/// the confirmation count by more than `report_lead`. Resolution is
/// one-way; callers only apply it to alerts that are still active.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionPolicy {
    pub max_reports: i32,
    pub report_lead: i32,
}

impl ResolutionPolicy {
    pub fn should_resolve(&self, confirmations: i32, reports: i32) -> bool {
        reports > self.max_reports && reports > confirmations + self.report_lead
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            max_reports: 3,
            report_lead: 2,
        }
    }
}

impl From<AlertsConfig> for ResolutionPolicy {
    fn from(config: AlertsConfig) -> Self {
        Self {
            max_reports: config.max_reports,
            report_lead: config.report_lead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_alert_needs_four_reports() {
        let policy = ResolutionPolicy::default();
        assert!(!policy.should_resolve(0, 0));
        assert!(!policy.should_resolve(0, 3));
        assert!(policy.should_resolve(0, 4));
    }

    #[test]
    fn confirmations_raise_the_bar() {
        let policy = ResolutionPolicy::default();
        // With 5 confirmations, 7 reports clear the absolute threshold but
        // not the lead over confirmations; 8 clear both.
        assert!(!policy.should_resolve(5, 7));
        assert!(policy.should_resolve(5, 8));
    }

    #[test]
    fn report_lead_boundary_is_strict() {
        let policy = ResolutionPolicy::default();
        // reports == confirmations + lead is not enough
        assert!(!policy.should_resolve(2, 4));
        assert!(policy.should_resolve(2, 5));
    }

    #[test]
    fn thresholds_are_tunable() {
        let policy = ResolutionPolicy {
            max_reports: 1,
            report_lead: 0,
        };
        assert!(policy.should_resolve(0, 2));
        assert!(!policy.should_resolve(2, 2));
    }

    #[test]
    fn status_parses_wire_values() {
        assert_eq!(AlertStatus::parse("ACTIVE"), Some(AlertStatus::Active));
        assert_eq!(AlertStatus::parse("resolved"), Some(AlertStatus::Resolved));
        assert_eq!(AlertStatus::parse("open"), None);
    }
}
