//! Job application domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{STATUS_APPLIED, STATUS_INTERVIEW, STATUS_OFFER, STATUS_REJECTED};

/// Job application pipeline status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// Stable string form used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => STATUS_APPLIED,
            ApplicationStatus::Interview => STATUS_INTERVIEW,
            ApplicationStatus::Offer => STATUS_OFFER,
            ApplicationStatus::Rejected => STATUS_REJECTED,
        }
    }
}

impl From<&str> for ApplicationStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_INTERVIEW => ApplicationStatus::Interview,
            STATUS_OFFER => ApplicationStatus::Offer,
            STATUS_REJECTED => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Applied,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job application domain entity. Belongs to exactly one user.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Acme Corp")]
    pub company: String,
    #[schema(example = "Backend Engineer")]
    pub title: String,
    pub status: ApplicationStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub applied_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a job application
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub company: String,
    pub title: String,
    pub status: ApplicationStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Partial update of a job application. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ApplicationUpdate {
    pub company: Option<String>,
    pub title: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl ApplicationUpdate {
    /// True when no field is set; such updates are rejected upstream.
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.title.is_none()
            && self.status.is_none()
            && self.location.is_none()
            && self.notes.is_none()
    }
}

/// Sortable columns for the application listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    AppliedDate,
    Company,
    Status,
    Title,
}

/// Sort direction for the application listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query filter for listing a user's applications
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    /// Case-insensitive substring match on company name
    pub company: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u64,
    pub per_page: u64,
}

/// Applications per pipeline status, for analytics
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: u64,
}

/// Applications per calendar month of `applied_date`, for analytics
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyCount {
    /// Month in `YYYY-MM` form
    #[schema(example = "2024-03")]
    pub month: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ApplicationStatus::Applied,
            ApplicationStatus::Interview,
            ApplicationStatus::Offer,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::from(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_defaults_to_applied() {
        assert_eq!(ApplicationStatus::from("GHOSTED"), ApplicationStatus::Applied);
    }

    #[test]
    fn test_empty_update_detected() {
        assert!(ApplicationUpdate::default().is_empty());
        let update = ApplicationUpdate {
            company: Some("Acme".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
