//! Clinical visit models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Visit lifecycle status.
///
/// A visit is auto-created in `Pending` state when its patient is enqueued;
/// it moves to `Completed` when the queue entry completes, or `Cancelled`
/// when the queue entry is removed before service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Pending => "pending",
            VisitStatus::InProgress => "in_progress",
            VisitStatus::Completed => "completed",
            VisitStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for VisitStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(VisitStatus::Pending),
            "in_progress" => Ok(VisitStatus::InProgress),
            "completed" => Ok(VisitStatus::Completed),
            "cancelled" => Ok(VisitStatus::Cancelled),
            _ => Err(ValidationError(format!("Invalid visit status: {}", s))),
        }
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of clinical visit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VisitType {
    Consultation,
    Examination,
}

impl VisitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitType::Consultation => "consultation",
            VisitType::Examination => "examination",
        }
    }
}

impl FromStr for VisitType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "consultation" => Ok(VisitType::Consultation),
            "examination" => Ok(VisitType::Examination),
            _ => Err(ValidationError(format!("Invalid visitType: {}", s))),
        }
    }
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clinical visit record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub patient_id: String,
    /// Attending doctor identifier
    pub doctor_name: String,
    pub status: VisitStatus,
    pub chief_complaint: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub visit_type: VisitType,
    /// Creation timestamp, used for recency ordering
    pub visit_date: String,
}

impl Visit {
    /// Create a new pending visit.
    pub fn new(patient_id: String, doctor_name: String, visit_type: VisitType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            doctor_name,
            status: VisitStatus::Pending,
            chief_complaint: None,
            diagnosis: None,
            notes: None,
            visit_type,
            visit_date: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Partial visit update. `None` fields are left unchanged, except `status`
/// which defaults to `Completed` when omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitUpdate {
    pub chief_complaint: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub status: Option<VisitStatus>,
}

/// Patient summary carried alongside a visit in list responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitPatientSummary {
    pub name: String,
    pub phone: String,
}

/// A visit joined with a patient summary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VisitWithPatient {
    #[serde(flatten)]
    pub visit: Visit,
    pub patient: VisitPatientSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_visit_is_pending() {
        let visit = Visit::new("patient-1".into(), "Dr. Ahmed Hassan".into(), VisitType::Examination);
        assert!(matches!(visit.status, VisitStatus::Pending));
        assert_eq!(visit.id.len(), 36);
        assert!(visit.diagnosis.is_none());
    }

    #[test]
    fn test_status_round_trip() {
        for token in ["pending", "in_progress", "completed", "cancelled"] {
            let parsed: VisitStatus = token.parse().unwrap();
            assert_eq!(parsed.as_str(), token);
        }
        assert!("done".parse::<VisitStatus>().is_err());
    }

    #[test]
    fn test_visit_type_parse() {
        assert_eq!("Consultation".parse::<VisitType>().unwrap(), VisitType::Consultation);
        assert!("surgery".parse::<VisitType>().is_err());
    }

    #[test]
    fn test_status_json_snake_case() {
        let json = serde_json::to_string(&VisitStatus::InProgress).unwrap();
        assert_eq!(json, r#""in_progress""#);
    }
}
