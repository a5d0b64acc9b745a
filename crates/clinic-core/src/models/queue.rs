//! Waiting queue models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

use super::patient::Gender;

/// Service priority. The primary sort key for service order:
/// urgent > high > normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Sort rank for service ordering; lower serves first.
    pub fn rank(&self) -> i64 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Normal => 2,
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(ValidationError(format!("Invalid priority: {}", s))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queue entry status. Monotonic: waiting -> in_progress -> completed,
/// or deleted entirely when the patient is removed before service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Waiting,
    InProgress,
    Completed,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Waiting => "waiting",
            QueueStatus::InProgress => "in_progress",
            QueueStatus::Completed => "completed",
        }
    }

    /// Whether this entry still occupies a position in the waiting list.
    pub fn is_active(&self) -> bool {
        matches!(self, QueueStatus::Waiting | QueueStatus::InProgress)
    }
}

impl FromStr for QueueStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waiting" => Ok(QueueStatus::Waiting),
            "in_progress" => Ok(QueueStatus::InProgress),
            "completed" => Ok(QueueStatus::Completed),
            _ => Err(ValidationError(format!("Invalid queue status: {}", s))),
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry on the patient waiting queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub id: String,
    pub patient_id: String,
    /// Strictly increasing across the active set; ties broken never
    pub position: i64,
    pub reason: Option<String>,
    pub priority: Priority,
    pub status: QueueStatus,
    pub created_at: String,
}

impl QueueEntry {
    /// Create a new waiting entry at the given position.
    pub fn new(patient_id: String, position: i64, reason: Option<String>, priority: Priority) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            position,
            reason,
            priority,
            status: QueueStatus::Waiting,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Patient summary carried alongside an active queue entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueuePatientSummary {
    pub name: String,
    pub phone: String,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
}

/// An active queue entry joined with a patient summary, as returned by
/// the canonical "who is served next" listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActiveQueueEntry {
    #[serde(flatten)]
    pub entry: QueueEntry,
    pub patient: QueuePatientSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_waiting() {
        let entry = QueueEntry::new("patient-1".into(), 3, None, Priority::Normal);
        assert!(matches!(entry.status, QueueStatus::Waiting));
        assert_eq!(entry.position, 3);
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::Urgent.rank() < Priority::High.rank());
        assert!(Priority::High.rank() < Priority::Normal.rank());
    }

    #[test]
    fn test_active_statuses() {
        assert!(QueueStatus::Waiting.is_active());
        assert!(QueueStatus::InProgress.is_active());
        assert!(!QueueStatus::Completed.is_active());
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("URGENT".parse::<Priority>().unwrap(), Priority::Urgent);
        assert!("asap".parse::<Priority>().is_err());
    }
}
