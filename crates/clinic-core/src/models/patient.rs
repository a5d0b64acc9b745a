//! Patient models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

use super::queue::QueueEntry;
use super::visit::Visit;

/// Patient gender. Parsed case-insensitively from client input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ValidationError(format!("Invalid gender: {}", s))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ABO/Rh blood type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APos,
    #[serde(rename = "A-")]
    ANeg,
    #[serde(rename = "B+")]
    BPos,
    #[serde(rename = "B-")]
    BNeg,
    #[serde(rename = "AB+")]
    AbPos,
    #[serde(rename = "AB-")]
    AbNeg,
    #[serde(rename = "O+")]
    OPos,
    #[serde(rename = "O-")]
    ONeg,
}

impl BloodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APos => "A+",
            BloodType::ANeg => "A-",
            BloodType::BPos => "B+",
            BloodType::BNeg => "B-",
            BloodType::AbPos => "AB+",
            BloodType::AbNeg => "AB-",
            BloodType::OPos => "O+",
            BloodType::ONeg => "O-",
        }
    }
}

impl FromStr for BloodType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A+" => Ok(BloodType::APos),
            "A-" => Ok(BloodType::ANeg),
            "B+" => Ok(BloodType::BPos),
            "B-" => Ok(BloodType::BNeg),
            "AB+" => Ok(BloodType::AbPos),
            "AB-" => Ok(BloodType::AbNeg),
            "O+" => Ok(BloodType::OPos),
            "O-" => Ok(BloodType::ONeg),
            _ => Err(ValidationError(format!("Invalid blood type: {}", s))),
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// System-assigned UUID
    pub id: String,
    /// Full name
    pub name: String,
    /// Age in years (0-120), absent if unknown
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    /// Egyptian mobile number (01xxxxxxxxx)
    pub phone: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub blood_type: Option<BloodType>,
    /// 14-digit national ID
    pub national_id: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Patient {
    /// Create a new patient with required fields.
    pub fn new(name: String, phone: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            age: None,
            gender: None,
            phone,
            address: None,
            email: None,
            blood_type: None,
            national_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Partial patient update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub blood_type: Option<BloodType>,
    pub national_id: Option<String>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.email.is_none()
            && self.blood_type.is_none()
            && self.national_id.is_none()
    }
}

/// A patient joined with its visits and queue entries.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetail {
    #[serde(flatten)]
    pub patient: Patient,
    pub visits: Vec<Visit>,
    pub queues: Vec<QueueEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient() {
        let patient = Patient::new("Mona Said".into(), "01012345678".into());
        assert_eq!(patient.name, "Mona Said");
        assert_eq!(patient.phone, "01012345678");
        assert!(patient.age.is_none());
        assert_eq!(patient.id.len(), 36); // UUID format
    }

    #[test]
    fn test_gender_parse_case_insensitive() {
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
        assert!("unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn test_blood_type_round_trip() {
        for token in ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"] {
            let parsed: BloodType = token.parse().unwrap();
            assert_eq!(parsed.as_str(), token);
        }
        assert!("C+".parse::<BloodType>().is_err());
    }

    #[test]
    fn test_blood_type_json_rename() {
        let json = serde_json::to_string(&BloodType::AbNeg).unwrap();
        assert_eq!(json, r#""AB-""#);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(PatientUpdate::default().is_empty());
        let update = PatientUpdate {
            age: Some(40),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
