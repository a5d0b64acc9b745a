//! Prescription and medication models.

use serde::{Deserialize, Serialize};

/// A prescription issued for a visit. Auto-created empty alongside the
/// pending visit when a patient is enqueued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: String,
    pub visit_id: String,
    pub additional_notes: Option<String>,
    pub medications: Vec<Medication>,
    pub created_at: String,
}

impl Prescription {
    /// Create a new empty prescription for a visit.
    pub fn new(visit_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            visit_id,
            additional_notes: None,
            medications: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.medications.is_empty() && self.additional_notes.is_none()
    }
}

/// A single medication line item on a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub prescription_id: String,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
}

impl Medication {
    pub fn new(prescription_id: String, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            prescription_id,
            name,
            dosage: None,
            frequency: None,
            duration: None,
            instructions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_prescription_is_empty() {
        let prescription = Prescription::new("visit-1".into());
        assert!(prescription.is_empty());
        assert_eq!(prescription.visit_id, "visit-1");
        assert_eq!(prescription.id.len(), 36);
    }

    #[test]
    fn test_medication_belongs_to_prescription() {
        let prescription = Prescription::new("visit-1".into());
        let med = Medication::new(prescription.id.clone(), "Amoxicillin".into());
        assert_eq!(med.prescription_id, prescription.id);
        assert_eq!(med.name, "Amoxicillin");
    }
}
