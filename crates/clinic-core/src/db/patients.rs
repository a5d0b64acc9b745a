//! Patient database operations.

use rusqlite::{params, params_from_iter, types::Value, Connection, OptionalExtension};

use super::{queues, visits, Database, DbError, DbResult};
use crate::models::{Patient, PatientDetail, PatientUpdate};

const PATIENT_COLUMNS: &str =
    "id, name, age, gender, phone, address, email, blood_type, national_id, created_at";

/// Intermediate row struct for database mapping.
struct PatientRow {
    id: String,
    name: String,
    age: Option<i64>,
    gender: Option<String>,
    phone: String,
    address: Option<String>,
    email: Option<String>,
    blood_type: Option<String>,
    national_id: Option<String>,
    created_at: String,
}

impl PatientRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            gender: row.get(3)?,
            phone: row.get(4)?,
            address: row.get(5)?,
            email: row.get(6)?,
            blood_type: row.get(7)?,
            national_id: row.get(8)?,
            created_at: row.get(9)?,
        })
    }
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let gender = row
            .gender
            .map(|g| g.parse())
            .transpose()
            .map_err(|e| DbError::Constraint(format!("stored gender: {}", e)))?;
        let blood_type = row
            .blood_type
            .map(|b| b.parse())
            .transpose()
            .map_err(|e| DbError::Constraint(format!("stored blood type: {}", e)))?;

        Ok(Patient {
            id: row.id,
            name: row.name,
            age: row.age,
            gender,
            phone: row.phone,
            address: row.address,
            email: row.email,
            blood_type,
            national_id: row.national_id,
            created_at: row.created_at,
        })
    }
}

/// Insert a new patient.
pub fn insert_patient(conn: &Connection, patient: &Patient) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO patients (
            id, name, age, gender, phone, address, email,
            blood_type, national_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            patient.id,
            patient.name,
            patient.age,
            patient.gender.map(|g| g.as_str()),
            patient.phone,
            patient.address,
            patient.email,
            patient.blood_type.map(|b| b.as_str()),
            patient.national_id,
            patient.created_at,
        ],
    )?;
    Ok(())
}

/// Get a patient by ID.
pub fn get_patient(conn: &Connection, id: &str) -> DbResult<Option<Patient>> {
    conn.query_row(
        &format!("SELECT {} FROM patients WHERE id = ?", PATIENT_COLUMNS),
        [id],
        PatientRow::from_row,
    )
    .optional()?
    .map(Patient::try_from)
    .transpose()
}

/// List a page of patients, newest first.
pub fn list_patients_page(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Patient>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM patients ORDER BY created_at DESC LIMIT ? OFFSET ?",
        PATIENT_COLUMNS
    ))?;

    let rows = stmt.query_map(params![limit, offset], PatientRow::from_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?.try_into()?);
    }
    Ok(patients)
}

/// Count all patients.
pub fn count_patients(conn: &Connection) -> DbResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?)
}

/// Apply a partial update. Returns false if the patient does not exist.
pub fn update_patient(conn: &Connection, id: &str, update: &PatientUpdate) -> DbResult<bool> {
    if update.is_empty() {
        // Nothing to write; report whether the patient exists.
        return Ok(get_patient(conn, id)?.is_some());
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(name) = &update.name {
        sets.push("name = ?");
        values.push(name.clone().into());
    }
    if let Some(age) = update.age {
        sets.push("age = ?");
        values.push(age.into());
    }
    if let Some(gender) = update.gender {
        sets.push("gender = ?");
        values.push(gender.as_str().to_string().into());
    }
    if let Some(phone) = &update.phone {
        sets.push("phone = ?");
        values.push(phone.clone().into());
    }
    if let Some(address) = &update.address {
        sets.push("address = ?");
        values.push(address.clone().into());
    }
    if let Some(email) = &update.email {
        sets.push("email = ?");
        values.push(email.clone().into());
    }
    if let Some(blood_type) = update.blood_type {
        sets.push("blood_type = ?");
        values.push(blood_type.as_str().to_string().into());
    }
    if let Some(national_id) = &update.national_id {
        sets.push("national_id = ?");
        values.push(national_id.clone().into());
    }

    values.push(id.to_string().into());
    let sql = format!("UPDATE patients SET {} WHERE id = ?", sets.join(", "));
    let rows_affected = conn.execute(&sql, params_from_iter(values))?;
    Ok(rows_affected > 0)
}

/// Delete a patient. Dependent visits and queue entries cascade.
pub fn delete_patient(conn: &Connection, id: &str) -> DbResult<bool> {
    let rows_affected = conn.execute("DELETE FROM patients WHERE id = ?", [id])?;
    Ok(rows_affected > 0)
}

impl Database {
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        insert_patient(self.conn(), patient)
    }

    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        get_patient(self.conn(), id)
    }

    /// Get a patient joined with its visits and queue entries.
    pub fn get_patient_detail(&self, id: &str) -> DbResult<Option<PatientDetail>> {
        let patient = match get_patient(self.conn(), id)? {
            Some(p) => p,
            None => return Ok(None),
        };
        let visits = visits::list_visits_for_patient(self.conn(), id)?;
        let queues = queues::list_entries_for_patient(self.conn(), id)?;
        Ok(Some(PatientDetail { patient, visits, queues }))
    }

    pub fn list_patients_page(&self, limit: i64, offset: i64) -> DbResult<Vec<Patient>> {
        list_patients_page(self.conn(), limit, offset)
    }

    pub fn count_patients(&self) -> DbResult<i64> {
        count_patients(self.conn())
    }

    pub fn update_patient(&self, id: &str, update: &PatientUpdate) -> DbResult<bool> {
        update_patient(self.conn(), id, update)
    }

    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        delete_patient(self.conn(), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodType, Gender};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_patient(name: &str) -> Patient {
        let mut patient = Patient::new(name.into(), "01012345678".into());
        patient.age = Some(34);
        patient.gender = Some(Gender::Female);
        patient.blood_type = Some(BloodType::OPos);
        patient
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let db = setup_db();
        let patient = make_patient("Mona Said");
        db.insert_patient(&patient).unwrap();

        let retrieved = db.get_patient(&patient.id).unwrap().unwrap();
        assert_eq!(retrieved, patient);
    }

    #[test]
    fn test_get_missing_patient() {
        let db = setup_db();
        assert!(db.get_patient("nope").unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let db = setup_db();
        for i in 0..3 {
            let mut patient = make_patient(&format!("Patient {}", i));
            // Force distinct, increasing timestamps
            patient.created_at = format!("2026-01-0{}T00:00:00+00:00", i + 1);
            db.insert_patient(&patient).unwrap();
        }

        let page = db.list_patients_page(10, 0).unwrap();
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].name, "Patient 2");
        assert_eq!(page[2].name, "Patient 0");
    }

    #[test]
    fn test_pagination_window() {
        let db = setup_db();
        for i in 0..15 {
            let mut patient = make_patient(&format!("Patient {:02}", i));
            patient.created_at = format!("2026-01-01T00:00:{:02}+00:00", i);
            db.insert_patient(&patient).unwrap();
        }

        assert_eq!(db.count_patients().unwrap(), 15);
        let second_page = db.list_patients_page(10, 10).unwrap();
        assert_eq!(second_page.len(), 5);
    }

    #[test]
    fn test_partial_update() {
        let db = setup_db();
        let patient = make_patient("Mona Said");
        db.insert_patient(&patient).unwrap();

        let update = PatientUpdate {
            age: Some(35),
            address: Some("12 Tahrir St, Cairo".into()),
            ..Default::default()
        };
        assert!(db.update_patient(&patient.id, &update).unwrap());

        let retrieved = db.get_patient(&patient.id).unwrap().unwrap();
        assert_eq!(retrieved.age, Some(35));
        assert_eq!(retrieved.address.as_deref(), Some("12 Tahrir St, Cairo"));
        // Untouched fields survive
        assert_eq!(retrieved.name, "Mona Said");
        assert_eq!(retrieved.blood_type, Some(BloodType::OPos));
    }

    #[test]
    fn test_update_missing_patient() {
        let db = setup_db();
        let update = PatientUpdate { age: Some(40), ..Default::default() };
        assert!(!db.update_patient("nope", &update).unwrap());
    }

    #[test]
    fn test_delete() {
        let db = setup_db();
        let patient = make_patient("Mona Said");
        db.insert_patient(&patient).unwrap();

        assert!(db.delete_patient(&patient.id).unwrap());
        assert!(!db.delete_patient(&patient.id).unwrap());
        assert!(db.get_patient(&patient.id).unwrap().is_none());
    }
}
