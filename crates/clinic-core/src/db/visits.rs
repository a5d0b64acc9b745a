//! Visit database operations.

use rusqlite::{params, Connection, OptionalExtension};

use super::{patients, prescriptions, Database, DbError, DbResult};
use crate::models::{
    Patient, Prescription, Visit, VisitPatientSummary, VisitStatus, VisitUpdate, VisitWithPatient,
};

const VISIT_COLUMNS: &str =
    "id, patient_id, doctor_name, status, chief_complaint, diagnosis, notes, visit_type, visit_date";

/// Intermediate row struct for database mapping.
struct VisitRow {
    id: String,
    patient_id: String,
    doctor_name: String,
    status: String,
    chief_complaint: Option<String>,
    diagnosis: Option<String>,
    notes: Option<String>,
    visit_type: String,
    visit_date: String,
}

impl VisitRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            doctor_name: row.get(2)?,
            status: row.get(3)?,
            chief_complaint: row.get(4)?,
            diagnosis: row.get(5)?,
            notes: row.get(6)?,
            visit_type: row.get(7)?,
            visit_date: row.get(8)?,
        })
    }
}

impl TryFrom<VisitRow> for Visit {
    type Error = DbError;

    fn try_from(row: VisitRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| DbError::Constraint(format!("stored visit status: {}", e)))?;
        let visit_type = row
            .visit_type
            .parse()
            .map_err(|e| DbError::Constraint(format!("stored visit type: {}", e)))?;

        Ok(Visit {
            id: row.id,
            patient_id: row.patient_id,
            doctor_name: row.doctor_name,
            status,
            chief_complaint: row.chief_complaint,
            diagnosis: row.diagnosis,
            notes: row.notes,
            visit_type,
            visit_date: row.visit_date,
        })
    }
}

/// Insert a new visit.
pub fn insert_visit(conn: &Connection, visit: &Visit) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO visits (
            id, patient_id, doctor_name, status, chief_complaint,
            diagnosis, notes, visit_type, visit_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            visit.id,
            visit.patient_id,
            visit.doctor_name,
            visit.status.as_str(),
            visit.chief_complaint,
            visit.diagnosis,
            visit.notes,
            visit.visit_type.as_str(),
            visit.visit_date,
        ],
    )?;
    Ok(())
}

/// Get a visit by ID.
pub fn get_visit(conn: &Connection, id: &str) -> DbResult<Option<Visit>> {
    conn.query_row(
        &format!("SELECT {} FROM visits WHERE id = ?", VISIT_COLUMNS),
        [id],
        VisitRow::from_row,
    )
    .optional()?
    .map(Visit::try_from)
    .transpose()
}

/// List a page of visits joined with patient name/phone, newest first.
pub fn list_visits_page(
    conn: &Connection,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<VisitWithPatient>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT v.id, v.patient_id, v.doctor_name, v.status, v.chief_complaint,
               v.diagnosis, v.notes, v.visit_type, v.visit_date,
               p.name, p.phone
        FROM visits v
        JOIN patients p ON p.id = v.patient_id
        ORDER BY v.visit_date DESC
        LIMIT ? OFFSET ?
        "#,
    )?;

    let rows = stmt.query_map(params![limit, offset], |row| {
        let visit = VisitRow::from_row(row)?;
        let patient = VisitPatientSummary {
            name: row.get(9)?,
            phone: row.get(10)?,
        };
        Ok((visit, patient))
    })?;

    let mut visits = Vec::new();
    for row in rows {
        let (visit_row, patient) = row?;
        visits.push(VisitWithPatient {
            visit: visit_row.try_into()?,
            patient,
        });
    }
    Ok(visits)
}

/// Count all visits.
pub fn count_visits(conn: &Connection) -> DbResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM visits", [], |row| row.get(0))?)
}

/// List all visits for a patient, newest first.
pub fn list_visits_for_patient(conn: &Connection, patient_id: &str) -> DbResult<Vec<Visit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM visits WHERE patient_id = ? ORDER BY visit_date DESC",
        VISIT_COLUMNS
    ))?;

    let rows = stmt.query_map([patient_id], VisitRow::from_row)?;

    let mut visits = Vec::new();
    for row in rows {
        visits.push(row?.try_into()?);
    }
    Ok(visits)
}

/// Find the most recent visit for a patient with one of the given statuses.
///
/// This is the implicit queue-entry-to-visit link: there is no foreign key
/// from queue entry to visit, so lookup is by patient plus status, which is
/// only safe under a single-active-visit-per-patient assumption.
pub fn find_latest_visit_by_status(
    conn: &Connection,
    patient_id: &str,
    statuses: &[VisitStatus],
) -> DbResult<Option<Visit>> {
    let placeholders = vec!["?"; statuses.len()].join(", ");
    let sql = format!(
        "SELECT {} FROM visits WHERE patient_id = ? AND status IN ({}) \
         ORDER BY visit_date DESC LIMIT 1",
        VISIT_COLUMNS, placeholders
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut param_values: Vec<&dyn rusqlite::ToSql> = vec![&patient_id];
    let status_strs: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
    for s in &status_strs {
        param_values.push(s);
    }

    stmt.query_row(param_values.as_slice(), VisitRow::from_row)
        .optional()?
        .map(Visit::try_from)
        .transpose()
}

/// Set a visit's status. Returns false if the visit does not exist.
pub fn set_visit_status(conn: &Connection, id: &str, status: VisitStatus) -> DbResult<bool> {
    let rows_affected = conn.execute(
        "UPDATE visits SET status = ? WHERE id = ?",
        params![status.as_str(), id],
    )?;
    Ok(rows_affected > 0)
}

/// Apply a visit update. A missing status defaults to `completed`.
/// Returns false if the visit does not exist.
pub fn update_visit(conn: &Connection, id: &str, update: &VisitUpdate) -> DbResult<bool> {
    let status = update.status.unwrap_or(VisitStatus::Completed);
    let rows_affected = conn.execute(
        r#"
        UPDATE visits SET
            chief_complaint = COALESCE(?2, chief_complaint),
            diagnosis = COALESCE(?3, diagnosis),
            notes = COALESCE(?4, notes),
            status = ?5
        WHERE id = ?1
        "#,
        params![
            id,
            update.chief_complaint,
            update.diagnosis,
            update.notes,
            status.as_str(),
        ],
    )?;
    Ok(rows_affected > 0)
}

/// Delete a visit. Does not touch any queue entry.
pub fn delete_visit(conn: &Connection, id: &str) -> DbResult<bool> {
    let rows_affected = conn.execute("DELETE FROM visits WHERE id = ?", [id])?;
    Ok(rows_affected > 0)
}

/// A visit joined with its patient and nested prescriptions.
#[derive(Debug, Clone, serde::Serialize, PartialEq)]
pub struct VisitDetail {
    #[serde(flatten)]
    pub visit: Visit,
    pub patient: Patient,
    pub prescriptions: Vec<Prescription>,
}

impl Database {
    pub fn insert_visit(&self, visit: &Visit) -> DbResult<()> {
        insert_visit(self.conn(), visit)
    }

    pub fn get_visit(&self, id: &str) -> DbResult<Option<Visit>> {
        get_visit(self.conn(), id)
    }

    /// Get a visit joined with its patient and prescriptions (medications
    /// included).
    pub fn get_visit_detail(&self, id: &str) -> DbResult<Option<VisitDetail>> {
        let visit = match get_visit(self.conn(), id)? {
            Some(v) => v,
            None => return Ok(None),
        };
        let patient = patients::get_patient(self.conn(), &visit.patient_id)?
            .ok_or_else(|| DbError::NotFound(format!("patient {}", visit.patient_id)))?;
        let prescriptions = prescriptions::list_prescriptions_for_visit(self.conn(), id)?;
        Ok(Some(VisitDetail { visit, patient, prescriptions }))
    }

    pub fn list_visits_page(&self, limit: i64, offset: i64) -> DbResult<Vec<VisitWithPatient>> {
        list_visits_page(self.conn(), limit, offset)
    }

    pub fn count_visits(&self) -> DbResult<i64> {
        count_visits(self.conn())
    }

    pub fn update_visit(&self, id: &str, update: &VisitUpdate) -> DbResult<bool> {
        update_visit(self.conn(), id, update)
    }

    pub fn delete_visit(&self, id: &str) -> DbResult<bool> {
        delete_visit(self.conn(), id)
    }
}
