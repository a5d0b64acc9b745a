//! Prescription and medication database operations.

use rusqlite::{params, Connection, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{Medication, Prescription};

/// Insert a prescription together with its medication line items.
pub fn insert_prescription(conn: &Connection, prescription: &Prescription) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO prescriptions (id, visit_id, additional_notes, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            prescription.id,
            prescription.visit_id,
            prescription.additional_notes,
            prescription.created_at,
        ],
    )?;

    for medication in &prescription.medications {
        insert_medication(conn, medication)?;
    }
    Ok(())
}

fn insert_medication(conn: &Connection, medication: &Medication) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO medications (
            id, prescription_id, name, dosage, frequency, duration, instructions
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            medication.id,
            medication.prescription_id,
            medication.name,
            medication.dosage,
            medication.frequency,
            medication.duration,
            medication.instructions,
        ],
    )?;
    Ok(())
}

/// List the medications on a prescription.
pub fn list_medications(conn: &Connection, prescription_id: &str) -> DbResult<Vec<Medication>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, prescription_id, name, dosage, frequency, duration, instructions
        FROM medications
        WHERE prescription_id = ?
        "#,
    )?;

    let rows = stmt.query_map([prescription_id], |row| {
        Ok(Medication {
            id: row.get(0)?,
            prescription_id: row.get(1)?,
            name: row.get(2)?,
            dosage: row.get(3)?,
            frequency: row.get(4)?,
            duration: row.get(5)?,
            instructions: row.get(6)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Get a prescription with its medications.
pub fn get_prescription(conn: &Connection, id: &str) -> DbResult<Option<Prescription>> {
    let header = conn
        .query_row(
            "SELECT id, visit_id, additional_notes, created_at FROM prescriptions WHERE id = ?",
            [id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let (id, visit_id, additional_notes, created_at) = match header {
        Some(h) => h,
        None => return Ok(None),
    };

    let medications = list_medications(conn, &id)?;
    Ok(Some(Prescription {
        id,
        visit_id,
        additional_notes,
        medications,
        created_at,
    }))
}

/// List a page of prescriptions (medications included), newest first.
pub fn list_prescriptions_page(
    conn: &Connection,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<Prescription>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM prescriptions ORDER BY created_at DESC LIMIT ? OFFSET ?",
    )?;
    let ids = stmt
        .query_map(params![limit, offset], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut prescriptions = Vec::new();
    for id in ids {
        if let Some(prescription) = get_prescription(conn, &id)? {
            prescriptions.push(prescription);
        }
    }
    Ok(prescriptions)
}

/// Count all prescriptions.
pub fn count_prescriptions(conn: &Connection) -> DbResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM prescriptions", [], |row| row.get(0))?)
}

/// List all prescriptions for a visit, medications included.
pub fn list_prescriptions_for_visit(conn: &Connection, visit_id: &str) -> DbResult<Vec<Prescription>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM prescriptions WHERE visit_id = ? ORDER BY created_at DESC",
    )?;
    let ids = stmt
        .query_map([visit_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut prescriptions = Vec::new();
    for id in ids {
        if let Some(prescription) = get_prescription(conn, &id)? {
            prescriptions.push(prescription);
        }
    }
    Ok(prescriptions)
}

/// Update a prescription's notes and replace its medication lines.
/// Returns false if the prescription does not exist.
pub fn update_prescription(
    conn: &Connection,
    id: &str,
    additional_notes: Option<&str>,
    medications: &[Medication],
) -> DbResult<bool> {
    let rows_affected = conn.execute(
        "UPDATE prescriptions SET additional_notes = ? WHERE id = ?",
        params![additional_notes, id],
    )?;
    if rows_affected == 0 {
        return Ok(false);
    }

    conn.execute("DELETE FROM medications WHERE prescription_id = ?", [id])?;
    for medication in medications {
        insert_medication(conn, medication)?;
    }
    Ok(true)
}

/// Delete a prescription. Its medications cascade.
pub fn delete_prescription(conn: &Connection, id: &str) -> DbResult<bool> {
    let rows_affected = conn.execute("DELETE FROM prescriptions WHERE id = ?", [id])?;
    Ok(rows_affected > 0)
}

/// Delete every prescription attached to a visit. Returns the count removed.
pub fn delete_prescriptions_for_visit(conn: &Connection, visit_id: &str) -> DbResult<usize> {
    let rows_affected =
        conn.execute("DELETE FROM prescriptions WHERE visit_id = ?", [visit_id])?;
    Ok(rows_affected)
}

impl Database {
    pub fn insert_prescription(&self, prescription: &Prescription) -> DbResult<()> {
        insert_prescription(self.conn(), prescription)
    }

    pub fn get_prescription(&self, id: &str) -> DbResult<Option<Prescription>> {
        get_prescription(self.conn(), id)
    }

    pub fn list_prescriptions_page(&self, limit: i64, offset: i64) -> DbResult<Vec<Prescription>> {
        list_prescriptions_page(self.conn(), limit, offset)
    }

    pub fn count_prescriptions(&self) -> DbResult<i64> {
        count_prescriptions(self.conn())
    }

    /// Replace notes and medications atomically.
    pub fn update_prescription(
        &mut self,
        id: &str,
        additional_notes: Option<&str>,
        medications: &[Medication],
    ) -> DbResult<bool> {
        let tx = self.transaction()?;
        let updated = update_prescription(&tx, id, additional_notes, medications)?;
        tx.commit()?;
        Ok(updated)
    }

    pub fn delete_prescription(&self, id: &str) -> DbResult<bool> {
        delete_prescription(self.conn(), id)
    }
}
