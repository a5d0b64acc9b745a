//! Queue entry database operations.

use rusqlite::{params, Connection, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{ActiveQueueEntry, QueueEntry, QueuePatientSummary, QueueStatus};

const QUEUE_COLUMNS: &str = "id, patient_id, position, reason, priority, status, created_at";

/// Intermediate row struct for database mapping.
struct QueueRow {
    id: String,
    patient_id: String,
    position: i64,
    reason: Option<String>,
    priority: String,
    status: String,
    created_at: String,
}

impl QueueRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            position: row.get(2)?,
            reason: row.get(3)?,
            priority: row.get(4)?,
            status: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

impl TryFrom<QueueRow> for QueueEntry {
    type Error = DbError;

    fn try_from(row: QueueRow) -> Result<Self, Self::Error> {
        let priority = row
            .priority
            .parse()
            .map_err(|e| DbError::Constraint(format!("stored priority: {}", e)))?;
        let status = row
            .status
            .parse()
            .map_err(|e| DbError::Constraint(format!("stored queue status: {}", e)))?;

        Ok(QueueEntry {
            id: row.id,
            patient_id: row.patient_id,
            position: row.position,
            reason: row.reason,
            priority,
            status,
            created_at: row.created_at,
        })
    }
}

/// Insert a new queue entry.
pub fn insert_queue_entry(conn: &Connection, entry: &QueueEntry) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO queue_entries (
            id, patient_id, position, reason, priority, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            entry.id,
            entry.patient_id,
            entry.position,
            entry.reason,
            entry.priority.as_str(),
            entry.status.as_str(),
            entry.created_at,
        ],
    )?;
    Ok(())
}

/// Get a queue entry by ID.
pub fn get_queue_entry(conn: &Connection, id: &str) -> DbResult<Option<QueueEntry>> {
    conn.query_row(
        &format!("SELECT {} FROM queue_entries WHERE id = ?", QUEUE_COLUMNS),
        [id],
        QueueRow::from_row,
    )
    .optional()?
    .map(QueueEntry::try_from)
    .transpose()
}

/// Highest position among active (waiting or in_progress) entries, 0 if none.
///
/// Positions are only monotonic within the active set; once the queue drains
/// the counter effectively restarts.
pub fn max_active_position(conn: &Connection) -> DbResult<i64> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(position), 0) FROM queue_entries \
         WHERE status IN ('waiting', 'in_progress')",
        [],
        |row| row.get(0),
    )?)
}

/// List active entries joined with a patient summary, in service order:
/// priority descending (urgent > high > normal), then position ascending.
pub fn list_active(conn: &Connection) -> DbResult<Vec<ActiveQueueEntry>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT q.id, q.patient_id, q.position, q.reason, q.priority, q.status, q.created_at,
               p.name, p.phone, p.age, p.gender
        FROM queue_entries q
        JOIN patients p ON p.id = q.patient_id
        WHERE q.status IN ('waiting', 'in_progress')
        ORDER BY CASE q.priority
                     WHEN 'urgent' THEN 0
                     WHEN 'high' THEN 1
                     ELSE 2
                 END,
                 q.position ASC
        "#,
    )?;

    let rows = stmt.query_map([], |row| {
        let entry = QueueRow::from_row(row)?;
        let gender: Option<String> = row.get(10)?;
        Ok((entry, row.get::<_, String>(7)?, row.get::<_, String>(8)?, row.get::<_, Option<i64>>(9)?, gender))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (entry_row, name, phone, age, gender) = row?;
        let gender = gender
            .map(|g| g.parse())
            .transpose()
            .map_err(|e| DbError::Constraint(format!("stored gender: {}", e)))?;
        entries.push(ActiveQueueEntry {
            entry: entry_row.try_into()?,
            patient: QueuePatientSummary { name, phone, age, gender },
        });
    }
    Ok(entries)
}

/// List all queue entries for a patient, newest first.
pub fn list_entries_for_patient(conn: &Connection, patient_id: &str) -> DbResult<Vec<QueueEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM queue_entries WHERE patient_id = ? ORDER BY created_at DESC",
        QUEUE_COLUMNS
    ))?;

    let rows = stmt.query_map([patient_id], QueueRow::from_row)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?.try_into()?);
    }
    Ok(entries)
}

/// Set an entry's status. Returns false if the entry does not exist.
pub fn set_queue_status(conn: &Connection, id: &str, status: QueueStatus) -> DbResult<bool> {
    let rows_affected = conn.execute(
        "UPDATE queue_entries SET status = ? WHERE id = ?",
        params![status.as_str(), id],
    )?;
    Ok(rows_affected > 0)
}

/// Delete a queue entry. Returns false if the entry does not exist.
pub fn delete_queue_entry(conn: &Connection, id: &str) -> DbResult<bool> {
    let rows_affected = conn.execute("DELETE FROM queue_entries WHERE id = ?", [id])?;
    Ok(rows_affected > 0)
}

impl Database {
    pub fn insert_queue_entry(&self, entry: &QueueEntry) -> DbResult<()> {
        insert_queue_entry(self.conn(), entry)
    }

    pub fn get_queue_entry(&self, id: &str) -> DbResult<Option<QueueEntry>> {
        get_queue_entry(self.conn(), id)
    }

    pub fn max_active_position(&self) -> DbResult<i64> {
        max_active_position(self.conn())
    }

    pub fn list_active_queue(&self) -> DbResult<Vec<ActiveQueueEntry>> {
        list_active(self.conn())
    }

    pub fn set_queue_status(&self, id: &str, status: QueueStatus) -> DbResult<bool> {
        set_queue_status(self.conn(), id, status)
    }

    pub fn delete_queue_entry(&self, id: &str) -> DbResult<bool> {
        delete_queue_entry(self.conn(), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Patient, Priority};

    fn setup_db() -> (Database, Patient) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("Mona Said".into(), "01012345678".into());
        db.insert_patient(&patient).unwrap();
        (db, patient)
    }

    #[test]
    fn test_insert_and_get() {
        let (db, patient) = setup_db();
        let entry = QueueEntry::new(patient.id.clone(), 1, Some("Headache".into()), Priority::Normal);
        db.insert_queue_entry(&entry).unwrap();

        let retrieved = db.get_queue_entry(&entry.id).unwrap().unwrap();
        assert_eq!(retrieved, entry);
    }

    #[test]
    fn test_max_position_ignores_completed() {
        let (db, patient) = setup_db();
        assert_eq!(db.max_active_position().unwrap(), 0);

        let first = QueueEntry::new(patient.id.clone(), 1, None, Priority::Normal);
        db.insert_queue_entry(&first).unwrap();
        let second = QueueEntry::new(patient.id.clone(), 2, None, Priority::Normal);
        db.insert_queue_entry(&second).unwrap();
        assert_eq!(db.max_active_position().unwrap(), 2);

        db.set_queue_status(&second.id, QueueStatus::Completed).unwrap();
        assert_eq!(db.max_active_position().unwrap(), 1);
    }

    #[test]
    fn test_service_ordering() {
        let (db, patient) = setup_db();
        let normal = QueueEntry::new(patient.id.clone(), 1, None, Priority::Normal);
        let urgent = QueueEntry::new(patient.id.clone(), 2, None, Priority::Urgent);
        let high = QueueEntry::new(patient.id.clone(), 3, None, Priority::High);
        for entry in [&normal, &urgent, &high] {
            db.insert_queue_entry(entry).unwrap();
        }

        let active = db.list_active_queue().unwrap();
        let ids: Vec<&str> = active.iter().map(|a| a.entry.id.as_str()).collect();
        assert_eq!(ids, vec![urgent.id.as_str(), high.id.as_str(), normal.id.as_str()]);
    }

    #[test]
    fn test_position_breaks_priority_ties() {
        let (db, patient) = setup_db();
        let second = QueueEntry::new(patient.id.clone(), 2, None, Priority::High);
        let first = QueueEntry::new(patient.id.clone(), 1, None, Priority::High);
        db.insert_queue_entry(&second).unwrap();
        db.insert_queue_entry(&first).unwrap();

        let active = db.list_active_queue().unwrap();
        assert_eq!(active[0].entry.id, first.id);
        assert_eq!(active[1].entry.id, second.id);
    }

    #[test]
    fn test_active_listing_excludes_completed() {
        let (db, patient) = setup_db();
        let entry = QueueEntry::new(patient.id.clone(), 1, None, Priority::Normal);
        db.insert_queue_entry(&entry).unwrap();

        db.set_queue_status(&entry.id, QueueStatus::InProgress).unwrap();
        assert_eq!(db.list_active_queue().unwrap().len(), 1);

        db.set_queue_status(&entry.id, QueueStatus::Completed).unwrap();
        assert!(db.list_active_queue().unwrap().is_empty());
    }

    #[test]
    fn test_listing_includes_patient_summary() {
        let (db, patient) = setup_db();
        let entry = QueueEntry::new(patient.id.clone(), 1, None, Priority::Normal);
        db.insert_queue_entry(&entry).unwrap();

        let active = db.list_active_queue().unwrap();
        assert_eq!(active[0].patient.name, "Mona Said");
        assert_eq!(active[0].patient.phone, "01012345678");
    }

    #[test]
    fn test_delete_entry() {
        let (db, patient) = setup_db();
        let entry = QueueEntry::new(patient.id.clone(), 1, None, Priority::Normal);
        db.insert_queue_entry(&entry).unwrap();

        assert!(db.delete_queue_entry(&entry.id).unwrap());
        assert!(!db.delete_queue_entry(&entry.id).unwrap());
    }
}
