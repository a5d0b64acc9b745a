//! SQLite schema definition.

/// Complete database schema for the clinic backend.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER,
    gender TEXT,
    phone TEXT NOT NULL,
    address TEXT,
    email TEXT,
    blood_type TEXT,
    national_id TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_created_at ON patients(created_at);
CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);

-- ============================================================================
-- Visits
-- ============================================================================

CREATE TABLE IF NOT EXISTS visits (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    doctor_name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'in_progress', 'completed', 'cancelled')),
    chief_complaint TEXT,
    diagnosis TEXT,
    notes TEXT,
    visit_type TEXT NOT NULL DEFAULT 'examination'
        CHECK (visit_type IN ('consultation', 'examination')),
    visit_date TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_visits_patient ON visits(patient_id);
CREATE INDEX IF NOT EXISTS idx_visits_status ON visits(status);
CREATE INDEX IF NOT EXISTS idx_visits_date ON visits(visit_date);

-- ============================================================================
-- Prescriptions and medication line items
-- ============================================================================

CREATE TABLE IF NOT EXISTS prescriptions (
    id TEXT PRIMARY KEY,
    visit_id TEXT NOT NULL REFERENCES visits(id) ON DELETE CASCADE,
    additional_notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_prescriptions_visit ON prescriptions(visit_id);

CREATE TABLE IF NOT EXISTS medications (
    id TEXT PRIMARY KEY,
    prescription_id TEXT NOT NULL REFERENCES prescriptions(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    dosage TEXT,
    frequency TEXT,
    duration TEXT,
    instructions TEXT
);

CREATE INDEX IF NOT EXISTS idx_medications_prescription ON medications(prescription_id);

-- ============================================================================
-- Waiting queue
-- ============================================================================

CREATE TABLE IF NOT EXISTS queue_entries (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    reason TEXT,
    priority TEXT NOT NULL DEFAULT 'normal'
        CHECK (priority IN ('normal', 'high', 'urgent')),
    status TEXT NOT NULL DEFAULT 'waiting'
        CHECK (status IN ('waiting', 'in_progress', 'completed')),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_queue_status ON queue_entries(status);
CREATE INDEX IF NOT EXISTS idx_queue_patient ON queue_entries(patient_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_status_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO patients (id, name, phone) VALUES ('p1', 'Mona Said', '01012345678')",
            [],
        )
        .unwrap();

        // Unknown queue status must be rejected at the store level
        let result = conn.execute(
            "INSERT INTO queue_entries (id, patient_id, position, status) VALUES ('q1', 'p1', 1, 'paused')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_patient_delete_cascades() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO patients (id, name, phone) VALUES ('p1', 'Mona Said', '01012345678')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO visits (id, patient_id, doctor_name) VALUES ('v1', 'p1', 'Dr. Ahmed Hassan')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO prescriptions (id, visit_id) VALUES ('rx1', 'v1')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO queue_entries (id, patient_id, position) VALUES ('q1', 'p1', 1)",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM patients WHERE id = 'p1'", []).unwrap();

        for table in ["visits", "prescriptions", "queue_entries"] {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
                .unwrap();
            assert_eq!(count, 0, "{} should cascade on patient delete", table);
        }
    }
}
