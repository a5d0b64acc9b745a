//! Queue lifecycle integration tests.

use clinic_core::db::Database;
use clinic_core::models::{Patient, QueueStatus, VisitStatus};
use clinic_core::queue::{NewQueueEntry, NoopNotifier, QueueManager};

fn make_patient(db: &Database, name: &str) -> Patient {
    let patient = Patient::new(name.to_string(), "01012345678".to_string());
    db.insert_patient(&patient).unwrap();
    patient
}

fn enqueue(db: &mut Database, patient_id: &str, priority: &str) -> clinic_core::EnqueueOutcome {
    QueueManager::new(db, &NoopNotifier)
        .enqueue(NewQueueEntry {
            patient_id: patient_id.to_string(),
            reason: Some("checkup".to_string()),
            priority: Some(priority.to_string()),
            visit_type: None,
        })
        .unwrap()
}

#[test]
fn test_full_lifecycle_enqueue_start_complete() {
    let mut db = Database::open_in_memory().unwrap();
    let patient = make_patient(&db, "Mona Said");

    let outcome = enqueue(&mut db, &patient.id, "normal");
    assert_eq!(outcome.entry.status, QueueStatus::Waiting);
    assert_eq!(outcome.visit.status, VisitStatus::Pending);
    assert!(outcome.prescription.is_empty());

    QueueManager::new(&mut db, &NoopNotifier)
        .start(&outcome.entry.id)
        .unwrap();

    let completed = QueueManager::new(&mut db, &NoopNotifier)
        .complete(&outcome.entry.id)
        .unwrap();
    assert_eq!(completed.entry.status, QueueStatus::Completed);
    assert_eq!(completed.visit.unwrap().status, VisitStatus::Completed);

    // The queue drained
    assert!(db.list_active_queue().unwrap().is_empty());
}

#[test]
fn test_service_order_across_priorities() {
    let mut db = Database::open_in_memory().unwrap();
    let p1 = make_patient(&db, "Patient One");
    let p2 = make_patient(&db, "Patient Two");
    let p3 = make_patient(&db, "Patient Three");

    // Added in order: normal, urgent, high
    enqueue(&mut db, &p1.id, "normal");
    enqueue(&mut db, &p2.id, "urgent");
    enqueue(&mut db, &p3.id, "high");

    let active = db.list_active_queue().unwrap();
    let names: Vec<&str> = active.iter().map(|a| a.patient.name.as_str()).collect();
    assert_eq!(names, vec!["Patient Two", "Patient Three", "Patient One"]);
}

#[test]
fn test_remove_mid_queue_preserves_other_entries() {
    let mut db = Database::open_in_memory().unwrap();
    let p1 = make_patient(&db, "Patient One");
    let p2 = make_patient(&db, "Patient Two");

    let first = enqueue(&mut db, &p1.id, "normal");
    let second = enqueue(&mut db, &p2.id, "normal");

    let cancelled = QueueManager::new(&mut db, &NoopNotifier)
        .remove(&first.entry.id)
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.patient_id, p1.id);
    assert_eq!(cancelled.status, VisitStatus::Cancelled);

    // The other patient's records are untouched
    let active = db.list_active_queue().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].entry.id, second.entry.id);
    assert_eq!(
        db.get_visit(&second.visit.id).unwrap().unwrap().status,
        VisitStatus::Pending
    );
    assert!(db.get_prescription(&second.prescription.id).unwrap().is_some());
}

#[test]
fn test_remove_targets_latest_visit_of_patient() {
    let mut db = Database::open_in_memory().unwrap();
    let patient = make_patient(&db, "Mona Said");

    // Two queue rounds for the same patient: the first was completed, the
    // second is still waiting.
    let first = enqueue(&mut db, &patient.id, "normal");
    QueueManager::new(&mut db, &NoopNotifier)
        .complete(&first.entry.id)
        .unwrap();
    let second = enqueue(&mut db, &patient.id, "normal");

    let cancelled = QueueManager::new(&mut db, &NoopNotifier)
        .remove(&second.entry.id)
        .unwrap()
        .unwrap();

    // The completed visit from round one is untouched
    assert_eq!(cancelled.id, second.visit.id);
    assert_eq!(
        db.get_visit(&first.visit.id).unwrap().unwrap().status,
        VisitStatus::Completed
    );
}

#[test]
fn test_enqueue_failure_leaves_no_partial_state() {
    let mut db = Database::open_in_memory().unwrap();
    let patient = make_patient(&db, "Mona Said");

    // First enqueue succeeds, then sabotage visit creation.
    enqueue(&mut db, &patient.id, "normal");
    db.conn()
        .execute_batch(
            "CREATE TRIGGER induce_visit_failure BEFORE INSERT ON visits \
             BEGIN SELECT RAISE(ABORT, 'induced failure'); END;",
        )
        .unwrap();

    let result = QueueManager::new(&mut db, &NoopNotifier).enqueue(NewQueueEntry {
        patient_id: patient.id.clone(),
        reason: None,
        priority: None,
        visit_type: None,
    });
    assert!(result.is_err());

    // Only the first round's records exist
    let queue_count: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM queue_entries", [], |r| r.get(0))
        .unwrap();
    let visit_count: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM visits", [], |r| r.get(0))
        .unwrap();
    let rx_count: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM prescriptions", [], |r| r.get(0))
        .unwrap();
    assert_eq!((queue_count, visit_count, rx_count), (1, 1, 1));
}

#[test]
fn test_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db");

    let entry_id = {
        let mut db = Database::open(&path).unwrap();
        let patient = make_patient(&db, "Mona Said");
        enqueue(&mut db, &patient.id, "high").entry.id
    };

    let db = Database::open(&path).unwrap();
    let entry = db.get_queue_entry(&entry_id).unwrap().unwrap();
    assert_eq!(entry.status, QueueStatus::Waiting);
    assert_eq!(db.list_active_queue().unwrap().len(), 1);
}
