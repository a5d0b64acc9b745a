//! Queue manager operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{prescriptions, queues, visits, Database, DbError};
use crate::models::{
    ActiveQueueEntry, Prescription, Priority, QueueEntry, QueueStatus, Visit, VisitStatus,
    VisitType,
};
use crate::validation::ValidationError;

use super::notify::QueueNotifier;

/// Doctor recorded on auto-created visits when none is configured.
pub const DEFAULT_DOCTOR: &str = "Dr. Ahmed Hassan";

/// Queue manager errors.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Queue entry not found: {0}")]
    EntryNotFound(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type QueueResult<T> = Result<T, QueueError>;

/// Request to add a patient to the queue.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewQueueEntry {
    pub patient_id: String,
    #[serde(default)]
    pub reason: Option<String>,
    /// One of normal/high/urgent; defaults to normal
    #[serde(default)]
    pub priority: Option<String>,
    /// One of consultation/examination; defaults to examination
    #[serde(default)]
    pub visit_type: Option<String>,
}

/// The three records created by a successful enqueue.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnqueueOutcome {
    pub entry: QueueEntry,
    pub visit: Visit,
    pub prescription: Prescription,
}

/// Result of completing a queue entry. `visit` is `None` when the patient
/// had no pending visit, which is not an error.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompleteOutcome {
    pub entry: QueueEntry,
    pub visit: Option<Visit>,
}

/// The queue state machine, operating over a borrowed database handle.
pub struct QueueManager<'a> {
    db: &'a mut Database,
    notifier: &'a dyn QueueNotifier,
    doctor_name: String,
}

impl<'a> QueueManager<'a> {
    pub fn new(db: &'a mut Database, notifier: &'a dyn QueueNotifier) -> Self {
        Self {
            db,
            notifier,
            doctor_name: DEFAULT_DOCTOR.to_string(),
        }
    }

    /// Record a different doctor on auto-created visits.
    pub fn with_doctor(mut self, doctor_name: impl Into<String>) -> Self {
        self.doctor_name = doctor_name.into();
        self
    }

    /// Add a patient to the queue.
    ///
    /// Validates inputs, computes the next position over the active set,
    /// then atomically creates the waiting queue entry, a pending visit and
    /// an empty prescription. All three exist afterwards or none do. On
    /// success a best-effort queue-changed notification is fired; its
    /// failure is invisible to the caller.
    pub fn enqueue(&mut self, request: NewQueueEntry) -> QueueResult<EnqueueOutcome> {
        if request.patient_id.is_empty() {
            return Err(ValidationError("patientId is required".into()).into());
        }
        let priority = match request.priority.as_deref() {
            Some(raw) => raw.parse::<Priority>()?,
            None => Priority::Normal,
        };
        let visit_type = match request.visit_type.as_deref() {
            Some(raw) => raw.parse::<VisitType>()?,
            None => VisitType::Examination,
        };

        let patient = self
            .db
            .get_patient(&request.patient_id)?
            .ok_or_else(|| QueueError::PatientNotFound(request.patient_id.clone()))?;

        // Positions restart once the active set drains; only active entries
        // are considered. The read-then-write here is serialized by the
        // caller holding the database handle exclusively.
        let position = self.db.max_active_position()? + 1;

        let entry = QueueEntry::new(
            patient.id.clone(),
            position,
            request.reason.clone(),
            priority,
        );
        let mut visit = Visit::new(patient.id.clone(), self.doctor_name.clone(), visit_type);
        visit.chief_complaint = request.reason;
        let prescription = Prescription::new(visit.id.clone());

        {
            let tx = self.db.transaction()?;
            queues::insert_queue_entry(&tx, &entry)?;
            visits::insert_visit(&tx, &visit)?;
            prescriptions::insert_prescription(&tx, &prescription)?;
            tx.commit().map_err(DbError::from)?;
        }

        tracing::info!(
            entry_id = %entry.id,
            patient_id = %patient.id,
            position,
            priority = %priority,
            "patient enqueued"
        );
        self.notifier.queue_changed();

        Ok(EnqueueOutcome { entry, visit, prescription })
    }

    /// List active entries in canonical service order.
    pub fn list_active(&self) -> QueueResult<Vec<ActiveQueueEntry>> {
        Ok(self.db.list_active_queue()?)
    }

    /// Start serving an entry: waiting -> in_progress.
    ///
    /// No cascading change to the linked visit. Re-starting an entry that
    /// is already in progress simply rewrites the same status.
    pub fn start(&mut self, id: &str) -> QueueResult<QueueEntry> {
        let mut entry = self
            .db
            .get_queue_entry(id)?
            .ok_or_else(|| QueueError::EntryNotFound(id.to_string()))?;

        self.db.set_queue_status(id, QueueStatus::InProgress)?;
        entry.status = QueueStatus::InProgress;

        tracing::info!(entry_id = %id, "queue entry started");
        Ok(entry)
    }

    /// Complete an entry, atomically also completing the patient's most
    /// recent pending visit if one exists. A missing pending visit is
    /// reported as `None`, not an error.
    pub fn complete(&mut self, id: &str) -> QueueResult<CompleteOutcome> {
        let outcome = {
            let tx = self.db.transaction()?;

            let mut entry = queues::get_queue_entry(&tx, id)?
                .ok_or_else(|| QueueError::EntryNotFound(id.to_string()))?;
            queues::set_queue_status(&tx, id, QueueStatus::Completed)?;
            entry.status = QueueStatus::Completed;

            let visit = match visits::find_latest_visit_by_status(
                &tx,
                &entry.patient_id,
                &[VisitStatus::Pending],
            )? {
                Some(mut visit) => {
                    visits::set_visit_status(&tx, &visit.id, VisitStatus::Completed)?;
                    visit.status = VisitStatus::Completed;
                    Some(visit)
                }
                None => None,
            };

            tx.commit().map_err(DbError::from)?;
            CompleteOutcome { entry, visit }
        };

        tracing::info!(
            entry_id = %id,
            visit_completed = outcome.visit.is_some(),
            "queue entry completed"
        );
        Ok(outcome)
    }

    /// Remove an entry before service. Atomically deletes the entry, deletes
    /// every prescription of the patient's most recent pending/in-progress
    /// visit, and cancels that visit. Returns the cancelled visit, or `None`
    /// when no visit was linked.
    pub fn remove(&mut self, id: &str) -> QueueResult<Option<Visit>> {
        let cancelled = {
            let tx = self.db.transaction()?;

            let entry = queues::get_queue_entry(&tx, id)?
                .ok_or_else(|| QueueError::EntryNotFound(id.to_string()))?;
            queues::delete_queue_entry(&tx, id)?;

            let cancelled = match visits::find_latest_visit_by_status(
                &tx,
                &entry.patient_id,
                &[VisitStatus::Pending, VisitStatus::InProgress],
            )? {
                Some(mut visit) => {
                    prescriptions::delete_prescriptions_for_visit(&tx, &visit.id)?;
                    visits::set_visit_status(&tx, &visit.id, VisitStatus::Cancelled)?;
                    visit.status = VisitStatus::Cancelled;
                    Some(visit)
                }
                None => None,
            };

            tx.commit().map_err(DbError::from)?;
            cancelled
        };

        tracing::info!(
            entry_id = %id,
            visit_cancelled = cancelled.is_some(),
            "queue entry removed"
        );
        Ok(cancelled)
    }
}
