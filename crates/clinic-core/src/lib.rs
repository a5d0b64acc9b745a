//! Clinic Core Library
//!
//! Domain layer for a small-clinic management backend: patient records, a
//! priority-partitioned waiting queue, clinical visits and prescriptions,
//! persisted in SQLite.
//!
//! # Architecture
//!
//! ```text
//!            POST /queues
//!                 │
//!         ┌───────▼────────┐
//!         │  QueueManager  │  waiting → in_progress → completed
//!         └───────┬────────┘            └─ removed (entry deleted)
//!                 │ one transaction
//!     ┌───────────┼────────────────┐
//!     ▼           ▼                ▼
//! queue entry   visit (pending)  prescription (empty)
//! ```
//!
//! Enqueue, complete and remove are atomic multi-step operations: the queue
//! entry, its visit and its prescription change together or not at all.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer, one module per entity
//! - [`models`]: domain types (Patient, QueueEntry, Visit, Prescription)
//! - [`queue`]: the queue state machine and its notification interface
//! - [`pagination`]: bounded page/limit windows for list endpoints
//! - [`validation`]: field validation checked before any persistence

pub mod db;
pub mod models;
pub mod pagination;
pub mod queue;
pub mod validation;

// Re-export commonly used types
pub use db::{Database, DbError, DbResult};
pub use models::{
    ActiveQueueEntry, BloodType, Gender, Medication, Patient, PatientDetail, PatientUpdate,
    Prescription, Priority, QueueEntry, QueueStatus, Visit, VisitStatus, VisitType, VisitUpdate,
    VisitWithPatient,
};
pub use pagination::{Page, PageQuery, PageWindow, Pagination};
pub use queue::{
    CompleteOutcome, EnqueueOutcome, NewQueueEntry, NoopNotifier, QueueError, QueueManager,
    QueueNotifier, QueueResult,
};
pub use validation::ValidationError;
