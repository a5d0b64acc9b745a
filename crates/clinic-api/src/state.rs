//! Shared request context.

use std::sync::{Arc, Mutex, MutexGuard};

use clinic_core::db::Database;

use crate::auth::AuthRegistry;
use crate::error::ApiError;
use crate::events::QueueEvents;

/// Shared state handed to middleware and handlers.
///
/// The database handle is a single connection behind a mutex, which also
/// serializes the read-then-write position assignment in the queue manager.
#[derive(Clone)]
pub struct AppContext {
    pub db: Arc<Mutex<Database>>,
    pub auth: Arc<AuthRegistry>,
    pub events: QueueEvents,
    pub doctor_name: Option<String>,
}

impl AppContext {
    pub fn new(db: Database, auth: AuthRegistry, doctor_name: Option<String>) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            auth: Arc::new(auth),
            events: QueueEvents::new(),
            doctor_name,
        }
    }

    pub fn lock_db(&self) -> Result<MutexGuard<'_, Database>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".into()))
    }
}
