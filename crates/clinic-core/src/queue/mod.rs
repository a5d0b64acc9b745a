//! Queue manager: the waiting-list state machine.
//!
//! Entries move waiting -> in_progress -> completed, or are removed before
//! service. Enqueue, complete and remove are multi-step operations that keep
//! the queue entry, its visit and its prescription consistent inside a
//! single transaction.

mod manager;
mod notify;

pub use manager::*;
pub use notify::*;
