//! Domain models for the clinic backend.

mod patient;
mod prescription;
mod queue;
mod visit;

pub use patient::*;
pub use prescription::*;
pub use queue::*;
pub use visit::*;
