//! Request handlers, one module per resource.

pub mod patients;
pub mod prescriptions;
pub mod queues;
pub mod visits;
