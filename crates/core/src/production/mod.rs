//! Phase services and pull queues

pub mod ports;
pub mod queue;
pub mod service;

pub use ports::{IncidentRepository, PhaseRepository};
pub use service::{PhaseService, TaskDetail};
