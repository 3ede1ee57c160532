//! Order workflow state machine
//!
//! [`transition::apply`] is the only place that decides how an event moves
//! an order and its phase record. [`WorkflowEngine`] loads state, applies
//! the event and hands the result to a [`WorkflowStore`] as one write.

pub mod engine;
pub mod ports;
pub mod transition;

pub use engine::WorkflowEngine;
pub use ports::WorkflowStore;
pub use transition::{
    apply, ApprovalDecision, AssignmentChange, AuditEvent, OrderUpdate, Transition,
    TransitionWrite, WorkflowEvent,
};
