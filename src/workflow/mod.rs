// src/workflow/mod.rs
//! Workflow controller that sequences plan generation and rendering against
//! the two external services, and the state it exposes for display.

pub mod controller;
pub mod state;

pub use controller::WorkflowController;
pub use state::{HeldPlan, WorkflowPhase, WorkflowSnapshot};
