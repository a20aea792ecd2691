// lib.rs - Main library file that exports all modules
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod planner_client;
pub mod renderer_client;
pub mod types;
pub mod workflow;

// Re-export commonly used types for convenience
pub use error::{ServiceError, WorkflowError};
pub use types::*;
pub use workflow::{HeldPlan, WorkflowController, WorkflowPhase, WorkflowSnapshot};

/// Shared application state: the workflow controller wired to the two
/// external service clients.
pub struct AppState {
    pub controller: WorkflowController,
}
