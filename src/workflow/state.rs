// src/workflow/state.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{InputDocument, Plan, RenderResult};

/// Where the controller currently is, as shown to the operator.
///
/// The error slot is orthogonal to the phase: it can be set in any phase and
/// is cleared when the next action starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Idle,
    Planning,
    PlanReady,
    Rendering,
    RenderDone,
}

/// A plan together with the document snapshot that produced it.
///
/// The snapshot is kept for display and drift inspection; rendering still
/// reads the live document, so edits made after generation are visible to
/// the render phase (and validated there).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeldPlan {
    pub plan: Plan,
    pub source_document: InputDocument,
    pub generated_at: DateTime<Utc>,
}

/// Everything the presentation layer consumes in one read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowSnapshot {
    pub phase: WorkflowPhase,
    pub document: String,
    pub plan: Option<HeldPlan>,
    pub render_result: Option<RenderResult>,
    pub error: Option<String>,
}

/// Mutable controller state, owned exclusively by the controller.
///
/// The tokens implement last-issued-wins for each action: a response is
/// applied only if its token still matches, so a slow earlier call can never
/// overwrite the result of a faster later one.
#[derive(Debug)]
pub(crate) struct ControllerState {
    pub document_text: String,
    pub phase: WorkflowPhase,
    pub plan: Option<HeldPlan>,
    pub render_result: Option<RenderResult>,
    pub error: Option<String>,
    pub plan_token: u64,
    pub render_token: u64,
}

impl ControllerState {
    pub fn new() -> Self {
        Self {
            document_text: InputDocument::default_skeleton().to_text(),
            phase: WorkflowPhase::Idle,
            plan: None,
            render_result: None,
            error: None,
            plan_token: 0,
            render_token: 0,
        }
    }
}
