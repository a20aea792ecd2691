// src/workflow/controller.rs
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::state::{ControllerState, HeldPlan, WorkflowPhase, WorkflowSnapshot};
use crate::error::WorkflowError;
use crate::planner_client::{PlanService, PlanningClient};
use crate::renderer_client::{RenderClient, RenderService};
use crate::types::{build_render_request, InputDocument, Plan, RenderResult};

/// Sequences the two triggerable actions (generate, render) over the shared
/// editable document and the held plan.
///
/// Single logical actor: the operator drives this through UI events, so the
/// state needs no locking beyond the `RwLock` that lets axum share it. The
/// lock is never held across a network call; each action re-acquires it and
/// applies the response only if its token is still the latest issued for
/// that action.
pub struct WorkflowController<P: PlanService = PlanningClient, R: RenderService = RenderClient> {
    planner: P,
    renderer: R,
    state: RwLock<ControllerState>,
}

impl<P: PlanService, R: RenderService> WorkflowController<P, R> {
    pub fn new(planner: P, renderer: R) -> Self {
        Self {
            planner,
            renderer,
            state: RwLock::new(ControllerState::new()),
        }
    }

    /// Current editable document text.
    pub async fn document_text(&self) -> String {
        self.state.read().await.document_text.clone()
    }

    /// Replace the editable document. Only the operator calls this; nothing
    /// downstream mutates the document.
    pub async fn set_document(&self, text: String) {
        let mut state = self.state.write().await;
        state.document_text = text;
    }

    /// Everything the presentation layer needs, in one consistent read.
    pub async fn snapshot(&self) -> WorkflowSnapshot {
        let state = self.state.read().await;
        WorkflowSnapshot {
            phase: state.phase,
            document: state.document_text.clone(),
            plan: state.plan.clone(),
            render_result: state.render_result.clone(),
            error: state.error.clone(),
        }
    }

    /// Ask the planning service for a fresh insertion plan.
    ///
    /// `Ok(None)` means the action was skipped because a planning request is
    /// already in flight. On success the new plan replaces any prior one and
    /// any prior render result is invalidated. On failure the previously held
    /// plan is left untouched so the last good plan stays visible.
    pub async fn generate(&self) -> Result<Option<Plan>, WorkflowError> {
        let (document, token) = {
            let mut state = self.state.write().await;
            if state.phase == WorkflowPhase::Planning {
                debug!("generate ignored: a planning request is already in flight");
                return Ok(None);
            }
            state.error = None;

            let document = match InputDocument::from_text(&state.document_text) {
                Ok(doc) => doc,
                Err(e) => {
                    // Abort before any network call; plan and render result
                    // stay exactly as they were.
                    let err = WorkflowError::from(e);
                    state.error = Some(err.to_string());
                    return Err(err);
                }
            };

            state.phase = WorkflowPhase::Planning;
            state.plan_token += 1;
            // A new plan invalidates any prior render output, including one
            // still in flight.
            state.render_result = None;
            state.render_token += 1;
            (document, state.plan_token)
        };

        info!("🎬 Generating insertion plan...");
        let outcome = self.planner.generate_plan(&document).await;

        let mut state = self.state.write().await;
        if state.plan_token != token {
            warn!("discarding stale plan response (token {})", token);
            return Ok(None);
        }

        match outcome {
            Ok(plan) => {
                state.plan = Some(HeldPlan {
                    plan: plan.clone(),
                    source_document: document,
                    generated_at: Utc::now(),
                });
                state.phase = WorkflowPhase::PlanReady;
                info!("✅ Plan installed: {} insertions", plan.insertions.len());
                Ok(Some(plan))
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                state.error = Some(err.to_string());
                state.phase = if state.plan.is_some() {
                    WorkflowPhase::PlanReady
                } else {
                    WorkflowPhase::Idle
                };
                warn!("plan generation failed: {}", err);
                Err(err)
            }
        }
    }

    /// Send the held plan plus the current document to the render service.
    ///
    /// `Ok(None)` means the precondition was not met (no plan, an empty
    /// insertion list, or a render already in flight); that is a silent
    /// no-op, not an error. The payload is derived from the document as it
    /// is *now*, so an insertion whose b-roll was edited away fails here
    /// with a missing-reference error instead of going out dangling.
    pub async fn render(&self) -> Result<Option<RenderResult>, WorkflowError> {
        let (request, token) = {
            let mut state = self.state.write().await;
            if state.phase == WorkflowPhase::Rendering {
                debug!("render ignored: a render request is already in flight");
                return Ok(None);
            }
            let plan = match state.plan.as_ref() {
                Some(held) if !held.plan.insertions.is_empty() => held.plan.clone(),
                _ => {
                    debug!("render ignored: no plan with insertions is held");
                    return Ok(None);
                }
            };
            state.error = None;

            let document = match InputDocument::from_text(&state.document_text) {
                Ok(doc) => doc,
                Err(e) => {
                    let err = WorkflowError::from(e);
                    state.error = Some(err.to_string());
                    return Err(err);
                }
            };
            let request = match build_render_request(&document, &plan) {
                Ok(req) => req,
                Err(e) => {
                    state.error = Some(e.to_string());
                    return Err(e);
                }
            };

            state.phase = WorkflowPhase::Rendering;
            state.render_token += 1;
            (request, state.render_token)
        };

        info!("🎞️ Rendering final video...");
        let outcome = self.renderer.render_video(&request).await;

        let mut state = self.state.write().await;
        if state.render_token != token {
            warn!("discarding stale render response (token {})", token);
            return Ok(None);
        }

        match outcome {
            Ok(result) => {
                state.render_result = Some(result.clone());
                state.phase = WorkflowPhase::RenderDone;
                info!("✅ Render result installed: {}", result.video_path);
                Ok(Some(result))
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                state.error = Some(err.to_string());
                state.phase = WorkflowPhase::PlanReady;
                warn!("render failed: {}", err);
                Err(err)
            }
        }
    }
}
