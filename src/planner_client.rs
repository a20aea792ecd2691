// src/planner_client.rs
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::error::ServiceError;
use crate::types::{InputDocument, Plan};

/// Contract for the external planning service.
///
/// One attempt per invocation, no retries; malformed documents are passed
/// through as-is and any rejection is the service's to make.
#[async_trait]
pub trait PlanService: Send + Sync {
    async fn generate_plan(&self, document: &InputDocument) -> Result<Plan, ServiceError>;
}

/// HTTP client for the planning service.
#[derive(Debug, Clone)]
pub struct PlanningClient {
    client: Client,
    base_url: String,
}

impl PlanningClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl PlanService for PlanningClient {
    async fn generate_plan(&self, document: &InputDocument) -> Result<Plan, ServiceError> {
        info!(
            "🎬 Requesting insertion plan: a-roll '{}', {} b-rolls",
            document.a_roll.url,
            document.b_rolls.len()
        );

        let response = self
            .client
            .post(format!("{}/generate-plan", self.base_url))
            .json(document)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            error!("Planner service rejected request: {}", error_text);
            return Err(ServiceError::Rejected(error_text));
        }

        let plan = response.json::<Plan>().await?;
        info!(
            "✅ Plan received: {} insertions over {:.2}s of a-roll",
            plan.insertions.len(),
            plan.a_roll_duration
        );

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ARoll, Insertion, TranscriptSegment};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn document() -> InputDocument {
        InputDocument {
            a_roll: ARoll {
                url: "a.mp4".to_string(),
                metadata: String::new(),
            },
            b_rolls: vec![],
        }
    }

    #[tokio::test]
    async fn test_generate_plan_parses_success_body() {
        let plan = Plan {
            a_roll_duration: 12.5,
            transcript_segments: vec![TranscriptSegment {
                start: 0.0,
                end: 3.0,
                text: "hello".to_string(),
            }],
            insertions: vec![Insertion {
                broll_id: "broll_1".to_string(),
                start_sec: 1.0,
                duration_sec: 2.0,
                confidence: 0.8,
                reason: "greeting".to_string(),
            }],
        };
        let expected = plan.clone();
        // Typed extractor on the stub also pins down the request field names.
        let router = Router::new().route(
            "/generate-plan",
            post(move |Json(_doc): Json<InputDocument>| {
                let plan = plan.clone();
                async move { Json(plan) }
            }),
        );
        let base_url = serve(router).await;

        let client = PlanningClient::new(base_url);
        let received = client.generate_plan(&document()).await.unwrap();
        assert_eq!(received, expected);
    }

    #[tokio::test]
    async fn test_generate_plan_surfaces_error_body_verbatim() {
        let router = Router::new().route(
            "/generate-plan",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "transcription failed") }),
        );
        let base_url = serve(router).await;

        let client = PlanningClient::new(base_url);
        let err = client.generate_plan(&document()).await.unwrap_err();
        assert_eq!(err.to_string(), "transcription failed");
    }

    #[tokio::test]
    async fn test_generate_plan_transport_failure() {
        // Nothing is listening here.
        let client = PlanningClient::new("http://127.0.0.1:1".to_string());
        let err = client.generate_plan(&document()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
        assert!(err.to_string().starts_with("request failed:"));
    }
}
