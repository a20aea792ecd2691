// src/renderer_client.rs
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::error::ServiceError;
use crate::types::{RenderRequest, RenderResult};

/// Contract for the external rendering service.
///
/// Callers must not invoke this without a held plan; that guard belongs to
/// the workflow controller, not the client.
#[async_trait]
pub trait RenderService: Send + Sync {
    async fn render_video(&self, request: &RenderRequest) -> Result<RenderResult, ServiceError>;
}

/// HTTP client for the rendering service.
#[derive(Debug, Clone)]
pub struct RenderClient {
    client: Client,
    base_url: String,
}

impl RenderClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl RenderService for RenderClient {
    async fn render_video(&self, request: &RenderRequest) -> Result<RenderResult, ServiceError> {
        info!(
            "🎞️ Requesting render: a-roll '{}', {} insertions",
            request.a_roll_url,
            request.insertions.len()
        );

        let response = self
            .client
            .post(format!("{}/render-video", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            error!("Render service rejected request: {}", error_text);
            return Err(ServiceError::Rejected(error_text));
        }

        let result = response.json::<RenderResult>().await?;
        info!("✅ Render complete: {}", result.video_path);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn request() -> RenderRequest {
        RenderRequest {
            a_roll_url: "a.mp4".to_string(),
            b_rolls: vec![],
            insertions: vec![],
        }
    }

    #[tokio::test]
    async fn test_render_video_parses_success_body() {
        let router = Router::new().route(
            "/render-video",
            post(|Json(_req): Json<RenderRequest>| async {
                Json(RenderResult {
                    video_path: "output_files/final_abc123.mp4".to_string(),
                })
            }),
        );
        let base_url = serve(router).await;

        let client = RenderClient::new(base_url);
        let result = client.render_video(&request()).await.unwrap();
        assert_eq!(result.video_path, "output_files/final_abc123.mp4");
    }

    #[tokio::test]
    async fn test_render_video_surfaces_error_body_verbatim() {
        let router = Router::new().route(
            "/render-video",
            post(|| async { (StatusCode::BAD_REQUEST, "ffmpeg exited with status 1") }),
        );
        let base_url = serve(router).await;

        let client = RenderClient::new(base_url);
        let err = client.render_video(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "ffmpeg exited with status 1");
    }
}
