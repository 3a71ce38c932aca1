use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agents::RouteError;
use crate::AppState;

/// What callers see when a reasoning call fails outright. Internal
/// detail goes to the log, not the wire.
const APOLOGY: &str = "Sorry, something went wrong while handling that request. Please try again.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Target agent; falls back to the configured default agent.
    #[serde(default)]
    pub agent: Option<String>,
    pub message: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/chat").route(web::post().to(chat)));
}

async fn chat(state: web::Data<AppState>, body: web::Json<ChatRequest>) -> impl Responder {
    let agent = body
        .agent
        .clone()
        .unwrap_or_else(|| state.config.default_agent.clone());

    match state
        .manager
        .route_message(&agent, &body.message, body.metadata.as_ref())
        .await
    {
        Ok(response) => HttpResponse::Ok().json(ChatResponse {
            success: true,
            agent: Some(agent),
            response: Some(response),
            error: None,
        }),
        Err(RouteError::UnknownAgent(name)) => HttpResponse::NotFound().json(ChatResponse {
            success: false,
            agent: None,
            response: None,
            error: Some(format!("Agent '{}' not found", name)),
        }),
        Err(e) => {
            log::error!("[CHAT] Agent '{}' failed: {}", agent, e);
            HttpResponse::InternalServerError().json(ChatResponse {
                success: false,
                agent: Some(agent),
                response: None,
                error: Some(APOLOGY.to_string()),
            })
        }
    }
}
