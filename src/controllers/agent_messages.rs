//! Queue inspection endpoints
//!
//! Failed messages are terminal and never retried, so operators need a
//! way to see them.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::models::MessageStatus;
use crate::AppState;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/agent-messages").route(web::get().to(list_messages)))
        .service(
            web::resource("/api/agent-messages/{message_id}").route(web::get().to(get_message)),
        );
}

async fn list_messages(state: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    let status = match &query.status {
        Some(raw) => match raw.parse::<MessageStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Unknown status '{}'", raw)
                }));
            }
        },
        None => None,
    };

    match state
        .db
        .list_agent_messages(status, query.limit.unwrap_or(DEFAULT_LIMIT))
    {
        Ok(messages) => HttpResponse::Ok().json(messages),
        Err(e) => {
            log::error!("[MESSAGES] Failed to list agent messages: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to list agent messages"
            }))
        }
    }
}

async fn get_message(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let message_id = path.into_inner();
    match state.db.get_agent_message_by_message_id(&message_id) {
        Ok(Some(message)) => HttpResponse::Ok().json(message),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Message '{}' not found", message_id)
        })),
        Err(e) => {
            log::error!("[MESSAGES] Failed to load message {}: {}", message_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to load message"
            }))
        }
    }
}
