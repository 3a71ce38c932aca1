use actix_web::{web, HttpResponse, Responder};

use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/tools").route(web::get().to(list_tools)));
}

async fn list_tools(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.registry.definitions_for(None))
}
