use actix_web::{web, post, HttpResponse};

use crate::auth::session::SessionActor;
use crate::handlers::tracking_handler;
use crate::services::product_analytics::ProductAnalytics;

#[post("/track")]
pub async fn track_event(
    payload: web::Payload,
    actor: SessionActor,
    analytics: web::Data<dyn ProductAnalytics>,
) -> HttpResponse {
    tracking_handler::track_event(payload, actor, analytics).await
}

pub fn init_analytics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(track_event);
}
