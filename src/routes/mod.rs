use actix_web::web;

pub mod analytics;
pub mod backend_health;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    // Session is optional here; the handler decides which events need one
    cfg.service(
        web::scope("/analytics")
            .configure(analytics::init_analytics_routes)
    );
}
