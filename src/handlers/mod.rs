pub mod backend_health_handler;
pub mod tracking_handler;
