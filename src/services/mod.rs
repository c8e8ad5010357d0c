pub mod product_analytics;

pub use product_analytics::{AnalyticsError, PgProductAnalytics, ProductAnalytics};
