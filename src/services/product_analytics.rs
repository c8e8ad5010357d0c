use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::tracking::EventKind;

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Analytics backend unavailable: {0}")]
    Unavailable(String),
}

/// Records storefront interactions. Implementations are shared across
/// workers, so every call must be safe to run concurrently.
#[async_trait]
pub trait ProductAnalytics: Send + Sync {
    async fn track_bookmark(&self, product_id: &str, user_id: &str) -> Result<(), AnalyticsError>;

    async fn track_cart_add(&self, product_id: &str, user_id: &str) -> Result<(), AnalyticsError>;

    /// Views are recorded for anonymous visitors too.
    async fn track_product_view(&self, product_id: &str, user_id: Option<&str>) -> Result<(), AnalyticsError>;
}

/// Stores one row per tracked event in `product_events`.
#[derive(Clone, Debug)]
pub struct PgProductAnalytics {
    pool: PgPool,
}

impl PgProductAnalytics {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_event(
        &self,
        kind: EventKind,
        product_id: &str,
        user_id: Option<&str>,
    ) -> Result<(), AnalyticsError> {
        sqlx::query(
            r#"
            INSERT INTO product_events (id, event_kind, product_id, user_id, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(kind.as_str())
        .bind(product_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!(event = %kind, product_id = %product_id, "Product event stored");
        Ok(())
    }
}

#[async_trait]
impl ProductAnalytics for PgProductAnalytics {
    async fn track_bookmark(&self, product_id: &str, user_id: &str) -> Result<(), AnalyticsError> {
        self.insert_event(EventKind::Bookmark, product_id, Some(user_id)).await
    }

    async fn track_cart_add(&self, product_id: &str, user_id: &str) -> Result<(), AnalyticsError> {
        self.insert_event(EventKind::CartAdd, product_id, Some(user_id)).await
    }

    async fn track_product_view(&self, product_id: &str, user_id: Option<&str>) -> Result<(), AnalyticsError> {
        self.insert_event(EventKind::View, product_id, user_id).await
    }
}
