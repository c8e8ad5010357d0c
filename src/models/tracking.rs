use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

/// The storefront interactions we accept from clients.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Product added to a comparison list. Nothing records it yet.
    ComparisonAdd,
    Bookmark,
    CartAdd,
    View,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ComparisonAdd => "comparison_add",
            EventKind::Bookmark => "bookmark",
            EventKind::CartAdd => "cart_add",
            EventKind::View => "view",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EventKind {
    type Error = TrackingError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "comparison_add" => Ok(Self::ComparisonAdd),
            "bookmark" => Ok(Self::Bookmark),
            "cart_add" => Ok(Self::CartAdd),
            "view" => Ok(Self::View),
            _ => Err(TrackingError::InvalidEventKind),
        }
    }
}

/// Raw request body. Fields are kept as untyped JSON so that a missing or
/// wrongly-typed value is reported by validation, not by the deserializer.
#[derive(Debug, Deserialize)]
pub struct TrackingRequest {
    #[serde(default)]
    pub event: Option<Value>,
    #[serde(default, rename = "productId")]
    pub product_id: Option<Value>,
}

impl TrackingRequest {
    /// Only a non-empty string identifies a product.
    pub fn product_id(&self) -> Result<&str, TrackingError> {
        match &self.product_id {
            Some(Value::String(id)) if !id.is_empty() => Ok(id.as_str()),
            _ => Err(TrackingError::MissingProductId),
        }
    }

    pub fn event_kind(&self) -> Result<EventKind, TrackingError> {
        match &self.event {
            Some(Value::String(kind)) => EventKind::try_from(kind.as_str()),
            _ => Err(TrackingError::InvalidEventKind),
        }
    }
}

/// The caller on whose behalf an event is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorIdentity {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    pub success: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("Product ID is required")]
    MissingProductId,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid event type")]
    InvalidEventKind,

    /// Detail stays in the source and is only ever logged.
    #[error("Failed to track event")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ResponseError for TrackingError {
    fn status_code(&self) -> StatusCode {
        match self {
            TrackingError::MissingProductId | TrackingError::InvalidEventKind => StatusCode::BAD_REQUEST,
            TrackingError::Unauthenticated => StatusCode::UNAUTHORIZED,
            TrackingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
