use actix_web::{web, HttpResponse, ResponseError};
use futures_util::StreamExt;
use tracing::field;

use crate::auth::session::SessionActor;
use crate::models::tracking::{ActorIdentity, EventKind, TrackingError, TrackingRequest, TrackingResponse};
use crate::services::product_analytics::ProductAnalytics;

/// Largest request body we are willing to buffer.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

#[tracing::instrument(
    name = "Track product event",
    skip(payload, actor, analytics),
    fields(
        event = field::Empty,
        product_id = field::Empty,
        authenticated = field::Empty
    )
)]
pub async fn track_event(
    payload: web::Payload,
    actor: SessionActor,
    analytics: web::Data<dyn ProductAnalytics>,
) -> HttpResponse {
    let actor = actor.into_inner();
    tracing::Span::current().record("authenticated", actor.is_some());

    let body = match read_body(payload).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to read tracking request body");
            return e.error_response();
        }
    };

    let request = match serde_json::from_slice::<TrackingRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to parse tracking request body");
            return TrackingError::Internal(Box::new(e)).error_response();
        }
    };

    match dispatch_event(request, actor.as_ref(), analytics.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(TrackingResponse { success: true }),
        Err(e) => {
            match &e {
                TrackingError::Internal(source) => {
                    tracing::error!(error = ?source, "Failed to track event");
                }
                other => {
                    tracing::warn!(error = %other, "Rejected tracking request");
                }
            }
            e.error_response()
        }
    }
}

/// Buffer the request body up to `MAX_BODY_BYTES`.
///
/// An oversized body is still drained so the client gets to read the JSON
/// error instead of a reset connection.
async fn read_body(mut payload: web::Payload) -> Result<web::BytesMut, TrackingError> {
    let mut body = web::BytesMut::new();
    let mut overflow = false;

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| TrackingError::Internal(e.to_string().into()))?;
        if overflow || body.len() + chunk.len() > MAX_BODY_BYTES {
            overflow = true;
            continue;
        }
        body.extend_from_slice(&chunk);
    }

    if overflow {
        return Err(TrackingError::Internal(
            format!("request body exceeds {} bytes", MAX_BODY_BYTES).into(),
        ));
    }
    Ok(body)
}

/// Validate, authorize and hand a single event to the analytics service.
///
/// Makes at most one call on `analytics`, and none at all when the request
/// is rejected or the event kind has nothing to record.
pub async fn dispatch_event(
    request: TrackingRequest,
    actor: Option<&ActorIdentity>,
    analytics: &dyn ProductAnalytics,
) -> Result<(), TrackingError> {
    let product_id = request.product_id()?;
    let span = tracing::Span::current();
    span.record("product_id", product_id);

    let kind = request.event_kind()?;
    span.record("event", kind.as_str());

    let actor_id = actor.map(|a| a.user_id.as_str());
    let result = match kind {
        EventKind::ComparisonAdd => {
            tracing::debug!("No recorder for comparison_add, accepting without tracking");
            Ok(())
        }
        EventKind::Bookmark => {
            let user_id = actor_id.ok_or(TrackingError::Unauthenticated)?;
            analytics.track_bookmark(product_id, user_id).await
        }
        EventKind::CartAdd => {
            let user_id = actor_id.ok_or(TrackingError::Unauthenticated)?;
            analytics.track_cart_add(product_id, user_id).await
        }
        EventKind::View => analytics.track_product_view(product_id, actor_id).await,
    };

    result.map_err(|e| TrackingError::Internal(Box::new(e)))
}
