use actix_web::{dev::Payload, http::header, web, Error as ActixError, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

use crate::config::jwt::JwtSettings;
use crate::models::tracking::ActorIdentity;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // Subject (user id)
    pub exp: usize,   // Expiration time (as UTC timestamp)
}

pub fn decode_claims(token: &str, jwt_settings: &JwtSettings) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(token_data.claims)
}

/// The caller behind a request, if one could be identified.
///
/// Never rejects a request: a missing, malformed or expired token simply
/// leaves the caller anonymous and the handler decides what that means.
#[derive(Debug, Clone)]
pub struct SessionActor(pub Option<ActorIdentity>);

impl SessionActor {
    pub fn into_inner(self) -> Option<ActorIdentity> {
        self.0
    }
}

impl FromRequest for SessionActor {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(SessionActor(resolve_actor(req))))
    }
}

fn resolve_actor(req: &HttpRequest) -> Option<ActorIdentity> {
    let jwt_settings = match req.app_data::<web::Data<JwtSettings>>() {
        Some(settings) => settings,
        None => {
            tracing::error!("JWT settings not found, treating caller as anonymous");
            return None;
        }
    };

    let auth_value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }

    match decode_claims(token, jwt_settings) {
        Ok(claims) if !claims.sub.is_empty() => Some(ActorIdentity { user_id: claims.sub }),
        Ok(_) => {
            tracing::warn!("Token carries an empty subject");
            None
        }
        Err(e) => {
            tracing::debug!("Ignoring invalid session token: {:?}", e);
            None
        }
    }
}
