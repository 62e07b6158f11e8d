use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permissions::Role;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub exp: usize,
}

impl Claims {
    /// Unknown role strings fall back to the least-privileged set.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::Customer)
    }
}

pub fn get_jwt_secret() -> Vec<u8> {
    std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using insecure default!");
            "insecure-development-secret-key-replace-me-immediately".to_string()
        })
        .into_bytes()
}

const PUBLIC_ROUTES: &[&str] = &["/api/auth/login", "/api/auth/check", "/api/ping"];

/// Decodes the bearer token for every /api request and attaches the claims to
/// the request extensions. Routes outside the public list answer 401 when no
/// valid token is present.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let path = request.uri().path().to_string();

    if !path.starts_with("/api/") {
        return Ok(next.run(request).await);
    }

    let claims = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .and_then(|token| {
            decode::<Claims>(
                token,
                &DecodingKey::from_secret(&get_jwt_secret()),
                &Validation::default(),
            )
            .ok()
        })
        .map(|data| data.claims);

    match claims {
        Some(claims) => {
            request.extensions_mut().insert(claims);
        }
        None => {
            if !PUBLIC_ROUTES.contains(&path.as_str()) {
                return Err(StatusCode::UNAUTHORIZED);
            }
        }
    }

    Ok(next.run(request).await)
}
