use axum::{extract::State, Extension, Json};
use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::Profile;
use crate::error::AgriResult;
use crate::middleware::auth::{get_jwt_secret, Claims};
use crate::state::AppState;

/// Demo usernames map to fixed emails. This is a development convenience for
/// exercising the four roles, not a real identity system.
const DEMO_EMAIL_MAP: &[(&str, &str)] = &[
    ("admin", "admin@farm.zm"),
    ("manager", "manager@farm.zm"),
    ("staff", "staff@farm.zm"),
    ("customer", "customer@farm.zm"),
];

const TOKEN_LIFETIME_HOURS: i64 = 12;

fn demo_email(username: &str) -> Option<&'static str> {
    DEMO_EMAIL_MAP
        .iter()
        .find(|(name, _)| *name == username)
        .map(|(_, email)| *email)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub full_name: String,
    pub phone: Option<String>,
}

impl From<&Profile> for SessionUser {
    fn from(profile: &Profile) -> Self {
        SessionUser {
            id: profile.id,
            username: profile.username.clone(),
            email: profile.email.clone(),
            role: profile.role.clone(),
            full_name: profile.full_name.clone(),
            phone: profile.phone.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: Option<String>,
    pub user: Option<SessionUser>,
}

impl LoginResponse {
    fn failure(message: &str) -> Self {
        LoginResponse {
            success: false,
            message: message.to_string(),
            token: None,
            user: None,
        }
    }
}

/// Wrong credentials of any kind answer with `success: false` and a generic
/// message; only infrastructure problems are logged.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AgriResult<Json<LoginResponse>> {
    let username = payload.username.trim().to_lowercase();
    let password = payload.password;

    if username.is_empty() || password.trim().is_empty() {
        return Ok(Json(LoginResponse::failure(
            "Please enter both username and password",
        )));
    }

    let Some(email) = demo_email(&username) else {
        return Ok(Json(LoginResponse::failure("Invalid username or password")));
    };

    let profile = match sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE email = $1")
        .bind(email)
        .fetch_optional(&state.pool)
        .await
    {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Login lookup failed: {:?}", e);
            return Ok(Json(LoginResponse::failure("Invalid username or password")));
        }
    };

    let Some(profile) = profile else {
        return Ok(Json(LoginResponse::failure("Invalid username or password")));
    };

    let Some(password_hash) = profile.password_hash.as_deref() else {
        return Ok(Json(LoginResponse::failure("Invalid username or password")));
    };

    match verify(&password, password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return Ok(Json(LoginResponse::failure("Invalid username or password")));
        }
        Err(e) => {
            tracing::error!("Password verification failed: {:?}", e);
            return Ok(Json(LoginResponse::failure("Invalid username or password")));
        }
    }

    let expires_at = Utc::now() + chrono::Duration::hours(TOKEN_LIFETIME_HOURS);
    let claims = Claims {
        sub: profile.id.to_string(),
        user_id: profile.id,
        username: profile.username.clone(),
        role: profile.role.clone(),
        full_name: profile.full_name.clone(),
        phone: profile.phone.clone(),
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&get_jwt_secret()),
    )?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: Some(token),
        user: Some(SessionUser::from(&profile)),
    }))
}

/// Sessions are stateless bearer tokens; logout succeeds once the client
/// drops the token. The endpoint exists so clients have a single place to
/// end a session.
pub async fn logout() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "data": null }))
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub logged_in: bool,
    pub user: Option<Claims>,
}

pub async fn check_auth_status(claims: Option<Extension<Claims>>) -> Json<AuthStatusResponse> {
    match claims {
        Some(Extension(claims)) => Json(AuthStatusResponse {
            logged_in: true,
            user: Some(claims),
        }),
        None => Json(AuthStatusResponse {
            logged_in: false,
            user: None,
        }),
    }
}
