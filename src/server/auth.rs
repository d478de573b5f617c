use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::auth::{RequireUser, SessionGenerator, password};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{LoginRequest, SessionResponse, SignupRequest};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{validate_email, validate_password};
use crate::types::{Session, User};

const SESSION_TTL_DAYS: i64 = 30;

pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> impl IntoResponse {
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let password_hash = password::hash_password(&req.password)
        .map_err(|_| ApiError::internal("Failed to hash password"))?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: req.email.trim().to_lowercase(),
        password_hash,
        created_at: now,
        updated_at: now,
    };

    match state.store.create_user(&user) {
        Ok(()) => {}
        Err(Error::AlreadyExists) => {
            return Err(ApiError::conflict(
                "An account with that email already exists",
            ));
        }
        Err(_) => return Err(ApiError::internal("Failed to create user")),
    }

    let (token, expires_at) = issue_session(&state, &user.id)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(SessionResponse {
            token,
            expires_at,
            user,
        })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let user = state
        .store
        .get_user_by_email(&req.email.trim().to_lowercase())
        .api_err("Failed to look up user")?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let verified = password::verify_password(&req.password, &user.password_hash)
        .map_err(|_| ApiError::internal("Failed to verify password"))?;
    if !verified {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let (token, expires_at) = issue_session(&state, &user.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(SessionResponse {
        token,
        expires_at,
        user,
    })))
}

pub async fn logout(auth: RequireUser, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state
        .store
        .delete_session(&auth.session.id)
        .api_err("Failed to delete session")?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

fn issue_session(
    state: &Arc<AppState>,
    user_id: &str,
) -> Result<(String, DateTime<Utc>), ApiError> {
    let generator = SessionGenerator::new();
    let (raw_token, lookup, hash) = generator
        .generate()
        .map_err(|_| ApiError::internal("Failed to generate session token"))?;

    let now = Utc::now();
    let expires_at = now + Duration::days(SESSION_TTL_DAYS);
    let session = Session {
        id: Uuid::new_v4().to_string(),
        token_hash: hash,
        token_lookup: lookup,
        user_id: user_id.to_string(),
        created_at: now,
        expires_at: Some(expires_at),
        last_used_at: None,
    };

    state
        .store
        .create_session(&session)
        .api_err("Failed to create session")?;

    Ok((raw_token, expires_at))
}
