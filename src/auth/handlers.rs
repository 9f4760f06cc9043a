use axum::{
    extract::{FromRef, State},
    http::HeaderMap,
    routing::{post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateProfileRequest,
            UpdateProfileResponse,
        },
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{is_unique_violation, User},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/update", put(update_profile))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request-shape checks for registration. Errors are collected, not
/// short-circuited.
fn validate_register(req: &RegisterRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if !is_valid_email(&req.email) {
        errors.push("Invalid email".to_string());
    }
    if req.password.len() < 8 {
        errors.push("Password too short".to_string());
    }
    errors
}

fn validate_update(req: &UpdateProfileRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(password) = &req.password {
        if password.len() < 8 {
            errors.push("Password too short".to_string());
        }
    }
    errors
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let errors = validate_register(&payload);
    if !errors.is_empty() {
        warn!(?errors, "register validation failed");
        return Err(ApiError::Validation(errors));
    }

    // Checked here for the common case; the unique index on email catches
    // the concurrent-duplicate race at insert time below.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "User already exists with this email");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password)?;

    let user = match User::create(
        &state.db,
        &payload.email,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
        &hash,
    )
    .await
    {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %payload.email, "User already exists with this email");
            return Err(ApiError::DuplicateEmail);
        }
        Err(e) => return Err(e.into()),
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(RegisterResponse {
        token,
        email: user.email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::NotFound("User was not found".into())
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login incorrect password");
        return Err(ApiError::Unauthorized("Incorrect password".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let authtoken = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        authtoken,
        user_name: user.first_name.unwrap_or_default(),
        user_email: user.email,
    }))
}

#[instrument(skip(state, headers, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, ApiError> {
    let errors = validate_update(&payload);
    if !errors.is_empty() {
        warn!(?errors, "update validation failed");
        return Err(ApiError::Validation(errors));
    }

    let email = headers
        .get("email")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!("update without email header");
            ApiError::BadRequest("Email not found in the request headers".into())
        })?;

    let mut user = User::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| {
            warn!(email, "update unknown email");
            ApiError::NotFound("User not found".into())
        })?;

    // Partial update: absent fields keep their stored value.
    if let Some(first_name) = payload.first_name {
        user.first_name = Some(first_name);
    }
    if let Some(last_name) = payload.last_name {
        user.last_name = Some(last_name);
    }
    if let Some(password) = payload.password {
        user.password_hash = hash_password(&password)?;
    }
    user.updated_at = OffsetDateTime::now_utc();

    let user = user
        .replace_by_email(&state.db)
        .await?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("user row vanished during update")))?;

    let keys = JwtKeys::from_ref(&state);
    let authtoken = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "profile updated");
    Ok(Json(UpdateProfileResponse { authtoken }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plain_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("a@x"));
    }

    #[test]
    fn register_validation_collects_all_errors() {
        let req = RegisterRequest {
            email: "bad".into(),
            password: "short".into(),
            first_name: None,
            last_name: None,
        };
        let errors = validate_register(&req);
        assert_eq!(errors, vec!["Invalid email", "Password too short"]);
    }

    #[test]
    fn register_validation_passes_well_formed_input() {
        let req = RegisterRequest {
            email: "a@x.com".into(),
            password: "long enough".into(),
            first_name: Some("Ada".into()),
            last_name: None,
        };
        assert!(validate_register(&req).is_empty());
    }

    #[test]
    fn update_validation_only_checks_present_fields() {
        let empty = UpdateProfileRequest {
            first_name: None,
            last_name: None,
            password: None,
        };
        assert!(validate_update(&empty).is_empty());

        let short = UpdateProfileRequest {
            first_name: Some("Ada".into()),
            last_name: None,
            password: Some("short".into()),
        };
        assert_eq!(validate_update(&short), vec!["Password too short"]);
    }
}
