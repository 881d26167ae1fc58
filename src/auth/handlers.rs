use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::Credentials,
        extractors::{session_cookie, SessionUser},
        password::{hash_password_blocking, verify_password_blocking},
        repo_types::PublicUser,
    },
    error::AppError,
    extract::AppJson,
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
}

/// Signs a token for the user and pairs it with the user body.
fn with_session(state: &AppState, user: PublicUser) -> Result<impl IntoResponse, AppError> {
    let token = state.jwt.sign(&user)?;
    let cookie = session_cookie(token, state.jwt.session_ttl, state.config.cookie.secure);
    Ok(([(SET_COOKIE, cookie)], Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.normalized_email();

    if email.is_empty() {
        return Err(AppError::BadRequest("field `email` is required.".into()));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("field `password` is required.".into()));
    }

    let hash = hash_password_blocking(payload.password).await?;

    let user = state
        .users
        .insert(&email, &hash)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "email already registered");
            AppError::Conflict("Email already registered".into())
        })?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    with_session(&state, user.into())
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.normalized_email();

    let user = if is_valid_email(&email) {
        state.users.find_by_email(&email).await?
    } else {
        None
    };

    let ok = verify_password_blocking(
        payload.password,
        user.as_ref().map(|u| u.password_hash.clone()),
    )
    .await?;

    let user = match user {
        Some(u) if ok => u,
        Some(u) => {
            warn!(user_id = %u.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    info!(user_id = %user.id, email = %user.email, "user logged in");
    with_session(&state, user.into())
}

#[instrument(skip_all)]
pub async fn verify(SessionUser(user): SessionUser) -> Json<PublicUser> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serialization_has_no_password() {
        let user = crate::auth::repo_types::User {
            id: uuid::Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            version: 0,
            created_at: time::OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_value(PublicUser::from(user)).unwrap();
        assert_eq!(json["email"], "test@example.com");
        assert!(json.get("_id").is_some());
        assert_eq!(json["__v"], 0);
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("test@test.com"));
        assert!(!is_valid_email("test"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email(""));
    }
}
