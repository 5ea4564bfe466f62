use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use anyhow::Context;
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MeResponse, PublicUser, RefreshRequest, RegisterRequest},
        repo::is_unique_violation,
        repo_types::User,
        services::{hash_password, is_valid_email, verify_password, AuthUser, JwtKeys},
    },
    errors::ApiError,
    navigation::rules::{settle, AppRoute, Session},
    profiles::repo as profiles_repo,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Where a freshly authenticated user lands.
async fn landing_for(state: &AppState, user_id: Uuid) -> Result<&'static str, ApiError> {
    let profile = profiles_repo::find(&state.db, user_id).await?;
    let session = Session {
        authenticated: true,
        profile_complete: profile.is_some_and(|p| p.is_complete()),
    };
    Ok(settle(AppRoute::SignIn, session).path())
}

/// Creates the user and its empty profile in one transaction. A concurrent
/// sign-up with the same email loses on the unique index and gets a 409.
async fn create_account(db: &PgPool, email: &str, password_hash: &str) -> Result<User, ApiError> {
    let mut tx = db.begin().await.context("begin sign-up")?;

    let user = User::create(&mut *tx, email, password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!(email, "email registered concurrently");
                ApiError::Conflict("Email already registered".into())
            } else {
                error!(error = %e, "create user failed");
                ApiError::Internal(e)
            }
        })?;
    // Every account starts with an empty profile, which sends it to onboarding.
    profiles_repo::create_empty(&mut *tx, user.id).await?;

    tx.commit().await.context("commit sign-up")?;
    Ok(user)
}

fn issue_tokens(keys: &JwtKeys, user_id: Uuid) -> Result<(String, String), ApiError> {
    let access_token = keys.sign_access(user_id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        ApiError::Internal(e)
    })?;
    let refresh_token = keys.sign_refresh(user_id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        ApiError::Internal(e)
    })?;
    Ok((access_token, refresh_token))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(mut payload) = payload?;
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::BadRequest("Password too short".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = create_account(&state.db, &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let (access_token, refresh_token) = issue_tokens(&keys, user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            refresh_token,
            user: PublicUser {
                id: user.id,
                email: user.email,
            },
            redirect_to: AppRoute::Onboarding.path(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(mut payload) = payload?;
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(ApiError::Internal(e));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let (access_token, refresh_token) = issue_tokens(&keys, user.id)?;
    let redirect_to = landing_for(&state, user.id).await?;

    info!(user_id = %user.id, redirect_to, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
        redirect_to,
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    // Issue new pair
    let (access_token, refresh_token) = issue_tokens(&keys, user.id)?;
    let redirect_to = landing_for(&state, user.id).await?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
        redirect_to,
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            error!(user_id = %user_id, "user not found");
            ApiError::Unauthorized("User not found".into())
        })?;
    let profile = profiles_repo::find(&state.db, user_id).await?;

    Ok(Json(MeResponse {
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
        profile_complete: profile.is_some_and(|p| p.is_complete()),
    }))
}
