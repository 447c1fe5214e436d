use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::User;
use crate::error::CrumbsError;
use crate::identity::CurrentUser;
use crate::state::AppState;
use crate::usecase::auth::{LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};
use crate::usecase::password_reset::{
    RequestPasswordResetUseCase, ResetPasswordInput, ResetPasswordUseCase,
};

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(serialize_with = "crumbs_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            created_at: u.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub api_key: String,
    pub user: UserResponse,
}

impl From<User> for AuthResponse {
    fn from(mut u: User) -> Self {
        Self {
            api_key: std::mem::take(&mut u.api_key),
            user: u.into(),
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /auth/register ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, CrumbsError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        api_key_prefix: state.api_key_prefix.clone(),
    };
    let user = usecase
        .execute(RegisterInput {
            email: body.email,
            username: body.username,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(AuthResponse::from(user))))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, CrumbsError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(user.into()))
}

// ── GET /auth/me ─────────────────────────────────────────────────────────────

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

// ── POST /auth/forgot-password ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, CrumbsError> {
    let usecase = RequestPasswordResetUseCase {
        users: state.user_repo(),
        tokens: state.reset_token_repo(),
        mailer: state.mailer.clone(),
        frontend_url: state.frontend_url.clone(),
    };
    let message = usecase.execute(&body.email).await?;
    Ok(Json(MessageResponse { message }))
}

// ── POST /auth/reset-password ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, CrumbsError> {
    let usecase = ResetPasswordUseCase {
        tokens: state.reset_token_repo(),
    };
    let message = usecase
        .execute(ResetPasswordInput {
            token: body.token,
            new_password: body.new_password,
        })
        .await?;
    Ok(Json(MessageResponse { message }))
}
