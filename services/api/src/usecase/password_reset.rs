use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::repository::{MailerPort, PasswordResetTokenRepository, UserRepository};
use crate::domain::types::{PasswordResetToken, RESET_TOKEN_TTL_SECS};
use crate::error::CrumbsError;
use crate::usecase::auth::normalize_email;
use crate::usecase::credential::{hash_password, random_token};

/// Returned for every reset request, whether or not the email is registered.
pub const RESET_REQUESTED_MESSAGE: &str =
    "If that email is registered, you'll receive a password reset link shortly.";

pub const RESET_DONE_MESSAGE: &str = "Password has been reset successfully.";

pub fn reset_link(frontend_url: &str, token: &str) -> String {
    format!(
        "{}/reset-password?token={token}",
        frontend_url.trim_end_matches('/')
    )
}

// ── RequestPasswordReset ─────────────────────────────────────────────────────

pub struct RequestPasswordResetUseCase<U, T, M>
where
    U: UserRepository,
    T: PasswordResetTokenRepository,
    M: MailerPort,
{
    pub users: U,
    pub tokens: T,
    pub mailer: M,
    pub frontend_url: String,
}

impl<U, T, M> RequestPasswordResetUseCase<U, T, M>
where
    U: UserRepository,
    T: PasswordResetTokenRepository,
    M: MailerPort,
{
    pub async fn execute(&self, email: &str) -> Result<&'static str, CrumbsError> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Ok(RESET_REQUESTED_MESSAGE);
        };

        let now = Utc::now();
        let token = PasswordResetToken {
            id: Uuid::now_v7(),
            user_id: user.id,
            token: random_token(),
            expires_at: now + Duration::seconds(RESET_TOKEN_TTL_SECS),
            used: false,
            created_at: now,
        };
        self.tokens.create(&token).await?;
        tracing::info!(user_id = %user.id, "password reset issued");

        let link = reset_link(&self.frontend_url, &token.token);
        if let Err(e) = self.mailer.send_password_reset(&user.email, &link).await {
            tracing::warn!(user_id = %user.id, error = %e, "password reset email failed");
        }
        Ok(RESET_REQUESTED_MESSAGE)
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub token: String,
    pub new_password: String,
}

pub struct ResetPasswordUseCase<T: PasswordResetTokenRepository> {
    pub tokens: T,
}

impl<T: PasswordResetTokenRepository> ResetPasswordUseCase<T> {
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<&'static str, CrumbsError> {
        let token = self
            .tokens
            .find_by_token(&input.token)
            .await?
            .filter(|t| t.is_usable(Utc::now()))
            .ok_or(CrumbsError::InvalidResetToken)?;

        if input.new_password.is_empty() {
            return Err(CrumbsError::InvalidPassword);
        }

        let password_hash = hash_password(&input.new_password).await?;
        // A concurrent reset may have consumed the token since the lookup.
        if !self.tokens.consume(&token, &password_hash).await? {
            return Err(CrumbsError::InvalidResetToken);
        }

        tracing::info!(user_id = %token.user_id, "password reset");
        Ok(RESET_DONE_MESSAGE)
    }
}
