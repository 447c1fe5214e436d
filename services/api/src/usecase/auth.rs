use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, validate_email, validate_username};
use crate::error::CrumbsError;
use crate::usecase::credential::{generate_api_key, hash_api_key, hash_password, verify_password};

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

pub struct RegisterUseCase<U: UserRepository> {
    pub users: U,
    pub api_key_prefix: String,
}

impl<U: UserRepository> RegisterUseCase<U> {
    /// The returned user carries the freshly issued plaintext API key.
    pub async fn execute(&self, input: RegisterInput) -> Result<User, CrumbsError> {
        let email = normalize_email(&input.email);
        let username = input.username.trim().to_owned();

        if !validate_email(&email) {
            return Err(CrumbsError::InvalidEmail);
        }
        if !validate_username(&username) {
            return Err(CrumbsError::InvalidUsername);
        }
        if input.password.is_empty() {
            return Err(CrumbsError::InvalidPassword);
        }

        if self.users.email_exists(&email).await? {
            return Err(CrumbsError::EmailAlreadyRegistered);
        }
        if self.users.username_exists(&username).await? {
            return Err(CrumbsError::UsernameAlreadyTaken);
        }

        let password_hash = hash_password(&input.password).await?;
        let api_key = generate_api_key(&self.api_key_prefix);
        let user = User {
            id: Uuid::now_v7(),
            email,
            username,
            password_hash,
            api_key_hash: hash_api_key(&api_key),
            api_key,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> LoginUseCase<U> {
    /// Returns the user with its stored API key; the key is never rotated here.
    pub async fn execute(&self, input: LoginInput) -> Result<User, CrumbsError> {
        let email = normalize_email(&input.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(CrumbsError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash).await? {
            return Err(CrumbsError::InvalidCredentials);
        }
        Ok(user)
    }
}

// ── Authenticate (bearer → user) ─────────────────────────────────────────────

pub struct AuthenticateUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> AuthenticateUseCase<U> {
    pub async fn execute(&self, api_key: &str) -> Result<User, CrumbsError> {
        if api_key.is_empty() {
            return Err(CrumbsError::InvalidApiKey);
        }
        self.users
            .find_by_api_key_hash(&hash_api_key(api_key))
            .await?
            .ok_or(CrumbsError::InvalidApiKey)
    }
}
