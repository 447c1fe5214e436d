use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use crate::config::CrumbsConfig;
use crate::infra::db::{
    DbPasswordResetTokenRepository, DbRestaurantRepository, DbReviewRepository, DbTagRepository,
    DbUserRepository,
};
use crate::infra::mail::ResendMailer;
use crate::infra::places::GooglePlacesClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub places: GooglePlacesClient,
    pub mailer: ResendMailer,
    pub api_key_prefix: String,
    pub frontend_url: String,
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &CrumbsConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            db,
            places: GooglePlacesClient {
                http: http.clone(),
                api_key: config.google_places_api_key.clone(),
                base_url: config.google_places_base_url.clone(),
            },
            mailer: ResendMailer {
                http,
                api_key: config.resend_api_key.clone(),
                base_url: config.resend_base_url.clone(),
                from: config.email_from.clone(),
            },
            api_key_prefix: config.api_key_prefix.clone(),
            frontend_url: config.frontend_url.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn reset_token_repo(&self) -> DbPasswordResetTokenRepository {
        DbPasswordResetTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn restaurant_repo(&self) -> DbRestaurantRepository {
        DbRestaurantRepository {
            db: self.db.clone(),
        }
    }

    pub fn review_repo(&self) -> DbReviewRepository {
        DbReviewRepository {
            db: self.db.clone(),
        }
    }

    pub fn tag_repo(&self) -> DbTagRepository {
        DbTagRepository {
            db: self.db.clone(),
        }
    }
}
