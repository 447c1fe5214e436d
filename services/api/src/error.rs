use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Crumbs service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum CrumbsError {
    // 400
    #[error("invalid email")]
    InvalidEmail,
    #[error("invalid username")]
    InvalidUsername,
    #[error("invalid password")]
    InvalidPassword,
    #[error("rating must be between 1 and 5")]
    InvalidRating,
    #[error("price range must be between 1 and 4")]
    InvalidPriceRange,
    #[error("invalid status")]
    InvalidStatus,
    #[error("unknown tag")]
    UnknownTag,
    #[error("tag name and category are required")]
    InvalidTag,
    #[error("query must be at least 2 characters")]
    InvalidQuery,
    #[error("invalid or expired token")]
    InvalidResetToken,
    #[error("invalid filter value")]
    InvalidFilter,
    #[error("name, country and city must not be empty")]
    MissingData,
    // 401
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("invalid or missing api key")]
    InvalidApiKey,
    // 404
    #[error("restaurant not found")]
    RestaurantNotFound,
    // 409
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("username already taken")]
    UsernameAlreadyTaken,
    #[error("tag already exists")]
    TagAlreadyExists,
    // 502 / 503
    #[error("places lookup failed")]
    PlacesUpstream,
    #[error("places lookup not configured")]
    PlacesNotConfigured,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl CrumbsError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidRating => "INVALID_RATING",
            Self::InvalidPriceRange => "INVALID_PRICE_RANGE",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::UnknownTag => "UNKNOWN_TAG",
            Self::InvalidTag => "INVALID_TAG",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::InvalidResetToken => "INVALID_RESET_TOKEN",
            Self::InvalidFilter => "INVALID_FILTER",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidApiKey => "INVALID_API_KEY",
            Self::RestaurantNotFound => "RESTAURANT_NOT_FOUND",
            Self::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            Self::UsernameAlreadyTaken => "USERNAME_ALREADY_TAKEN",
            Self::TagAlreadyExists => "TAG_ALREADY_EXISTS",
            Self::PlacesUpstream => "PLACES_UPSTREAM",
            Self::PlacesNotConfigured => "PLACES_NOT_CONFIGURED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEmail
            | Self::InvalidUsername
            | Self::InvalidPassword
            | Self::InvalidRating
            | Self::InvalidPriceRange
            | Self::InvalidStatus
            | Self::UnknownTag
            | Self::InvalidTag
            | Self::InvalidQuery
            | Self::InvalidResetToken
            | Self::InvalidFilter
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::InvalidApiKey => StatusCode::UNAUTHORIZED,
            Self::RestaurantNotFound => StatusCode::NOT_FOUND,
            Self::EmailAlreadyRegistered | Self::UsernameAlreadyTaken | Self::TagAlreadyExists => {
                StatusCode::CONFLICT
            }
            Self::PlacesUpstream => StatusCode::BAD_GATEWAY,
            Self::PlacesNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CrumbsError {
    fn into_response(self) -> Response {
        let status = self.status();
        // TraceLayer records every response; only the 500 chain is logged here.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
