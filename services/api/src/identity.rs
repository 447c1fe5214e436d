//! Bearer API key extractor.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use crate::domain::types::User;
use crate::error::CrumbsError;
use crate::state::AppState;
use crate::usecase::auth::AuthenticateUseCase;

/// The user owning the presented `Authorization: Bearer <api_key>`.
///
/// Rejects with 401 when the header is absent, uses another scheme, or the
/// key matches no user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_owned())
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = CrumbsError;

    // Header is read synchronously; the returned future owns everything it needs.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(&parts.headers);
        let users = state.user_repo();

        async move {
            let token = token.ok_or(CrumbsError::InvalidApiKey)?;
            let user = AuthenticateUseCase { users }.execute(&token).await?;
            Ok(Self(user))
        }
    }
}
