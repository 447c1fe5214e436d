use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::CrumbsError;
use crate::handlers::restaurant::RestaurantResponse;
use crate::identity::CurrentUser;
use crate::state::AppState;
use crate::usecase::review::{MarkSavedUseCase, MarkTriedInput, MarkTriedUseCase};

// ── POST /restaurants/{id}/mark-tried ────────────────────────────────────────

#[derive(Deserialize)]
pub struct MarkTriedRequest {
    pub rating: i32,
    pub review_text: Option<String>,
    pub visited_at: Option<DateTime<Utc>>,
}

pub async fn mark_tried(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<MarkTriedRequest>,
) -> Result<Json<RestaurantResponse>, CrumbsError> {
    let usecase = MarkTriedUseCase {
        restaurants: state.restaurant_repo(),
        reviews: state.review_repo(),
    };
    let view = usecase
        .execute(
            user.id,
            id,
            MarkTriedInput {
                rating: body.rating,
                review_text: body.review_text,
                visited_at: body.visited_at,
            },
        )
        .await?;
    Ok(Json(view.into()))
}

// ── POST /restaurants/{id}/mark-saved ────────────────────────────────────────

pub async fn mark_saved(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RestaurantResponse>, CrumbsError> {
    let usecase = MarkSavedUseCase {
        restaurants: state.restaurant_repo(),
        reviews: state.review_repo(),
    };
    let view = usecase.execute(user.id, id).await?;
    Ok(Json(view.into()))
}
