use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::{
    RestaurantFilters, RestaurantStatus, RestaurantView, Review, validate_price_range,
};
use crate::error::CrumbsError;
use crate::handlers::tag::TagResponse;
use crate::identity::CurrentUser;
use crate::state::AppState;
use crate::usecase::restaurant::{
    CreateRestaurantInput, CreateRestaurantUseCase, DeleteRestaurantUseCase,
    GetRestaurantUseCase, ListRestaurantsUseCase, ToggleFavoriteUseCase, UpdateRestaurantInput,
    UpdateRestaurantUseCase,
};

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub rating: u8,
    pub review_text: Option<String>,
    #[serde(serialize_with = "crumbs_core::serde::to_rfc3339_ms_opt")]
    pub visited_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "crumbs_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "crumbs_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            restaurant_id: r.restaurant_id,
            rating: r.rating,
            review_text: r.review_text,
            visited_at: r.visited_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct RestaurantResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: &'static str,
    pub is_favorite: bool,
    pub name: String,
    pub country: String,
    pub city: String,
    pub area: Option<String>,
    pub website_url: Option<String>,
    pub google_maps_url: Option<String>,
    pub google_place_id: Option<String>,
    pub photo_url: Option<String>,
    pub price_range: Option<u8>,
    pub notes: Option<String>,
    pub tags: Vec<TagResponse>,
    pub review: Option<ReviewResponse>,
    #[serde(serialize_with = "crumbs_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "crumbs_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<RestaurantView> for RestaurantResponse {
    fn from(view: RestaurantView) -> Self {
        let r = view.restaurant;
        Self {
            id: r.id,
            user_id: r.user_id,
            status: r.status.as_str(),
            is_favorite: r.is_favorite,
            name: r.name,
            country: r.country,
            city: r.city,
            area: r.area,
            website_url: r.website_url,
            google_maps_url: r.google_maps_url,
            google_place_id: r.google_place_id,
            photo_url: r.photo_url,
            price_range: r.price_range,
            notes: r.notes,
            tags: view.tags.into_iter().map(Into::into).collect(),
            review: view.review.map(Into::into),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ── POST /restaurants ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub country: String,
    pub city: String,
    pub area: Option<String>,
    pub website_url: Option<String>,
    pub google_maps_url: Option<String>,
    pub google_place_id: Option<String>,
    pub photo_url: Option<String>,
    pub price_range: Option<i32>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

pub async fn create_restaurant(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateRestaurantRequest>,
) -> Result<impl IntoResponse, CrumbsError> {
    let usecase = CreateRestaurantUseCase {
        restaurants: state.restaurant_repo(),
        tags: state.tag_repo(),
    };
    let view = usecase
        .execute(
            user.id,
            CreateRestaurantInput {
                name: body.name,
                country: body.country,
                city: body.city,
                area: body.area,
                website_url: body.website_url,
                google_maps_url: body.google_maps_url,
                google_place_id: body.google_place_id,
                photo_url: body.photo_url,
                price_range: body.price_range,
                notes: body.notes,
                tag_ids: body.tag_ids,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(RestaurantResponse::from(view))))
}

// ── GET /restaurants ─────────────────────────────────────────────────────────

/// Build list filters from raw query pairs. `tag_ids` may repeat and may be
/// spelled `tag_ids[]`; empty values impose no constraint.
pub fn parse_filters(pairs: Vec<(String, String)>) -> Result<RestaurantFilters, CrumbsError> {
    let mut filters = RestaurantFilters::default();
    for (key, value) in pairs {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "status" => {
                filters.status =
                    Some(RestaurantStatus::parse(value).ok_or(CrumbsError::InvalidStatus)?);
            }
            "country" => filters.country = Some(value.to_owned()),
            "city" => filters.city = Some(value.to_owned()),
            "q" => filters.q = Some(value.to_owned()),
            "price_range" => {
                let n: i32 = value.parse().map_err(|_| CrumbsError::InvalidFilter)?;
                filters.price_range =
                    Some(validate_price_range(n).ok_or(CrumbsError::InvalidPriceRange)?);
            }
            "tag_ids" | "tag_ids[]" => {
                let id = value.parse().map_err(|_| CrumbsError::InvalidFilter)?;
                if !filters.tag_ids.contains(&id) {
                    filters.tag_ids.push(id);
                }
            }
            "is_favorite" => {
                filters.is_favorite = Some(match value {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    _ => return Err(CrumbsError::InvalidFilter),
                });
            }
            _ => {}
        }
    }
    Ok(filters)
}

pub async fn list_restaurants(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<RestaurantResponse>>, CrumbsError> {
    let filters = parse_filters(pairs)?;
    let usecase = ListRestaurantsUseCase {
        restaurants: state.restaurant_repo(),
        reviews: state.review_repo(),
    };
    let views = usecase.execute(user.id, filters).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

// ── GET /restaurants/{id} ────────────────────────────────────────────────────

pub async fn get_restaurant(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RestaurantResponse>, CrumbsError> {
    let usecase = GetRestaurantUseCase {
        restaurants: state.restaurant_repo(),
        reviews: state.review_repo(),
    };
    let view = usecase.execute(user.id, id).await?;
    Ok(Json(view.into()))
}

// ── PATCH /restaurants/{id} ──────────────────────────────────────────────────

/// Nullable fields: absent leaves the value, explicit `null` clears it.
#[derive(Deserialize)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    #[serde(default, deserialize_with = "crumbs_core::serde::deserialize_some")]
    pub area: Option<Option<String>>,
    #[serde(default, deserialize_with = "crumbs_core::serde::deserialize_some")]
    pub website_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "crumbs_core::serde::deserialize_some")]
    pub google_maps_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "crumbs_core::serde::deserialize_some")]
    pub google_place_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "crumbs_core::serde::deserialize_some")]
    pub photo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "crumbs_core::serde::deserialize_some")]
    pub price_range: Option<Option<i32>>,
    #[serde(default, deserialize_with = "crumbs_core::serde::deserialize_some")]
    pub notes: Option<Option<String>>,
    pub tag_ids: Option<Vec<Uuid>>,
}

impl From<UpdateRestaurantRequest> for UpdateRestaurantInput {
    fn from(b: UpdateRestaurantRequest) -> Self {
        Self {
            name: b.name,
            country: b.country,
            city: b.city,
            area: b.area,
            website_url: b.website_url,
            google_maps_url: b.google_maps_url,
            google_place_id: b.google_place_id,
            photo_url: b.photo_url,
            price_range: b.price_range,
            notes: b.notes,
            tag_ids: b.tag_ids,
        }
    }
}

pub async fn update_restaurant(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRestaurantRequest>,
) -> Result<Json<RestaurantResponse>, CrumbsError> {
    let usecase = UpdateRestaurantUseCase {
        restaurants: state.restaurant_repo(),
        reviews: state.review_repo(),
        tags: state.tag_repo(),
    };
    let view = usecase.execute(user.id, id, body.into()).await?;
    Ok(Json(view.into()))
}

// ── DELETE /restaurants/{id} ─────────────────────────────────────────────────

pub async fn delete_restaurant(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, CrumbsError> {
    let usecase = DeleteRestaurantUseCase {
        restaurants: state.restaurant_repo(),
    };
    usecase.execute(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /restaurants/{id}/toggle-favorite ───────────────────────────────────

pub async fn toggle_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RestaurantResponse>, CrumbsError> {
    let usecase = ToggleFavoriteUseCase {
        restaurants: state.restaurant_repo(),
        reviews: state.review_repo(),
    };
    let view = usecase.execute(user.id, id).await?;
    Ok(Json(view.into()))
}
