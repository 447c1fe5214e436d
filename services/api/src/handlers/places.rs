use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::{PlaceDetails, PlaceSearchResult};
use crate::error::CrumbsError;
use crate::state::AppState;
use crate::usecase::places::{GetPlaceDetailsUseCase, SearchPlacesUseCase};

#[derive(Serialize)]
pub struct PlaceSearchResponse {
    pub place_id: String,
    pub description: String,
    pub main_text: String,
    pub secondary_text: String,
}

impl From<PlaceSearchResult> for PlaceSearchResponse {
    fn from(p: PlaceSearchResult) -> Self {
        Self {
            place_id: p.place_id,
            description: p.description,
            main_text: p.main_text,
            secondary_text: p.secondary_text,
        }
    }
}

#[derive(Serialize)]
pub struct PlaceDetailsResponse {
    pub place_id: String,
    pub name: Option<String>,
    pub website_url: Option<String>,
    pub google_maps_url: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub area: Option<String>,
    pub price_range: Option<u8>,
    pub photo_url: Option<String>,
}

impl From<PlaceDetails> for PlaceDetailsResponse {
    fn from(d: PlaceDetails) -> Self {
        Self {
            place_id: d.place_id,
            name: d.name,
            website_url: d.website_url,
            google_maps_url: d.google_maps_url,
            country: d.country,
            city: d.city,
            area: d.area,
            price_range: d.price_range,
            photo_url: d.photo_url,
        }
    }
}

// ── GET /places/search ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search_places(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PlaceSearchResponse>>, CrumbsError> {
    let usecase = SearchPlacesUseCase {
        places: state.places.clone(),
    };
    let results = usecase.execute(&query.q).await?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

// ── GET /places/details/{place_id} ───────────────────────────────────────────

pub async fn get_place_details(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<PlaceDetailsResponse>, CrumbsError> {
    let usecase = GetPlaceDetailsUseCase {
        places: state.places.clone(),
    };
    let details = usecase.execute(&place_id).await?;
    Ok(Json(details.into()))
}
