use crate::domain::repository::PlacesPort;
use crate::domain::types::{PLACES_MIN_QUERY_LEN, PlaceDetails, PlaceSearchResult};
use crate::error::CrumbsError;

// ── SearchPlaces ─────────────────────────────────────────────────────────────

pub struct SearchPlacesUseCase<P: PlacesPort> {
    pub places: P,
}

impl<P: PlacesPort> SearchPlacesUseCase<P> {
    pub async fn execute(&self, q: &str) -> Result<Vec<PlaceSearchResult>, CrumbsError> {
        let q = q.trim();
        if q.chars().count() < PLACES_MIN_QUERY_LEN {
            return Err(CrumbsError::InvalidQuery);
        }
        self.places.search(q).await
    }
}

// ── GetPlaceDetails ──────────────────────────────────────────────────────────

pub struct GetPlaceDetailsUseCase<P: PlacesPort> {
    pub places: P,
}

impl<P: PlacesPort> GetPlaceDetailsUseCase<P> {
    pub async fn execute(&self, place_id: &str) -> Result<PlaceDetails, CrumbsError> {
        self.places.details(place_id).await
    }
}
