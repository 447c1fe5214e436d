use std::collections::HashMap;

use anyhow::Context as _;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::repository::PlacesPort;
use crate::domain::types::{PlaceDetails, PlaceSearchResult};
use crate::error::CrumbsError;

const DETAILS_FIELDS: &str =
    "name,website,url,formatted_address,address_components,price_level,geometry,photos";
const PHOTO_MAX_WIDTH: &str = "800";

/// Google Places (legacy web service) client. Single attempt, no retry.
#[derive(Clone)]
pub struct GooglePlacesClient {
    pub http: reqwest::Client,
    pub api_key: Option<String>,
    /// e.g. `https://maps.googleapis.com/maps/api/place`
    pub base_url: String,
}

impl GooglePlacesClient {
    fn api_key(&self) -> Result<&str, CrumbsError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(CrumbsError::PlacesNotConfigured)
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, CrumbsError> {
        let base = format!("{}/{path}", self.base_url.trim_end_matches('/'));
        let url = Url::parse_with_params(&base, params).context("build places url")?;
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CrumbsError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                tracing::warn!(error = %e, "places request failed");
                CrumbsError::PlacesUpstream
            })?;
        response.json::<T>().await.map_err(|e| {
            tracing::warn!(error = %e, "places response undecodable");
            CrumbsError::PlacesUpstream
        })
    }
}

impl PlacesPort for GooglePlacesClient {
    async fn search(&self, query: &str) -> Result<Vec<PlaceSearchResult>, CrumbsError> {
        let key = self.api_key()?;
        let url = self.endpoint(
            "autocomplete/json",
            &[("input", query), ("types", "establishment"), ("key", key)],
        )?;
        let body: AutocompleteResponse = self.get_json(url).await?;
        search_results(body)
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, CrumbsError> {
        let key = self.api_key()?;
        let url = self.endpoint(
            "details/json",
            &[("place_id", place_id), ("fields", DETAILS_FIELDS), ("key", key)],
        )?;
        let body: DetailsResponse = self.get_json(url).await?;
        let result = match (body.status.as_str(), body.result) {
            ("OK", Some(result)) => result,
            (status, _) => {
                tracing::warn!(status, "places details rejected");
                return Err(CrumbsError::PlacesUpstream);
            }
        };
        let photo = match result.photos.first() {
            Some(p) => Some(
                self.endpoint(
                    "photo",
                    &[
                        ("maxwidth", PHOTO_MAX_WIDTH),
                        ("photoreference", p.photo_reference.as_str()),
                        ("key", key),
                    ],
                )?
                .to_string(),
            ),
            None => None,
        };
        Ok(normalize_details(place_id, result, photo))
    }
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    place_id: String,
    description: String,
    structured_formatting: StructuredFormatting,
}

#[derive(Debug, Deserialize)]
struct StructuredFormatting {
    main_text: String,
    #[serde(default)]
    secondary_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    name: Option<String>,
    website: Option<String>,
    url: Option<String>,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
    price_level: Option<i64>,
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    photo_reference: String,
}

// ── Normalization ────────────────────────────────────────────────────────────

fn search_results(body: AutocompleteResponse) -> Result<Vec<PlaceSearchResult>, CrumbsError> {
    if body.status != "OK" && body.status != "ZERO_RESULTS" {
        tracing::warn!(status = %body.status, "places autocomplete rejected");
        return Err(CrumbsError::PlacesUpstream);
    }
    Ok(body
        .predictions
        .into_iter()
        .map(|p| PlaceSearchResult {
            place_id: p.place_id,
            description: p.description,
            main_text: p.structured_formatting.main_text,
            secondary_text: p.structured_formatting.secondary_text.unwrap_or_default(),
        })
        .collect())
}

/// Upstream 0 (free) folds into the cheapest bucket.
fn price_range_from_level(level: i64) -> Option<u8> {
    match level {
        0 | 1 => Some(1),
        2 => Some(2),
        3 => Some(3),
        4 => Some(4),
        _ => None,
    }
}

fn normalize_details(
    place_id: &str,
    result: DetailsResult,
    photo_url: Option<String>,
) -> PlaceDetails {
    // First component wins for each type.
    let mut by_type: HashMap<&str, &str> = HashMap::new();
    for component in &result.address_components {
        for t in &component.types {
            by_type.entry(t.as_str()).or_insert(component.long_name.as_str());
        }
    }
    let first_of = |types: &[&str]| {
        types
            .iter()
            .find_map(|t| by_type.get(t))
            .map(|s| (*s).to_owned())
    };

    PlaceDetails {
        place_id: place_id.to_owned(),
        country: first_of(&["country"]),
        city: first_of(&["locality", "administrative_area_level_2"]),
        area: first_of(&[
            "sublocality_level_1",
            "sublocality",
            "neighborhood",
            "administrative_area_level_3",
        ]),
        price_range: result.price_level.and_then(price_range_from_level),
        name: result.name,
        website_url: result.website,
        google_maps_url: result.url,
        photo_url,
    }
}
