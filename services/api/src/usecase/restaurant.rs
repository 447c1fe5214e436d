use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{RestaurantRepository, ReviewRepository, TagRepository};
use crate::domain::types::{
    Restaurant, RestaurantFilters, RestaurantPatch, RestaurantStatus, RestaurantView, Tag,
    validate_price_range,
};
use crate::error::CrumbsError;

/// Attach tags and reviews to `restaurants`, preserving order. Two batch
/// queries regardless of list length.
pub async fn load_views<R, V>(
    restaurants: &R,
    reviews: &V,
    list: Vec<Restaurant>,
) -> Result<Vec<RestaurantView>, CrumbsError>
where
    R: RestaurantRepository,
    V: ReviewRepository,
{
    if list.is_empty() {
        return Ok(vec![]);
    }
    let ids: Vec<Uuid> = list.iter().map(|r| r.id).collect();

    let mut tags_by_id: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (restaurant_id, tag) in restaurants.tags_for(&ids).await? {
        tags_by_id.entry(restaurant_id).or_default().push(tag);
    }
    let mut reviews_by_id: HashMap<Uuid, _> = reviews
        .list_by_restaurant_ids(&ids)
        .await?
        .into_iter()
        .map(|review| (review.restaurant_id, review))
        .collect();

    Ok(list
        .into_iter()
        .map(|restaurant| RestaurantView {
            tags: tags_by_id.remove(&restaurant.id).unwrap_or_default(),
            review: reviews_by_id.remove(&restaurant.id),
            restaurant,
        })
        .collect())
}

pub async fn load_view<R, V>(
    restaurants: &R,
    reviews: &V,
    restaurant: Restaurant,
) -> Result<RestaurantView, CrumbsError>
where
    R: RestaurantRepository,
    V: ReviewRepository,
{
    load_views(restaurants, reviews, vec![restaurant])
        .await?
        .pop()
        .ok_or_else(|| anyhow::anyhow!("restaurant view vanished").into())
}

/// Collapse duplicates (first occurrence wins) and require every id to exist.
async fn resolve_tag_ids<T: TagRepository>(
    tags: &T,
    tag_ids: Vec<Uuid>,
) -> Result<Vec<Uuid>, CrumbsError> {
    let mut unique = Vec::with_capacity(tag_ids.len());
    for id in tag_ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    if !unique.is_empty() && tags.count_existing(&unique).await? != unique.len() as u64 {
        return Err(CrumbsError::UnknownTag);
    }
    Ok(unique)
}

fn require_non_empty(value: &str) -> Result<String, CrumbsError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CrumbsError::MissingData);
    }
    Ok(trimmed.to_owned())
}

fn check_price_range(price_range: Option<i32>) -> Result<Option<u8>, CrumbsError> {
    price_range
        .map(|p| validate_price_range(p).ok_or(CrumbsError::InvalidPriceRange))
        .transpose()
}

// ── CreateRestaurant ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CreateRestaurantInput {
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
    pub tag_ids: Vec<Uuid>,
}

pub struct CreateRestaurantUseCase<R: RestaurantRepository, T: TagRepository> {
    pub restaurants: R,
    pub tags: T,
}

impl<R: RestaurantRepository, T: TagRepository> CreateRestaurantUseCase<R, T> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateRestaurantInput,
    ) -> Result<RestaurantView, CrumbsError> {
        let name = require_non_empty(&input.name)?;
        let country = require_non_empty(&input.country)?;
        let city = require_non_empty(&input.city)?;
        let price_range = check_price_range(input.price_range)?;
        let tag_ids = resolve_tag_ids(&self.tags, input.tag_ids).await?;

        let now = Utc::now();
        let restaurant = Restaurant {
            id: Uuid::now_v7(),
            user_id,
            status: RestaurantStatus::Saved,
            is_favorite: false,
            name,
            country,
            city,
            area: input.area,
            website_url: input.website_url,
            google_maps_url: input.google_maps_url,
            google_place_id: input.google_place_id,
            photo_url: input.photo_url,
            price_range,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        self.restaurants.create(&restaurant, &tag_ids).await?;

        let tags: Vec<Tag> = self
            .restaurants
            .tags_for(&[restaurant.id])
            .await?
            .into_iter()
            .map(|(_, tag)| tag)
            .collect();
        Ok(RestaurantView {
            restaurant,
            tags,
            review: None,
        })
    }
}

// ── ListRestaurants ──────────────────────────────────────────────────────────

pub struct ListRestaurantsUseCase<R: RestaurantRepository, V: ReviewRepository> {
    pub restaurants: R,
    pub reviews: V,
}

impl<R: RestaurantRepository, V: ReviewRepository> ListRestaurantsUseCase<R, V> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        filters: RestaurantFilters,
    ) -> Result<Vec<RestaurantView>, CrumbsError> {
        let list = self.restaurants.list(user_id, &filters).await?;
        load_views(&self.restaurants, &self.reviews, list).await
    }
}

// ── GetRestaurant ────────────────────────────────────────────────────────────

pub struct GetRestaurantUseCase<R: RestaurantRepository, V: ReviewRepository> {
    pub restaurants: R,
    pub reviews: V,
}

impl<R: RestaurantRepository, V: ReviewRepository> GetRestaurantUseCase<R, V> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<RestaurantView, CrumbsError> {
        let restaurant = self
            .restaurants
            .find(user_id, id)
            .await?
            .ok_or(CrumbsError::RestaurantNotFound)?;
        load_view(&self.restaurants, &self.reviews, restaurant).await
    }
}

// ── UpdateRestaurant ─────────────────────────────────────────────────────────

/// Outer `None` leaves a field untouched; `Some(None)` clears a nullable one.
#[derive(Default)]
pub struct UpdateRestaurantInput {
    pub name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub area: Option<Option<String>>,
    pub website_url: Option<Option<String>>,
    pub google_maps_url: Option<Option<String>>,
    pub google_place_id: Option<Option<String>>,
    pub photo_url: Option<Option<String>>,
    pub price_range: Option<Option<i32>>,
    pub notes: Option<Option<String>>,
    pub tag_ids: Option<Vec<Uuid>>,
}

pub struct UpdateRestaurantUseCase<R, V, T>
where
    R: RestaurantRepository,
    V: ReviewRepository,
    T: TagRepository,
{
    pub restaurants: R,
    pub reviews: V,
    pub tags: T,
}

impl<R, V, T> UpdateRestaurantUseCase<R, V, T>
where
    R: RestaurantRepository,
    V: ReviewRepository,
    T: TagRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateRestaurantInput,
    ) -> Result<RestaurantView, CrumbsError> {
        let patch = RestaurantPatch {
            name: input.name.as_deref().map(require_non_empty).transpose()?,
            country: input.country.as_deref().map(require_non_empty).transpose()?,
            city: input.city.as_deref().map(require_non_empty).transpose()?,
            area: input.area,
            website_url: input.website_url,
            google_maps_url: input.google_maps_url,
            google_place_id: input.google_place_id,
            photo_url: input.photo_url,
            price_range: input.price_range.map(check_price_range).transpose()?,
            notes: input.notes,
        };
        let tag_ids = match input.tag_ids {
            Some(ids) => Some(resolve_tag_ids(&self.tags, ids).await?),
            None => None,
        };

        let restaurant = self
            .restaurants
            .update(user_id, id, &patch, tag_ids.as_deref())
            .await?
            .ok_or(CrumbsError::RestaurantNotFound)?;
        load_view(&self.restaurants, &self.reviews, restaurant).await
    }
}

// ── DeleteRestaurant ─────────────────────────────────────────────────────────

pub struct DeleteRestaurantUseCase<R: RestaurantRepository> {
    pub restaurants: R,
}

impl<R: RestaurantRepository> DeleteRestaurantUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), CrumbsError> {
        if !self.restaurants.delete(user_id, id).await? {
            return Err(CrumbsError::RestaurantNotFound);
        }
        Ok(())
    }
}

// ── ToggleFavorite ───────────────────────────────────────────────────────────

pub struct ToggleFavoriteUseCase<R: RestaurantRepository, V: ReviewRepository> {
    pub restaurants: R,
    pub reviews: V,
}

impl<R: RestaurantRepository, V: ReviewRepository> ToggleFavoriteUseCase<R, V> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<RestaurantView, CrumbsError> {
        let restaurant = self
            .restaurants
            .toggle_favorite(user_id, id)
            .await?
            .ok_or(CrumbsError::RestaurantNotFound)?;
        load_view(&self.restaurants, &self.reviews, restaurant).await
    }
}
