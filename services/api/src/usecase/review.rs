use uuid::Uuid;

use crate::domain::repository::{RestaurantRepository, ReviewRepository};
use crate::domain::types::{RestaurantStatus, RestaurantView, ReviewInput, validate_rating};
use crate::error::CrumbsError;
use crate::usecase::restaurant::load_view;

// ── MarkTried ────────────────────────────────────────────────────────────────

pub struct MarkTriedInput {
    pub rating: i32,
    pub review_text: Option<String>,
    pub visited_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub struct MarkTriedUseCase<R: RestaurantRepository, V: ReviewRepository> {
    pub restaurants: R,
    pub reviews: V,
}

impl<R: RestaurantRepository, V: ReviewRepository> MarkTriedUseCase<R, V> {
    /// Idempotent on status; the single review is created or overwritten.
    pub async fn execute(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
        input: MarkTriedInput,
    ) -> Result<RestaurantView, CrumbsError> {
        let rating = validate_rating(input.rating).ok_or(CrumbsError::InvalidRating)?;
        let review_input = ReviewInput {
            rating,
            review_text: input.review_text,
            visited_at: input.visited_at,
        };

        let (restaurant, review) = self
            .reviews
            .mark_tried(user_id, restaurant_id, &review_input)
            .await?
            .ok_or(CrumbsError::RestaurantNotFound)?;

        let tags = self
            .restaurants
            .tags_for(&[restaurant.id])
            .await?
            .into_iter()
            .map(|(_, tag)| tag)
            .collect();
        Ok(RestaurantView {
            restaurant,
            tags,
            review: Some(review),
        })
    }
}

// ── MarkSaved ────────────────────────────────────────────────────────────────

pub struct MarkSavedUseCase<R: RestaurantRepository, V: ReviewRepository> {
    pub restaurants: R,
    pub reviews: V,
}

impl<R: RestaurantRepository, V: ReviewRepository> MarkSavedUseCase<R, V> {
    /// Leaves any existing review untouched.
    pub async fn execute(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
    ) -> Result<RestaurantView, CrumbsError> {
        let restaurant = self
            .restaurants
            .set_status(user_id, restaurant_id, RestaurantStatus::Saved)
            .await?
            .ok_or(CrumbsError::RestaurantNotFound)?;
        load_view(&self.restaurants, &self.reviews, restaurant).await
    }
}
