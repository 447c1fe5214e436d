#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{
    PasswordResetToken, PlaceDetails, PlaceSearchResult, Restaurant, RestaurantFilters,
    RestaurantPatch, RestaurantStatus, Review, ReviewInput, Tag, User,
};
use crate::error::CrumbsError;

/// Credential store.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CrumbsError>;
    async fn find_by_api_key_hash(&self, api_key_hash: &str)
    -> Result<Option<User>, CrumbsError>;
    async fn email_exists(&self, email: &str) -> Result<bool, CrumbsError>;
    async fn username_exists(&self, username: &str) -> Result<bool, CrumbsError>;
    async fn create(&self, user: &User) -> Result<(), CrumbsError>;
}

/// Repository for password reset tokens.
pub trait PasswordResetTokenRepository: Send + Sync {
    async fn create(&self, token: &PasswordResetToken) -> Result<(), CrumbsError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<PasswordResetToken>, CrumbsError>;

    /// Store `password_hash` for the token's owner and mark the token used,
    /// in one transaction. Returns `false` if the token was already used.
    async fn consume(
        &self,
        token: &PasswordResetToken,
        password_hash: &str,
    ) -> Result<bool, CrumbsError>;
}

/// Restaurants. Every method takes the owner id; rows owned by someone else
/// are indistinguishable from missing rows.
pub trait RestaurantRepository: Send + Sync {
    /// Newest first (`created_at DESC, id DESC`).
    async fn list(
        &self,
        user_id: Uuid,
        filters: &RestaurantFilters,
    ) -> Result<Vec<Restaurant>, CrumbsError>;

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Restaurant>, CrumbsError>;

    /// Insert the restaurant and its tag set in one transaction.
    async fn create(&self, restaurant: &Restaurant, tag_ids: &[Uuid]) -> Result<(), CrumbsError>;

    /// Apply `patch` and, when `tag_ids` is `Some`, replace the whole tag set,
    /// in one transaction. Returns `None` if not found for this owner.
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &RestaurantPatch,
        tag_ids: Option<&[Uuid]>,
    ) -> Result<Option<Restaurant>, CrumbsError>;

    async fn set_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: RestaurantStatus,
    ) -> Result<Option<Restaurant>, CrumbsError>;

    async fn toggle_favorite(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Restaurant>, CrumbsError>;

    /// Delete the restaurant (review and tag links cascade). Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, CrumbsError>;

    /// Tags attached to each of `restaurant_ids`, as `(restaurant_id, tag)` pairs ordered by tag name.
    async fn tags_for(&self, restaurant_ids: &[Uuid]) -> Result<Vec<(Uuid, Tag)>, CrumbsError>;
}

/// Reviews and the saved → tried transition.
pub trait ReviewRepository: Send + Sync {
    async fn list_by_restaurant_ids(
        &self,
        restaurant_ids: &[Uuid],
    ) -> Result<Vec<Review>, CrumbsError>;

    /// Set status to tried and insert-or-overwrite the restaurant's single review,
    /// in one transaction. Returns `None` if not found for this owner.
    async fn mark_tried(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
        input: &ReviewInput,
    ) -> Result<Option<(Restaurant, Review)>, CrumbsError>;
}

/// Global tag vocabulary.
pub trait TagRepository: Send + Sync {
    /// Ordered by category, then name.
    async fn list_all(&self) -> Result<Vec<Tag>, CrumbsError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, CrumbsError>;
    /// Number of the given ids that exist.
    async fn count_existing(&self, ids: &[Uuid]) -> Result<u64, CrumbsError>;
    async fn create(&self, tag: &Tag) -> Result<(), CrumbsError>;
}

/// Outbound email.
pub trait MailerPort: Send + Sync {
    async fn send_password_reset(&self, to: &str, reset_link: &str) -> Result<(), CrumbsError>;
}

/// External place search-and-details API.
pub trait PlacesPort: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PlaceSearchResult>, CrumbsError>;
    async fn details(&self, place_id: &str) -> Result<PlaceDetails, CrumbsError>;
}
