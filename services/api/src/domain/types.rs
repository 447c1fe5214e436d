use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub api_key: String,
    pub api_key_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle stage of a restaurant: wish-list or visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestaurantStatus {
    #[default]
    Saved,
    Tried,
}

impl RestaurantStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Tried => "tried",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "saved" => Some(Self::Saved),
            "tried" => Some(Self::Tried),
            _ => None,
        }
    }
}

/// A restaurant owned by exactly one user.
#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: RestaurantStatus,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// At most one per restaurant.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub rating: u8,
    pub review_text: Option<String>,
    pub visited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Global tag, shared across all users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// A restaurant together with its tags and (optional) review.
#[derive(Debug, Clone)]
pub struct RestaurantView {
    pub restaurant: Restaurant,
    pub tags: Vec<Tag>,
    pub review: Option<Review>,
}

/// Single-use password reset token.
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Unused and not yet past its expiry.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at >= now
    }
}

/// Conjunctive restaurant list filters. `None` / empty imposes no constraint.
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilters {
    pub status: Option<RestaurantStatus>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub price_range: Option<u8>,
    /// Matches name or notes.
    pub q: Option<String>,
    /// Union: any one of these tags is enough.
    pub tag_ids: Vec<Uuid>,
    pub is_favorite: Option<bool>,
}

/// Partial restaurant update. Outer `None` = leave untouched; for nullable
/// columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub area: Option<Option<String>>,
    pub website_url: Option<Option<String>>,
    pub google_maps_url: Option<Option<String>>,
    pub google_place_id: Option<Option<String>>,
    pub photo_url: Option<Option<String>>,
    pub price_range: Option<Option<u8>>,
    pub notes: Option<Option<String>>,
}

impl RestaurantPatch {
    /// Apply present fields onto `restaurant`. Does not touch `updated_at`.
    pub fn apply(&self, restaurant: &mut Restaurant) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        set(&mut restaurant.name, &self.name);
        set(&mut restaurant.country, &self.country);
        set(&mut restaurant.city, &self.city);
        set(&mut restaurant.area, &self.area);
        set(&mut restaurant.website_url, &self.website_url);
        set(&mut restaurant.google_maps_url, &self.google_maps_url);
        set(&mut restaurant.google_place_id, &self.google_place_id);
        set(&mut restaurant.photo_url, &self.photo_url);
        set(&mut restaurant.price_range, &self.price_range);
        set(&mut restaurant.notes, &self.notes);
    }
}

/// Review fields supplied when marking a restaurant tried.
#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub rating: u8,
    pub review_text: Option<String>,
    pub visited_at: Option<DateTime<Utc>>,
}

/// Autocomplete prediction from the place lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceSearchResult {
    pub place_id: String,
    pub description: String,
    pub main_text: String,
    pub secondary_text: String,
}

/// Place details normalized into restaurant seed fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaceDetails {
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

/// Reset tokens expire this many seconds after issuance.
pub const RESET_TOKEN_TTL_SECS: i64 = 3600;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

pub const MIN_PRICE_RANGE: i32 = 1;
pub const MAX_PRICE_RANGE: i32 = 4;

/// Minimum length of a place search query, in characters.
pub const PLACES_MIN_QUERY_LEN: usize = 2;

/// Loose shape check: one `@`, non-empty local part, dotted domain, no whitespace.
pub fn validate_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Usernames: alphanumeric + hyphen + underscore + dot, 1-32 chars.
pub fn validate_username(username: &str) -> bool {
    if username.is_empty() || username.len() > 32 {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

pub fn validate_rating(rating: i32) -> Option<u8> {
    (MIN_RATING..=MAX_RATING)
        .contains(&rating)
        .then_some(rating as u8)
}

pub fn validate_price_range(price_range: i32) -> Option<u8> {
    (MIN_PRICE_RANGE..=MAX_PRICE_RANGE)
        .contains(&price_range)
        .then_some(price_range as u8)
}

/// Group tags by category. Input order is preserved inside each group.
pub fn group_by_category(tags: Vec<Tag>) -> BTreeMap<String, Vec<Tag>> {
    let mut grouped: BTreeMap<String, Vec<Tag>> = BTreeMap::new();
    for tag in tags {
        grouped.entry(tag.category.clone()).or_default().push(tag);
    }
    grouped
}
