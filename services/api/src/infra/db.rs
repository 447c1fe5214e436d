use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, Insert, PaginatorTrait, QueryFilter, QueryOrder,
    Select, SqlErr, TransactionTrait,
    sea_query::{Expr, OnConflict, Query},
};
use uuid::Uuid;

use crumbs_core::sea_ext::contains_ci;
use crumbs_schema::{password_reset_tokens, restaurant_tags, restaurants, reviews, tags, users};

use crate::domain::repository::{
    PasswordResetTokenRepository, RestaurantRepository, ReviewRepository, TagRepository,
    UserRepository,
};
use crate::domain::types::{
    PasswordResetToken, Restaurant, RestaurantFilters, RestaurantPatch, RestaurantStatus, Review,
    ReviewInput, Tag, User,
};
use crate::error::CrumbsError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CrumbsError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_api_key_hash(
        &self,
        api_key_hash: &str,
    ) -> Result<Option<User>, CrumbsError> {
        let model = users::Entity::find()
            .filter(users::Column::ApiKeyHash.eq(api_key_hash))
            .one(&self.db)
            .await
            .context("find user by api key hash")?;
        Ok(model.map(user_from_model))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, CrumbsError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await
            .context("count users by email")?;
        Ok(count > 0)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, CrumbsError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("count users by username")?;
        Ok(count > 0)
    }

    async fn create(&self, user: &User) -> Result<(), CrumbsError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            api_key: Set(user.api_key.clone()),
            api_key_hash: Set(user.api_key_hash.clone()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                // Lost a race with a concurrent registration.
                if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
                    if let Some(conflict) = user_conflict(&detail) {
                        return Err(conflict);
                    }
                }
                Err(anyhow::Error::new(e).context("create user").into())
            }
        }
    }
}

// Postgres default names for the column-level unique constraints on `users`.
const USERS_EMAIL_KEY: &str = "users_email_key";
const USERS_USERNAME_KEY: &str = "users_username_key";

/// Map a `users` unique violation to its conflict. Email wins over username.
fn user_conflict(detail: &str) -> Option<CrumbsError> {
    if detail.contains(USERS_EMAIL_KEY) {
        Some(CrumbsError::EmailAlreadyRegistered)
    } else if detail.contains(USERS_USERNAME_KEY) {
        Some(CrumbsError::UsernameAlreadyTaken)
    } else {
        None
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        password_hash: model.password_hash,
        api_key: model.api_key,
        api_key_hash: model.api_key_hash,
        created_at: model.created_at,
    }
}

// ── Password reset token repository ──────────────────────────────────────────

#[derive(Clone)]
pub struct DbPasswordResetTokenRepository {
    pub db: DatabaseConnection,
}

impl PasswordResetTokenRepository for DbPasswordResetTokenRepository {
    async fn create(&self, token: &PasswordResetToken) -> Result<(), CrumbsError> {
        password_reset_tokens::ActiveModel {
            id: Set(token.id),
            user_id: Set(token.user_id),
            token: Set(token.token.clone()),
            expires_at: Set(token.expires_at),
            used: Set(token.used),
            created_at: Set(token.created_at),
        }
        .insert(&self.db)
        .await
        .context("create password reset token")?;
        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<PasswordResetToken>, CrumbsError> {
        let model = password_reset_tokens::Entity::find()
            .filter(password_reset_tokens::Column::Token.eq(token))
            .one(&self.db)
            .await
            .context("find password reset token")?;
        Ok(model.map(reset_token_from_model))
    }

    async fn consume(
        &self,
        token: &PasswordResetToken,
        password_hash: &str,
    ) -> Result<bool, CrumbsError> {
        let token_id = token.id;
        let user_id = token.user_id;
        let password_hash = password_hash.to_owned();
        let consumed = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    // Conditional flip so two concurrent resets cannot both win.
                    let marked = password_reset_tokens::Entity::update_many()
                        .col_expr(password_reset_tokens::Column::Used, Expr::value(true))
                        .filter(password_reset_tokens::Column::Id.eq(token_id))
                        .filter(password_reset_tokens::Column::Used.eq(false))
                        .exec(txn)
                        .await?;
                    if marked.rows_affected == 0 {
                        return Ok(false);
                    }
                    users::Entity::update_many()
                        .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
                        .filter(users::Column::Id.eq(user_id))
                        .exec(txn)
                        .await?;
                    Ok(true)
                })
            })
            .await
            .context("consume password reset token")?;
        Ok(consumed)
    }
}

fn reset_token_from_model(model: password_reset_tokens::Model) -> PasswordResetToken {
    PasswordResetToken {
        id: model.id,
        user_id: model.user_id,
        token: model.token,
        expires_at: model.expires_at,
        used: model.used,
        created_at: model.created_at,
    }
}

// ── Restaurant repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRestaurantRepository {
    pub db: DatabaseConnection,
}

/// Owner-scoped, filtered, newest-first restaurant query.
pub fn list_query(user_id: Uuid, filters: &RestaurantFilters) -> Select<restaurants::Entity> {
    let mut query = restaurants::Entity::find().filter(restaurants::Column::UserId.eq(user_id));

    if let Some(status) = filters.status {
        query = query.filter(restaurants::Column::Status.eq(status.as_str()));
    }
    if let Some(country) = &filters.country {
        query = query.filter(contains_ci(restaurants::Column::Country, country));
    }
    if let Some(city) = &filters.city {
        query = query.filter(contains_ci(restaurants::Column::City, city));
    }
    if let Some(price_range) = filters.price_range {
        query = query.filter(restaurants::Column::PriceRange.eq(i16::from(price_range)));
    }
    if let Some(q) = &filters.q {
        query = query.filter(
            Condition::any()
                .add(contains_ci(restaurants::Column::Name, q))
                .add(contains_ci(restaurants::Column::Notes, q)),
        );
    }
    if !filters.tag_ids.is_empty() {
        query = query.filter(
            restaurants::Column::Id.in_subquery(
                Query::select()
                    .column(restaurant_tags::Column::RestaurantId)
                    .from(restaurant_tags::Entity)
                    .and_where(restaurant_tags::Column::TagId.is_in(filters.tag_ids.iter().copied()))
                    .to_owned(),
            ),
        );
    }
    if let Some(is_favorite) = filters.is_favorite {
        query = query.filter(restaurants::Column::IsFavorite.eq(is_favorite));
    }

    query
        .order_by_desc(restaurants::Column::CreatedAt)
        .order_by_desc(restaurants::Column::Id)
}

fn find_owned(user_id: Uuid, id: Uuid) -> Select<restaurants::Entity> {
    restaurants::Entity::find_by_id(id).filter(restaurants::Column::UserId.eq(user_id))
}

impl RestaurantRepository for DbRestaurantRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filters: &RestaurantFilters,
    ) -> Result<Vec<Restaurant>, CrumbsError> {
        let models = list_query(user_id, filters)
            .all(&self.db)
            .await
            .context("list restaurants")?;
        Ok(models.into_iter().map(restaurant_from_model).collect())
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Restaurant>, CrumbsError> {
        let model = find_owned(user_id, id)
            .one(&self.db)
            .await
            .context("find restaurant")?;
        Ok(model.map(restaurant_from_model))
    }

    async fn create(&self, restaurant: &Restaurant, tag_ids: &[Uuid]) -> Result<(), CrumbsError> {
        let restaurant = restaurant.clone();
        let tag_ids = tag_ids.to_vec();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    restaurant_active_model(&restaurant).insert(txn).await?;
                    insert_restaurant_tags(txn, restaurant.id, &tag_ids).await?;
                    Ok(())
                })
            })
            .await
            .context("create restaurant with tags")?;
        Ok(())
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &RestaurantPatch,
        tag_ids: Option<&[Uuid]>,
    ) -> Result<Option<Restaurant>, CrumbsError> {
        let patch = patch.clone();
        let tag_ids = tag_ids.map(<[Uuid]>::to_vec);
        let updated = self
            .db
            .transaction::<_, Option<Restaurant>, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(model) = find_owned(user_id, id).one(txn).await? else {
                        return Ok(None);
                    };
                    let mut restaurant = restaurant_from_model(model);
                    patch.apply(&mut restaurant);
                    restaurant.updated_at = Utc::now();
                    restaurant_active_model(&restaurant).update(txn).await?;

                    if let Some(tag_ids) = tag_ids {
                        restaurant_tags::Entity::delete_many()
                            .filter(restaurant_tags::Column::RestaurantId.eq(id))
                            .exec(txn)
                            .await?;
                        insert_restaurant_tags(txn, id, &tag_ids).await?;
                    }
                    Ok(Some(restaurant))
                })
            })
            .await
            .context("update restaurant")?;
        Ok(updated)
    }

    async fn set_status(
        &self,
        user_id: Uuid,
        id: Uuid,
        status: RestaurantStatus,
    ) -> Result<Option<Restaurant>, CrumbsError> {
        let result = restaurants::Entity::update_many()
            .col_expr(restaurants::Column::Status, Expr::value(status.as_str()))
            .col_expr(restaurants::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(restaurants::Column::Id.eq(id))
            .filter(restaurants::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("set restaurant status")?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find(user_id, id).await
    }

    async fn toggle_favorite(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Restaurant>, CrumbsError> {
        let result = restaurants::Entity::update_many()
            .col_expr(
                restaurants::Column::IsFavorite,
                Expr::col(restaurants::Column::IsFavorite).not(),
            )
            .col_expr(restaurants::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(restaurants::Column::Id.eq(id))
            .filter(restaurants::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("toggle restaurant favorite")?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find(user_id, id).await
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, CrumbsError> {
        let result = restaurants::Entity::delete_many()
            .filter(restaurants::Column::Id.eq(id))
            .filter(restaurants::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete restaurant")?;
        Ok(result.rows_affected > 0)
    }

    async fn tags_for(&self, restaurant_ids: &[Uuid]) -> Result<Vec<(Uuid, Tag)>, CrumbsError> {
        if restaurant_ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = restaurant_tags::Entity::find()
            .filter(restaurant_tags::Column::RestaurantId.is_in(restaurant_ids.iter().copied()))
            .find_also_related(tags::Entity)
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .context("load restaurant tags")?;
        Ok(rows
            .into_iter()
            .filter_map(|(link, tag)| tag.map(|t| (link.restaurant_id, tag_from_model(t))))
            .collect())
    }
}

async fn insert_restaurant_tags(
    txn: &DatabaseTransaction,
    restaurant_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), DbErr> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    restaurant_tags::Entity::insert_many(tag_ids.iter().map(|tag_id| {
        restaurant_tags::ActiveModel {
            restaurant_id: Set(restaurant_id),
            tag_id: Set(*tag_id),
        }
    }))
    .exec(txn)
    .await?;
    Ok(())
}

fn restaurant_active_model(r: &Restaurant) -> restaurants::ActiveModel {
    restaurants::ActiveModel {
        id: Set(r.id),
        user_id: Set(r.user_id),
        status: Set(r.status.as_str().to_owned()),
        is_favorite: Set(r.is_favorite),
        name: Set(r.name.clone()),
        country: Set(r.country.clone()),
        city: Set(r.city.clone()),
        area: Set(r.area.clone()),
        website_url: Set(r.website_url.clone()),
        google_maps_url: Set(r.google_maps_url.clone()),
        google_place_id: Set(r.google_place_id.clone()),
        photo_url: Set(r.photo_url.clone()),
        price_range: Set(r.price_range.map(i16::from)),
        notes: Set(r.notes.clone()),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    }
}

/// The column is CHECK-constrained; anything else is logged and read as `saved`.
fn stored_status(id: Uuid, raw: &str) -> RestaurantStatus {
    RestaurantStatus::parse(raw).unwrap_or_else(|| {
        tracing::warn!(restaurant_id = %id, status = raw, "unknown stored restaurant status");
        RestaurantStatus::Saved
    })
}

fn restaurant_from_model(model: restaurants::Model) -> Restaurant {
    Restaurant {
        id: model.id,
        user_id: model.user_id,
        status: stored_status(model.id, &model.status),
        is_favorite: model.is_favorite,
        name: model.name,
        country: model.country,
        city: model.city,
        area: model.area,
        website_url: model.website_url,
        google_maps_url: model.google_maps_url,
        google_place_id: model.google_place_id,
        photo_url: model.photo_url,
        price_range: model.price_range.map(|p| p as u8),
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn list_by_restaurant_ids(
        &self,
        restaurant_ids: &[Uuid],
    ) -> Result<Vec<Review>, CrumbsError> {
        if restaurant_ids.is_empty() {
            return Ok(vec![]);
        }
        let models = reviews::Entity::find()
            .filter(reviews::Column::RestaurantId.is_in(restaurant_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("list reviews by restaurant ids")?;
        Ok(models.into_iter().map(review_from_model).collect())
    }

    async fn mark_tried(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
        input: &ReviewInput,
    ) -> Result<Option<(Restaurant, Review)>, CrumbsError> {
        let input = input.clone();
        let result = self
            .db
            .transaction::<_, Option<(Restaurant, Review)>, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(model) = find_owned(user_id, restaurant_id).one(txn).await? else {
                        return Ok(None);
                    };
                    let now = Utc::now();
                    let mut restaurant = restaurant_from_model(model);
                    restaurant.status = RestaurantStatus::Tried;
                    restaurant.updated_at = now;
                    restaurants::ActiveModel {
                        id: Set(restaurant.id),
                        status: Set(restaurant.status.as_str().to_owned()),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    let review = review_upsert(restaurant_id, input, now)
                        .exec_with_returning(txn)
                        .await?;

                    Ok(Some((restaurant, review_from_model(review))))
                })
            })
            .await
            .context("mark restaurant tried")?;
        Ok(result)
    }
}

/// Insert the review, or overwrite rating, text and visit date of the existing one.
fn review_upsert(
    restaurant_id: Uuid,
    input: ReviewInput,
    now: DateTime<Utc>,
) -> Insert<reviews::ActiveModel> {
    reviews::Entity::insert(reviews::ActiveModel {
        id: Set(Uuid::now_v7()),
        restaurant_id: Set(restaurant_id),
        rating: Set(i16::from(input.rating)),
        review_text: Set(input.review_text),
        visited_at: Set(input.visited_at),
        created_at: Set(now),
        updated_at: Set(now),
    })
    .on_conflict(
        OnConflict::column(reviews::Column::RestaurantId)
            .update_columns([
                reviews::Column::Rating,
                reviews::Column::ReviewText,
                reviews::Column::VisitedAt,
                reviews::Column::UpdatedAt,
            ])
            .to_owned(),
    )
}

fn review_from_model(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        restaurant_id: model.restaurant_id,
        rating: model.rating as u8,
        review_text: model.review_text,
        visited_at: model.visited_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list_all(&self) -> Result<Vec<Tag>, CrumbsError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Category)
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, CrumbsError> {
        let model = tags::Entity::find()
            .filter(tags::Column::Name.eq(name))
            .one(&self.db)
            .await
            .context("find tag by name")?;
        Ok(model.map(tag_from_model))
    }

    async fn count_existing(&self, ids: &[Uuid]) -> Result<u64, CrumbsError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let count = tags::Entity::find()
            .filter(tags::Column::Id.is_in(ids.iter().copied()))
            .count(&self.db)
            .await
            .context("count tags by id")?;
        Ok(count)
    }

    async fn create(&self, tag: &Tag) -> Result<(), CrumbsError> {
        let result = tags::ActiveModel {
            id: Set(tag.id),
            name: Set(tag.name.clone()),
            category: Set(tag.category.clone()),
            created_at: Set(tag.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            // Lost a race with a concurrent create of the same name.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(CrumbsError::TagAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create tag").into()),
        }
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        category: model.category,
        created_at: model.created_at,
    }
}
