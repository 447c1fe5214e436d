use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crumbs_api::domain::types::RestaurantStatus;
use crumbs_api::error::CrumbsError;
use crumbs_api::usecase::restaurant::{CreateRestaurantInput, CreateRestaurantUseCase};
use crumbs_api::usecase::review::{MarkSavedUseCase, MarkTriedInput, MarkTriedUseCase};

use crate::helpers::{MockRestaurantRepo, MockReviewRepo, MockStore, test_restaurant};

fn tried_uc(store: &MockStore) -> MarkTriedUseCase<MockRestaurantRepo, MockReviewRepo> {
    MarkTriedUseCase {
        restaurants: store.restaurants(),
        reviews: store.reviews(),
    }
}

fn rating(rating: i32) -> MarkTriedInput {
    MarkTriedInput {
        rating,
        review_text: None,
        visited_at: None,
    }
}

#[tokio::test]
async fn should_create_then_mark_tried_with_review() {
    let store = MockStore::default();
    let me = Uuid::now_v7();
    let created = CreateRestaurantUseCase {
        restaurants: store.restaurants(),
        tags: store.tag_repo(),
    }
    .execute(
        me,
        CreateRestaurantInput {
            name: "Luigi's".to_owned(),
            country: "IT".to_owned(),
            city: "Rome".to_owned(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(created.restaurant.status, RestaurantStatus::Saved);
    assert!(created.tags.is_empty());

    let view = tried_uc(&store)
        .execute(me, created.restaurant.id, rating(5))
        .await
        .unwrap();
    assert_eq!(view.restaurant.status, RestaurantStatus::Tried);
    assert_eq!(view.review.unwrap().rating, 5);
}

#[tokio::test]
async fn should_overwrite_single_review_when_marked_twice() {
    let store = MockStore::default();
    let me = Uuid::now_v7();
    let r = test_restaurant(me, "Luigi's", 0);
    store.insert_restaurant(r.clone());

    let first = tried_uc(&store)
        .execute(
            me,
            r.id,
            MarkTriedInput {
                rating: 3,
                review_text: Some("ok".to_owned()),
                visited_at: None,
            },
        )
        .await
        .unwrap();
    let visited = Utc.with_ymd_and_hms(2024, 5, 1, 19, 30, 0).unwrap();
    let second = tried_uc(&store)
        .execute(
            me,
            r.id,
            MarkTriedInput {
                rating: 5,
                review_text: Some("great second time".to_owned()),
                visited_at: Some(visited),
            },
        )
        .await
        .unwrap();

    let (first, second) = (first.review.unwrap(), second.review.unwrap());
    assert_eq!(first.id, second.id);
    assert_eq!(second.rating, 5);
    assert_eq!(second.review_text.as_deref(), Some("great second time"));
    assert_eq!(second.visited_at, Some(visited));
    assert_eq!(store.review_count(r.id), 1);
}

#[tokio::test]
async fn should_validate_rating_before_lookup() {
    let store = MockStore::default();
    let uc = tried_uc(&store);
    // Nonexistent restaurant: the rating error still wins.
    for bad in [0, 6, -1] {
        let result = uc.execute(Uuid::now_v7(), Uuid::now_v7(), rating(bad)).await;
        assert!(
            matches!(result, Err(CrumbsError::InvalidRating)),
            "rating {bad}: expected InvalidRating, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_not_mark_another_users_restaurant() {
    let store = MockStore::default();
    let owner = Uuid::now_v7();
    let r = test_restaurant(owner, "Luigi's", 0);
    store.insert_restaurant(r.clone());

    let result = tried_uc(&store).execute(Uuid::now_v7(), r.id, rating(4)).await;
    assert!(matches!(result, Err(CrumbsError::RestaurantNotFound)));
    assert_eq!(store.review_count(r.id), 0);
    assert_eq!(
        store.restaurants.lock().unwrap()[0].status,
        RestaurantStatus::Saved
    );

    let saved = MarkSavedUseCase {
        restaurants: store.restaurants(),
        reviews: store.reviews(),
    }
    .execute(Uuid::now_v7(), r.id)
    .await;
    assert!(matches!(saved, Err(CrumbsError::RestaurantNotFound)));
}

#[tokio::test]
async fn should_keep_review_untouched_when_marked_saved() {
    let store = MockStore::default();
    let me = Uuid::now_v7();
    let r = test_restaurant(me, "Luigi's", 0);
    store.insert_restaurant(r.clone());

    let tried = tried_uc(&store)
        .execute(
            me,
            r.id,
            MarkTriedInput {
                rating: 4,
                review_text: Some("lovely".to_owned()),
                visited_at: None,
            },
        )
        .await
        .unwrap();
    let before = tried.review.unwrap();

    let view = MarkSavedUseCase {
        restaurants: store.restaurants(),
        reviews: store.reviews(),
    }
    .execute(me, r.id)
    .await
    .unwrap();
    assert_eq!(view.restaurant.status, RestaurantStatus::Saved);
    let after = view.review.unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.rating, 4);
    assert_eq!(after.review_text.as_deref(), Some("lovely"));
    assert_eq!(after.updated_at, before.updated_at);
}
