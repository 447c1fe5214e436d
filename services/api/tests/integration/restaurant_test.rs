use uuid::Uuid;

use crumbs_api::domain::types::{RestaurantFilters, RestaurantStatus};
use crumbs_api::error::CrumbsError;
use crumbs_api::usecase::restaurant::{
    CreateRestaurantInput, CreateRestaurantUseCase, DeleteRestaurantUseCase,
    GetRestaurantUseCase, ListRestaurantsUseCase, ToggleFavoriteUseCase, UpdateRestaurantInput,
    UpdateRestaurantUseCase,
};
use crumbs_api::usecase::review::{MarkTriedInput, MarkTriedUseCase};

use crate::helpers::{
    MockRestaurantRepo, MockReviewRepo, MockStore, MockTagRepo, test_restaurant, test_tag,
};

fn luigis(tag_ids: Vec<Uuid>) -> CreateRestaurantInput {
    CreateRestaurantInput {
        name: "Luigi's".to_owned(),
        country: "IT".to_owned(),
        city: "Rome".to_owned(),
        tag_ids,
        ..Default::default()
    }
}

fn list_uc(store: &MockStore) -> ListRestaurantsUseCase<MockRestaurantRepo, MockReviewRepo> {
    ListRestaurantsUseCase {
        restaurants: store.restaurants(),
        reviews: store.reviews(),
    }
}

fn update_uc(
    store: &MockStore,
) -> UpdateRestaurantUseCase<MockRestaurantRepo, MockReviewRepo, MockTagRepo> {
    UpdateRestaurantUseCase {
        restaurants: store.restaurants(),
        reviews: store.reviews(),
        tags: store.tag_repo(),
    }
}

#[tokio::test]
async fn should_create_saved_restaurant_without_tags() {
    let store = MockStore::default();
    let user_id = Uuid::now_v7();
    let uc = CreateRestaurantUseCase {
        restaurants: store.restaurants(),
        tags: store.tag_repo(),
    };

    let view = uc.execute(user_id, luigis(vec![])).await.unwrap();
    assert_eq!(view.restaurant.status, RestaurantStatus::Saved);
    assert_eq!(view.restaurant.user_id, user_id);
    assert!(!view.restaurant.is_favorite);
    assert!(view.tags.is_empty());
    assert!(view.review.is_none());
    assert_eq!(store.restaurants.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_create_with_deduplicated_tags() {
    let italian = test_tag("italian", "cuisine");
    let cozy = test_tag("cozy", "mood");
    let store = MockStore::with_tags(vec![italian.clone(), cozy.clone()]);
    let uc = CreateRestaurantUseCase {
        restaurants: store.restaurants(),
        tags: store.tag_repo(),
    };

    let view = uc
        .execute(Uuid::now_v7(), luigis(vec![italian.id, cozy.id, italian.id]))
        .await
        .unwrap();
    let names: Vec<_> = view.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["cozy", "italian"]);
    assert_eq!(store.link_count(view.restaurant.id), 2);
}

#[tokio::test]
async fn should_reject_invalid_create_input() {
    let store = MockStore::default();
    let uc = CreateRestaurantUseCase {
        restaurants: store.restaurants(),
        tags: store.tag_repo(),
    };
    let user_id = Uuid::now_v7();

    let blank_name = uc
        .execute(
            user_id,
            CreateRestaurantInput {
                name: "   ".to_owned(),
                ..luigis(vec![])
            },
        )
        .await;
    assert!(matches!(blank_name, Err(CrumbsError::MissingData)));

    let bad_price = uc
        .execute(
            user_id,
            CreateRestaurantInput {
                price_range: Some(5),
                ..luigis(vec![])
            },
        )
        .await;
    assert!(matches!(bad_price, Err(CrumbsError::InvalidPriceRange)));

    let unknown_tag = uc.execute(user_id, luigis(vec![Uuid::now_v7()])).await;
    assert!(matches!(unknown_tag, Err(CrumbsError::UnknownTag)));

    assert!(store.restaurants.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_search_name_or_notes_case_insensitively_newest_first() {
    let store = MockStore::default();
    let me = Uuid::now_v7();
    let other = Uuid::now_v7();

    let old_pizza = test_restaurant(me, "Pizza Place", 300);
    let mut noted = test_restaurant(me, "Trattoria", 100);
    noted.notes = Some("best PIZZA in town".to_owned());
    let sushi = test_restaurant(me, "Sushi Bar", 50);
    let foreign_pizza = test_restaurant(other, "Pizzeria", 10);
    for r in [&old_pizza, &noted, &sushi, &foreign_pizza] {
        store.insert_restaurant(r.clone());
    }

    let views = list_uc(&store)
        .execute(
            me,
            RestaurantFilters {
                q: Some("pizza".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let ids: Vec<_> = views.iter().map(|v| v.restaurant.id).collect();
    assert_eq!(ids, vec![noted.id, old_pizza.id]);
}

#[tokio::test]
async fn should_treat_tag_filter_as_union() {
    let t1 = test_tag("italian", "cuisine");
    let t2 = test_tag("cozy", "mood");
    let t3 = test_tag("loud", "mood");
    let store = MockStore::with_tags(vec![t1.clone(), t2.clone(), t3.clone()]);
    let me = Uuid::now_v7();
    let create = CreateRestaurantUseCase {
        restaurants: store.restaurants(),
        tags: store.tag_repo(),
    };

    let a = create.execute(me, luigis(vec![t1.id])).await.unwrap();
    let b = create
        .execute(
            me,
            CreateRestaurantInput {
                name: "Bar B".to_owned(),
                ..luigis(vec![t2.id])
            },
        )
        .await
        .unwrap();
    let c = create
        .execute(
            me,
            CreateRestaurantInput {
                name: "Club C".to_owned(),
                ..luigis(vec![t3.id])
            },
        )
        .await
        .unwrap();

    let views = list_uc(&store)
        .execute(
            me,
            RestaurantFilters {
                tag_ids: vec![t1.id, t2.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let mut ids: Vec<_> = views.iter().map(|v| v.restaurant.id).collect();
    ids.sort();
    let mut expected = vec![a.restaurant.id, b.restaurant.id];
    expected.sort();
    assert_eq!(ids, expected);
    assert!(!ids.contains(&c.restaurant.id));
}

#[tokio::test]
async fn should_hide_other_users_restaurants_like_missing_ones() {
    let store = MockStore::default();
    let owner = Uuid::now_v7();
    let intruder = Uuid::now_v7();
    let r = test_restaurant(owner, "Luigi's", 0);
    store.insert_restaurant(r.clone());

    let get = GetRestaurantUseCase {
        restaurants: store.restaurants(),
        reviews: store.reviews(),
    };
    let foreign = get.execute(intruder, r.id).await;
    let missing = get.execute(owner, Uuid::now_v7()).await;
    assert!(matches!(foreign, Err(CrumbsError::RestaurantNotFound)));
    assert!(matches!(missing, Err(CrumbsError::RestaurantNotFound)));

    let update = update_uc(&store)
        .execute(
            intruder,
            r.id,
            UpdateRestaurantInput {
                name: Some("Mine now".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(CrumbsError::RestaurantNotFound)));

    let delete = DeleteRestaurantUseCase {
        restaurants: store.restaurants(),
    };
    assert!(matches!(
        delete.execute(intruder, r.id).await,
        Err(CrumbsError::RestaurantNotFound)
    ));
    assert_eq!(store.restaurants.lock().unwrap()[0].name, "Luigi's");
}

#[tokio::test]
async fn should_patch_only_present_fields_and_clear_explicit_nulls() {
    let store = MockStore::default();
    let me = Uuid::now_v7();
    let mut r = test_restaurant(me, "Luigi's", 60);
    r.notes = Some("cash only".to_owned());
    r.price_range = Some(2);
    r.area = Some("Trastevere".to_owned());
    store.insert_restaurant(r.clone());

    let view = update_uc(&store)
        .execute(
            me,
            r.id,
            UpdateRestaurantInput {
                name: Some("Luigi's Trattoria".to_owned()),
                notes: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(view.restaurant.name, "Luigi's Trattoria");
    assert_eq!(view.restaurant.notes, None);
    assert_eq!(view.restaurant.price_range, Some(2));
    assert_eq!(view.restaurant.area.as_deref(), Some("Trastevere"));
    assert!(view.restaurant.updated_at > r.updated_at);
}

#[tokio::test]
async fn should_replace_tags_only_when_present() {
    let t1 = test_tag("italian", "cuisine");
    let t2 = test_tag("cozy", "mood");
    let store = MockStore::with_tags(vec![t1.clone(), t2.clone()]);
    let me = Uuid::now_v7();
    let created = CreateRestaurantUseCase {
        restaurants: store.restaurants(),
        tags: store.tag_repo(),
    }
    .execute(me, luigis(vec![t1.id]))
    .await
    .unwrap();
    let id = created.restaurant.id;

    // Absent: untouched.
    let view = update_uc(&store)
        .execute(
            me,
            id,
            UpdateRestaurantInput {
                city: Some("Milan".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(view.tags.len(), 1);

    // Present: full replacement.
    let view = update_uc(&store)
        .execute(
            me,
            id,
            UpdateRestaurantInput {
                tag_ids: Some(vec![t2.id]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(view.tags, vec![t2.clone()]);

    // Present and empty: cleared.
    let view = update_uc(&store)
        .execute(
            me,
            id,
            UpdateRestaurantInput {
                tag_ids: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(view.tags.is_empty());
    assert_eq!(store.link_count(id), 0);
}

#[tokio::test]
async fn should_reject_invalid_patch_values() {
    let store = MockStore::default();
    let me = Uuid::now_v7();
    let r = test_restaurant(me, "Luigi's", 0);
    store.insert_restaurant(r.clone());

    let blank_city = update_uc(&store)
        .execute(
            me,
            r.id,
            UpdateRestaurantInput {
                city: Some(" ".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(blank_city, Err(CrumbsError::MissingData)));

    let bad_price = update_uc(&store)
        .execute(
            me,
            r.id,
            UpdateRestaurantInput {
                price_range: Some(Some(0)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(bad_price, Err(CrumbsError::InvalidPriceRange)));

    let unknown_tag = update_uc(&store)
        .execute(
            me,
            r.id,
            UpdateRestaurantInput {
                tag_ids: Some(vec![Uuid::now_v7()]),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(unknown_tag, Err(CrumbsError::UnknownTag)));
}

#[tokio::test]
async fn should_delete_with_cascade_then_report_not_found() {
    let t1 = test_tag("italian", "cuisine");
    let store = MockStore::with_tags(vec![t1.clone()]);
    let me = Uuid::now_v7();
    let created = CreateRestaurantUseCase {
        restaurants: store.restaurants(),
        tags: store.tag_repo(),
    }
    .execute(me, luigis(vec![t1.id]))
    .await
    .unwrap();
    let id = created.restaurant.id;

    MarkTriedUseCase {
        restaurants: store.restaurants(),
        reviews: store.reviews(),
    }
    .execute(
        me,
        id,
        MarkTriedInput {
            rating: 4,
            review_text: None,
            visited_at: None,
        },
    )
    .await
    .unwrap();

    let delete = DeleteRestaurantUseCase {
        restaurants: store.restaurants(),
    };
    delete.execute(me, id).await.unwrap();
    assert_eq!(store.review_count(id), 0);
    assert_eq!(store.link_count(id), 0);
    // Tags themselves are global and survive.
    assert_eq!(store.tags.lock().unwrap().len(), 1);

    let get = GetRestaurantUseCase {
        restaurants: store.restaurants(),
        reviews: store.reviews(),
    };
    assert!(matches!(
        get.execute(me, id).await,
        Err(CrumbsError::RestaurantNotFound)
    ));
    assert!(matches!(
        delete.execute(me, id).await,
        Err(CrumbsError::RestaurantNotFound)
    ));
}

#[tokio::test]
async fn should_toggle_favorite_and_filter_by_it() {
    let store = MockStore::default();
    let me = Uuid::now_v7();
    let a = test_restaurant(me, "A", 20);
    let b = test_restaurant(me, "B", 10);
    store.insert_restaurant(a.clone());
    store.insert_restaurant(b.clone());

    let toggle = ToggleFavoriteUseCase {
        restaurants: store.restaurants(),
        reviews: store.reviews(),
    };
    assert!(toggle.execute(me, a.id).await.unwrap().restaurant.is_favorite);

    let favorites = list_uc(&store)
        .execute(
            me,
            RestaurantFilters {
                is_favorite: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].restaurant.id, a.id);

    assert!(!toggle.execute(me, a.id).await.unwrap().restaurant.is_favorite);
    assert!(matches!(
        toggle.execute(Uuid::now_v7(), a.id).await,
        Err(CrumbsError::RestaurantNotFound)
    ));
}
