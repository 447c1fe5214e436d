use crumbs_api::error::CrumbsError;
use crumbs_api::usecase::tag::{
    CreateTagInput, CreateTagUseCase, GetConfigOptionsUseCase, ListTagsUseCase,
};

use crate::helpers::{MockStore, test_tag};

fn input(name: &str, category: &str) -> CreateTagInput {
    CreateTagInput {
        name: name.to_owned(),
        category: category.to_owned(),
    }
}

#[tokio::test]
async fn should_create_trimmed_tag() {
    let store = MockStore::default();
    let uc = CreateTagUseCase {
        tags: store.tag_repo(),
    };
    let tag = uc.execute(input("  italian ", " cuisine ")).await.unwrap();
    assert_eq!(tag.name, "italian");
    assert_eq!(tag.category, "cuisine");
    assert_eq!(store.tags.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_blank_name_or_category() {
    let store = MockStore::default();
    let uc = CreateTagUseCase {
        tags: store.tag_repo(),
    };
    for (name, category) in [("", "cuisine"), ("italian", "  "), (" ", " ")] {
        let result = uc.execute(input(name, category)).await;
        assert!(
            matches!(result, Err(CrumbsError::InvalidTag)),
            "expected InvalidTag, got {result:?}"
        );
    }
    assert!(store.tags.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_duplicate_name_across_categories() {
    let store = MockStore::with_tags(vec![test_tag("italian", "cuisine")]);
    let uc = CreateTagUseCase {
        tags: store.tag_repo(),
    };
    let result = uc.execute(input("italian", "mood")).await;
    assert!(matches!(result, Err(CrumbsError::TagAlreadyExists)));
    assert_eq!(store.tags.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_list_by_category_then_name() {
    let store = MockStore::with_tags(vec![
        test_tag("quiet", "mood"),
        test_tag("thai", "cuisine"),
        test_tag("cozy", "mood"),
        test_tag("italian", "cuisine"),
    ]);
    let tags = ListTagsUseCase {
        tags: store.tag_repo(),
    }
    .execute()
    .await
    .unwrap();
    let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["italian", "thai", "cozy", "quiet"]);
}

#[tokio::test]
async fn should_group_options_by_category() {
    let store = MockStore::with_tags(vec![
        test_tag("quiet", "mood"),
        test_tag("thai", "cuisine"),
        test_tag("italian", "cuisine"),
    ]);
    let options = GetConfigOptionsUseCase {
        tags: store.tag_repo(),
    }
    .execute()
    .await
    .unwrap();

    let categories: Vec<_> = options.keys().map(String::as_str).collect();
    assert_eq!(categories, vec!["cuisine", "mood"]);
    let cuisine: Vec<_> = options["cuisine"].iter().map(|t| t.name.as_str()).collect();
    assert_eq!(cuisine, vec!["italian", "thai"]);
    assert_eq!(options["mood"].len(), 1);
}
