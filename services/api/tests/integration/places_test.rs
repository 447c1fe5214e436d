use crumbs_api::domain::types::PlaceSearchResult;
use crumbs_api::error::CrumbsError;
use crumbs_api::usecase::places::{GetPlaceDetailsUseCase, SearchPlacesUseCase};

use crate::helpers::MockPlaces;

#[tokio::test]
async fn should_reject_short_query_without_calling_upstream() {
    let places = MockPlaces::default();
    let queries = places.queries.clone();
    let uc = SearchPlacesUseCase { places };

    for q in ["", "a", "  b  "] {
        let result = uc.execute(q).await;
        assert!(
            matches!(result, Err(CrumbsError::InvalidQuery)),
            "{q:?}: expected InvalidQuery, got {result:?}"
        );
    }
    assert!(queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forward_trimmed_query() {
    let places = MockPlaces {
        results: vec![PlaceSearchResult {
            place_id: "abc".to_owned(),
            description: "Luigi's, Rome".to_owned(),
            main_text: "Luigi's".to_owned(),
            secondary_text: "Rome".to_owned(),
        }],
        ..Default::default()
    };
    let queries = places.queries.clone();
    let uc = SearchPlacesUseCase { places };

    let results = uc.execute(" luigi ").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(queries.lock().unwrap().as_slice(), ["luigi".to_owned()]);
}

#[tokio::test]
async fn should_return_details_for_place() {
    let uc = GetPlaceDetailsUseCase {
        places: MockPlaces::default(),
    };
    let details = uc.execute("abc").await.unwrap();
    assert_eq!(details.place_id, "abc");
}
