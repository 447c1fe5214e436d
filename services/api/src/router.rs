use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crumbs_core::health::{healthz, readyz};
use crumbs_core::middleware::{cors_layer, request_id_layer};

use crate::handlers::{
    auth::{forgot_password, login, me, register, reset_password},
    places::{get_place_details, search_places},
    restaurant::{
        create_restaurant, delete_restaurant, get_restaurant, list_restaurants, toggle_favorite,
        update_restaurant,
    },
    review::{mark_saved, mark_tried},
    tag::{create_tag, get_config_options, list_tags},
};
use crate::state::AppState;

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        // Places
        .route("/places/search", get(search_places))
        .route("/places/details/{place_id}", get(get_place_details))
        // Restaurants
        .route("/restaurants", post(create_restaurant).get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant)
                .patch(update_restaurant)
                .delete(delete_restaurant),
        )
        .route("/restaurants/{id}/mark-tried", post(mark_tried))
        .route("/restaurants/{id}/mark-saved", post(mark_saved))
        .route("/restaurants/{id}/toggle-favorite", post(toggle_favorite))
        // Tags
        .route("/tags", post(create_tag).get(list_tags))
        .route("/config/options", get(get_config_options))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}
