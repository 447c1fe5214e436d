use std::collections::BTreeMap;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Tag;
use crate::error::CrumbsError;
use crate::identity::CurrentUser;
use crate::state::AppState;
use crate::usecase::tag::{
    CreateTagInput, CreateTagUseCase, GetConfigOptionsUseCase, ListTagsUseCase,
};

#[derive(Serialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(serialize_with = "crumbs_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Tag> for TagResponse {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
            category: t.category,
            created_at: t.created_at,
        }
    }
}

// ── POST /tags ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub category: String,
}

pub async fn create_tag(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<CreateTagRequest>,
) -> Result<impl IntoResponse, CrumbsError> {
    let usecase = CreateTagUseCase {
        tags: state.tag_repo(),
    };
    let tag = usecase
        .execute(CreateTagInput {
            name: body.name,
            category: body.category,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(TagResponse::from(tag))))
}

// ── GET /tags ────────────────────────────────────────────────────────────────

pub async fn list_tags(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<TagResponse>>, CrumbsError> {
    let usecase = ListTagsUseCase {
        tags: state.tag_repo(),
    };
    let tags = usecase.execute().await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

// ── GET /config/options ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ConfigOptionsResponse {
    pub options: BTreeMap<String, Vec<TagResponse>>,
}

pub async fn get_config_options(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ConfigOptionsResponse>, CrumbsError> {
    let usecase = GetConfigOptionsUseCase {
        tags: state.tag_repo(),
    };
    let grouped = usecase.execute().await?;
    let options = grouped
        .into_iter()
        .map(|(category, tags)| (category, tags.into_iter().map(Into::into).collect()))
        .collect();
    Ok(Json(ConfigOptionsResponse { options }))
}
