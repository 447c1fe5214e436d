use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::TagRepository;
use crate::domain::types::{Tag, group_by_category};
use crate::error::CrumbsError;

// ── CreateTag ────────────────────────────────────────────────────────────────

pub struct CreateTagInput {
    pub name: String,
    pub category: String,
}

pub struct CreateTagUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> CreateTagUseCase<T> {
    pub async fn execute(&self, input: CreateTagInput) -> Result<Tag, CrumbsError> {
        let name = input.name.trim();
        let category = input.category.trim();
        if name.is_empty() || category.is_empty() {
            return Err(CrumbsError::InvalidTag);
        }
        if self.tags.find_by_name(name).await?.is_some() {
            return Err(CrumbsError::TagAlreadyExists);
        }

        let tag = Tag {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            category: category.to_owned(),
            created_at: Utc::now(),
        };
        self.tags.create(&tag).await?;
        Ok(tag)
    }
}

// ── ListTags ─────────────────────────────────────────────────────────────────

pub struct ListTagsUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> ListTagsUseCase<T> {
    pub async fn execute(&self) -> Result<Vec<Tag>, CrumbsError> {
        self.tags.list_all().await
    }
}

// ── GetConfigOptions ─────────────────────────────────────────────────────────

pub struct GetConfigOptionsUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> GetConfigOptionsUseCase<T> {
    /// Tags grouped by category, categories ascending.
    pub async fn execute(&self) -> Result<BTreeMap<String, Vec<Tag>>, CrumbsError> {
        Ok(group_by_category(self.tags.list_all().await?))
    }
}
