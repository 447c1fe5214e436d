use sea_orm::entity::prelude::*;

/// Global tag vocabulary shared by every user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    /// Free-text grouping label, e.g. "cuisine" or "mood".
    pub category: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::restaurant_tags::Entity")]
    RestaurantTags,
}

impl Related<super::restaurant_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RestaurantTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
