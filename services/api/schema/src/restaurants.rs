use sea_orm::entity::prelude::*;

/// A restaurant saved or tried by exactly one user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// `"saved"` or `"tried"`.
    pub status: String,
    pub is_favorite: bool,
    pub name: String,
    pub country: String,
    pub city: String,
    pub area: Option<String>,
    pub website_url: Option<String>,
    pub google_maps_url: Option<String>,
    pub google_place_id: Option<String>,
    pub photo_url: Option<String>,
    /// 1–4.
    pub price_range: Option<i16>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_one = "super::reviews::Entity")]
    Review,
    #[sea_orm(has_many = "super::restaurant_tags::Entity")]
    RestaurantTags,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl Related<super::restaurant_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RestaurantTags.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::restaurant_tags::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::restaurant_tags::Relation::Restaurant.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
