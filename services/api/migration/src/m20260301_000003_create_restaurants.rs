use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurants::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Restaurants::Status)
                            .string_len(16)
                            .not_null()
                            .default("saved"),
                    )
                    .col(
                        ColumnDef::new(Restaurants::IsFavorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string().not_null())
                    .col(ColumnDef::new(Restaurants::Country).string().not_null())
                    .col(ColumnDef::new(Restaurants::City).string().not_null())
                    .col(ColumnDef::new(Restaurants::Area).string())
                    .col(ColumnDef::new(Restaurants::WebsiteUrl).string())
                    .col(ColumnDef::new(Restaurants::GoogleMapsUrl).string())
                    .col(ColumnDef::new(Restaurants::GooglePlaceId).string())
                    .col(ColumnDef::new(Restaurants::PhotoUrl).string())
                    .col(ColumnDef::new(Restaurants::PriceRange).small_integer())
                    .col(ColumnDef::new(Restaurants::Notes).text())
                    .col(
                        ColumnDef::new(Restaurants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Restaurants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(
                        Expr::col(Restaurants::PriceRange)
                            .is_null()
                            .or(Expr::col(Restaurants::PriceRange).between(1, 4)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Restaurants::Table, Restaurants::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Restaurants::Table)
                    .col(Restaurants::UserId)
                    .col(Restaurants::CreatedAt)
                    .name("idx_restaurants_user_id_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Restaurants::Table)
                    .col(Restaurants::UserId)
                    .col(Restaurants::Status)
                    .name("idx_restaurants_user_id_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Restaurants {
    Table,
    Id,
    UserId,
    Status,
    IsFavorite,
    Name,
    Country,
    City,
    Area,
    WebsiteUrl,
    GoogleMapsUrl,
    GooglePlaceId,
    PhotoUrl,
    PriceRange,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
