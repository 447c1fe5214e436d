use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reviews::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Reviews::RestaurantId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Reviews::Rating).small_integer().not_null())
                    .col(ColumnDef::new(Reviews::ReviewText).text())
                    .col(ColumnDef::new(Reviews::VisitedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Reviews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Reviews::Rating).between(1, 5))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reviews::Table, Reviews::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reviews {
    Table,
    Id,
    RestaurantId,
    Rating,
    ReviewText,
    VisitedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Restaurants {
    Table,
    Id,
}
