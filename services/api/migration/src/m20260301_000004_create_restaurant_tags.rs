use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RestaurantTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RestaurantTags::RestaurantId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RestaurantTags::TagId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(RestaurantTags::RestaurantId)
                            .col(RestaurantTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RestaurantTags::Table, RestaurantTags::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RestaurantTags::Table, RestaurantTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Tag filter looks rows up by tag_id; the PK only covers restaurant_id-first scans.
        manager
            .create_index(
                Index::create()
                    .table(RestaurantTags::Table)
                    .col(RestaurantTags::TagId)
                    .name("idx_restaurant_tags_tag_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RestaurantTags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RestaurantTags {
    Table,
    RestaurantId,
    TagId,
}

#[derive(Iden)]
enum Restaurants {
    Table,
    Id,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
}
