use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_tags;
mod m20260301_000003_create_restaurants;
mod m20260301_000004_create_restaurant_tags;
mod m20260301_000005_create_reviews;
mod m20260301_000006_create_password_reset_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_tags::Migration),
            Box::new(m20260301_000003_create_restaurants::Migration),
            Box::new(m20260301_000004_create_restaurant_tags::Migration),
            Box::new(m20260301_000005_create_reviews::Migration),
            Box::new(m20260301_000006_create_password_reset_tokens::Migration),
        ]
    }
}
