//! sea-orm entities for the Crumbs database.

pub mod password_reset_tokens;
pub mod restaurant_tags;
pub mod restaurants;
pub mod reviews;
pub mod tags;
pub mod users;
