pub mod auth;
pub mod places;
pub mod restaurant;
pub mod review;
pub mod tag;
