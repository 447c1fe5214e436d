pub mod auth;
pub mod credential;
pub mod password_reset;
pub mod places;
pub mod restaurant;
pub mod review;
pub mod tag;
