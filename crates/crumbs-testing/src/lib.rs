//! Test utilities for the Crumbs service.
//!
//! Dev-dependency only.

pub mod auth;
