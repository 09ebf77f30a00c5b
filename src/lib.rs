//! Glace blog - content service layer
//!
//! Articles, tags, catalogues and comments over SQLite or MySQL, with input
//! validation and a stable error vocabulary. No transport is served; callers
//! embed [`services::ContentServices`].

pub mod config;
pub mod db;
pub mod models;
pub mod services;
