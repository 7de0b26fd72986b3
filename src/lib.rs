//! Core library for the Academy Showcase web application.
//!
//! The `data` feature exposes the reusable persistence/domain layer
//! (`domain`, `models`, `schema`, `repository`); the `server` feature builds
//! the full Actix-web application (HTTP routes, services, templates) on top
//! of it.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Role granting moderation rights: promotion, curriculum editing and
/// removal of other users' records.
pub const ADMIN_ROLE: &str = "admin";
