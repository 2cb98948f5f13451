//! JSON REST API for the Cookbook recipe catalog.
//!
//! Exposes axum [`Router`]s backed by any [`RecipeStore`]. CORS, static
//! assets and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cookbook_api::api_router(store.clone()))
//! ```

pub mod admin;
pub mod domains;
pub mod error;
pub mod extract;
pub mod recipes;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use cookbook_core::store::RecipeStore;

pub use error::ApiError;

/// Build the catalog API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecipeStore + 'static,
{
  Router::new()
    // Domains
    .route("/domains", get(domains::list::<S>).post(domains::create::<S>))
    // Recipes
    .route("/recipes", get(recipes::list::<S>).post(recipes::create::<S>))
    .route("/recipes/{id}", put(recipes::update::<S>))
    .route("/recipes/{id}/notes", post(recipes::create_note::<S>))
    .with_state(store)
}

/// Administrative routes. Unauthenticated, so only merge these into
/// deployments that are trusted end to end.
pub fn admin_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecipeStore + 'static,
{
  Router::new()
    .route("/admin/seed", get(admin::seed::<S>))
    .with_state(store)
}
