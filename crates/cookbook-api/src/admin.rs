//! `GET /admin/seed`: on-demand sample data bootstrap.
//!
//! Only mounted when the server enables it; see [`crate::admin_router`].

use std::sync::Arc;

use axum::{Json, extract::State};
use cookbook_core::{seed::SeedOutcome, store::RecipeStore};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct SeedResponse {
  pub message: String,
  pub outcome: SeedOutcome,
}

/// `GET /admin/seed`: a no-op (still 200) if any domain already exists.
pub async fn seed<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<SeedResponse>, ApiError>
where
  S: RecipeStore,
{
  let outcome = store.seed().await.map_err(ApiError::store)?;
  Ok(Json(SeedResponse { message: outcome.to_string(), outcome }))
}
