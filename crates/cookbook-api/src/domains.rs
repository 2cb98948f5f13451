//! Handlers for `/domains` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/domains` | Every domain with nested systems, recipes and notes |
//! | `POST` | `/domains` | Body: [`CreateDomainBody`]; returns 201 + created domain |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use cookbook_core::{
  domain::{Domain, NewDomain},
  store::RecipeStore,
};
use serde::Deserialize;

use crate::{error::ApiError, extract::ApiJson};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /domains`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Domain>>, ApiError>
where
  S: RecipeStore,
{
  let domains = store.list_domains().await.map_err(ApiError::store)?;
  Ok(Json(domains))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// One entry of [`CreateDomainBody::systems`].
#[derive(Debug, Deserialize)]
pub struct SystemBody {
  pub system_name: String,
}

/// JSON body accepted by `POST /domains`.
#[derive(Debug, Deserialize)]
pub struct CreateDomainBody {
  pub name:        String,
  pub description: String,
  #[serde(default)]
  pub systems:     Vec<SystemBody>,
}

impl From<CreateDomainBody> for NewDomain {
  fn from(b: CreateDomainBody) -> Self {
    NewDomain {
      name:        b.name,
      description: b.description,
      systems:     b.systems.into_iter().map(|s| s.system_name).collect(),
    }
  }
}

/// `POST /domains`: returns 201 + the stored [`Domain`] with its systems.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<CreateDomainBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecipeStore,
{
  let domain = store
    .create_domain(NewDomain::from(body))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(domain)))
}
