//! Handlers for `/recipes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/recipes` | `?skip` (default 0) and `?limit` (default 100) |
//! | `POST` | `/recipes` | Body: [`CreateRecipeBody`]; returns 201 + created recipe |
//! | `PUT`  | `/recipes/:id` | Body: [`RecipeUpdate`]; 404 if unknown |
//! | `POST` | `/recipes/:id/notes` | Body: [`CreateNoteBody`]; returns 201 + created note |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use cookbook_core::{
  recipe::{NewNote, NewRecipe, Recipe, RecipeUpdate},
  store::RecipeStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
};

// ─── List ─────────────────────────────────────────────────────────────────────

const DEFAULT_LIMIT: u32 = 100;

fn default_limit() -> u32 { DEFAULT_LIMIT }

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub skip:  u32,
  #[serde(default = "default_limit")]
  pub limit: u32,
}

/// `GET /recipes[?skip=<n>][&limit=<n>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Recipe>>, ApiError>
where
  S: RecipeStore,
{
  let recipes = store
    .list_recipes(params.skip, params.limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(recipes))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /recipes`.
#[derive(Debug, Deserialize)]
pub struct CreateRecipeBody {
  pub domain_id:   i64,
  pub title:       String,
  pub sql_content: String,
  pub summary:     String,
}

impl From<CreateRecipeBody> for NewRecipe {
  fn from(b: CreateRecipeBody) -> Self {
    NewRecipe {
      domain_id:   b.domain_id,
      title:       b.title,
      sql_content: b.sql_content,
      summary:     b.summary,
    }
  }
}

/// `POST /recipes`: returns 201 + the stored [`Recipe`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<CreateRecipeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecipeStore,
{
  let recipe = store
    .create_recipe(NewRecipe::from(body))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(recipe)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /recipes/:id`: only keys present with a non-null value are applied.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
  ApiJson(body): ApiJson<RecipeUpdate>,
) -> Result<Json<Recipe>, ApiError>
where
  S: RecipeStore,
{
  let recipe = store
    .update_recipe(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Recipe not found".to_owned()))?;
  Ok(Json(recipe))
}

// ─── Notes ────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /recipes/:id/notes`.
#[derive(Debug, Deserialize)]
pub struct CreateNoteBody {
  pub author_name: String,
  /// Free-form; "caution" and "memo" are the conventional values.
  pub note_type:   String,
  pub content:     String,
}

impl From<CreateNoteBody> for NewNote {
  fn from(b: CreateNoteBody) -> Self {
    NewNote {
      author_name: b.author_name,
      note_type:   b.note_type,
      content:     b.content,
    }
  }
}

/// `POST /recipes/:id/notes`: the recipe id is not checked for existence.
pub async fn create_note<S>(
  State(store): State<Arc<S>>,
  ApiPath(recipe_id): ApiPath<i64>,
  ApiJson(body): ApiJson<CreateNoteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecipeStore,
{
  let note = store
    .create_note(recipe_id, NewNote::from(body))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(note)))
}
