//! The `RecipeStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `cookbook-store-sqlite`). Higher layers (`cookbook-api`,
//! `cookbook-server`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  domain::{Domain, NewDomain},
  recipe::{NewNote, NewRecipe, Note, Recipe, RecipeUpdate},
  seed::SeedOutcome,
};

/// Abstraction over a recipe catalog backend.
///
/// Every mutation is committed before its future resolves; a read issued
/// afterwards observes it. Nothing is ever deleted.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecipeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Domains ───────────────────────────────────────────────────────────

  /// All domains in insertion order, each with its systems and its recipes
  /// (each recipe with its notes).
  fn list_domains(
    &self,
  ) -> impl Future<Output = Result<Vec<Domain>, Self::Error>> + Send + '_;

  /// Insert a domain and one system row per entry in `input.systems`.
  /// Returns the domain with its new systems and no recipes.
  fn create_domain(
    &self,
    input: NewDomain,
  ) -> impl Future<Output = Result<Domain, Self::Error>> + Send + '_;

  // ── Recipes ───────────────────────────────────────────────────────────

  /// Recipes in insertion order, skipping `skip` and returning at most
  /// `limit`. An out-of-range `skip` yields an empty list.
  fn list_recipes(
    &self,
    skip: u32,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<Recipe>, Self::Error>> + Send + '_;

  /// Retrieve a recipe (with notes) by id. Returns `None` if not found.
  fn get_recipe(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Recipe>, Self::Error>> + Send + '_;

  /// Insert a recipe. `created_at` is set by the store.
  fn create_recipe(
    &self,
    input: NewRecipe,
  ) -> impl Future<Output = Result<Recipe, Self::Error>> + Send + '_;

  /// Apply a partial update. Returns `None` (and writes nothing) if no
  /// recipe has this id.
  fn update_recipe(
    &self,
    id: i64,
    update: RecipeUpdate,
  ) -> impl Future<Output = Result<Option<Recipe>, Self::Error>> + Send + '_;

  // ── Notes ─────────────────────────────────────────────────────────────

  /// Attach a note to `recipe_id`. The recipe's existence is not checked.
  fn create_note(
    &self,
    recipe_id: i64,
    input: NewNote,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;

  // ── Bootstrap ─────────────────────────────────────────────────────────

  /// Populate the sample data set unless any domain already exists.
  fn seed(
    &self,
  ) -> impl Future<Output = Result<SeedOutcome, Self::Error>> + Send + '_;
}
