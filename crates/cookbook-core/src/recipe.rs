//! Recipes (stored SQL queries) and the notes attached to them.
//!
//! `sql_content` is opaque text: it is stored and returned verbatim and
//! never parsed or executed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ─── Note ────────────────────────────────────────────────────────────────────

/// A timestamped annotation on a recipe. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub id:          i64,
  pub recipe_id:   i64,
  pub author_name: String,
  /// "caution" or "memo" by convention; stored verbatim, never validated.
  pub note_type:   String,
  pub content:     String,
  /// Server-assigned timestamp.
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::RecipeStore::create_note`].
#[derive(Debug, Clone)]
pub struct NewNote {
  pub author_name: String,
  pub note_type:   String,
  pub content:     String,
}

// ─── Recipe ──────────────────────────────────────────────────────────────────

/// A titled SQL query belonging to one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
  pub id:          i64,
  pub domain_id:   i64,
  pub title:       String,
  pub sql_content: String,
  pub summary:     String,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:  DateTime<Utc>,
  /// Notes in insertion order.
  pub notes:       Vec<Note>,
}

/// Input to [`crate::store::RecipeStore::create_recipe`].
/// `created_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewRecipe {
  pub domain_id:   i64,
  pub title:       String,
  pub sql_content: String,
  pub summary:     String,
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// A partial update to a recipe's mutable fields.
///
/// Each field distinguishes three states:
///
/// - `None`: the key was absent from the request,
/// - `Some(None)`: the key was present with an explicit `null`,
/// - `Some(Some(v))`: the key carried a value.
///
/// Only `Some(Some(v))` overwrites the stored column; the other two leave it
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecipeUpdate {
  #[serde(default, deserialize_with = "present")]
  pub title:       Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub sql_content: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub summary:     Option<Option<String>>,
}

impl RecipeUpdate {
  pub fn title(&self) -> Option<&str> { self.title.as_ref()?.as_deref() }

  pub fn sql_content(&self) -> Option<&str> {
    self.sql_content.as_ref()?.as_deref()
  }

  pub fn summary(&self) -> Option<&str> { self.summary.as_ref()?.as_deref() }

  /// `true` if applying this update would leave every column unchanged.
  pub fn is_noop(&self) -> bool {
    self.title().is_none()
      && self.sql_content().is_none()
      && self.summary().is_none()
  }
}

/// Runs only when the key is present, so a `null` becomes `Some(None)`
/// instead of collapsing into the absent case.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}
