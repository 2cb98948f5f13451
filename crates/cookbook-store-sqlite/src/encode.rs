//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Rows are first read into
//! `Raw*` structs of column values inside the connection closure and decoded
//! into domain types afterwards, outside the database thread.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use cookbook_core::{
  domain::{Domain, DomainSystem},
  recipe::{Note, Recipe},
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `domains` row.
pub struct RawDomain {
  pub id:          i64,
  pub name:        String,
  pub description: String,
}

impl RawDomain {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
    })
  }
}

/// `domain_systems` rows carry no encoded columns, so they map straight to
/// the domain type.
pub fn system_from_row(row: &Row<'_>) -> rusqlite::Result<DomainSystem> {
  Ok(DomainSystem {
    id:          row.get(0)?,
    domain_id:   row.get(1)?,
    system_name: row.get(2)?,
  })
}

/// Raw values read directly from a `recipes` row.
pub struct RawRecipe {
  pub id:          i64,
  pub domain_id:   i64,
  pub title:       String,
  pub sql_content: String,
  pub summary:     String,
  pub created_at:  String,
}

impl RawRecipe {
  /// Column order expected by [`RawRecipe::from_row`].
  pub const COLUMNS: &'static str =
    "id, domain_id, title, sql_content, summary, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      domain_id:   row.get(1)?,
      title:       row.get(2)?,
      sql_content: row.get(3)?,
      summary:     row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_recipe(self, notes: Vec<Note>) -> Result<Recipe> {
    Ok(Recipe {
      id: self.id,
      domain_id: self.domain_id,
      title: self.title,
      sql_content: self.sql_content,
      summary: self.summary,
      created_at: decode_dt(&self.created_at)?,
      notes,
    })
  }
}

/// Raw values read directly from a `recipe_notes` row.
pub struct RawNote {
  pub id:          i64,
  pub recipe_id:   i64,
  pub author_name: String,
  pub note_type:   String,
  pub content:     String,
  pub created_at:  String,
}

impl RawNote {
  /// Column order expected by [`RawNote::from_row`].
  pub const COLUMNS: &'static str =
    "id, recipe_id, author_name, note_type, content, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      recipe_id:   row.get(1)?,
      author_name: row.get(2)?,
      note_type:   row.get(3)?,
      content:     row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      id:          self.id,
      recipe_id:   self.recipe_id,
      author_name: self.author_name,
      note_type:   self.note_type,
      content:     self.content,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

// ─── Assembly ────────────────────────────────────────────────────────────────

/// Recipes together with every note that belongs to one of them.
pub struct RawRecipeSet {
  pub recipes: Vec<RawRecipe>,
  pub notes:   Vec<RawNote>,
}

impl RawRecipeSet {
  /// Decode and attach each note to its recipe. Input order is preserved on
  /// both levels; notes whose recipe is not in the set are dropped.
  pub fn into_recipes(self) -> Result<Vec<Recipe>> {
    let mut notes_by_recipe: HashMap<i64, Vec<Note>> = HashMap::new();
    for raw in self.notes {
      let note = raw.into_note()?;
      notes_by_recipe.entry(note.recipe_id).or_default().push(note);
    }

    self
      .recipes
      .into_iter()
      .map(|raw| {
        let notes = notes_by_recipe.remove(&raw.id).unwrap_or_default();
        raw.into_recipe(notes)
      })
      .collect()
  }
}

/// The full domain → system / recipe → note hierarchy as flat row lists.
pub struct RawCatalog {
  pub domains: Vec<RawDomain>,
  pub systems: Vec<DomainSystem>,
  pub recipes: RawRecipeSet,
}

impl RawCatalog {
  pub fn into_domains(self) -> Result<Vec<Domain>> {
    let mut systems_by_domain: HashMap<i64, Vec<DomainSystem>> = HashMap::new();
    for system in self.systems {
      systems_by_domain.entry(system.domain_id).or_default().push(system);
    }

    let mut recipes_by_domain: HashMap<i64, Vec<Recipe>> = HashMap::new();
    for recipe in self.recipes.into_recipes()? {
      recipes_by_domain.entry(recipe.domain_id).or_default().push(recipe);
    }

    Ok(
      self
        .domains
        .into_iter()
        .map(|raw| Domain {
          systems:     systems_by_domain.remove(&raw.id).unwrap_or_default(),
          recipes:     recipes_by_domain.remove(&raw.id).unwrap_or_default(),
          id:          raw.id,
          name:        raw.name,
          description: raw.description,
        })
        .collect(),
    )
  }
}
