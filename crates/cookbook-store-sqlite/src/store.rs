//! [`SqliteStore`], the SQLite implementation of [`RecipeStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, Params, Row, params};

use cookbook_core::{
  domain::{Domain, DomainSystem, NewDomain},
  recipe::{NewNote, NewRecipe, Note, Recipe, RecipeUpdate},
  seed::SeedOutcome,
  store::RecipeStore,
};

use crate::{
  Result,
  encode::{
    RawCatalog, RawDomain, RawNote, RawRecipe, RawRecipeSet, encode_dt,
    system_from_row,
  },
  schema::{SCHEMA, SCHEMA_VERSION},
  seed,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A recipe catalog backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every
/// operation runs as one closure on the connection's thread, so a request's
/// reads and writes never interleave with another request's.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "opening recipe store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    let previous: i64 = self
      .conn
      .call(|conn| {
        let previous: i64 =
          conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
        conn.execute_batch(SCHEMA)?;
        Ok(previous)
      })
      .await?;

    if previous == 0 {
      tracing::info!(version = SCHEMA_VERSION, "created schema");
    } else {
      tracing::debug!(version = previous, "schema already present");
    }
    Ok(())
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn query_all<T, P, F>(
  conn: &Connection,
  sql: &str,
  params: P,
  f: F,
) -> rusqlite::Result<Vec<T>>
where
  P: Params,
  F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt.query_map(params, f)?.collect();
  rows
}

/// One recipe and its notes, or `None` if the id is unknown.
fn load_recipe(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawRecipeSet>> {
  let recipe = conn
    .query_row(
      &format!("SELECT {} FROM recipes WHERE id = ?1", RawRecipe::COLUMNS),
      [id],
      RawRecipe::from_row,
    )
    .optional()?;

  let Some(recipe) = recipe else {
    return Ok(None);
  };

  let notes = query_all(
    conn,
    &format!(
      "SELECT {} FROM recipe_notes WHERE recipe_id = ?1 ORDER BY id",
      RawNote::COLUMNS
    ),
    [id],
    RawNote::from_row,
  )?;

  Ok(Some(RawRecipeSet { recipes: vec![recipe], notes }))
}

/// Insert a domain row, then one `domain_systems` row per name pointing at
/// the id the first insert was assigned.
pub(crate) fn insert_domain_rows<S: AsRef<str>>(
  conn: &Connection,
  name: &str,
  description: &str,
  systems: &[S],
) -> rusqlite::Result<(i64, Vec<DomainSystem>)> {
  conn.execute(
    "INSERT INTO domains (name, description) VALUES (?1, ?2)",
    params![name, description],
  )?;
  let domain_id = conn.last_insert_rowid();

  let mut stmt = conn
    .prepare("INSERT INTO domain_systems (domain_id, system_name) VALUES (?1, ?2)")?;
  let mut inserted = Vec::with_capacity(systems.len());
  for system_name in systems {
    let system_name = system_name.as_ref();
    stmt.execute(params![domain_id, system_name])?;
    inserted.push(DomainSystem {
      id: conn.last_insert_rowid(),
      domain_id,
      system_name: system_name.to_owned(),
    });
  }

  Ok((domain_id, inserted))
}

pub(crate) fn insert_recipe_row(
  conn: &Connection,
  input: &NewRecipe,
  created_at: &str,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO recipes (domain_id, title, sql_content, summary, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      input.domain_id,
      input.title,
      input.sql_content,
      input.summary,
      created_at,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_note_row(
  conn: &Connection,
  recipe_id: i64,
  input: &NewNote,
  created_at: &str,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO recipe_notes (recipe_id, author_name, note_type, content, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      recipe_id,
      input.author_name,
      input.note_type,
      input.content,
      created_at,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

// ─── RecipeStore impl ────────────────────────────────────────────────────────

impl RecipeStore for SqliteStore {
  type Error = crate::Error;

  // ── Domains ───────────────────────────────────────────────────────────────

  async fn list_domains(&self) -> Result<Vec<Domain>> {
    let raw: RawCatalog = self
      .conn
      .call(|conn| {
        let domains = query_all(
          conn,
          "SELECT id, name, description FROM domains ORDER BY id",
          [],
          RawDomain::from_row,
        )?;
        let systems = query_all(
          conn,
          "SELECT id, domain_id, system_name FROM domain_systems ORDER BY id",
          [],
          system_from_row,
        )?;
        let recipes = query_all(
          conn,
          &format!("SELECT {} FROM recipes ORDER BY id", RawRecipe::COLUMNS),
          [],
          RawRecipe::from_row,
        )?;
        let notes = query_all(
          conn,
          &format!("SELECT {} FROM recipe_notes ORDER BY id", RawNote::COLUMNS),
          [],
          RawNote::from_row,
        )?;

        Ok(RawCatalog {
          domains,
          systems,
          recipes: RawRecipeSet { recipes, notes },
        })
      })
      .await?;

    raw.into_domains()
  }

  async fn create_domain(&self, input: NewDomain) -> Result<Domain> {
    let NewDomain { name, description, systems } = input;

    let domain = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let (id, systems) = insert_domain_rows(&tx, &name, &description, &systems)?;
        tx.commit()?;

        Ok(Domain {
          id,
          name,
          description,
          systems,
          recipes: Vec::new(),
        })
      })
      .await?;

    tracing::debug!(domain_id = domain.id, systems = domain.systems.len(), "created domain");
    Ok(domain)
  }

  // ── Recipes ───────────────────────────────────────────────────────────────

  async fn list_recipes(&self, skip: u32, limit: u32) -> Result<Vec<Recipe>> {
    let skip = i64::from(skip);
    let limit = i64::from(limit);

    let raw: RawRecipeSet = self
      .conn
      .call(move |conn| {
        let recipes = query_all(
          conn,
          &format!(
            "SELECT {} FROM recipes ORDER BY id LIMIT ?1 OFFSET ?2",
            RawRecipe::COLUMNS
          ),
          params![limit, skip],
          RawRecipe::from_row,
        )?;

        // Only the notes of the recipes on this page.
        let notes = query_all(
          conn,
          "SELECT n.id, n.recipe_id, n.author_name, n.note_type, n.content, n.created_at
           FROM recipe_notes n
           JOIN (SELECT id FROM recipes ORDER BY id LIMIT ?1 OFFSET ?2) page
             ON page.id = n.recipe_id
           ORDER BY n.id",
          params![limit, skip],
          RawNote::from_row,
        )?;

        Ok(RawRecipeSet { recipes, notes })
      })
      .await?;

    raw.into_recipes()
  }

  async fn get_recipe(&self, id: i64) -> Result<Option<Recipe>> {
    let raw = self.conn.call(move |conn| Ok(load_recipe(conn, id)?)).await?;

    match raw {
      Some(set) => Ok(set.into_recipes()?.pop()),
      None => Ok(None),
    }
  }

  async fn create_recipe(&self, input: NewRecipe) -> Result<Recipe> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let row = input.clone();

    let id = self
      .conn
      .call(move |conn| Ok(insert_recipe_row(conn, &row, &at_str)?))
      .await?;

    tracing::debug!(recipe_id = id, domain_id = input.domain_id, "created recipe");

    Ok(Recipe {
      id,
      domain_id: input.domain_id,
      title: input.title,
      sql_content: input.sql_content,
      summary: input.summary,
      created_at,
      notes: Vec::new(),
    })
  }

  async fn update_recipe(
    &self,
    id: i64,
    update: RecipeUpdate,
  ) -> Result<Option<Recipe>> {
    let noop = update.is_noop();
    let title = update.title().map(str::to_owned);
    let sql_content = update.sql_content().map(str::to_owned);
    let summary = update.summary().map(str::to_owned);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists = tx
          .query_row("SELECT 1 FROM recipes WHERE id = ?1", [id], |_| Ok(()))
          .optional()?
          .is_some();
        if !exists {
          return Ok(None);
        }

        // A NULL parameter keeps the stored value.
        if !noop {
          tx.execute(
            "UPDATE recipes SET
               title       = COALESCE(?2, title),
               sql_content = COALESCE(?3, sql_content),
               summary     = COALESCE(?4, summary)
             WHERE id = ?1",
            params![id, title, sql_content, summary],
          )?;
        }

        let recipe = load_recipe(&tx, id)?;
        tx.commit()?;
        Ok(recipe)
      })
      .await?;

    match raw {
      Some(set) => {
        tracing::debug!(recipe_id = id, "updated recipe");
        Ok(set.into_recipes()?.pop())
      }
      None => Ok(None),
    }
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  async fn create_note(&self, recipe_id: i64, input: NewNote) -> Result<Note> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let row = input.clone();

    let id = self
      .conn
      .call(move |conn| Ok(insert_note_row(conn, recipe_id, &row, &at_str)?))
      .await?;

    tracing::debug!(note_id = id, recipe_id, "created note");

    Ok(Note {
      id,
      recipe_id,
      author_name: input.author_name,
      note_type: input.note_type,
      content: input.content,
      created_at,
    })
  }

  // ── Bootstrap ─────────────────────────────────────────────────────────────

  async fn seed(&self) -> Result<SeedOutcome> {
    let now = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let populated: bool =
          tx.query_row("SELECT EXISTS (SELECT 1 FROM domains)", [], |r| r.get(0))?;
        if populated {
          return Ok(SeedOutcome::AlreadySeeded);
        }

        let outcome = seed::insert_samples(&tx, &now)?;
        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    tracing::info!(%outcome, "seed finished");
    Ok(outcome)
  }
}
