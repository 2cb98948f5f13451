//! Result of the sample-data bootstrap.

use std::fmt;

use serde::Serialize;

/// What [`crate::store::RecipeStore::seed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeedOutcome {
  /// At least one domain already existed; nothing was written.
  AlreadySeeded,
  /// The sample set was inserted; counts are rows written per table.
  Seeded {
    domains: usize,
    systems: usize,
    recipes: usize,
    notes:   usize,
  },
}

impl fmt::Display for SeedOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::AlreadySeeded => {
        write!(f, "data already present, skipping sample data")
      }
      Self::Seeded { domains, systems, recipes, notes } => write!(
        f,
        "sample data created: {domains} domains, {systems} systems, \
         {recipes} recipes, {notes} notes"
      ),
    }
  }
}
