//! Domains (the business areas that group recipes) and the source systems
//! attached to them.

use serde::{Deserialize, Serialize};

use crate::recipe::Recipe;

/// A source system (CRM, analytics tool, log database...) feeding a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSystem {
  pub id:          i64,
  pub domain_id:   i64,
  pub system_name: String,
}

/// A named analysis area, e.g. "Sales" or "Production".
///
/// `systems` and `recipes` are assembled at read time from their owning-id
/// columns; a domain row itself stores neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
  pub id:          i64,
  pub name:        String,
  pub description: String,
  pub systems:     Vec<DomainSystem>,
  pub recipes:     Vec<Recipe>,
}

/// Input to [`crate::store::RecipeStore::create_domain`].
#[derive(Debug, Clone)]
pub struct NewDomain {
  pub name:        String,
  pub description: String,
  /// System names to attach; one `domain_systems` row is written per entry.
  pub systems:     Vec<String>,
}
