//! The sample data set written by [`RecipeStore::seed`].
//!
//! [`RecipeStore::seed`]: cookbook_core::store::RecipeStore::seed

use cookbook_core::{
  recipe::{NewNote, NewRecipe},
  seed::SeedOutcome,
};
use rusqlite::Connection;

use crate::store::{insert_domain_rows, insert_note_row, insert_recipe_row};

struct SampleDomain {
  name:        &'static str,
  description: &'static str,
  systems:     &'static [&'static str],
  recipes:     &'static [SampleRecipe],
}

struct SampleRecipe {
  title:       &'static str,
  sql_content: &'static str,
  summary:     &'static str,
  notes:       &'static [SampleNote],
}

struct SampleNote {
  author_name: &'static str,
  note_type:   &'static str,
  content:     &'static str,
}

const MONTHLY_SALES_SQL: &str = "\
SELECT
    o.order_id,
    c.customer_name,
    p.product_name,
    o.amount
FROM orders o
JOIN customers c ON o.customer_id = c.customer_id
JOIN products p ON o.product_id = p.product_id
WHERE o.order_date >= '2023-01-01'";

const SAMPLES: &[SampleDomain] = &[
  SampleDomain {
    name:        "Sales",
    description: "Analysis of revenue and customer data",
    systems:     &["Salesforce", "Google Analytics"],
    recipes:     &[SampleRecipe {
      title:       "Monthly sales by customer and product",
      sql_content: MONTHLY_SALES_SQL,
      summary:     "Baseline query aggregating sales per customer and per product.",
      notes:       &[SampleNote {
        author_name: "Data Analytics Team",
        note_type:   "caution",
        content:     "Cancelled orders are not filtered out; a status check in \
                      the WHERE clause may be needed.",
      }],
    }],
  },
  SampleDomain {
    name:        "Production",
    description: "Analysis of plants, inventory and quality control",
    systems:     &["IoT Log DB", "Inventory App"],
    recipes:     &[],
  },
];

/// Write every sample row. The caller owns the transaction and the
/// already-populated check.
pub(crate) fn insert_samples(
  conn: &Connection,
  created_at: &str,
) -> rusqlite::Result<SeedOutcome> {
  let (mut domains, mut systems, mut recipes, mut notes) = (0, 0, 0, 0);

  for sample in SAMPLES {
    let (domain_id, inserted) =
      insert_domain_rows(conn, sample.name, sample.description, sample.systems)?;
    domains += 1;
    systems += inserted.len();

    for recipe in sample.recipes {
      let recipe_id = insert_recipe_row(
        conn,
        &NewRecipe {
          domain_id,
          title: recipe.title.to_owned(),
          sql_content: recipe.sql_content.to_owned(),
          summary: recipe.summary.to_owned(),
        },
        created_at,
      )?;
      recipes += 1;

      for note in recipe.notes {
        insert_note_row(
          conn,
          recipe_id,
          &NewNote {
            author_name: note.author_name.to_owned(),
            note_type:   note.note_type.to_owned(),
            content:     note.content.to_owned(),
          },
          created_at,
        )?;
        notes += 1;
      }
    }
  }

  Ok(SeedOutcome::Seeded { domains, systems, recipes, notes })
}
