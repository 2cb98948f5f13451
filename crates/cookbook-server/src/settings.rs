//! Runtime server configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variables with this prefix override file values, e.g.
/// `COOKBOOK_PORT=9000`.
pub const ENV_PREFIX: &str = "COOKBOOK";

/// Server configuration, deserialised from `config.toml` and the
/// environment. Every field has a default, so an absent file is fine.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  /// SQLite database file; a leading `~/` is expanded.
  pub store_path:    PathBuf,
  /// Front-end bundle served for every path the API does not match.
  pub static_dir:    PathBuf,
  /// Mount `GET /api/admin/seed`.
  pub seed_endpoint: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          8000,
      store_path:    PathBuf::from("data/recipe.db"),
      static_dir:    PathBuf::from("frontend"),
      seed_endpoint: false,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `COOKBOOK_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg, ServerConfig::default());
  }

  #[test]
  fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "port = 9100\nstatic_dir = \"dist\"\nseed_endpoint = true").unwrap();

    let cfg = ServerConfig::load(file.path()).unwrap();
    assert_eq!(cfg.port, 9100);
    assert_eq!(cfg.static_dir, PathBuf::from("dist"));
    assert!(cfg.seed_endpoint);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_path, PathBuf::from("data/recipe.db"));
  }

  #[test]
  fn relative_store_path_is_kept() {
    let cfg = ServerConfig::default();
    assert_eq!(cfg.resolved_store_path(), PathBuf::from("data/recipe.db"));
    assert_eq!(cfg.address(), "127.0.0.1:8000");
  }
}
