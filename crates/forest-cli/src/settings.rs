//! Layered configuration: TOML file, then `FOREST_*` environment variables,
//! then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use forest_core::store::OrphanPolicy;
use serde::Deserialize;

/// Shape of the optional `forest.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file. Created on first start.
  #[serde(default = "default_database_path")]
  pub database_path:  PathBuf,
  /// What deleting a plot does to its ranger assignments.
  #[serde(default)]
  pub on_plot_delete: OrphanPolicy,
  /// Where log lines go; the terminal is owned by the UI.
  #[serde(default = "default_log_file")]
  pub log_file:       PathBuf,
}

fn default_database_path() -> PathBuf { PathBuf::from("forest.db") }

fn default_log_file() -> PathBuf { PathBuf::from("forest.log") }

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FOREST"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut parsed: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    parsed.database_path = expand_tilde(&parsed.database_path);
    parsed.log_file = expand_tilde(&parsed.log_file);
    Ok(parsed)
  }

  /// Apply command-line overrides.
  pub fn with_overrides(
    mut self,
    database_path: Option<PathBuf>,
    log_file: Option<PathBuf>,
  ) -> Self {
    if let Some(p) = database_path {
      self.database_path = expand_tilde(&p);
    }
    if let Some(p) = log_file {
      self.log_file = expand_tilde(&p);
    }
    self
  }
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
  use super::*;

  fn temp_config(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
      "forest-config-{}-{name}.toml",
      std::process::id()
    ));
    std::fs::write(&path, body).unwrap();
    path
  }

  #[test]
  fn missing_file_yields_defaults() {
    let path = std::env::temp_dir().join("forest-config-does-not-exist.toml");
    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.on_plot_delete, OrphanPolicy::Retain);
    assert_eq!(settings.log_file, PathBuf::from("forest.log"));
  }

  #[test]
  fn file_values_are_read() {
    let path = temp_config(
      "values",
      "database_path = \"/var/lib/forest/plots.db\"\non_plot_delete = \"cascade\"\n",
    );
    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.database_path, PathBuf::from("/var/lib/forest/plots.db"));
    assert_eq!(settings.on_plot_delete, OrphanPolicy::Cascade);
    std::fs::remove_file(path).ok();
  }

  #[test]
  fn unknown_policy_is_rejected() {
    let path = temp_config("bad-policy", "on_plot_delete = \"shred\"\n");
    assert!(Settings::load(&path).is_err());
    std::fs::remove_file(path).ok();
  }

  #[test]
  fn flags_override_file() {
    let path = temp_config("override", "database_path = \"from-file.db\"\n");
    let settings = Settings::load(&path)
      .unwrap()
      .with_overrides(Some(PathBuf::from("from-flag.db")), None);
    assert_eq!(settings.database_path, PathBuf::from("from-flag.db"));
    std::fs::remove_file(path).ok();
  }

  #[test]
  fn tilde_is_expanded() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/forest.db")),
        PathBuf::from(home).join("forest.db")
      );
    }
    assert_eq!(expand_tilde(Path::new("/abs.db")), PathBuf::from("/abs.db"));
  }
}
