//! Layered configuration for the spill location and listing limits.

use std::{
   path::{Path, PathBuf},
   sync::OnceLock,
   time::Duration,
};

use directories::BaseDirs;
use figment::{
   Figment,
   providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, types::SpillLocation};

pub const MAX_LIST_PAGES_CAP: usize = 1000;
/// Upper bound S3 accepts for `max-buckets` on one `ListBuckets` page.
pub const MAX_LIST_PAGE_SIZE_CAP: i32 = 10_000;

/// Env vars the connector handlers conventionally read the spill location
/// from. Prefixed `SPILLGUARD_` vars take precedence over these.
const CONNECTOR_ENV_KEYS: &[&str] = &["spill_bucket", "spill_prefix"];

/// Configuration loaded from config files and environment variables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
   pub spill_bucket:    String,
   pub spill_prefix:    String,
   pub list_timeout_ms: u64,
   pub max_list_pages:  usize,
   pub list_page_size:  i32,
   pub region:          Option<String>,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         spill_bucket:    String::new(),
         spill_prefix:    "athena-spill".to_string(),
         list_timeout_ms: 10_000,
         max_list_pages:  100,
         list_page_size:  1000,
         region:          None,
      }
   }
}

impl Config {
   /// Loads the global config and environment, falling back to defaults when
   /// the layers fail to parse.
   pub fn load() -> Self {
      Self::figment(None)
         .extract()
         .inspect_err(|e| tracing::warn!("failed to parse config: {e}"))
         .unwrap_or_default()
   }

   /// Loads the global config, then `path`, then the environment.
   ///
   /// Unlike [`Config::load`], a missing file or a parse failure is an error.
   pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
      if !path.exists() {
         return Err(ConfigError::NotFound(path.to_path_buf()));
      }
      Ok(Self::figment(Some(path)).extract()?)
   }

   fn figment(explicit: Option<&Path>) -> Figment {
      let mut figment = Figment::from(Serialized::defaults(Self::default()));

      if let Some(global) = config_file_path().filter(|p| p.exists()) {
         figment = figment.merge(Toml::file(global));
      }
      if let Some(path) = explicit {
         figment = figment.merge(Toml::file(path));
      }

      figment
         .merge(Env::raw().only(CONNECTOR_ENV_KEYS))
         .merge(Env::prefixed("SPILLGUARD_").lowercase(true))
   }

   pub fn validate(&self) -> Result<(), ConfigError> {
      if self.spill_bucket.is_empty() {
         return Err(ConfigError::MissingSpillBucket);
      }
      if self.max_list_pages == 0 {
         return Err(ConfigError::Invalid("max_list_pages must be at least 1".to_string()));
      }
      if self.max_list_pages > MAX_LIST_PAGES_CAP {
         return Err(ConfigError::Invalid(format!(
            "max_list_pages {} exceeds hard cap {}",
            self.max_list_pages, MAX_LIST_PAGES_CAP
         )));
      }
      if !(1..=MAX_LIST_PAGE_SIZE_CAP).contains(&self.list_page_size) {
         return Err(ConfigError::Invalid(format!(
            "list_page_size {} must be between 1 and {}",
            self.list_page_size, MAX_LIST_PAGE_SIZE_CAP
         )));
      }
      Ok(())
   }

   /// Listing deadline, or `None` when `list_timeout_ms` is zero.
   pub const fn list_timeout(&self) -> Option<Duration> {
      if self.list_timeout_ms == 0 {
         None
      } else {
         Some(Duration::from_millis(self.list_timeout_ms))
      }
   }

   pub fn effective_max_list_pages(&self) -> usize {
      self.max_list_pages.clamp(1, MAX_LIST_PAGES_CAP)
   }

   pub fn effective_list_page_size(&self) -> i32 {
      self.list_page_size.clamp(1, MAX_LIST_PAGE_SIZE_CAP)
   }

   pub fn spill_location(&self) -> SpillLocation {
      SpillLocation::new(self.spill_bucket.clone(), self.spill_prefix.clone())
   }
}

/// Returns the base directory for spillguard configuration
pub fn base_dir() -> Option<&'static PathBuf> {
   static ONCE: OnceLock<Option<PathBuf>> = OnceLock::new();
   ONCE
      .get_or_init(|| {
         BaseDirs::new()
            .map(|d| d.home_dir().join(".spillguard"))
            .or_else(|| {
               std::env::var("HOME")
                  .ok()
                  .map(|h| PathBuf::from(h).join(".spillguard"))
            })
      })
      .as_ref()
}

pub fn config_file_path() -> Option<PathBuf> {
   base_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
   use super::*;

   fn with_bucket(bucket: &str) -> Config {
      Config { spill_bucket: bucket.to_string(), ..Config::default() }
   }

   #[test]
   fn empty_bucket_is_rejected() {
      assert!(matches!(Config::default().validate(), Err(ConfigError::MissingSpillBucket)));
   }

   #[test]
   fn page_cap_is_enforced() {
      let mut cfg = with_bucket("b1");
      assert!(cfg.validate().is_ok());

      cfg.max_list_pages = MAX_LIST_PAGES_CAP + 1;
      assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
      assert_eq!(cfg.effective_max_list_pages(), MAX_LIST_PAGES_CAP);

      cfg.max_list_pages = 0;
      assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
      assert_eq!(cfg.effective_max_list_pages(), 1);
   }

   #[test]
   fn page_size_must_fit_s3_bounds() {
      let mut cfg = with_bucket("b1");
      assert_eq!(cfg.effective_list_page_size(), 1000);

      cfg.list_page_size = 0;
      assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
      assert_eq!(cfg.effective_list_page_size(), 1);

      cfg.list_page_size = MAX_LIST_PAGE_SIZE_CAP + 1;
      assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
      assert_eq!(cfg.effective_list_page_size(), MAX_LIST_PAGE_SIZE_CAP);
   }

   #[test]
   fn zero_timeout_disables_deadline() {
      let mut cfg = with_bucket("b1");
      assert_eq!(cfg.list_timeout(), Some(Duration::from_secs(10)));
      cfg.list_timeout_ms = 0;
      assert_eq!(cfg.list_timeout(), None);
   }

   #[test]
   fn spill_location_uses_bucket_and_prefix() {
      let cfg = with_bucket("b1");
      let location = cfg.spill_location();
      assert_eq!(location.bucket(), "b1");
      assert_eq!(location.prefix(), "athena-spill");
   }
}
