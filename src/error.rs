use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Main error type for spillguard.
///
/// Ownership verdicts, listing failures and configuration problems are kept
/// as distinct variants so a handler can log or map them differently.
#[derive(Debug, Error)]
pub enum Error {
   /// The bucket listing completed but did not contain the spill bucket.
   #[error("you do not own the spill bucket with the name: {bucket}")]
   OwnershipDenied { bucket: String },

   /// The decision rule ran while the bucket state was still unchecked.
   #[error("spill bucket {bucket} should have been checked already")]
   InternalInvariant { bucket: String },

   /// The bucket listing itself failed.
   #[error("bucket listing failed: {0}")]
   Listing(#[from] ListingError),

   /// Configuration-related error occurred.
   #[error("config error: {0}")]
   Config(#[from] ConfigError),

   /// JSON serialization error occurred.
   #[error("json error: {0}")]
   Json(#[from] serde_json::Error),

   /// TOML serialization error occurred.
   #[error("toml error: {0}")]
   Toml(#[from] toml::ser::Error),
}

impl Error {
   pub const fn exit_code(&self) -> i32 {
      match self {
         Self::Listing(_) => 2,
         Self::OwnershipDenied { .. } => 3,
         Self::InternalInvariant { .. } => 4,
         Self::Config(_) => 5,
         Self::Json(_) | Self::Toml(_) => 1,
      }
   }

   /// Returns `true` when the error is a definitive ownership verdict rather
   /// than a failure to reach one.
   pub const fn is_denial(&self) -> bool {
      matches!(self, Self::OwnershipDenied { .. })
   }
}

/// Errors produced by a [`BucketLister`](crate::lister::BucketLister).
///
/// The verifier propagates these unchanged and leaves its state untouched,
/// so the next check issues a fresh listing.
#[derive(Debug, Error)]
pub enum ListingError {
   /// The listing request failed (network, credentials, throttling).
   #[error("list buckets request failed: {0}")]
   Request(String),

   /// The listing did not complete within the configured deadline.
   #[error("list buckets timed out after {0:?}")]
   Timeout(Duration),

   /// The listing spans more pages than the configured cap.
   #[error("list buckets exceeded {max_pages} pages")]
   Truncated { max_pages: usize },
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
   /// No spill bucket was configured.
   #[error("spill_bucket is not set; configure it or set SPILLGUARD_SPILL_BUCKET")]
   MissingSpillBucket,

   /// A configured value exceeds its hard cap or is otherwise invalid.
   #[error("invalid config: {0}")]
   Invalid(String),

   /// An explicitly requested config file does not exist.
   #[error("config file not found: {path}", path = _0.display())]
   NotFound(PathBuf),

   /// Figment failed to merge or extract the layered configuration.
   #[error("failed to parse config: {0}")]
   Parse(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
   fn from(e: figment::Error) -> Self {
      Self::Parse(Box::new(e))
   }
}

/// Standard result type using [`enum@Error`] as the default error type
pub type Result<T, E = Error> = std::result::Result<T, E>;
