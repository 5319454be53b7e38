//! Spill bucket ownership guard.
//!
//! Federated query handlers spill oversized results into an object-storage
//! bucket named by configuration. [`SpillVerifier`] checks, once per bucket
//! name, that the bucket is visible to the handler's own credentials and
//! refuses to pass otherwise.
//!
//! ```no_run
//! # async fn run() -> spillguard::Result<()> {
//! use spillguard::{SpillVerifier, StaticBucketLister};
//!
//! let mut verifier = SpillVerifier::new("spill-b1", StaticBucketLister::new(["spill-b1"]));
//! verifier.check("spill-b1").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod lister;
pub mod shared;
pub mod types;
pub mod verifier;

pub use config::Config;
pub use error::{ConfigError, Error, ListingError, Result};
pub use lister::{BucketLister, StaticBucketLister};
pub use shared::SharedVerifier;
pub use types::SpillLocation;
pub use verifier::{BucketState, SpillVerifier};
