//! Bucket listing capability consumed by the verifier.
//!
//! A [`BucketLister`] answers one question: which bucket names are visible
//! under the credentials the process is running with. The verifier treats
//! the returned set as authoritative.

mod fixed;
#[cfg(feature = "s3")]
pub mod s3;

use std::{collections::HashSet, sync::Arc, time::Duration};

pub use fixed::StaticBucketLister;

use crate::error::ListingError;

/// Lists the bucket names visible under the effective credentials.
///
/// Implementations own any deadline, retry or cancellation policy; the
/// verifier calls this at most once per check and never retries.
#[async_trait::async_trait]
pub trait BucketLister: Send + Sync {
   async fn list_buckets(&self) -> Result<HashSet<String>, ListingError>;
}

#[async_trait::async_trait]
impl<L: BucketLister + ?Sized> BucketLister for Arc<L> {
   async fn list_buckets(&self) -> Result<HashSet<String>, ListingError> {
      (**self).list_buckets().await
   }
}

#[async_trait::async_trait]
impl<L: BucketLister + ?Sized> BucketLister for Box<L> {
   async fn list_buckets(&self) -> Result<HashSet<String>, ListingError> {
      (**self).list_buckets().await
   }
}

/// Runs `listing` under an optional deadline, mapping expiry to
/// [`ListingError::Timeout`].
pub async fn with_deadline<F>(
   deadline: Option<Duration>,
   listing: F,
) -> Result<HashSet<String>, ListingError>
where
   F: Future<Output = Result<HashSet<String>, ListingError>>,
{
   match deadline {
      Some(deadline) => tokio::time::timeout(deadline, listing)
         .await
         .map_err(|_| ListingError::Timeout(deadline))?,
      None => listing.await,
   }
}
