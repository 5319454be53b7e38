//! In-memory lister for tooling and tests.

use std::{
   collections::HashSet,
   sync::atomic::{AtomicUsize, Ordering},
};

use parking_lot::RwLock;

use super::BucketLister;
use crate::error::ListingError;

/// Serves a fixed, replaceable set of bucket names and counts listings.
#[derive(Debug, Default)]
pub struct StaticBucketLister {
   buckets: RwLock<HashSet<String>>,
   calls:   AtomicUsize,
}

impl StaticBucketLister {
   pub fn new<I, S>(buckets: I) -> Self
   where
      I: IntoIterator<Item = S>,
      S: Into<String>,
   {
      Self {
         buckets: RwLock::new(buckets.into_iter().map(Into::into).collect()),
         calls:   AtomicUsize::new(0),
      }
   }

   /// Replaces the visible set; later listings observe the new names.
   pub fn set_buckets<I, S>(&self, buckets: I)
   where
      I: IntoIterator<Item = S>,
      S: Into<String>,
   {
      *self.buckets.write() = buckets.into_iter().map(Into::into).collect();
   }

   /// Number of listings served so far.
   pub fn calls(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
   }
}

#[async_trait::async_trait]
impl BucketLister for StaticBucketLister {
   async fn list_buckets(&self) -> Result<HashSet<String>, ListingError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(self.buckets.read().clone())
   }
}
