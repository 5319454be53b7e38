//! Task-safe handle around a [`SpillVerifier`].

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
   Result,
   lister::BucketLister,
   verifier::{BucketState, SpillVerifier},
};

/// Cloneable verifier handle that serializes `check` behind one async mutex.
///
/// The whole verifier state is the remembered bucket plus its verdict, so a
/// single lock around `check` is enough. A listing in flight holds the lock;
/// concurrent callers wait and then observe the refreshed verdict.
#[derive(Debug)]
pub struct SharedVerifier<L> {
   inner: Arc<Mutex<SpillVerifier<L>>>,
}

impl<L> Clone for SharedVerifier<L> {
   fn clone(&self) -> Self {
      Self { inner: Arc::clone(&self.inner) }
   }
}

impl<L: BucketLister> SharedVerifier<L> {
   pub fn new(bucket: impl Into<String>, lister: L) -> Self {
      Self::from_verifier(SpillVerifier::new(bucket, lister))
   }

   pub fn from_verifier(verifier: SpillVerifier<L>) -> Self {
      Self { inner: Arc::new(Mutex::new(verifier)) }
   }

   pub async fn check(&self, spill_bucket: &str) -> Result<()> {
      self.inner.lock().await.check(spill_bucket).await
   }

   pub async fn bucket(&self) -> String {
      self.inner.lock().await.bucket().to_owned()
   }

   pub async fn state(&self) -> BucketState {
      self.inner.lock().await.state()
   }
}
