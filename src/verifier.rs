//! Spill bucket ownership verification.
//!
//! [`SpillVerifier`] remembers the spill bucket it last checked together
//! with the outcome of that check. A listing is issued lazily: once after
//! construction and once more every time the handler presents a different
//! bucket name. Between those points the cached verdict is reused without
//! I/O.

use std::fmt;

use crate::{
   Result,
   error::Error,
   lister::BucketLister,
   types::SpillLocation,
};

/// Verification state of the remembered spill bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketState {
   /// No listing has succeeded since the current bucket name was adopted.
   Unchecked,
   /// The last listing contained the bucket.
   Valid,
   /// The last listing did not contain the bucket.
   Invalid,
}

impl BucketState {
   pub const fn as_str(self) -> &'static str {
      match self {
         Self::Unchecked => "unchecked",
         Self::Valid => "valid",
         Self::Invalid => "invalid",
      }
   }
}

impl fmt::Display for BucketState {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.as_str())
   }
}

/// Guards spill writes against buckets the caller does not own.
///
/// One verifier belongs to one handler. [`check`](Self::check) takes
/// `&mut self`; wrap the verifier in a
/// [`SharedVerifier`](crate::shared::SharedVerifier) to share it between
/// tasks.
#[derive(Debug)]
pub struct SpillVerifier<L> {
   bucket: String,
   state:  BucketState,
   lister: L,
}

impl<L: BucketLister> SpillVerifier<L> {
   /// Creates a verifier for `bucket`. Performs no I/O.
   pub fn new(bucket: impl Into<String>, lister: L) -> Self {
      Self { bucket: bucket.into(), state: BucketState::Unchecked, lister }
   }

   pub fn bucket(&self) -> &str {
      &self.bucket
   }

   pub const fn state(&self) -> BucketState {
      self.state
   }

   pub const fn lister(&self) -> &L {
      &self.lister
   }

   /// Verifies that the caller owns `spill_bucket`.
   ///
   /// A name that differs from the remembered one (byte-exact comparison)
   /// replaces it and discards the cached verdict. A listing is issued only
   /// while the state is unchecked; a failed listing is returned as
   /// [`Error::Listing`] and leaves the state unchecked so the next call
   /// lists again.
   pub async fn check(&mut self, spill_bucket: &str) -> Result<()> {
      if self.bucket != spill_bucket {
         tracing::debug!(from = %self.bucket, to = %spill_bucket, "spill bucket changed");
         spill_bucket.clone_into(&mut self.bucket);
         self.state = BucketState::Unchecked;
      }

      if self.state == BucketState::Unchecked {
         self.refresh().await?;
      }

      self.pass_or_fail()
   }

   /// Verifies the bucket of a full spill location.
   pub async fn check_location(&mut self, location: &SpillLocation) -> Result<()> {
      self.check(location.bucket()).await
   }

   async fn refresh(&mut self) -> Result<()> {
      let buckets = self.lister.list_buckets().await?;

      let previous = self.state;
      self.state = if buckets.contains(&self.bucket) {
         BucketState::Valid
      } else {
         BucketState::Invalid
      };

      tracing::debug!(
         bucket = %self.bucket,
         from = %previous,
         to = %self.state,
         visible = buckets.len(),
         "spill bucket state updated"
      );
      Ok(())
   }

   fn pass_or_fail(&self) -> Result<()> {
      match self.state {
         BucketState::Valid => Ok(()),
         BucketState::Invalid => Err(Error::OwnershipDenied { bucket: self.bucket.clone() }),
         BucketState::Unchecked => Err(Error::InternalInvariant { bucket: self.bucket.clone() }),
      }
   }
}
