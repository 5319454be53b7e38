//! Shared value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a handler spills query results: a bucket plus a key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpillLocation {
   bucket: String,
   prefix: String,
}

impl SpillLocation {
   pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
      Self { bucket: bucket.into(), prefix: prefix.into() }
   }

   pub fn bucket(&self) -> &str {
      &self.bucket
   }

   pub fn prefix(&self) -> &str {
      &self.prefix
   }
}

impl fmt::Display for SpillLocation {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let prefix = self.prefix.trim_matches('/');
      if prefix.is_empty() {
         write!(f, "s3://{}/", self.bucket)
      } else {
         write!(f, "s3://{}/{}/", self.bucket, prefix)
      }
   }
}
