#![allow(dead_code, reason = "each test target uses a different subset")]

use std::{
   collections::HashSet,
   sync::atomic::{AtomicUsize, Ordering},
   time::Duration,
};

use spillguard::{BucketLister, ListingError};

#[derive(Debug, Clone)]
pub enum Step {
   Buckets(Vec<&'static str>),
   Fail(&'static str),
}

/// Replays a script of listing responses; the last step repeats.
pub struct ScriptedLister {
   steps: Vec<Step>,
   calls: AtomicUsize,
   delay: Option<Duration>,
}

impl ScriptedLister {
   pub fn new(steps: Vec<Step>) -> Self {
      assert!(!steps.is_empty(), "script needs at least one step");
      Self { steps, calls: AtomicUsize::new(0), delay: None }
   }

   pub fn always(buckets: &[&'static str]) -> Self {
      Self::new(vec![Step::Buckets(buckets.to_vec())])
   }

   pub fn with_delay(mut self, delay: Duration) -> Self {
      self.delay = Some(delay);
      self
   }

   pub fn calls(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
   }
}

#[async_trait::async_trait]
impl BucketLister for ScriptedLister {
   async fn list_buckets(&self) -> Result<HashSet<String>, ListingError> {
      let n = self.calls.fetch_add(1, Ordering::SeqCst);
      if let Some(delay) = self.delay {
         tokio::time::sleep(delay).await;
      }
      match &self.steps[n.min(self.steps.len() - 1)] {
         Step::Buckets(names) => Ok(names.iter().map(|s| (*s).to_string()).collect()),
         Step::Fail(reason) => Err(ListingError::Request((*reason).to_string())),
      }
   }
}
