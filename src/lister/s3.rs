//! S3 `ListBuckets` adapter.

use std::{collections::HashSet, time::Duration};

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{Client, error::DisplayErrorContext};

use super::{BucketLister, with_deadline};
use crate::{config::Config, error::ListingError};

/// Lists the buckets visible to the configured AWS credentials.
///
/// Every request asks for at most `page_size` buckets and the listing
/// follows continuation tokens for up to `max_pages` pages. A listing that
/// would need more pages fails with [`ListingError::Truncated`] instead of
/// returning a partial set.
#[derive(Debug, Clone)]
pub struct S3BucketLister {
   client:    Client,
   timeout:   Option<Duration>,
   max_pages: usize,
   page_size: i32,
}

impl S3BucketLister {
   /// Wraps `client` with the default deadline and page limits.
   pub fn new(client: Client) -> Self {
      Self::from_config(client, &Config::default())
   }

   pub fn from_config(client: Client, cfg: &Config) -> Self {
      Self {
         client,
         timeout: cfg.list_timeout(),
         max_pages: cfg.effective_max_list_pages(),
         page_size: cfg.effective_list_page_size(),
      }
   }

   /// Builds a client from the ambient AWS environment, honoring
   /// `cfg.region` when set.
   pub async fn from_env(cfg: &Config) -> Self {
      let mut loader = aws_config::defaults(BehaviorVersion::latest());
      if let Some(region) = &cfg.region {
         loader = loader.region(Region::new(region.clone()));
      }
      let sdk_config = loader.load().await;
      Self::from_config(Client::new(&sdk_config), cfg)
   }

   pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
      self.timeout = timeout;
      self
   }

   pub fn with_max_pages(mut self, max_pages: usize) -> Self {
      self.max_pages = max_pages.max(1);
      self
   }

   pub fn with_page_size(mut self, page_size: i32) -> Self {
      self.page_size = page_size.clamp(1, crate::config::MAX_LIST_PAGE_SIZE_CAP);
      self
   }

   async fn list_all(&self) -> Result<HashSet<String>, ListingError> {
      let mut names = HashSet::new();
      let mut token: Option<String> = None;

      for page in 1..=self.max_pages {
         let output = self
            .client
            .list_buckets()
            .max_buckets(self.page_size)
            .set_continuation_token(token.take())
            .send()
            .await
            .map_err(|e| ListingError::Request(DisplayErrorContext(&e).to_string()))?;

         names.extend(
            output
               .buckets()
               .iter()
               .filter_map(|b| b.name())
               .map(str::to_owned),
         );

         match output.continuation_token() {
            Some(next) if !next.is_empty() => token = Some(next.to_owned()),
            _ => {
               tracing::debug!(pages = page, buckets = names.len(), "listed buckets");
               return Ok(names);
            },
         }
      }

      Err(ListingError::Truncated { max_pages: self.max_pages })
   }
}

#[async_trait]
impl BucketLister for S3BucketLister {
   async fn list_buckets(&self) -> Result<HashSet<String>, ListingError> {
      with_deadline(self.timeout, self.list_all()).await
   }
}

#[cfg(test)]
mod tests {
   use aws_sdk_s3::{
      error::ErrorMetadata,
      operation::list_buckets::{ListBucketsError, ListBucketsOutput},
      types::Bucket,
   };
   use aws_smithy_mocks::{RuleMode, mock, mock_client};

   use super::*;

   fn page(names: &[&str], next: Option<&str>) -> ListBucketsOutput {
      names
         .iter()
         .fold(ListBucketsOutput::builder(), |builder, name| {
            builder.buckets(Bucket::builder().name(*name).build())
         })
         .set_continuation_token(next.map(str::to_owned))
         .build()
   }

   #[tokio::test]
   async fn pages_are_merged_and_sized() {
      let first = mock!(Client::list_buckets)
         .match_requests(|req| req.continuation_token().is_none() && req.max_buckets() == Some(2))
         .then_output(|| page(&["b1", "b2"], Some("t1")));
      let second = mock!(Client::list_buckets)
         .match_requests(|req| req.continuation_token() == Some("t1") && req.max_buckets() == Some(2))
         .then_output(|| page(&["b3"], None));
      let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&first, &second]);

      let lister = S3BucketLister::new(client)
         .with_page_size(2)
         .with_timeout(Some(Duration::from_secs(5)));
      let names = lister.list_buckets().await.unwrap();

      let expected: HashSet<String> = ["b1", "b2", "b3"].into_iter().map(String::from).collect();
      assert_eq!(names, expected);
      assert_eq!(first.num_calls(), 1);
      assert_eq!(second.num_calls(), 1);
   }

   #[tokio::test]
   async fn first_request_carries_default_page_size() {
      let only = mock!(Client::list_buckets)
         .match_requests(|req| req.max_buckets() == Some(1000))
         .then_output(|| page(&["b1"], None));
      let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&only]);

      let names = S3BucketLister::new(client).list_buckets().await.unwrap();
      assert!(names.contains("b1"));
      assert_eq!(only.num_calls(), 1);
   }

   #[tokio::test]
   async fn listing_past_page_cap_is_truncated() {
      let first = mock!(Client::list_buckets)
         .match_requests(|req| req.continuation_token().is_none())
         .then_output(|| page(&["b1"], Some("t1")));
      let second = mock!(Client::list_buckets)
         .match_requests(|req| req.continuation_token() == Some("t1"))
         .then_output(|| page(&["b2"], Some("t2")));
      let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&first, &second]);

      let err = S3BucketLister::new(client)
         .with_max_pages(2)
         .with_timeout(None)
         .list_buckets()
         .await
         .unwrap_err();

      assert!(matches!(err, ListingError::Truncated { max_pages: 2 }));
      assert_eq!(second.num_calls(), 1);
   }

   #[tokio::test]
   async fn zero_page_cap_still_issues_one_request() {
      let only = mock!(Client::list_buckets).then_output(|| page(&["b1"], Some("t1")));
      let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&only]);

      let err = S3BucketLister::new(client)
         .with_max_pages(0)
         .list_buckets()
         .await
         .unwrap_err();

      assert!(matches!(err, ListingError::Truncated { max_pages: 1 }));
      assert_eq!(only.num_calls(), 1);
   }

   #[tokio::test]
   async fn service_error_maps_to_request_failure() {
      let denied = mock!(Client::list_buckets).then_error(|| {
         ListBucketsError::generic(
            ErrorMetadata::builder()
               .code("AccessDenied")
               .message("access denied")
               .build(),
         )
      });
      let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, [&denied]);

      let err = S3BucketLister::new(client).list_buckets().await.unwrap_err();
      assert!(matches!(err, ListingError::Request(ref msg) if !msg.is_empty()));
   }
}
