//! One delimited listing call against object storage.
//!
//! [`ObjectLister`] is the only thing the walker needs from the outside
//! world. The production implementation sits on top of `ListObjectsV2`.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use tracing::debug;

use crate::error::{Error, Result};

const DELIMITER: &str = "/";

/// A single flat "directory" query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub bucket: String,
    pub prefix: String,
    pub continuation_token: Option<String>,
    pub max_keys: Option<i32>,
}

impl ListingRequest {
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            continuation_token: None,
            max_keys: None,
        }
    }

    pub fn with_continuation_token(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }

    pub fn with_max_keys(mut self, max_keys: Option<i32>) -> Self {
        self.max_keys = max_keys;
        self
    }

    /// Always `/`, so deeper keys come back grouped as common prefixes.
    pub fn delimiter(&self) -> &'static str {
        DELIMITER
    }
}

/// What one listing call returned, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub keys: Vec<String>,
    pub common_prefixes: Vec<String>,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
}

impl ListingPage {
    /// Converts an SDK response, failing on entries the service left without a key.
    pub fn from_output(prefix: &str, output: &ListObjectsV2Output) -> Result<Self> {
        let keys = output
            .contents()
            .iter()
            .map(|object| {
                object.key().map(str::to_owned).ok_or_else(|| Error::MalformedResponse {
                    prefix: prefix.to_owned(),
                    detail: "object entry without a key".into(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let common_prefixes = output
            .common_prefixes()
            .iter()
            .map(|common| {
                common.prefix().map(str::to_owned).ok_or_else(|| Error::MalformedResponse {
                    prefix: prefix.to_owned(),
                    detail: "common prefix entry without a value".into(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            keys,
            common_prefixes,
            is_truncated: output.is_truncated().unwrap_or_default(),
            next_continuation_token: output.next_continuation_token().map(str::to_owned),
        })
    }
}

/// Lists one page of keys and common prefixes under a prefix.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    async fn list_page(&self, request: &ListingRequest) -> Result<ListingPage>;
}

#[async_trait]
impl ObjectLister for aws_sdk_s3::Client {
    async fn list_page(&self, request: &ListingRequest) -> Result<ListingPage> {
        debug!(
            bucket = %request.bucket,
            prefix = %request.prefix,
            continuation = request.continuation_token.is_some(),
            "ListObjectsV2"
        );

        let output = self
            .list_objects_v2()
            .bucket(&request.bucket)
            .prefix(&request.prefix)
            .delimiter(request.delimiter())
            .set_continuation_token(request.continuation_token.clone())
            .set_max_keys(request.max_keys)
            .send()
            .await
            .map_err(|err| Error::Listing {
                bucket: request.bucket.clone(),
                prefix: request.prefix.clone(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        ListingPage::from_output(&request.prefix, &output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::types::{CommonPrefix, Object};

    #[test]
    fn converts_sdk_output_in_order() {
        let output = ListObjectsV2Output::builder()
            .contents(Object::builder().key("a/x.csv").build())
            .contents(Object::builder().key("a/readme.md").build())
            .common_prefixes(CommonPrefix::builder().prefix("a/b/").build())
            .common_prefixes(CommonPrefix::builder().prefix("a/c/").build())
            .is_truncated(true)
            .next_continuation_token("token-1")
            .build();

        let page = ListingPage::from_output("a/", &output).unwrap();

        assert_eq!(page.keys, vec!["a/x.csv", "a/readme.md"]);
        assert_eq!(page.common_prefixes, vec!["a/b/", "a/c/"]);
        assert!(page.is_truncated);
        assert_eq!(page.next_continuation_token.as_deref(), Some("token-1"));
    }

    #[test]
    fn empty_output_is_an_empty_page() {
        let output = ListObjectsV2Output::builder().build();
        let page = ListingPage::from_output("", &output).unwrap();
        assert_eq!(page, ListingPage::default());
    }

    #[test]
    fn object_without_key_is_malformed() {
        let output = ListObjectsV2Output::builder()
            .contents(Object::builder().size(10).build())
            .build();

        let err = ListingPage::from_output("data/", &output).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { ref prefix, .. } if prefix == "data/"));
    }

    #[test]
    fn common_prefix_without_value_is_malformed() {
        let output = ListObjectsV2Output::builder()
            .common_prefixes(CommonPrefix::builder().build())
            .build();

        assert!(ListingPage::from_output("", &output).is_err());
    }

    #[test]
    fn request_builder() {
        let request = ListingRequest::new("bucket", "a/")
            .with_continuation_token(Some("t".into()))
            .with_max_keys(Some(5));

        assert_eq!(request.delimiter(), "/");
        assert_eq!(request.continuation_token.as_deref(), Some("t"));
        assert_eq!(request.max_keys, Some(5));
    }
}
