//! Depth-first walk over `/`-delimited prefixes, keeping keys with accepted suffixes.

use std::collections::HashSet;
use std::fmt;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::listing::{ListingRequest, ObjectLister};

/// Suffixes accepted when none are given.
pub const DEFAULT_SUFFIXES: &[&str] = &[".parquet", ".csv", ".txt", ".tar"];

/// One object whose key ended with an accepted suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Last `/`-separated segment of the key.
    pub filename: String,
    /// `s3://{bucket}/{key}`
    pub full_path: String,
}

impl MatchRecord {
    pub fn new(bucket: &str, key: &str) -> Self {
        let filename = key.rsplit_once('/').map_or(key, |(_, name)| name);
        Self {
            filename: filename.to_owned(),
            full_path: format!("s3://{bucket}/{key}"),
        }
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filename: {}, Full Path: {}", self.filename, self.full_path)
    }
}

/// Literal, case-sensitive key suffixes. An empty set accepts nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixSet(Vec<String>);

impl SuffixSet {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(suffixes.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, key: &str) -> bool {
        self.0.iter().any(|suffix| key.ends_with(suffix.as_str()))
    }
}

impl Default for SuffixSet {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIXES.iter().copied())
    }
}

impl<S: Into<String>> FromIterator<S> for SuffixSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// How many listing pages to read per prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pagination {
    /// Only the first page. Entries past a truncated page are skipped.
    #[default]
    FirstPage,
    /// Follow continuation tokens until the prefix is exhausted.
    AllPages,
}

#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    pub pagination: Pagination,
    /// Page size hint sent with every request.
    pub max_keys: Option<i32>,
}

impl WalkOptions {
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_max_keys(mut self, max_keys: Option<i32>) -> Self {
        self.max_keys = max_keys;
        self
    }
}

/// Lists every object under `start_prefix` whose key ends with one of `suffixes`.
///
/// Records come back in discovery order: the keys of a prefix first, then
/// each sub-prefix in turn, as ordered by the service. The first listing
/// error aborts the walk and is returned as is.
pub async fn list_matching_objects<L>(
    lister: &L,
    bucket: &str,
    start_prefix: &str,
    suffixes: &SuffixSet,
    options: &WalkOptions,
) -> Result<Vec<MatchRecord>>
where
    L: ObjectLister + ?Sized,
{
    let walker = Walker {
        lister,
        bucket,
        suffixes,
        options,
    };

    let mut matches = Vec::new();
    walker.visit(start_prefix.to_owned(), &mut matches).await?;

    info!(
        bucket,
        prefix = start_prefix,
        matches = matches.len(),
        "walk finished"
    );
    Ok(matches)
}

struct Walker<'a, L: ?Sized> {
    lister: &'a L,
    bucket: &'a str,
    suffixes: &'a SuffixSet,
    options: &'a WalkOptions,
}

impl<'a, L> Walker<'a, L>
where
    L: ObjectLister + ?Sized,
{
    fn visit<'s>(
        &'s self,
        prefix: String,
        matches: &'s mut Vec<MatchRecord>,
    ) -> BoxFuture<'s, Result<()>> {
        async move {
            let (keys, sub_prefixes) = self.list_prefix(&prefix).await?;

            debug!(
                prefix = %prefix,
                keys = keys.len(),
                sub_prefixes = sub_prefixes.len(),
                "listed prefix"
            );

            matches.extend(
                keys.iter()
                    .filter(|key| self.suffixes.matches(key))
                    .map(|key| MatchRecord::new(self.bucket, key)),
            );

            for sub_prefix in sub_prefixes {
                self.visit(sub_prefix, matches).await?;
            }

            Ok(())
        }
        .boxed()
    }

    async fn list_prefix(&self, prefix: &str) -> Result<(Vec<String>, Vec<String>)> {
        let mut request =
            ListingRequest::new(self.bucket, prefix).with_max_keys(self.options.max_keys);
        let mut keys = Vec::new();
        let mut sub_prefixes = Vec::new();
        let mut seen_tokens = HashSet::new();

        loop {
            let page = self.lister.list_page(&request).await?;
            keys.extend(page.keys);
            sub_prefixes.extend(page.common_prefixes);

            if !page.is_truncated {
                break;
            }

            match (self.options.pagination, page.next_continuation_token) {
                (Pagination::AllPages, Some(token)) => {
                    if !seen_tokens.insert(token.clone()) {
                        warn!(prefix, token = %token, "continuation token repeated, stopping");
                        break;
                    }
                    request = request.with_continuation_token(Some(token));
                }
                (Pagination::AllPages, None) => {
                    warn!(prefix, "truncated listing without a continuation token");
                    break;
                }
                (Pagination::FirstPage, _) => {
                    warn!(prefix, "listing truncated, remaining entries were not fetched");
                    break;
                }
            }
        }

        Ok((keys, sub_prefixes))
    }
}
