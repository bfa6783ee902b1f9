//! Recursive, suffix-filtered listing of S3 buckets.
//!
//! ```ignore
//! let client = build_client(&ClientConfig::default()).await;
//! let matches = list_matching_objects(
//!     &client,
//!     "ai2-public-datasets",
//!     "",
//!     &SuffixSet::default(),
//!     &WalkOptions::default(),
//! )
//! .await?;
//! ```

pub mod client;
pub mod error;
pub mod listing;
pub mod walk;

pub use client::{build_client, ClientConfig};
pub use error::{Error, Result};
pub use listing::{ListingPage, ListingRequest, ObjectLister};
pub use walk::{list_matching_objects, MatchRecord, Pagination, SuffixSet, WalkOptions};
