//
//  vcs-bitbucket
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Pagination envelope for Bitbucket Cloud list responses.
//!
//! Bitbucket Cloud uses cursor-based pagination: every list response wraps
//! its items in an envelope carrying a complete `next` URL. A listing is
//! exhausted by following `next` until it is absent.
//!
//! # Example
//!
//! ```rust
//! use serde::Deserialize;
//! use vcs_bitbucket::api::common::Paginated;
//!
//! #[derive(Deserialize)]
//! struct Entry {
//!     path: String,
//! }
//!
//! let json = r#"{
//!     "pagelen": 10,
//!     "values": [{"path": "setup.py"}],
//!     "page": 1,
//!     "size": 1
//! }"#;
//!
//! let page: Paginated<Entry> = serde_json::from_str(json).unwrap();
//! assert_eq!(page.values.len(), 1);
//! assert!(!page.has_next());
//! ```

use serde::Deserialize;

/// A single page of a Bitbucket Cloud list response.
///
/// # Type Parameters
///
/// - `T` - The type of items contained in the `values` array
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `values` | Items in the current page |
/// | `page` | Current page number (1-indexed), when reported |
/// | `pagelen` | Page size limit, when reported |
/// | `size` | Total item count across pages, when reported |
/// | `next` | Complete URL of the next page, absent on the last page |
///
/// # Notes
///
/// - `size` is omitted by some endpoints for performance
/// - `next` is a full URL and can be requested directly
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    /// Items in the current page. May be empty.
    pub values: Vec<T>,

    /// Current page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of items per page.
    #[serde(default)]
    pub pagelen: Option<u32>,

    /// Total number of items across all pages.
    #[serde(default)]
    pub size: Option<u32>,

    /// URL of the next page of results, absent on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> Paginated<T> {
    /// Returns `true` when another page of results is available.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns the URL of the next page, if any.
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }
}
