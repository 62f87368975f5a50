//
//  vcs-bitbucket
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Bitbucket Cloud VCS Provider
//!
//! An adapter between a generic version-control capability interface and the
//! Bitbucket Cloud REST API v2.0: OAuth token exchange and refresh,
//! repository listing, tree and file retrieval, commit lookup, diffstat
//! listing, and file create/overwrite.
//!
//! ## Overview
//!
//! The crate exposes one capability-set implementation,
//! [`CloudProvider`](api::cloud::CloudProvider), behind the shared
//! [`Provider`](vcs::Provider) trait. The caller supplies the HTTP client
//! and OAuth credentials per call; the adapter holds no state between calls,
//! spawns no background work, and caches nothing.
//!
//! ## Module Structure
//!
//! - [`vcs`]: the generic capability trait, value objects, and error type
//! - [`api`]: Bitbucket Cloud request builders and response decoders
//! - [`auth`]: the per-call OAuth context and the refresh-and-retry helper
//!
//! ## Example
//!
//! ```rust,no_run
//! use vcs_bitbucket::api::cloud::CloudProvider;
//! use vcs_bitbucket::auth::OAuthContext;
//! use vcs_bitbucket::vcs::{Provider, ProviderConfig};
//!
//! # async fn example() -> vcs_bitbucket::vcs::error::Result<()> {
//! let provider = CloudProvider::new(ProviderConfig::default());
//! let mut ctx = OAuthContext {
//!     access_token: "token".to_string(),
//!     refresh_token: "refresh".to_string(),
//!     ..Default::default()
//! };
//!
//! let content = provider
//!     .read_file_content(
//!         &mut ctx,
//!         "https://bitbucket.org",
//!         "atlassian/bbql",
//!         "tests/__init__.py",
//!         "eefd5ef",
//!     )
//!     .await?;
//! println!("{content}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`vcs::error::Result`]. Transport failures are
//! propagated unchanged; non-2xx answers carry the status and response body;
//! decode failures name the payload that was malformed. No partial results
//! are produced, and nothing is retried except the single
//! refresh-then-retry on a 401 answer.

/// Bitbucket REST API layer: request builders and response decoders.
pub mod api;

/// OAuth context, token persistence hook, and the refresh-and-retry helper.
pub mod auth;

/// Generic VCS capability surface: the provider trait and value objects.
pub mod vcs;

pub use api::cloud::CloudProvider;
pub use auth::OAuthContext;
pub use vcs::{Provider, ProviderConfig, ProviderError};

/// Crate version, derived from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
