//
//  vcs-bitbucket
//  vcs/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Generic VCS Capability Surface
//!
//! This module defines the provider-agnostic contract a version-control
//! integration exposes: the [`Provider`] trait and the value objects its
//! operations exchange. The Bitbucket Cloud implementation lives in
//! [`api::cloud`](crate::api::cloud); other hosting platforms would plug in
//! behind the same trait.
//!
//! ## Value Objects
//!
//! Every type here is a pure projection of one API response. Entities are
//! immutable once constructed, are never mutated by the adapter, and do not
//! outlive the call that produced them.
//!
//! - [`OAuthToken`] — access/refresh token pair with expiry bookkeeping
//! - [`Commit`] — commit id, author display name, creation timestamp
//! - [`FileDiff`] — changed path plus its [`FileDiffType`]
//! - [`Repository`] — stable id, short name, full slug path, web URL
//! - [`RepositoryTreeNode`] — blob entry in a tree listing
//! - [`FileMeta`] — file name, path, size, last commit id
//! - [`FileCommitCreate`] — input for a file create/overwrite commit
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
//!     ..Default::default()
//! };
//!
//! let commit = provider
//!     .fetch_commit_by_id(&mut ctx, "https://bitbucket.org", "workspace/repo", "f7591a1")
//!     .await?;
//! println!("{} by {}", commit.id, commit.author_name);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::Client;

use crate::auth::OAuthContext;

pub mod error;

pub use error::{ProviderError, Result};

/// Input parameters for exchanging an OAuth authorization code for tokens.
///
/// # Fields
///
/// * `client_id` - OAuth consumer key from the Bitbucket workspace settings
/// * `client_secret` - OAuth consumer secret
/// * `code` - The authorization code returned by the consent redirect
/// * `redirect_url` - The redirect URL the code was issued against
#[derive(Debug, Clone, Default)]
pub struct OAuthExchange {
    /// OAuth consumer key.
    pub client_id: String,

    /// OAuth consumer secret.
    pub client_secret: String,

    /// Authorization code to exchange.
    pub code: String,

    /// Redirect URL the authorization code was issued against.
    pub redirect_url: String,
}

/// An OAuth access/refresh token pair with expiry bookkeeping.
///
/// Produced by [`Provider::exchange_oauth_token`] and by the refresh path of
/// the authorized request helper. `created_at` is set to the wall-clock time
/// of the exchange; `expires_ts` is `created_at + expires_in`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OAuthToken {
    /// Bearer token for authenticated API calls.
    pub access_token: String,

    /// Token used to obtain a new access token once this one expires.
    pub refresh_token: String,

    /// Lifetime of the access token in seconds, as reported by the server.
    pub expires_in: i64,

    /// Unix timestamp (seconds) at which the token was obtained.
    pub created_at: i64,

    /// Unix timestamp (seconds) at which the token expires.
    pub expires_ts: i64,
}

/// A single commit, projected from the provider's commit payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full commit hash.
    pub id: String,

    /// Display name of the commit author.
    pub author_name: String,

    /// Commit creation time as Unix epoch seconds, derived from the
    /// provider's RFC 3339 date field.
    pub created_ts: i64,
}

/// The kind of change a [`FileDiff`] describes.
///
/// Derived from a diffstat entry's `status` field. Statuses outside this set
/// surface as [`ProviderError::UnsupportedDiffStatus`] rather than silently
/// defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDiffType {
    /// The file was added in the target commit.
    Added,

    /// The file existed before and its content changed.
    Modified,

    /// The file was removed in the target commit.
    Removed,
}

/// One changed file between two commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Repository-relative path of the changed file.
    pub path: String,

    /// The kind of change.
    pub diff_type: FileDiffType,
}

/// A repository visible to the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Stable identifier (for Bitbucket Cloud, the UUID including braces).
    pub id: String,

    /// Short repository name.
    pub name: String,

    /// Full slug path in `workspace/repository-name` form.
    pub full_path: String,

    /// Browser URL of the repository.
    pub web_url: String,
}

/// One blob entry in a repository tree listing.
///
/// Directory and symlink entries are excluded from listings; only blobs
/// (`commit_file` on Bitbucket Cloud) are returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTreeNode {
    /// Repository-relative path of the blob.
    pub path: String,

    /// Provider-native node type string (e.g. `commit_file`).
    pub node_type: String,
}

/// Metadata for a single file at a given ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Base name of the file (final path component).
    pub name: String,

    /// Repository-relative path of the file.
    pub path: String,

    /// File size in bytes.
    pub size: i64,

    /// Hash of the last commit that touched the file.
    pub last_commit_id: String,
}

/// Input parameters for a file create or overwrite commit.
///
/// The sole distinguishing input between create and overwrite is
/// `last_commit_id`: empty for create, set to the file's current last commit
/// for an optimistic-concurrency overwrite.
#[derive(Debug, Clone, Default)]
pub struct FileCommitCreate {
    /// Target branch for the commit.
    pub branch: String,

    /// Raw file content to commit.
    pub content: String,

    /// Commit message.
    pub commit_message: String,

    /// Parent commit id for overwrite; `None` (or empty) for create.
    pub last_commit_id: Option<String>,
}

/// Construction-time configuration for a provider.
///
/// The caller owns the HTTP client and its reuse/locking policy; the
/// provider holds no other state between calls. `api_url` exists so tests
/// and self-hosted gateways can point the provider at a different base.
///
/// # Example
///
/// ```rust,no_run
/// use vcs_bitbucket::vcs::ProviderConfig;
///
/// let config = ProviderConfig::default();
/// assert_eq!(config.api_url, "https://api.bitbucket.org/2.0");
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// The HTTP client used for every outbound request.
    pub client: Client,

    /// Base URL of the provider's REST API.
    pub api_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client: Client::new(),
            api_url: crate::api::cloud::BITBUCKET_CLOUD_API_URL.to_string(),
        }
    }
}

/// The capability set a version-control provider exposes.
///
/// Each operation issues one outbound request (paginated listings follow
/// `next` links, and authorized calls may retry once after a token refresh)
/// and blocks the calling task until a response or transport error arrives.
/// Cancellation is via the caller's runtime; the adapter spawns no
/// background work.
///
/// The `instance_url` parameter is the web host of the provider instance
/// (e.g. `https://bitbucket.org`); it is used for the OAuth token endpoint.
/// API calls go to the base URL from [`ProviderConfig`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// Exchanges an authorization code for an [`OAuthToken`].
    async fn exchange_oauth_token(
        &self,
        instance_url: &str,
        exchange: &OAuthExchange,
    ) -> Result<OAuthToken>;

    /// Fetches a single commit by (possibly abbreviated) hash.
    async fn fetch_commit_by_id(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        commit_id: &str,
    ) -> Result<Commit>;

    /// Lists the files changed between two commits.
    async fn get_diff_file_list(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        before_commit: &str,
        after_commit: &str,
    ) -> Result<Vec<FileDiff>>;

    /// Lists every repository the authenticated user can access.
    async fn fetch_all_repository_list(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
    ) -> Result<Vec<Repository>>;

    /// Lists blob entries under `file_path` (or the tree root when empty)
    /// at the given ref.
    async fn fetch_repository_file_list(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        ref_name: &str,
        file_path: &str,
    ) -> Result<Vec<RepositoryTreeNode>>;

    /// Creates a new file on a branch.
    async fn create_file(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        commit: FileCommitCreate,
    ) -> Result<()>;

    /// Overwrites an existing file on a branch, using
    /// [`FileCommitCreate::last_commit_id`] as the expected parent.
    async fn overwrite_file(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        commit: FileCommitCreate,
    ) -> Result<()>;

    /// Reads the metadata of a file at a ref.
    async fn read_file_meta(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        ref_name: &str,
    ) -> Result<FileMeta>;

    /// Reads the raw content of a file at a ref, verbatim.
    async fn read_file_content(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        ref_name: &str,
    ) -> Result<String>;
}
