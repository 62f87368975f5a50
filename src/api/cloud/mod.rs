//
//  vcs-bitbucket
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Bitbucket Cloud Provider
//!
//! [`CloudProvider`] implements the generic [`Provider`] capability set
//! against the Bitbucket Cloud REST API v2.0. Each operation issues one
//! request (listings follow `next` links; authorized calls retry once after
//! a token refresh) and maps the JSON response into the caller's generic
//! data types.
//!
//! ## Module Organization
//!
//! - [`commits`] - commit fetch and diffstat listing
//! - [`repositories`] - repository listing
//! - [`source`] - tree listing, file meta/content reads, file writes
//!
//! ## Endpoints
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | token exchange | POST | `/site/oauth2/access_token` (instance host) |
//! | commit fetch | GET | `/2.0/repositories/{repo}/commit/{sha}` |
//! | diffstat | GET | `/2.0/repositories/{repo}/diffstat/{after}..{before}` |
//! | repo list | GET | `/2.0/user/permissions/repositories` |
//! | tree listing | GET | `/2.0/repositories/{repo}/src/{sha}/{prefix}` |
//! | file meta/content | GET | `/2.0/repositories/{repo}/src/{sha}/{path}` |
//! | file write | POST | `/2.0/repositories/{repo}/src` |
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
//! let repos = provider
//!     .fetch_all_repository_list(&mut ctx, "https://bitbucket.org")
//!     .await?;
//! for repo in repos {
//!     println!("{} -> {}", repo.full_path, repo.web_url);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::common::Paginated;
use crate::auth::{oauth, OAuthContext};
use crate::vcs::error::{ProviderError, Result};
use crate::vcs::{
    Commit, FileCommitCreate, FileDiff, FileMeta, OAuthExchange, OAuthToken, Provider,
    ProviderConfig, Repository, RepositoryTreeNode,
};

pub mod commits;
pub mod repositories;
pub mod source;

/// Web host of Bitbucket Cloud, used to construct repository browser URLs.
pub const BITBUCKET_CLOUD_URL: &str = "https://bitbucket.org";

/// Default base URL of the Bitbucket Cloud REST API.
pub const BITBUCKET_CLOUD_API_URL: &str = "https://api.bitbucket.org/2.0";

/// The Bitbucket Cloud implementation of the [`Provider`] capability set.
///
/// Holds only the construction-time [`ProviderConfig`]; credentials arrive
/// per call in an [`OAuthContext`] and no state is retained between calls.
pub struct CloudProvider {
    config: ProviderConfig,
}

impl CloudProvider {
    /// Creates a provider from a configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use vcs_bitbucket::api::cloud::CloudProvider;
    /// use vcs_bitbucket::vcs::ProviderConfig;
    ///
    /// let provider = CloudProvider::new(ProviderConfig::default());
    /// ```
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    /// The HTTP client supplied by the caller.
    pub(crate) fn client(&self) -> &Client {
        &self.config.client
    }

    /// Builds an API URL from path segments.
    ///
    /// Each segment is split on `/` and the pieces are appended with
    /// standard URL path escaping, so repository ids (`workspace/slug`) and
    /// file paths keep their separators while unsafe characters are
    /// percent-encoded. An empty segment produces a trailing slash, which
    /// the tree-root listing relies on.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_url)?;
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| ProviderError::InvalidBaseUrl(self.config.api_url.clone()))?;
            parts.pop_if_empty();
            for segment in segments {
                for piece in segment.split('/') {
                    parts.push(piece);
                }
            }
        }
        Ok(url)
    }

    /// Fetches a paginated listing, following `next` links until exhausted.
    ///
    /// Page envelopes are decoded as [`Paginated<T>`] and their `values`
    /// concatenated in response order.
    pub(crate) async fn get_paginated<T: DeserializeOwned>(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        first_page: Url,
        context: &'static str,
    ) -> Result<Vec<T>> {
        let mut values = Vec::new();
        let mut next = Some(first_page.to_string());

        while let Some(page_url) = next {
            tracing::debug!(url = %page_url, "fetching list page");
            let response = oauth::send_with_refresh(self.client(), instance_url, ctx, |token| {
                Ok(self.client().get(&page_url).bearer_auth(token))
            })
            .await?;

            let body = success_body(response).await?;
            let page: Paginated<T> = serde_json::from_str(&body)
                .map_err(|source| ProviderError::Decode { context, source })?;
            values.extend(page.values);
            next = page.next;
        }

        Ok(values)
    }

    /// Exchanges an authorization code for an [`OAuthToken`].
    ///
    /// POSTs `grant_type=authorization_code&code=<code>` to the instance's
    /// token endpoint, authenticating the consumer with
    /// `base64(client_id:client_secret)` in the Authorization header. On 200
    /// the token pair and expiry are decoded; `created_at` is set to the
    /// current time and `expires_ts` derived from it.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Status`] on any non-200 answer and
    /// [`ProviderError::Decode`] on a malformed body.
    pub async fn exchange_oauth_token(
        &self,
        instance_url: &str,
        exchange: &OAuthExchange,
    ) -> Result<OAuthToken> {
        let url = oauth::token_endpoint_url(instance_url);
        tracing::debug!(%url, "exchanging authorization code");

        let response = self
            .client()
            .post(&url)
            .header(
                header::AUTHORIZATION,
                oauth::token_endpoint_credentials(&exchange.client_id, &exchange.client_secret),
            )
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", exchange.code.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(ProviderError::Status { url, status, body });
        }

        let payload: oauth::TokenPayload =
            serde_json::from_str(&body).map_err(|source| ProviderError::Decode {
                context: "oauth token",
                source,
            })?;

        let created_at = Utc::now().timestamp();
        Ok(OAuthToken {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            expires_in: payload.expires_in,
            created_at,
            expires_ts: created_at + payload.expires_in,
        })
    }
}

/// Reads the response body, turning any non-2xx status into an error.
///
/// The body is preserved verbatim in [`ProviderError::Status`] so callers
/// can surface the API's diagnostics.
pub(crate) async fn success_body(response: reqwest::Response) -> Result<String> {
    let url = response.url().to_string();
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::Status { url, status, body });
    }
    Ok(body)
}

#[async_trait]
impl Provider for CloudProvider {
    async fn exchange_oauth_token(
        &self,
        instance_url: &str,
        exchange: &OAuthExchange,
    ) -> Result<OAuthToken> {
        CloudProvider::exchange_oauth_token(self, instance_url, exchange).await
    }

    async fn fetch_commit_by_id(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        commit_id: &str,
    ) -> Result<Commit> {
        CloudProvider::fetch_commit_by_id(self, ctx, instance_url, repository_id, commit_id).await
    }

    async fn get_diff_file_list(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        before_commit: &str,
        after_commit: &str,
    ) -> Result<Vec<FileDiff>> {
        CloudProvider::get_diff_file_list(
            self,
            ctx,
            instance_url,
            repository_id,
            before_commit,
            after_commit,
        )
        .await
    }

    async fn fetch_all_repository_list(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
    ) -> Result<Vec<Repository>> {
        CloudProvider::fetch_all_repository_list(self, ctx, instance_url).await
    }

    async fn fetch_repository_file_list(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        ref_name: &str,
        file_path: &str,
    ) -> Result<Vec<RepositoryTreeNode>> {
        CloudProvider::fetch_repository_file_list(
            self,
            ctx,
            instance_url,
            repository_id,
            ref_name,
            file_path,
        )
        .await
    }

    async fn create_file(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        commit: FileCommitCreate,
    ) -> Result<()> {
        CloudProvider::create_file(self, ctx, instance_url, repository_id, file_path, commit).await
    }

    async fn overwrite_file(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        commit: FileCommitCreate,
    ) -> Result<()> {
        CloudProvider::overwrite_file(self, ctx, instance_url, repository_id, file_path, commit)
            .await
    }

    async fn read_file_meta(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        ref_name: &str,
    ) -> Result<FileMeta> {
        CloudProvider::read_file_meta(self, ctx, instance_url, repository_id, file_path, ref_name)
            .await
    }

    async fn read_file_content(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        ref_name: &str,
    ) -> Result<String> {
        CloudProvider::read_file_content(
            self,
            ctx,
            instance_url,
            repository_id,
            file_path,
            ref_name,
        )
        .await
    }
}
