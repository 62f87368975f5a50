//
//  vcs-bitbucket
//  api/cloud/commits.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Commit fetch and diffstat operations.
//!
//! Two read operations live here:
//!
//! - [`CloudProvider::fetch_commit_by_id`] - GET
//!   `/repositories/{repo}/commit/{sha}`, projecting the payload into a
//!   generic [`Commit`]
//! - [`CloudProvider::get_diff_file_list`] - GET
//!   `/repositories/{repo}/diffstat/{after}..{before}`, projecting each
//!   diffstat entry into a [`FileDiff`]
//!
//! # Notes
//!
//! - Commit dates arrive as RFC 3339 and are converted to epoch seconds
//! - Diffstat statuses outside `added`/`modified`/`removed` surface as
//!   [`ProviderError::UnsupportedDiffStatus`] rather than silently defaulting

use chrono::DateTime;
use serde::Deserialize;

use crate::api::cloud::{success_body, CloudProvider};
use crate::auth::{oauth, OAuthContext};
use crate::vcs::error::{ProviderError, Result};
use crate::vcs::{Commit, FileDiff, FileDiffType};

/// Wire shape of a commit payload.
#[derive(Debug, Deserialize)]
struct CommitPayload {
    hash: String,
    date: String,
    author: AuthorPayload,
}

/// Wire shape of a commit author.
///
/// `user` is absent when the author is not a Bitbucket account (raw
/// signatures only); the mapping treats that as a missing field rather than
/// inventing a display name.
#[derive(Debug, Deserialize)]
struct AuthorPayload {
    #[serde(default)]
    user: Option<UserPayload>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    display_name: String,
}

impl CommitPayload {
    fn into_commit(self) -> Result<Commit> {
        let author_name = self
            .author
            .user
            .map(|user| user.display_name)
            .ok_or(ProviderError::MissingField {
                context: "commit",
                field: "author.user.display_name",
            })?;

        let created_ts = DateTime::parse_from_rfc3339(&self.date)
            .map_err(|source| ProviderError::InvalidDate {
                value: self.date.clone(),
                source,
            })?
            .timestamp();

        Ok(Commit {
            id: self.hash,
            author_name,
            created_ts,
        })
    }
}

/// Wire shape of one diffstat entry.
#[derive(Debug, Deserialize)]
struct DiffStatPayload {
    status: String,
    #[serde(default)]
    old: Option<DiffStatFile>,
    #[serde(default)]
    new: Option<DiffStatFile>,
}

#[derive(Debug, Deserialize)]
struct DiffStatFile {
    path: String,
}

impl DiffStatPayload {
    fn into_file_diff(self) -> Result<FileDiff> {
        let diff_type = match self.status.as_str() {
            "added" => FileDiffType::Added,
            "modified" => FileDiffType::Modified,
            "removed" => FileDiffType::Removed,
            _ => return Err(ProviderError::UnsupportedDiffStatus(self.status)),
        };

        // The new path wins; the old path only remains for removals.
        let path = self
            .new
            .or(self.old)
            .map(|file| file.path)
            .ok_or(ProviderError::MissingField {
                context: "diffstat",
                field: "new.path",
            })?;

        Ok(FileDiff { path, diff_type })
    }
}

impl CloudProvider {
    /// Fetches a single commit by (possibly abbreviated) hash.
    ///
    /// Maps `hash` to the commit id, `author.user.display_name` to the
    /// author name, and the RFC 3339 `date` field to epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Status`] on a non-2xx answer,
    /// [`ProviderError::Decode`] on a malformed body, and
    /// [`ProviderError::MissingField`] when the author has no linked user.
    pub async fn fetch_commit_by_id(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        commit_id: &str,
    ) -> Result<Commit> {
        let url = self.api_url(&["repositories", repository_id, "commit", commit_id])?;
        tracing::debug!(%url, "fetching commit");

        let response = oauth::send_with_refresh(self.client(), instance_url, ctx, |token| {
            Ok(self.client().get(url.clone()).bearer_auth(token))
        })
        .await?;

        let body = success_body(response).await?;
        let payload: CommitPayload =
            serde_json::from_str(&body).map_err(|source| ProviderError::Decode {
                context: "commit",
                source,
            })?;
        payload.into_commit()
    }

    /// Lists the files changed between two commits.
    ///
    /// Follows `next` links across diffstat pages and preserves response
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnsupportedDiffStatus`] for a status outside
    /// the known set, in addition to the usual transport/status/decode
    /// errors.
    pub async fn get_diff_file_list(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        before_commit: &str,
        after_commit: &str,
    ) -> Result<Vec<FileDiff>> {
        let revspec = format!("{}..{}", after_commit, before_commit);
        let url = self.api_url(&["repositories", repository_id, "diffstat", &revspec])?;

        let entries: Vec<DiffStatPayload> = self
            .get_paginated(ctx, instance_url, url, "diffstat page")
            .await?;

        entries
            .into_iter()
            .map(DiffStatPayload::into_file_diff)
            .collect()
    }
}
