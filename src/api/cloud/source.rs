//
//  vcs-bitbucket
//  api/cloud/source.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Source browsing and file commit operations.
//!
//! All four operations share the `/repositories/{repo}/src` endpoint family:
//!
//! - [`CloudProvider::fetch_repository_file_list`] - tree listing at a ref,
//!   filtered to blob entries (`commit_file`)
//! - [`CloudProvider::read_file_meta`] - file metadata as JSON
//! - [`CloudProvider::read_file_content`] - raw file content, verbatim
//! - [`CloudProvider::create_file`] / [`CloudProvider::overwrite_file`] -
//!   multipart form commit of a single file
//!
//! # Notes
//!
//! - A tree listing with an empty prefix requests `{sha}/` with a trailing
//!   slash, so the root tree is listed instead of matching a same-named file
//! - Create and overwrite differ only in the `parents` query parameter:
//!   empty for create, the file's last commit id for overwrite

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::api::cloud::{success_body, CloudProvider};
use crate::auth::{oauth, OAuthContext};
use crate::vcs::error::{ProviderError, Result};
use crate::vcs::{FileCommitCreate, FileMeta, RepositoryTreeNode};

/// Wire shape of one tree listing entry.
#[derive(Debug, Deserialize)]
struct TreeEntryPayload {
    path: String,
    #[serde(rename = "type")]
    node_type: String,
}

/// Node type Bitbucket assigns to blob entries.
const NODE_TYPE_BLOB: &str = "commit_file";

/// Wire shape of a file meta payload.
#[derive(Debug, Deserialize)]
struct FileMetaPayload {
    path: String,
    size: i64,
    commit: CommitRefPayload,
}

#[derive(Debug, Deserialize)]
struct CommitRefPayload {
    hash: String,
}

/// Returns the final component of a repository-relative path.
fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl CloudProvider {
    /// Lists blob entries under `file_path` at the given ref.
    ///
    /// Passing an empty `file_path` lists the tree root. Directory and
    /// symlink entries are excluded; blobs keep their response order.
    /// Follows `next` links across pages.
    pub async fn fetch_repository_file_list(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        ref_name: &str,
        file_path: &str,
    ) -> Result<Vec<RepositoryTreeNode>> {
        let url = self.api_url(&["repositories", repository_id, "src", ref_name, file_path])?;
        let entries: Vec<TreeEntryPayload> = self
            .get_paginated(ctx, instance_url, url, "source tree page")
            .await?;

        let nodes = entries
            .into_iter()
            .filter(|entry| entry.node_type == NODE_TYPE_BLOB)
            .map(|entry| RepositoryTreeNode {
                path: entry.path,
                node_type: entry.node_type,
            })
            .collect();
        Ok(nodes)
    }

    /// Reads the metadata of a file at a ref.
    ///
    /// Maps `path`, `size`, and `commit.hash`; the file name is the base
    /// name of the path.
    pub async fn read_file_meta(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        ref_name: &str,
    ) -> Result<FileMeta> {
        let url = self.api_url(&["repositories", repository_id, "src", ref_name, file_path])?;
        tracing::debug!(%url, "reading file meta");

        let response = oauth::send_with_refresh(self.client(), instance_url, ctx, |token| {
            Ok(self.client().get(url.clone()).bearer_auth(token))
        })
        .await?;

        let body = success_body(response).await?;
        let payload: FileMetaPayload =
            serde_json::from_str(&body).map_err(|source| ProviderError::Decode {
                context: "file meta",
                source,
            })?;

        Ok(FileMeta {
            name: base_name(&payload.path).to_string(),
            path: payload.path,
            size: payload.size,
            last_commit_id: payload.commit.hash,
        })
    }

    /// Reads the raw content of a file at a ref.
    ///
    /// The response body is returned verbatim regardless of content type; it
    /// is never JSON-decoded.
    pub async fn read_file_content(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        ref_name: &str,
    ) -> Result<String> {
        let url = self.api_url(&["repositories", repository_id, "src", ref_name, file_path])?;
        tracing::debug!(%url, "reading file content");

        let response = oauth::send_with_refresh(self.client(), instance_url, ctx, |token| {
            Ok(self.client().get(url.clone()).bearer_auth(token))
        })
        .await?;

        success_body(response).await
    }

    /// Creates a new file on a branch.
    ///
    /// `parents` is left empty so the commit is rejected if the path already
    /// exists on a diverged history the caller did not expect.
    pub async fn create_file(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        commit: FileCommitCreate,
    ) -> Result<()> {
        self.write_file(ctx, instance_url, repository_id, file_path, &commit, "")
            .await
    }

    /// Overwrites an existing file on a branch.
    ///
    /// Sets `parents` to [`FileCommitCreate::last_commit_id`] so the write
    /// fails if the file moved on since the caller read it.
    pub async fn overwrite_file(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        commit: FileCommitCreate,
    ) -> Result<()> {
        let parents = commit.last_commit_id.clone().unwrap_or_default();
        self.write_file(ctx, instance_url, repository_id, file_path, &commit, &parents)
            .await
    }

    /// Commits one file via the multipart `src` endpoint.
    ///
    /// The form carries a single part named `filename` whose part filename
    /// is the repository-relative path and whose content type is a generic
    /// octet stream. Any 2xx status is success; otherwise the response body
    /// is carried in the error.
    async fn write_file(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
        repository_id: &str,
        file_path: &str,
        commit: &FileCommitCreate,
        parents: &str,
    ) -> Result<()> {
        let mut url = self.api_url(&["repositories", repository_id, "src"])?;
        url.query_pairs_mut()
            .append_pair("message", &commit.commit_message)
            .append_pair("branch", &commit.branch)
            .append_pair("parents", parents);
        tracing::debug!(%url, path = file_path, "committing file");

        let response = oauth::send_with_refresh(self.client(), instance_url, ctx, |token| {
            // Multipart bodies cannot be replayed, so the form is rebuilt
            // for each attempt.
            let part = Part::bytes(commit.content.clone().into_bytes())
                .file_name(file_path.to_string())
                .mime_str("application/octet-stream")?;
            let form = Form::new().part("filename", part);
            Ok(self
                .client()
                .post(url.clone())
                .bearer_auth(token)
                .multipart(form))
        })
        .await?;

        success_body(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use reqwest::StatusCode;

    use super::base_name;
    use crate::api::cloud::testutil::{context, provider};
    use crate::vcs::error::ProviderError;
    use crate::vcs::{FileCommitCreate, FileMeta, RepositoryTreeNode};

    // Example response derived from the Bitbucket source API reference,
    // with a directory entry added to exercise filtering.
    const TREE_RESPONSE: &str = r#"
    {
      "pagelen": 10,
      "values": [
        {
          "path": "tests",
          "type": "commit_directory",
          "commit": {"type": "commit", "hash": "eefd5ef5d3df01aed629f650959d6706d54cd335"}
        },
        {
          "path": "tests/__init__.py",
          "commit": {"type": "commit", "hash": "eefd5ef5d3df01aed629f650959d6706d54cd335"},
          "attributes": [],
          "type": "commit_file",
          "size": 0
        }
      ],
      "page": 1,
      "size": 2
    }
    "#;

    #[tokio::test]
    async fn lists_blobs_at_tree_root_with_trailing_slash() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repositories/atlassian/bbql/src/eefd5ef/")
            .match_header("authorization", "Bearer token")
            .with_body(TREE_RESPONSE)
            .create_async()
            .await;

        let provider = provider(&server);
        let mut ctx = context();
        let nodes = provider
            .fetch_repository_file_list(&mut ctx, &server.url(), "atlassian/bbql", "eefd5ef", "")
            .await
            .unwrap();

        assert_eq!(
            nodes,
            vec![RepositoryTreeNode {
                path: "tests/__init__.py".to_string(),
                node_type: "commit_file".to_string(),
            }]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn lists_blobs_under_a_path_prefix() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repositories/atlassian/bbql/src/eefd5ef/tests")
            .with_body(TREE_RESPONSE)
            .create_async()
            .await;

        let provider = provider(&server);
        let mut ctx = context();
        let nodes = provider
            .fetch_repository_file_list(
                &mut ctx,
                &server.url(),
                "atlassian/bbql",
                "eefd5ef",
                "tests",
            )
            .await
            .unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path, "tests/__init__.py");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn reads_file_meta_with_basename() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repositories/atlassian/bbql/src/eefd5ef/tests/__init__.py")
            .with_body(
                r#"{
                  "path": "tests/__init__.py",
                  "commit": {
                    "type": "commit",
                    "hash": "eefd5ef5d3df01aed629f650959d6706d54cd335"
                  },
                  "attributes": [],
                  "type": "commit_file",
                  "size": 100
                }"#,
            )
            .create_async()
            .await;

        let provider = provider(&server);
        let mut ctx = context();
        let meta = provider
            .read_file_meta(
                &mut ctx,
                &server.url(),
                "atlassian/bbql",
                "tests/__init__.py",
                "eefd5ef",
            )
            .await
            .unwrap();

        assert_eq!(
            meta,
            FileMeta {
                name: "__init__.py".to_string(),
                path: "tests/__init__.py".to_string(),
                size: 100,
                last_commit_id: "eefd5ef5d3df01aed629f650959d6706d54cd335".to_string(),
            }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn reads_file_content_verbatim() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repositories/atlassian/bbql/src/eefd5ef/tests/__init__.py")
            .with_body("#!/bin/sh\nhalt")
            .create_async()
            .await;

        let provider = provider(&server);
        let mut ctx = context();
        let content = provider
            .read_file_content(
                &mut ctx,
                &server.url(),
                "atlassian/bbql",
                "tests/__init__.py",
                "eefd5ef",
            )
            .await
            .unwrap();

        assert_eq!(content, "#!/bin/sh\nhalt");
    }

    #[tokio::test]
    async fn read_surfaces_non_2xx_instead_of_empty_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repositories/atlassian/bbql/src/eefd5ef/missing.py")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let provider = provider(&server);
        let mut ctx = context();
        let err = provider
            .read_file_content(
                &mut ctx,
                &server.url(),
                "atlassian/bbql",
                "missing.py",
                "eefd5ef",
            )
            .await
            .unwrap_err();

        match err {
            ProviderError::Status { status, body, .. } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body, "not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn multipart_matchers() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::Regex(r#"name="filename"; filename="repo/path/to/image.png""#.to_string()),
            Matcher::Regex("Content-Type: application/octet-stream".to_string()),
            Matcher::Regex("halt".to_string()),
        ])
    }

    fn file_commit() -> FileCommitCreate {
        FileCommitCreate {
            branch: "main".to_string(),
            content: "#!/bin/sh\nhalt".to_string(),
            commit_message: "Initial commit".to_string(),
            last_commit_id: None,
        }
    }

    #[tokio::test]
    async fn create_places_empty_parents() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/repositories/username/slug/src")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("message".into(), "Initial commit".into()),
                Matcher::UrlEncoded("branch".into(), "main".into()),
                Matcher::UrlEncoded("parents".into(), "".into()),
            ]))
            .match_body(multipart_matchers())
            .with_status(201)
            .create_async()
            .await;

        let provider = provider(&server);
        let mut ctx = context();
        provider
            .create_file(
                &mut ctx,
                &server.url(),
                "username/slug",
                "repo/path/to/image.png",
                file_commit(),
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn overwrite_places_last_commit_id_in_parents() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/repositories/username/slug/src")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("message".into(), "Initial commit".into()),
                Matcher::UrlEncoded("branch".into(), "main".into()),
                Matcher::UrlEncoded(
                    "parents".into(),
                    "7638417db6d59f3c431d3e1f261cc637155684cd".into(),
                ),
            ]))
            .match_body(multipart_matchers())
            .with_status(200)
            .create_async()
            .await;

        let provider = provider(&server);
        let mut ctx = context();
        let mut commit = file_commit();
        commit.last_commit_id = Some("7638417db6d59f3c431d3e1f261cc637155684cd".to_string());
        provider
            .overwrite_file(
                &mut ctx,
                &server.url(),
                "username/slug",
                "repo/path/to/image.png",
                commit,
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn write_failure_carries_response_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/repositories/username/slug/src")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"type": "error", "error": {"message": "branch not found"}}"#)
            .create_async()
            .await;

        let provider = provider(&server);
        let mut ctx = context();
        let err = provider
            .create_file(
                &mut ctx,
                &server.url(),
                "username/slug",
                "repo/path/to/image.png",
                file_commit(),
            )
            .await
            .unwrap_err();

        match err {
            ProviderError::Status { status, body, .. } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert!(body.contains("branch not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn base_name_takes_final_component() {
        assert_eq!(base_name("tests/__init__.py"), "__init__.py");
        assert_eq!(base_name("README.md"), "README.md");
        assert_eq!(base_name("a/b/c.txt"), "c.txt");
    }
}
