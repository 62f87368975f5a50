//
//  vcs-bitbucket
//  api/cloud/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Repository listing.
//!
//! [`CloudProvider::fetch_all_repository_list`] walks
//! `/user/permissions/repositories`, which yields one permission entry per
//! grant. The mapping unwraps each entry's embedded repository, dedupes by
//! UUID (a user can hold several grants on the same repository), and derives
//! the browser URL from the full name.

use std::collections::HashSet;

use serde::Deserialize;

use crate::api::cloud::{CloudProvider, BITBUCKET_CLOUD_URL};
use crate::auth::OAuthContext;
use crate::vcs::error::Result;
use crate::vcs::Repository;

/// Wire shape of one `repository_permission` entry.
#[derive(Debug, Deserialize)]
struct RepositoryPermissionPayload {
    repository: RepositoryPayload,
}

/// Wire shape of the repository embedded in a permission entry.
#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    uuid: String,
    name: String,
    full_name: String,
}

impl RepositoryPayload {
    fn into_repository(self) -> Repository {
        let web_url = format!("{}/{}", BITBUCKET_CLOUD_URL, self.full_name);
        Repository {
            id: self.uuid,
            name: self.name,
            full_path: self.full_name,
            web_url,
        }
    }
}

impl CloudProvider {
    /// Lists every repository the authenticated user can access.
    ///
    /// Follows `next` links across pages, dedupes by UUID preserving
    /// first-seen order, and constructs each repository's web URL as
    /// `https://bitbucket.org/{full_name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Status`](crate::vcs::ProviderError::Status)
    /// on a non-2xx answer and
    /// [`ProviderError::Decode`](crate::vcs::ProviderError::Decode) on a
    /// malformed page.
    pub async fn fetch_all_repository_list(
        &self,
        ctx: &mut OAuthContext,
        instance_url: &str,
    ) -> Result<Vec<Repository>> {
        let url = self.api_url(&["user", "permissions", "repositories"])?;
        let entries: Vec<RepositoryPermissionPayload> = self
            .get_paginated(ctx, instance_url, url, "repository permission page")
            .await?;

        let mut seen = HashSet::new();
        let repositories = entries
            .into_iter()
            .map(|entry| entry.repository)
            .filter(|repo| seen.insert(repo.uuid.clone()))
            .map(RepositoryPayload::into_repository)
            .collect();
        Ok(repositories)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::cloud::testutil::{context, provider};
    use crate::vcs::Repository;

    // Example response taken from the Bitbucket permissions API reference.
    const PERMISSIONS_RESPONSE: &str = r#"
    {
      "pagelen": 10,
      "values": [
        {
          "type": "repository_permission",
          "user": {
            "type": "user",
            "nickname": "evzijst",
            "display_name": "Erik van Zijst",
            "uuid": "{d301aafa-d676-4ee0-88be-962be7417567}"
          },
          "repository": {
            "type": "repository",
            "name": "geordi",
            "full_name": "bitbucket/geordi",
            "uuid": "{85d08b4e-571d-44e9-a507-fa476535aa98}"
          },
          "permission": "admin"
        }
      ],
      "page": 1,
      "size": 1
    }
    "#;

    #[tokio::test]
    async fn lists_repositories_with_derived_web_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/user/permissions/repositories")
            .match_header("authorization", "Bearer token")
            .with_body(PERMISSIONS_RESPONSE)
            .create_async()
            .await;

        let provider = provider(&server);
        let mut ctx = context();
        let repos = provider
            .fetch_all_repository_list(&mut ctx, &server.url())
            .await
            .unwrap();

        assert_eq!(
            repos,
            vec![Repository {
                id: "{85d08b4e-571d-44e9-a507-fa476535aa98}".to_string(),
                name: "geordi".to_string(),
                full_path: "bitbucket/geordi".to_string(),
                web_url: "https://bitbucket.org/bitbucket/geordi".to_string(),
            }]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn dedupes_by_uuid_across_pages() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/user/permissions/repositories")
            .with_body(format!(
                r#"{{
                    "values": [
                        {{
                            "permission": "admin",
                            "repository": {{
                                "name": "geordi",
                                "full_name": "bitbucket/geordi",
                                "uuid": "{{85d08b4e-571d-44e9-a507-fa476535aa98}}"
                            }}
                        }}
                    ],
                    "next": "{}/user/permissions/repositories?page=2"
                }}"#,
                server.url()
            ))
            .create_async()
            .await;
        server
            .mock("GET", "/user/permissions/repositories")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "2".into()))
            .with_body(
                r#"{
                    "values": [
                        {
                            "permission": "write",
                            "repository": {
                                "name": "geordi",
                                "full_name": "bitbucket/geordi",
                                "uuid": "{85d08b4e-571d-44e9-a507-fa476535aa98}"
                            }
                        },
                        {
                            "permission": "read",
                            "repository": {
                                "name": "bbql",
                                "full_name": "atlassian/bbql",
                                "uuid": "{9970a9b6-2d86-413f-8555-da8e1ac0e542}"
                            }
                        }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let provider = provider(&server);
        let mut ctx = context();
        let repos = provider
            .fetch_all_repository_list(&mut ctx, &server.url())
            .await
            .unwrap();

        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["geordi", "bbql"]);
    }
}
