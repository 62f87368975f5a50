//
//  vcs-bitbucket
//  vcs/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Error types for VCS provider operations.
//!
//! Every operation on a [`Provider`](super::Provider) resolves to exactly one
//! of the variants defined here. There are no partial results: an operation
//! either fully succeeds or returns a [`ProviderError`] with no result.
//!
//! # Error Categories
//!
//! | Variant | Cause |
//! |---------|-------|
//! | [`Transport`](ProviderError::Transport) | Network, DNS, or timeout failure from the HTTP client |
//! | [`Status`](ProviderError::Status) | Non-2xx response from the API |
//! | [`Decode`](ProviderError::Decode) | Response JSON did not match the expected shape |
//! | [`MissingField`](ProviderError::MissingField) | Response JSON parsed but a required field was absent |
//! | [`InvalidDate`](ProviderError::InvalidDate) | Commit date was not valid RFC 3339 |
//! | [`UnsupportedDiffStatus`](ProviderError::UnsupportedDiffStatus) | Diffstat status outside the known set |
//! | [`Refresh`](ProviderError::Refresh) | The token refresh call itself failed |
//! | [`TokenPersist`](ProviderError::TokenPersist) | The caller's token persistence callback failed |
//! | [`Url`](ProviderError::Url) | A request URL could not be constructed |

use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Unified error type for all provider operations.
///
/// Transport failures are propagated unchanged from the underlying HTTP
/// client. HTTP status errors carry the status code and the raw response
/// body for diagnostics. Decode errors name the payload that failed so the
/// caller can tell which operation produced malformed JSON.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-level failure (DNS, connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("unexpected status {status} from {url}: {body}")]
    Status {
        /// The request URL that produced the response.
        url: String,
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The raw response body, kept verbatim for diagnostics.
        body: String,
    },

    /// The response body could not be deserialized into the expected shape.
    #[error("failed to decode {context}: {source}")]
    Decode {
        /// Which payload failed to decode (e.g. `"commit"`, `"diffstat page"`).
        context: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed but a field the mapping requires was absent.
    #[error("missing field {field} in {context}")]
    MissingField {
        /// Which payload the field was expected in.
        context: &'static str,
        /// Dotted path of the missing field.
        field: &'static str,
    },

    /// A commit `date` field was not valid RFC 3339.
    #[error("invalid commit date {value:?}: {source}")]
    InvalidDate {
        /// The raw date string from the response.
        value: String,
        /// The underlying chrono parse error.
        #[source]
        source: chrono::ParseError,
    },

    /// A diffstat entry carried a `status` outside the known set
    /// (`added`, `modified`, `removed`).
    #[error("unsupported diffstat status {0:?}")]
    UnsupportedDiffStatus(String),

    /// The token refresh call returned a non-200 status.
    #[error("token refresh failed with status {status}: {body}")]
    Refresh {
        /// The HTTP status code of the refresh response.
        status: StatusCode,
        /// The raw refresh response body.
        body: String,
    },

    /// The caller-supplied token persistence callback returned an error.
    #[error("failed to persist refreshed token: {0}")]
    TokenPersist(String),

    /// A request URL could not be built from the configured base.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The configured API base URL cannot carry path segments.
    #[error("api base url cannot be a base: {0}")]
    InvalidBaseUrl(String),
}
