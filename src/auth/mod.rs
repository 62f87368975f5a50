//
//  vcs-bitbucket
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # OAuth Context and Token Persistence
//!
//! This module holds the credentials a caller threads through every
//! authorized provider call, plus the persistence hook invoked when the
//! refresh path mints a new token pair.
//!
//! The adapter owns no credential storage of its own: the caller supplies an
//! [`OAuthContext`] per call and decides where refreshed tokens land via the
//! [`TokenPersister`] callback.
//!
//! ## Module Structure
//!
//! - [`oauth`]: the refresh-and-retry request helper used by every
//!   authorized operation
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vcs_bitbucket::auth::OAuthContext;
//!
//! let ctx = OAuthContext {
//!     client_id: "consumer-key".to_string(),
//!     client_secret: "consumer-secret".to_string(),
//!     access_token: "access".to_string(),
//!     refresh_token: "refresh".to_string(),
//!     persister: Some(Arc::new(|access, refresh, expires_ts| {
//!         println!("store {access} {refresh} (expires {expires_ts})");
//!         Ok(())
//!     })),
//! };
//! assert_eq!(ctx.client_id, "consumer-key");
//! ```

use std::fmt;
use std::sync::Arc;

pub mod oauth;

pub use oauth::send_with_refresh;

/// Callback invoked after a successful token refresh.
///
/// Receives the new access token, the new refresh token, and the Unix
/// timestamp (seconds) at which the access token expires. A returned error
/// aborts the in-flight operation with
/// [`ProviderError::TokenPersist`](crate::vcs::ProviderError::TokenPersist).
pub type TokenPersister = Arc<
    dyn Fn(&str, &str, i64) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>
        + Send
        + Sync,
>;

/// Credentials threaded through every authorized provider call.
///
/// The context is owned by the caller and passed mutably: when a 401 answer
/// triggers a refresh, the helper updates `access_token` and `refresh_token`
/// in place so the remainder of the call (and subsequent calls reusing the
/// context) see the fresh pair.
///
/// # Fields
///
/// * `client_id` / `client_secret` - OAuth consumer credentials, used only
///   by the refresh call
/// * `access_token` - current bearer token
/// * `refresh_token` - token used to mint a new pair on 401; when empty the
///   401 is surfaced to the caller unchanged
/// * `persister` - optional hook that stores refreshed tokens
#[derive(Clone, Default)]
pub struct OAuthContext {
    /// OAuth consumer key.
    pub client_id: String,

    /// OAuth consumer secret.
    pub client_secret: String,

    /// Current bearer token sent with every authorized request.
    pub access_token: String,

    /// Refresh token used when the access token is rejected.
    pub refresh_token: String,

    /// Optional callback that persists a refreshed token pair.
    pub persister: Option<TokenPersister>,
}

impl fmt::Debug for OAuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthContext")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("persister", &self.persister.as_ref().map(|_| "…"))
            .finish()
    }
}
