//
//  vcs-bitbucket
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Bitbucket REST API Layer
//!
//! This module contains the HTTP-facing half of the crate: request builders,
//! wire types, and response decoders for the Bitbucket Cloud REST API v2.0.
//!
//! ## Architecture
//!
//! - [`cloud`]: the [`CloudProvider`](cloud::CloudProvider) implementation
//!   of the generic [`Provider`](crate::vcs::Provider) trait, organized by
//!   resource (commits, repositories, source)
//! - [`common`]: shared response plumbing (the Cloud pagination envelope)
//!
//! Each operation maps to exactly one endpoint; listings follow `next` links
//! across pages. There is no caching and no state between calls.

/// Bitbucket Cloud API v2.0 provider implementation.
///
/// Contains the [`CloudProvider`](cloud::CloudProvider) struct, its wire
/// types, and the per-resource operation implementations.
pub mod cloud;

/// Shared API plumbing.
///
/// Currently the Cloud pagination envelope and its iteration helpers.
pub mod common;
