//
//  vcs-bitbucket
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/21.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Shared response types for the Bitbucket Cloud API.
//!
//! Currently this is the pagination envelope every list endpoint wraps its
//! results in. See [`Paginated`] for the iteration contract.

mod pagination;

pub use pagination::*;
