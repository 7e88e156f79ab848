// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod fetcher;

pub use self::fetcher::{BlockFetcher, BlockstoreFetcher, FetchError};
