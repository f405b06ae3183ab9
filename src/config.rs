// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Length of a content hash or transaction id in hex characters.
pub const HEX_ID_LEN: usize = 64;

/// Maximum post text length, in Unicode scalar values.
pub const MAX_TEXT_CHARS: usize = 500;

/// Maximum number of distinct links per post.
pub const MAX_LINKS: usize = 10;

/// Maximum number of distinct images per post.
pub const MAX_IMAGES: usize = 1;

/// Tipping entry point on the tips contract.
pub const DEFAULT_TIP_FUNCTION: &str = "tip-post";

/// Domain tag mixed into every content hash. Bump on encoding changes.
pub const CONTENT_HASH_DOMAIN: &[u8] = b"frog.post.v1";
