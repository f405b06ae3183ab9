// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.

use core::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{parse_hex_id, parse_positive, scalar::decimal};
use crate::error::{TipError, TipResult};

/// 64-char lowercase hex digest of a normalized post. Primary key for posts.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    pub fn parse(raw: &str) -> TipResult<Self> {
        parse_hex_id(raw)
            .map(Self)
            .ok_or_else(|| TipError::invalid("invalid contentHash"))
    }

    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentHash {
    type Error = TipError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentHash> for String {
    fn from(h: ContentHash) -> Self {
        h.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External transaction identifier, 64-char lowercase hex without prefix.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxId(String);

impl TxId {
    pub fn parse(raw: &str) -> TipResult<Self> {
        parse_hex_id(raw)
            .map(Self)
            .ok_or_else(|| TipError::invalid("invalid txid"))
    }

    /// Chain APIs report ids as `0x`-prefixed hex.
    pub fn from_chain(raw: &str) -> TipResult<Self> {
        let bare = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);
        Self::parse(bare)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TxId {
    type Error = TipError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TxId> for String {
    fn from(t: TxId) -> Self {
        t.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-chain post id (Clarity `uint`). Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PostId(pub u128);

impl PostId {
    pub fn parse(raw: &str) -> TipResult<Self> {
        parse_positive(raw)
            .map(Self)
            .ok_or_else(|| TipError::invalid("invalid postId"))
    }

    pub fn get(self) -> u128 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for PostId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        decimal::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match decimal::deserialize(deserializer)? {
            0 => Err(serde::de::Error::custom("postId must be positive")),
            v => Ok(PostId(v)),
        }
    }
}
