// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Decoding of Clarity call arguments as reported by the chain API.
//!
//! Each argument may carry a human-readable `repr` (`u100000`) and/or the
//! consensus-serialized `hex` (`0x01` tag + 16-byte big-endian payload for a
//! `uint`). `repr` is tried first; `hex` is the fallback.

use byteorder::{BigEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

pub const TYPE_INT: u8 = 0x00;
pub const TYPE_UINT: u8 = 0x01;
pub const TYPE_BOOL_TRUE: u8 = 0x03;
pub const TYPE_BOOL_FALSE: u8 = 0x04;

/// One entry of `contract_call.function_args`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionArg {
    #[serde(default)]
    pub repr: Option<String>,
    #[serde(default)]
    pub hex: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClarityValue {
    Int(i128),
    UInt(u128),
    Bool(bool),
    /// A well-formed value of a type this decoder does not unpack.
    Other(u8),
}

impl ClarityValue {
    /// Parses the human-readable form: `u42`, `-7`, `42`, `true`, `false`.
    pub fn from_repr(repr: &str) -> Option<Self> {
        let repr = repr.trim();
        match repr {
            "true" => return Some(ClarityValue::Bool(true)),
            "false" => return Some(ClarityValue::Bool(false)),
            _ => {}
        }
        if let Some(digits) = repr.strip_prefix('u') {
            return crate::types::parse_decimal(digits).map(ClarityValue::UInt);
        }
        let (negative, digits) = match repr.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, repr),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let magnitude: i128 = digits.parse().ok()?;
        Some(ClarityValue::Int(if negative { -magnitude } else { magnitude }))
    }

    /// Parses the serialized form, with or without a `0x`/`0X` prefix.
    pub fn from_hex(encoded: &str) -> Option<Self> {
        let encoded = encoded.trim();
        let bare = encoded
            .strip_prefix("0x")
            .or_else(|| encoded.strip_prefix("0X"))
            .unwrap_or(encoded);
        let bytes = hex::decode(bare).ok()?;
        Self::from_bytes(&bytes)
    }

    /// Decodes one value. Bytes left over after a value of a known type make
    /// the input undecodable.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut cursor = Cursor::new(bytes);
        let tag = cursor.read_u8().ok()?;
        let value = match tag {
            TYPE_INT => ClarityValue::Int(cursor.read_i128::<BigEndian>().ok()?),
            TYPE_UINT => ClarityValue::UInt(cursor.read_u128::<BigEndian>().ok()?),
            TYPE_BOOL_TRUE => ClarityValue::Bool(true),
            TYPE_BOOL_FALSE => ClarityValue::Bool(false),
            other => return Some(ClarityValue::Other(other)),
        };
        if cursor.position() != bytes.len() as u64 {
            return None;
        }
        Some(value)
    }

    pub fn as_uint(self) -> Option<u128> {
        match self {
            ClarityValue::UInt(v) => Some(v),
            _ => None,
        }
    }
}

impl FunctionArg {
    /// Decodes the argument, `repr` first and `hex` second.
    pub fn decode(&self) -> Option<ClarityValue> {
        self.repr
            .as_deref()
            .and_then(ClarityValue::from_repr)
            .or_else(|| self.hex.as_deref().and_then(ClarityValue::from_hex))
    }

    /// The argument as an unsigned integer, or `None` if it is absent,
    /// undecodable, or of another type.
    pub fn as_uint(&self) -> Option<u128> {
        self.decode().and_then(ClarityValue::as_uint)
    }
}
