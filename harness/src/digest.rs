//! Canonical JSON and domain-separated digests for transcripts.
//!
//! Two runs of the same strategy over the same space must produce the same
//! transcript digest on every machine. That requires one byte encoding:
//!
//! 1. Object keys sorted by byte order.
//! 2. Compact form, no whitespace.
//! 3. Strings escaped per RFC 8259 §7; non-ASCII passes through as UTF-8.
//! 4. Integers only. Floats are rejected so formatting cannot drift.
//!
//! The digest is SHA-256 over `domain || bytes`, rendered as `sha256:<hex>`.

use std::io::Write;

use sha2::{Digest as _, Sha256};

/// Domain prefix for step transcripts. Null-terminated.
pub const DOMAIN_TRANSCRIPT: &[u8] = b"WAYFIND::TRANSCRIPT::V1\0";

/// A JSON value could not be canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonError {
    #[error("non-integer number in canonical JSON: {raw}")]
    NonIntegerNumber { raw: String },
}

/// Canonical bytes of `value`.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] if any number is not an `i64`
/// or `u64`.
pub fn canonical_json_bytes(value: &serde_json::Value) -> Result<Vec<u8>, CanonError> {
    let mut buf = Vec::new();
    write_value(&mut buf, value)?;
    Ok(buf)
}

fn write_value(buf: &mut Vec<u8>, value: &serde_json::Value) -> Result<(), CanonError> {
    use serde_json::Value;

    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                let _ = write!(buf, "{i}");
            } else if let Some(u) = n.as_u64() {
                let _ = write!(buf, "{u}");
            } else {
                return Err(CanonError::NonIntegerNumber { raw: n.to_string() });
            }
        }
        Value::String(s) => write_string(buf, s),
        Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item)?;
            }
            buf.push(b']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            buf.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_string(buf, key);
                buf.push(b':');
                write_value(buf, &map[key])?;
            }
            buf.push(b'}');
        }
    }
    Ok(())
}

fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for ch in s.chars() {
        match ch {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            c if c < '\u{0020}' => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => {
                let mut utf8 = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
        }
    }
    buf.push(b'"');
}

/// Incremental domain-separated SHA-256.
///
/// Each `update` is length-prefixed so record boundaries are part of the
/// digest: `["ab","c"]` and `["a","bc"]` hash differently.
#[derive(Debug, Clone)]
pub struct DigestWriter {
    hasher: Sha256,
}

impl DigestWriter {
    #[must_use]
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    pub fn update(&mut self, record: &[u8]) {
        self.hasher.update((record.len() as u64).to_le_bytes());
        self.hasher.update(record);
    }

    /// `sha256:<hex>` of everything written so far.
    #[must_use]
    pub fn finish(self) -> String {
        format!("sha256:{}", hex::encode(self.hasher.finalize()))
    }
}
