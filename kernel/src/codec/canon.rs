//! Canonical JSON bytes: the single serialization-for-hashing implementation.
//!
//! **Exactly one place** produces canonical JSON bytes in the workspace.
//! Round hashes, the chain seed, envelope hashes, the terminal seal,
//! constitution snapshots and judgment digests all route through this module.
//! A divergence here breaks every downstream verification, so the rules below
//! are a wire contract, not an implementation detail.
//!
//! # Canonicalization rules
//!
//! 1. Object keys are sorted lexicographically (byte order).
//! 2. Array order is preserved (it is semantically significant).
//! 3. No extraneous whitespace (compact form: `{"a":1,"b":2}`).
//! 4. Strings are JSON-escaped per RFC 8259 §7; non-control characters pass
//!    through as raw UTF-8.
//! 5. Numbers must be integers (`i64` or `u64`). Non-integer numbers (floats,
//!    NaN, Infinity) are rejected to prevent cross-platform formatting drift.
//!    Prices and amounts travel as integer minor units.
//! 6. `null`, `true`, `false` are written literally.

use std::io::Write;

use serde::Serialize;

/// Error type for canonical JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonError {
    /// A JSON number was not an integer (float, NaN, Infinity).
    #[error("non-integer number in canonical JSON: {raw}")]
    NonIntegerNumber { raw: String },
    /// A typed value could not be projected onto `serde_json::Value`.
    #[error("value is not representable as JSON: {detail}")]
    NotRepresentable { detail: String },
}

/// Produce canonical JSON bytes from a `serde_json::Value`.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] if any JSON number is not
/// representable as `i64` or `u64`.
pub fn canonical_json_bytes(value: &serde_json::Value) -> Result<Vec<u8>, CanonError> {
    let mut buf = Vec::new();
    write_value(&mut buf, value)?;
    Ok(buf)
}

/// Alias for [`canonical_json_bytes`] under the protocol's name for it.
///
/// # Errors
///
/// See [`canonical_json_bytes`].
pub fn canonicalize(value: &serde_json::Value) -> Result<Vec<u8>, CanonError> {
    canonical_json_bytes(value)
}

/// Serialize any `Serialize` type through `serde_json::Value` and
/// canonicalize the result.
///
/// # Errors
///
/// Returns [`CanonError::NotRepresentable`] if serde cannot produce a JSON
/// value (e.g. a map with non-string keys), or [`CanonError::NonIntegerNumber`]
/// if the value contains a float.
pub fn canonical_bytes_of<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonError> {
    let json = serde_json::to_value(value).map_err(|e| CanonError::NotRepresentable {
        detail: e.to_string(),
    })?;
    canonical_json_bytes(&json)
}

fn write_value(buf: &mut Vec<u8>, value: &serde_json::Value) -> Result<(), CanonError> {
    match value {
        serde_json::Value::Null => buf.extend_from_slice(b"null"),
        serde_json::Value::Bool(true) => buf.extend_from_slice(b"true"),
        serde_json::Value::Bool(false) => buf.extend_from_slice(b"false"),
        serde_json::Value::Number(n) => write_number(buf, n)?,
        serde_json::Value::String(s) => write_string(buf, s),
        serde_json::Value::Array(arr) => {
            buf.push(b'[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item)?;
            }
            buf.push(b']');
        }
        serde_json::Value::Object(map) => {
            // serde_json::Map iteration order depends on the `preserve_order`
            // feature; sort explicitly so unification elsewhere can't change us.
            let mut entries: Vec<(&String, &serde_json::Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            buf.push(b'{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_string(buf, key);
                buf.push(b':');
                write_value(buf, item)?;
            }
            buf.push(b'}');
        }
    }
    Ok(())
}

fn write_number(buf: &mut Vec<u8>, n: &serde_json::Number) -> Result<(), CanonError> {
    // i64 first (negatives), then u64 (large positives).
    if let Some(i) = n.as_i64() {
        let _ = write!(buf, "{i}");
        Ok(())
    } else if let Some(u) = n.as_u64() {
        let _ = write!(buf, "{u}");
        Ok(())
    } else {
        Err(CanonError::NonIntegerNumber {
            raw: n.to_string(),
        })
    }
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
                let mut utf8_buf = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8_buf).as_bytes());
            }
        }
    }
    buf.push(b'"');
}
