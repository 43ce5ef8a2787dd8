//! License Code Format
//!
//! A signature travels as a short printable code: the two signature
//! integers in lowercase hex, no padding, no prefix, joined by a hyphen,
//! e.g. `3f9a1c2b07-8d02e4a611`.
//!
//! Parsing is strict and happens before any curve arithmetic: a code that
//! is not exactly two hex fields is rejected as malformed here, so the
//! verifier only ever sees numeric input.

use num_bigint::BigInt;
use thiserror::Error;

use crate::crypto::Signature;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("malformed license code; expected two hex fields joined by '-'")]
    MalformedCode,
}

/// Render a signature as a license code.
pub fn encode_code(signature: &Signature) -> String {
    format!("{:x}-{:x}", signature.r, signature.s)
}

/// Parse a license code back into a signature.
///
/// Accepts exactly two non-empty hexadecimal fields split on `-`; anything
/// else fails with [`CodeError::MalformedCode`]. Range checking against the
/// curve order is the verifier's job, not the parser's.
pub fn parse_code(code: &str) -> Result<Signature, CodeError> {
    let mut fields = code.trim().split('-');
    let (r, s) = match (fields.next(), fields.next(), fields.next()) {
        (Some(r), Some(s), None) => (r, s),
        _ => return Err(CodeError::MalformedCode),
    };
    Ok(Signature::new(parse_hex_field(r)?, parse_hex_field(s)?))
}

fn parse_hex_field(field: &str) -> Result<BigInt, CodeError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodeError::MalformedCode);
    }
    BigInt::parse_bytes(field.as_bytes(), 16).ok_or(CodeError::MalformedCode)
}

// MARK: - Tests
