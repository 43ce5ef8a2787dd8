//! License Layer
//!
//! Everything between human-entered license text and the signature
//! primitives: canonical text composition, the salted hash derivation, and
//! the printable code format.

mod code;
mod hash;

pub use code::{encode_code, parse_code, CodeError};
pub use hash::{compute_hash, Salt, SaltError, HASH_BITS, SALT_LEN, SALT_MODULUS};

/// Characters that would collide with the field separator or shell quoting;
/// replaced with `_` in each field before composition.
const RESERVED: [char; 3] = ['&', '"', '\\'];

/// Compose canonical license text from the holder's details.
///
/// Fields are trimmed, reserved characters are replaced with `_`, and the
/// result is `first&last&email`. Case is preserved; the hash derivation is
/// case-insensitive anyway.
pub fn compose_text(first: &str, last: &str, email: &str) -> String {
    let clean = |field: &str| -> String {
        field
            .trim()
            .chars()
            .map(|c| if RESERVED.contains(&c) { '_' } else { c })
            .collect()
    };
    format!("{}&{}&{}", clean(first), clean(last), clean(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_joins_with_ampersands() {
        assert_eq!(
            compose_text("Art", "Bee", "artbee@email.com"),
            "Art&Bee&artbee@email.com"
        );
    }

    #[test]
    fn test_compose_replaces_reserved_characters() {
        assert_eq!(
            compose_text("A&rt", "B\"ee", "art\\bee@email.com"),
            "A_rt&B_ee&art_bee@email.com"
        );
    }

    #[test]
    fn test_compose_trims_fields() {
        assert_eq!(
            compose_text("  Art ", "Bee", " artbee@email.com "),
            "Art&Bee&artbee@email.com"
        );
    }
}
