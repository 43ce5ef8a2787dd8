//! licensekit - ECDSA License Code Core
//!
//! Produces and validates license/unlock codes: prime-field curve
//! arithmetic, ECDSA key generation, signing, verification, public-key
//! recovery, and the deterministic salted hash that turns license text into
//! a signable message representative.
//!
//! # Architecture
//!
//! This crate provides:
//! - **crypto**: modular arithmetic, the curve/point group, the named curve
//!   catalogue, and the ECDSA key and signature types
//! - **license**: text composition, the salted 40-bit hash, and the
//!   printable code format
//! - **keystore**: flat-text persistence of keys and salt
//! - **utils**: logging with secret redaction
//!
//! The core is single-threaded and synchronous: every operation is a pure
//! computation over immutable inputs. The only external dependency is a
//! secure random source, consumed once per signature for the nonce.
//!
//! # Example
//!
//! ```rust,ignore
//! use licensekit::crypto::{curves::GENERATOR_MINI, generate_keypair};
//! use licensekit::license::{compute_hash, encode_code, Salt};
//! use num_bigint::BigInt;
//! use rand::rngs::OsRng;
//!
//! let key = generate_keypair(&GENERATOR_MINI, &mut OsRng)?;
//! let salt = Salt::generate(&mut OsRng);
//!
//! let hash = compute_hash("art&bee&artbee@email.com", &salt);
//! let signature = key.sign_with_rng(&BigInt::from(hash), &mut OsRng)?;
//! println!("license code: {}", encode_code(&signature));
//! ```

pub mod crypto;
pub mod error;
pub mod keystore;
pub mod license;
pub mod utils;

// Re-export key types for convenience
pub use crypto::{generate_keypair, recover_public_keys, CurveFp, Point, PrivateKey, PublicKey, Signature};
pub use error::{LicenseError, LicenseResult};
pub use license::{compose_text, compute_hash, encode_code, parse_code, Salt};
