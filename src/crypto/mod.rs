//! Cryptographic Core
//!
//! The layers, leaves first:
//! - `arith`: big-integer modular arithmetic (inverse, exponentiation,
//!   Jacobi symbol, square roots, primality)
//! - `curve`: prime-field curves and the elliptic-curve point group
//! - `curves`: the named curve catalogue (mini license curve, AACS, NIST
//!   primes, secp256k1)
//! - `ecdsa`: keys, signing, verification, and public-key recovery

pub mod arith;
pub mod curve;
pub mod curves;
pub mod ecdsa;

pub use curve::{CurveFp, Point};
pub use ecdsa::{generate_keypair, recover_public_keys, PrivateKey, PublicKey, Signature};
