//! ECDSA Keys, Signatures, and Public-Key Recovery
//!
//! Signing and verification over the prime-field point group, X9.62 style:
//! - `PublicKey` construction enforces the subgroup and range invariants
//! - `PrivateKey::sign` consumes one fresh nonce per call
//! - `PublicKey::verify` never fails with an error; malformed or
//!   out-of-range signatures simply verify as false
//! - `recover_public_keys` reconstructs the two candidate signer keys from
//!   a signature and hash alone
//!
//! SECURITY: the signing nonce must come from a cryptographically secure,
//! non-deterministic source, freshly drawn per signature. Reusing a nonce
//! across two signatures leaks the private key.

use num_bigint::{BigInt, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::arith::{inverse_mod, modular_exp, modular_square_root, ArithError};
use super::curve::{CurveError, Point};

// MARK: - Errors

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcdsaError {
    /// The nonce produced a zero `r` or `s`. Expected with probability
    /// about 1/n; the caller retries with fresh randomness.
    #[error("signature component {0} is zero; retry with a fresh nonce")]
    ZeroSignature(&'static str),
    #[error("invalid public key: {0}")]
    InvalidKey(String),
    #[error(transparent)]
    Curve(#[from] CurveError),
    #[error(transparent)]
    Arith(#[from] ArithError),
}

// MARK: - Signature

/// An ECDSA signature pair. Both components lie in `[1, n-1]` when the
/// signature was produced by [`PrivateKey::sign`]; untrusted values parsed
/// from the outside may not, and verification range-checks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: BigInt,
    pub s: BigInt,
}

impl Signature {
    pub fn new(r: BigInt, s: BigInt) -> Self {
        Self { r, s }
    }
}

// MARK: - Public Key

/// An ECDSA public key: a generator of known order and the key point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    generator: Point,
    point: Point,
    n: BigInt,
}

impl PublicKey {
    /// Build a public key, enforcing the key invariants:
    /// the generator carries a group order `n`, `n * point == Infinity`,
    /// and both coordinates lie in `[0, n)`.
    pub fn new(generator: Point, point: Point) -> Result<Self, EcdsaError> {
        let n = generator
            .order()
            .cloned()
            .ok_or_else(|| EcdsaError::InvalidKey("generator must carry a group order".into()))?;

        // Multiply an order-free copy so the subgroup check cannot be
        // short-circuited by scalar reduction.
        if !point.without_order().multiply(&n)?.is_infinity() {
            return Err(EcdsaError::InvalidKey(
                "point order does not divide the generator order".into(),
            ));
        }
        match (point.x(), point.y()) {
            (Some(x), Some(y)) => {
                let zero = BigInt::zero();
                if *x < zero || *x >= n || *y < zero || *y >= n {
                    return Err(EcdsaError::InvalidKey(
                        "point coordinates out of range".into(),
                    ));
                }
            }
            _ => {
                return Err(EcdsaError::InvalidKey(
                    "public key cannot be the point at infinity".into(),
                ))
            }
        }
        Ok(Self { generator, point, n })
    }

    pub fn generator(&self) -> &Point {
        &self.generator
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Order of the generator subgroup.
    pub fn order(&self) -> &BigInt {
        &self.n
    }

    /// Coordinates of the key point.
    pub fn coordinates(&self) -> (&BigInt, &BigInt) {
        match &self.point {
            Point::Finite { x, y, .. } => (x, y),
            Point::Infinity => unreachable!("constructor rejects the point at infinity"),
        }
    }

    /// Verify that `signature` is a valid signature of `hash`.
    ///
    /// Total over untrusted input: any out-of-range or degenerate signature
    /// yields `false`, never an error.
    pub fn verify(&self, hash: &BigInt, signature: &Signature) -> bool {
        self.verify_inner(hash, signature).unwrap_or(false)
    }

    // X9.62 J.3.1.
    fn verify_inner(&self, hash: &BigInt, signature: &Signature) -> Result<bool, EcdsaError> {
        let n = &self.n;
        let one = BigInt::one();
        let n_minus_1 = n - &one;
        if signature.r < one || signature.r > n_minus_1 {
            return Ok(false);
        }
        if signature.s < one || signature.s > n_minus_1 {
            return Ok(false);
        }

        let c = inverse_mod(&signature.s, n)?;
        let u1 = (hash * &c).mod_floor(n);
        let u2 = (&signature.r * &c).mod_floor(n);
        let xy = self
            .generator
            .multiply(&u1)?
            .add(&self.point.multiply(&u2)?)?;
        match xy.x() {
            Some(x) => Ok(x.mod_floor(n) == signature.r),
            // u1*G + u2*Q degenerated to infinity; nothing verifies against it.
            None => Ok(false),
        }
    }

    /// Short hex identifier for logs and CLI output; not a security boundary.
    pub fn fingerprint(&self) -> String {
        let (x, y) = self.coordinates();
        let mut hasher = Sha256::new();
        hasher.update(x.to_str_radix(10).as_bytes());
        hasher.update(b":");
        hasher.update(y.to_str_radix(10).as_bytes());
        hex::encode(&hasher.finalize()[..4])
    }
}

// MARK: - Private Key

/// An ECDSA private key: the public half plus the secret multiplier.
#[derive(Clone)]
pub struct PrivateKey {
    public_key: PublicKey,
    secret_multiplier: BigInt,
}

// Debug omits the secret multiplier.
impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl PrivateKey {
    pub fn new(public_key: PublicKey, secret_multiplier: BigInt) -> Self {
        Self {
            public_key,
            secret_multiplier,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn secret_multiplier(&self) -> &BigInt {
        &self.secret_multiplier
    }

    /// Sign `hash` with an explicit `nonce`.
    ///
    /// The nonce must be drawn uniformly from `[1, n-1]` by a secure random
    /// source and must never be reused. Fails with
    /// [`EcdsaError::ZeroSignature`] when `r` or `s` comes out zero, in
    /// which case the caller signs again with a fresh nonce.
    pub fn sign(&self, hash: &BigInt, nonce: &BigInt) -> Result<Signature, EcdsaError> {
        let g = &self.public_key.generator;
        let n = &self.public_key.n;

        let k = nonce.mod_floor(n);
        let p1 = g.multiply(&k)?;
        let r = match p1.x() {
            Some(x) => x.mod_floor(n),
            None => return Err(EcdsaError::ZeroSignature("r")),
        };
        if r.is_zero() {
            return Err(EcdsaError::ZeroSignature("r"));
        }
        let s = (inverse_mod(&k, n)? * (hash + (&self.secret_multiplier * &r).mod_floor(n)))
            .mod_floor(n);
        if s.is_zero() {
            return Err(EcdsaError::ZeroSignature("s"));
        }
        Ok(Signature::new(r, s))
    }

    /// Sign `hash`, drawing fresh nonces from `rng` until the signature is
    /// non-degenerate.
    pub fn sign_with_rng<R: Rng + CryptoRng>(
        &self,
        hash: &BigInt,
        rng: &mut R,
    ) -> Result<Signature, EcdsaError> {
        let n = &self.public_key.n;
        loop {
            let nonce = rng.gen_bigint_range(&BigInt::one(), n);
            match self.sign(hash, &nonce) {
                Err(EcdsaError::ZeroSignature(_)) => continue,
                other => return other,
            }
        }
    }
}

// MARK: - Key Generation

/// Generate a key pair on the given generator's subgroup.
///
/// The secret multiplier is drawn uniformly from `[1, n-1]`.
pub fn generate_keypair<R: Rng + CryptoRng>(
    generator: &Point,
    rng: &mut R,
) -> Result<PrivateKey, EcdsaError> {
    let n = generator
        .order()
        .ok_or_else(|| EcdsaError::InvalidKey("generator must carry a group order".into()))?;
    let secret = rng.gen_bigint_range(&BigInt::one(), n);
    let point = generator.multiply(&secret)?;
    let public_key = PublicKey::new(generator.clone(), point)?;
    Ok(PrivateKey::new(public_key, secret))
}

// MARK: - Public-Key Recovery

/// Reconstruct the two public keys for which `signature` is a valid
/// signature of `hash`.
///
/// The curve points with x-coordinate `r` are found by taking the modular
/// square root of the curve equation at `x = r`; for each, the candidate key
/// is `Q = r^-1 * (s*R - hash*G)` with the scalars taken modulo `n`. Exactly
/// one candidate equals the true signer's key when the signature is genuine;
/// callers disambiguate against a known expected key. Fails when `r` is not
/// a valid x-coordinate on the curve.
pub fn recover_public_keys(
    signature: &Signature,
    hash: &BigInt,
    generator: &Point,
) -> Result<[PublicKey; 2], EcdsaError> {
    let curve = generator
        .curve()
        .ok_or_else(|| EcdsaError::InvalidKey("generator must be a finite point".into()))?;
    let n = generator
        .order()
        .ok_or_else(|| EcdsaError::InvalidKey("generator must carry a group order".into()))?;
    let p = curve.p();
    let r = &signature.r;

    // The curve equation at x = r, and its roots +-beta.
    let alpha =
        (modular_exp(r, &BigInt::from(3), p)? + curve.a() * r + curve.b()).mod_floor(p);
    let beta = modular_square_root(&alpha, p)?;
    let y_even = if beta.is_even() { beta.clone() } else { p - &beta };
    let y_odd = (p - &y_even).mod_floor(p);

    let r_inv = inverse_mod(r, n)?;
    let minus_hash = (-hash).mod_floor(n);

    let candidate = |y: BigInt| -> Result<PublicKey, EcdsaError> {
        let rp = Point::with_order(curve.clone(), r.clone(), y, n.clone())?;
        let q = rp
            .multiply(&signature.s)?
            .add(&generator.multiply(&minus_hash)?)?
            .multiply(&r_inv)?;
        PublicKey::new(generator.clone(), q)
    };

    Ok([candidate(y_even)?, candidate(y_odd)?])
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curve::CurveFp;

    fn bi(v: i64) -> BigInt {
        BigInt::from(v)
    }

    /// y^2 = x^3 + 2x + 2 (mod 17), G = (5, 1), n = 19.
    fn toy_generator() -> Point {
        let curve = CurveFp::new(bi(17), bi(2), bi(2));
        Point::with_order(curve, bi(5), bi(1), bi(19)).unwrap()
    }

    fn toy_private_key(secret: i64) -> PrivateKey {
        let g = toy_generator();
        let point = g.multiply(&bi(secret)).unwrap();
        let public = PublicKey::new(g, point).unwrap();
        PrivateKey::new(public, bi(secret))
    }

    #[test]
    fn test_sign_known_values() {
        // secret 7, hash 10, nonce 3:
        //   r = (3*G).x mod 19 = 10
        //   s = 3^-1 * (10 + 7*10) mod 19 = 13 * 4 mod 19 = 14
        let key = toy_private_key(7);
        let sig = key.sign(&bi(10), &bi(3)).unwrap();
        assert_eq!(sig.r, bi(10));
        assert_eq!(sig.s, bi(14));
    }

    #[test]
    fn test_verify_accepts_genuine_signature() {
        let key = toy_private_key(7);
        let sig = key.sign(&bi(10), &bi(3)).unwrap();
        assert!(key.public_key().verify(&bi(10), &sig));
    }

    #[test]
    fn test_verify_rejects_modified_hash() {
        let key = toy_private_key(7);
        let sig = key.sign(&bi(10), &bi(3)).unwrap();
        assert!(!key.public_key().verify(&bi(11), &sig));
    }

    #[test]
    fn test_verify_range_rejection_never_errors() {
        let key = toy_private_key(7);
        let good = key.sign(&bi(10), &bi(3)).unwrap();
        let n = key.public_key().order().clone();
        let cases = [
            Signature::new(bi(0), good.s.clone()),
            Signature::new(good.r.clone(), bi(0)),
            Signature::new(bi(-4), good.s.clone()),
            Signature::new(good.r.clone(), bi(-1)),
            Signature::new(n.clone(), good.s.clone()),
            Signature::new(good.r.clone(), &n + 5),
        ];
        for sig in &cases {
            assert!(!key.public_key().verify(&bi(10), sig));
        }
    }

    #[test]
    fn test_verify_accepts_exactly_the_signable_pairs() {
        // Exhaustive over the toy group: a pair (r, s) verifies iff some
        // nonce produces it. Every other pair is rejected.
        use std::collections::HashSet;
        let key = toy_private_key(7);
        let mut producible = HashSet::new();
        for nonce in 1..19i64 {
            if let Ok(sig) = key.sign(&bi(10), &bi(nonce)) {
                producible.insert((sig.r, sig.s));
            }
        }
        for r in 1..19i64 {
            for s in 1..19i64 {
                let expected = producible.contains(&(bi(r), bi(s)));
                assert_eq!(
                    key.public_key().verify(&bi(10), &Signature::new(bi(r), bi(s))),
                    expected,
                    "r={} s={}",
                    r,
                    s
                );
            }
        }
    }

    #[test]
    fn test_roundtrip_all_secrets_and_nonces() {
        for secret in 1..19i64 {
            let key = toy_private_key(secret);
            for nonce in 1..19i64 {
                let hash = bi((secret * 5 + nonce) % 18 + 1);
                match key.sign(&hash, &bi(nonce)) {
                    Ok(sig) => assert!(key.public_key().verify(&hash, &sig)),
                    Err(EcdsaError::ZeroSignature(_)) => {} // legitimately degenerate
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
        }
    }

    #[test]
    fn test_recover_finds_signer() {
        let key = toy_private_key(7);
        let sig = key.sign(&bi(10), &bi(3)).unwrap();
        let candidates = recover_public_keys(&sig, &bi(10), &toy_generator()).unwrap();
        assert!(candidates.iter().any(|c| c == key.public_key()));
    }

    #[test]
    fn test_recover_candidates_differ() {
        let key = toy_private_key(7);
        let sig = key.sign(&bi(10), &bi(3)).unwrap();
        let [a, b] = recover_public_keys(&sig, &bi(10), &toy_generator()).unwrap();
        assert_ne!(a.point(), b.point());
    }

    #[test]
    fn test_public_key_rejects_bad_points() {
        let g = toy_generator();
        // Generator with no known order
        assert!(matches!(
            PublicKey::new(g.without_order(), g.multiply(&bi(2)).unwrap()),
            Err(EcdsaError::InvalidKey(_))
        ));
        // Key point at infinity
        assert!(matches!(
            PublicKey::new(g.clone(), Point::Infinity),
            Err(EcdsaError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_sign_with_rng_verifies() {
        use rand::rngs::OsRng;
        let key = toy_private_key(5);
        let sig = key.sign_with_rng(&bi(12), &mut OsRng).unwrap();
        assert!(key.public_key().verify(&bi(12), &sig));
    }

    #[test]
    fn test_generate_keypair_on_toy_curve() {
        use rand::rngs::OsRng;
        let key = generate_keypair(&toy_generator(), &mut OsRng).unwrap();
        let sig = key.sign_with_rng(&bi(10), &mut OsRng).unwrap();
        assert!(key.public_key().verify(&bi(10), &sig));
    }
}
