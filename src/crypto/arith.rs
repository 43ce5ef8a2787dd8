//! Modular Arithmetic over Big Integers
//!
//! The number-theoretic foundation for the curve layer:
//! - Extended-Euclidean modular inverse
//! - Fast modular exponentiation
//! - Jacobi symbol (HAC algorithm 2.149)
//! - Modular square roots (HAC algorithms 3.34 to 3.39, including the
//!   polynomial-exponentiation general case)
//! - Probabilistic primality testing (Miller-Rabin over fixed small-prime bases)
//!
//! All functions treat the modulus as trusted input; primality of a modulus is
//! a caller invariant, not something these routines re-check.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use thiserror::Error;

// MARK: - Errors

/// Errors from the modular arithmetic layer.
///
/// These indicate a parameter or programming error and are not recoverable
/// at this level; callers propagate them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithError {
    #[error("negative exponent {0} not allowed")]
    NegativeExponent(BigInt),
    #[error("{0} has no inverse modulo {1}")]
    NoInverse(BigInt, BigInt),
    #[error("{0} has no square root modulo {1}")]
    NoSquareRoot(BigInt, BigInt),
}

// MARK: - Inverse and Exponentiation

/// Inverse of `a` modulo `m`.
///
/// `a` is normalized into `[0, m)` first. Fails when `gcd(a, m) != 1`.
pub fn inverse_mod(a: &BigInt, m: &BigInt) -> Result<BigInt, ArithError> {
    let a = a.mod_floor(m);

    // Extended Euclid, Ferguson & Schneier style: maintain uc, ud with
    // uc*a = c (mod m) and ud*a = d (mod m).
    let (mut c, mut d) = (a.clone(), m.clone());
    let (mut uc, mut ud) = (BigInt::one(), BigInt::zero());
    while !c.is_zero() {
        let (q, r) = d.div_rem(&c);
        let next_uc = &ud - &q * &uc;
        d = c;
        c = r;
        ud = uc;
        uc = next_uc;
    }

    // d is now gcd(a, m); if it is 1, ud is the inverse.
    if !d.is_one() {
        return Err(ArithError::NoInverse(a, m.clone()));
    }
    if ud.is_negative() {
        Ok(ud + m)
    } else {
        Ok(ud)
    }
}

/// Raise `base` to `exponent`, reducing by `modulus`.
///
/// Fails on a negative exponent; use [`inverse_mod`] for inverses instead.
pub fn modular_exp(base: &BigInt, exponent: &BigInt, modulus: &BigInt) -> Result<BigInt, ArithError> {
    if exponent.is_negative() {
        return Err(ArithError::NegativeExponent(exponent.clone()));
    }
    Ok(base.mod_floor(modulus).modpow(exponent, modulus))
}

// MARK: - Jacobi Symbol

/// Jacobi symbol `(a / n)` for odd `n >= 3`.
///
/// Returns -1, 0, or 1 via the quadratic-reciprocity reduction of
/// HAC algorithm 2.149.
pub fn jacobi_symbol(a: &BigInt, n: &BigInt) -> i32 {
    debug_assert!(*n >= BigInt::from(3));
    debug_assert!(n.is_odd());

    let a = a.mod_floor(n);
    if a.is_zero() {
        return 0;
    }
    if a.is_one() {
        return 1;
    }

    // Split a = 2^e * a1 with a1 odd.
    let mut a1 = a;
    let mut e = 0u64;
    while a1.is_even() {
        a1 >>= 1;
        e += 1;
    }

    let n_mod_8 = n.mod_floor(&BigInt::from(8));
    let mut s = if e % 2 == 0 || n_mod_8.is_one() || n_mod_8 == BigInt::from(7) {
        1
    } else {
        -1
    };
    if a1.is_one() {
        return s;
    }

    let three = BigInt::from(3);
    let four = BigInt::from(4);
    if n.mod_floor(&four) == three && a1.mod_floor(&four) == three {
        s = -s;
    }
    s * jacobi_symbol(&n.mod_floor(&a1), &a1)
}

// MARK: - Modular Square Roots

/// Square root of `a` modulo the odd prime `p`.
///
/// Requires `0 <= a < p`. Fails when `a` is a quadratic non-residue.
pub fn modular_square_root(a: &BigInt, p: &BigInt) -> Result<BigInt, ArithError> {
    debug_assert!(!a.is_negative() && a < p);
    debug_assert!(*p > BigInt::one());

    if a.is_zero() {
        return Ok(BigInt::zero());
    }
    if *p == BigInt::from(2) {
        return Ok(a.clone());
    }
    if jacobi_symbol(a, p) == -1 {
        return Err(ArithError::NoSquareRoot(a.clone(), p.clone()));
    }

    let one = BigInt::one();
    let four = BigInt::from(4);
    let eight = BigInt::from(8);

    if p.mod_floor(&four) == BigInt::from(3) {
        return modular_exp(a, &((p + &one) / &four), p);
    }

    if p.mod_floor(&eight) == BigInt::from(5) {
        let d = modular_exp(a, &((p - &one) / &four), p)?;
        if d.is_one() {
            return modular_exp(a, &((p + BigInt::from(3)) / &eight), p);
        }
        if d == p - &one {
            let root = (BigInt::from(2)
                * a
                * modular_exp(&(&four * a), &((p - BigInt::from(5)) / &eight), p)?)
            .mod_floor(p);
            return Ok(root);
        }
        unreachable!("a^((p-1)/4) must be +-1 for a residue modulo a prime p = 5 (mod 8)");
    }

    // General case: exponentiate x in GF(p^2) = GF(p)[x] / (x^2 - b*x + a)
    // for a search element b whose discriminant is a non-residue.
    let mut b = BigInt::from(2);
    while b < *p {
        if jacobi_symbol(&(&b * &b - &four * a), p) == -1 {
            let modpoly = [a.clone(), -&b, BigInt::one()];
            let ff = polynomial_exp_mod(
                &[BigInt::zero(), BigInt::one()],
                &((p + &one) >> 1),
                &modpoly,
                p,
            );
            debug_assert!(ff.get(1).map_or(true, Zero::is_zero));
            return Ok(ff.into_iter().next().unwrap_or_else(BigInt::zero));
        }
        b += 1u32;
    }
    unreachable!("some b in [2, p) has a non-residue discriminant when p is prime");
}

/// Reduce `poly` by the monic `polymod`, coefficients modulo `p`.
///
/// Polynomials are coefficient vectors in increasing powers of x.
fn polynomial_reduce_mod(mut poly: Vec<BigInt>, polymod: &[BigInt], p: &BigInt) -> Vec<BigInt> {
    debug_assert!(polymod.last().map_or(false, One::is_one));
    debug_assert!(polymod.len() > 1);

    while poly.len() >= polymod.len() {
        let lead = poly[poly.len() - 1].clone();
        if !lead.is_zero() {
            for i in 2..=polymod.len() {
                let idx = poly.len() - i;
                poly[idx] = (&poly[idx] - &lead * &polymod[polymod.len() - i]).mod_floor(p);
            }
        }
        poly.pop();
    }
    poly
}

/// Polynomial multiplication modulo `polymod`, coefficients modulo `p`.
fn polynomial_multiply_mod(
    m1: &[BigInt],
    m2: &[BigInt],
    polymod: &[BigInt],
    p: &BigInt,
) -> Vec<BigInt> {
    let mut prod = vec![BigInt::zero(); m1.len() + m2.len() - 1];
    for (i, c1) in m1.iter().enumerate() {
        for (j, c2) in m2.iter().enumerate() {
            prod[i + j] = (&prod[i + j] + c1 * c2).mod_floor(p);
        }
    }
    polynomial_reduce_mod(prod, polymod, p)
}

/// Polynomial exponentiation modulo `polymod`, coefficients modulo `p`.
///
/// Square-and-multiply, HAC algorithm 2.227.
fn polynomial_exp_mod(
    base: &[BigInt],
    exponent: &BigInt,
    polymod: &[BigInt],
    p: &BigInt,
) -> Vec<BigInt> {
    debug_assert!(exponent < p);

    if exponent.is_zero() {
        return vec![BigInt::one()];
    }
    let mut g = base.to_vec();
    let mut k = exponent.clone();
    let mut s = if k.is_odd() { g.clone() } else { vec![BigInt::one()] };
    while k > BigInt::one() {
        k >>= 1;
        g = polynomial_multiply_mod(&g, &g, polymod, p);
        if k.is_odd() {
            s = polynomial_multiply_mod(&g, &s, polymod, p);
        }
    }
    s
}

// MARK: - Primality Testing

/// The primes below 1230, used both for trial division and as Miller-Rabin
/// bases.
const SMALL_PRIMES: &[u64] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293,
    307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509, 521, 523, 541,
    547, 557, 563, 569, 571, 577, 587, 593, 599, 601, 607, 613, 617, 619, 631, 641, 643, 647, 653,
    659, 661, 673, 677, 683, 691, 701, 709, 719, 727, 733, 739, 743, 751, 757, 761, 769, 773, 787,
    797, 809, 811, 821, 823, 827, 829, 839, 853, 857, 859, 863, 877, 881, 883, 887, 907, 911, 919,
    929, 937, 941, 947, 953, 967, 971, 977, 983, 991, 997, 1009, 1013, 1019, 1021, 1031, 1033,
    1039, 1049, 1051, 1061, 1063, 1069, 1087, 1091, 1093, 1097, 1103, 1109, 1117, 1123, 1129,
    1151, 1153, 1163, 1171, 1181, 1187, 1193, 1201, 1213, 1217, 1223, 1229,
];

/// Miller-Rabin iteration counts by bit length, keeping the probability of
/// accepting a composite below 2^-80 (Menezes et al., table 4.4).
const MILLER_RABIN_ROUNDS: &[(u64, usize)] = &[
    (100, 27),
    (150, 18),
    (200, 15),
    (250, 12),
    (300, 9),
    (350, 8),
    (400, 7),
    (450, 6),
    (550, 5),
    (650, 4),
    (850, 3),
    (1300, 2),
];

/// Probabilistic primality test.
///
/// Trial division against the small-prime table, then Miller-Rabin with
/// bases drawn from that same table. Not a certifying test: composite
/// values can pass, with probability bounded below 2^-80.
pub fn is_prime(n: &BigInt) -> bool {
    let largest_small = SMALL_PRIMES[SMALL_PRIMES.len() - 1];
    if *n <= BigInt::from(largest_small) {
        return n
            .to_u64()
            .map_or(false, |v| SMALL_PRIMES.binary_search(&v).is_ok());
    }
    if !n.gcd(&BigInt::from(2u64 * 3 * 5 * 7 * 11)).is_one() {
        return false;
    }

    let mut rounds = 40;
    for &(bits, t) in MILLER_RABIN_ROUNDS {
        if n.bits() < bits {
            break;
        }
        rounds = t;
    }

    // n - 1 = 2^s * r with r odd
    let one = BigInt::one();
    let two = BigInt::from(2);
    let n_minus_1 = n - &one;
    let mut r = n_minus_1.clone();
    let mut s = 0u32;
    while r.is_even() {
        r >>= 1;
        s += 1;
    }

    for base in SMALL_PRIMES.iter().take(rounds) {
        let mut y = BigInt::from(*base).modpow(&r, n);
        if !y.is_one() && y != n_minus_1 {
            let mut j = 1;
            while j <= s - 1 && y != n_minus_1 {
                y = y.modpow(&two, n);
                if y.is_one() {
                    return false;
                }
                j += 1;
            }
            if y != n_minus_1 {
                return false;
            }
        }
    }
    true
}

// MARK: - Tests
