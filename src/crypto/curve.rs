//! Prime-Field Elliptic Curves and the Point Group
//!
//! A short-Weierstrass curve `y^2 = x^3 + a*x + b (mod p)` over a prime
//! field, and points on it forming a group under chord-and-tangent addition.
//! The point at infinity is the group identity and is represented as its own
//! variant, never as a sentinel object with missing coordinates.
//!
//! Points are immutable; every group operation returns a new point. Results
//! of group operations do not carry a group order even when the operands do.

use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use thiserror::Error;

use super::arith::{inverse_mod, ArithError};

// MARK: - Errors

/// Errors from curve construction and the group law.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("point ({x}, {y}) is not on {curve}")]
    NotOnCurve { curve: CurveFp, x: BigInt, y: BigInt },
    #[error("point does not have the claimed order {0}")]
    BadOrder(BigInt),
    #[error("cannot multiply by negative scalar {0} without a known point order")]
    NegativeScalar(BigInt),
    #[error(transparent)]
    Arith(#[from] ArithError),
}

// MARK: - Curve Parameters

/// An elliptic curve `y^2 = x^3 + a*x + b` over the integers modulo a prime.
///
/// `p` is assumed prime; this is not verified at construction. `a` and `b`
/// may be stored sign-extended (the standard curves use `a = -3`) and are
/// reduced modulo `p` during arithmetic.
///
/// Two independently constructed curves with equal parameters compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveFp {
    p: BigInt,
    a: BigInt,
    b: BigInt,
}

impl CurveFp {
    pub fn new(p: BigInt, a: BigInt, b: BigInt) -> Self {
        Self { p, a, b }
    }

    pub fn p(&self) -> &BigInt {
        &self.p
    }

    pub fn a(&self) -> &BigInt {
        &self.a
    }

    pub fn b(&self) -> &BigInt {
        &self.b
    }

    /// Is the affine point `(x, y)` on this curve?
    pub fn contains(&self, x: &BigInt, y: &BigInt) -> bool {
        (y * y - (x * x * x + &self.a * x + &self.b))
            .mod_floor(&self.p)
            .is_zero()
    }
}

impl fmt::Display for CurveFp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurveFp(p={}, a={}, b={})", self.p, self.a, self.b)
    }
}

// MARK: - Points

/// A point on a prime-field elliptic curve, or the point at infinity.
///
/// `order`, when present, is the order of the point in the curve group;
/// scalar multiplication reduces its scalar by it. Equality ignores the
/// order annotation and compares curve parameters and coordinates by value.
#[derive(Debug, Clone)]
pub enum Point {
    Infinity,
    Finite {
        curve: CurveFp,
        x: BigInt,
        y: BigInt,
        order: Option<BigInt>,
    },
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Point::Infinity, Point::Infinity) => true,
            (
                Point::Finite { curve: c1, x: x1, y: y1, .. },
                Point::Finite { curve: c2, x: x2, y: y2, .. },
            ) => c1 == c2 && x1 == x2 && y1 == y2,
            _ => false,
        }
    }
}

impl Eq for Point {}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Point::Infinity => write!(f, "infinity"),
            Point::Finite { x, y, .. } => write!(f, "({}, {})", x, y),
        }
    }
}

impl Point {
    /// A finite point, checked against the curve equation.
    pub fn new(curve: CurveFp, x: BigInt, y: BigInt) -> Result<Point, CurveError> {
        if !curve.contains(&x, &y) {
            return Err(CurveError::NotOnCurve { curve, x, y });
        }
        Ok(Point::Finite { curve, x, y, order: None })
    }

    /// A finite point with a claimed group order.
    ///
    /// Verifies `order * point == Infinity` against an order-free copy of the
    /// point, so the scalar cannot be reduced away by the very order under
    /// test. The check runs in debug builds and, in release builds, only
    /// with the `paranoid-checks` feature; it is expensive for large curves.
    pub fn with_order(
        curve: CurveFp,
        x: BigInt,
        y: BigInt,
        order: BigInt,
    ) -> Result<Point, CurveError> {
        let free = Point::new(curve, x, y)?;
        if cfg!(any(debug_assertions, feature = "paranoid-checks"))
            && !free.multiply(&order)?.is_infinity()
        {
            return Err(CurveError::BadOrder(order));
        }
        match free {
            Point::Finite { curve, x, y, .. } => Ok(Point::Finite {
                curve,
                x,
                y,
                order: Some(order),
            }),
            Point::Infinity => Ok(Point::Infinity),
        }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    pub fn curve(&self) -> Option<&CurveFp> {
        match self {
            Point::Infinity => None,
            Point::Finite { curve, .. } => Some(curve),
        }
    }

    pub fn x(&self) -> Option<&BigInt> {
        match self {
            Point::Infinity => None,
            Point::Finite { x, .. } => Some(x),
        }
    }

    pub fn y(&self) -> Option<&BigInt> {
        match self {
            Point::Infinity => None,
            Point::Finite { y, .. } => Some(y),
        }
    }

    pub fn order(&self) -> Option<&BigInt> {
        match self {
            Point::Infinity => None,
            Point::Finite { order, .. } => order.as_ref(),
        }
    }

    /// The same point with the order annotation removed.
    pub(crate) fn without_order(&self) -> Point {
        match self {
            Point::Infinity => Point::Infinity,
            Point::Finite { curve, x, y, .. } => Point::Finite {
                curve: curve.clone(),
                x: x.clone(),
                y: y.clone(),
                order: None,
            },
        }
    }

    /// The reflection of this point across the x-axis, i.e. its group
    /// negation. Keeps the order annotation (a point and its negation have
    /// the same order).
    pub fn negate(&self) -> Point {
        match self {
            Point::Infinity => Point::Infinity,
            Point::Finite { curve, x, y, order } => {
                let neg_y = (-y).mod_floor(curve.p());
                Point::Finite {
                    curve: curve.clone(),
                    x: x.clone(),
                    y: neg_y,
                    order: order.clone(),
                }
            }
        }
    }

    /// Group addition (X9.62 B.3).
    pub fn add(&self, other: &Point) -> Result<Point, CurveError> {
        let (curve, x1, y1) = match self {
            Point::Infinity => return Ok(other.clone()),
            Point::Finite { curve, x, y, .. } => (curve, x, y),
        };
        let (x2, y2) = match other {
            Point::Infinity => return Ok(self.clone()),
            Point::Finite { curve: c2, x, y, .. } => {
                debug_assert_eq!(curve, c2, "points on different curves");
                (x, y)
            }
        };

        let p = curve.p();
        if x1 == x2 {
            if (y1 + y2).mod_floor(p).is_zero() {
                return Ok(Point::Infinity);
            }
            return self.double();
        }

        let l = ((y2 - y1) * inverse_mod(&(x2 - x1), p)?).mod_floor(p);
        let x3 = (&l * &l - x1 - x2).mod_floor(p);
        let y3 = (l * (x1 - &x3) - y1).mod_floor(p);
        Ok(Point::Finite {
            curve: curve.clone(),
            x: x3,
            y: y3,
            order: None,
        })
    }

    /// Point doubling via the tangent slope (X9.62 B.3).
    pub fn double(&self) -> Result<Point, CurveError> {
        let (curve, x, y) = match self {
            Point::Infinity => return Ok(Point::Infinity),
            Point::Finite { curve, x, y, .. } => (curve, x, y),
        };

        let p = curve.p();
        let three = BigInt::from(3);
        let two = BigInt::from(2);
        let l = ((&three * x * x + curve.a()) * inverse_mod(&(&two * y), p)?).mod_floor(p);
        let x3 = (&l * &l - &two * x).mod_floor(p);
        let y3 = (l * (x - &x3) - y).mod_floor(p);
        Ok(Point::Finite {
            curve: curve.clone(),
            x: x3,
            y: y3,
            order: None,
        })
    }

    /// Scalar multiplication `k * self`.
    ///
    /// Reduces `k` by the point's order when one is known. Walks the bits of
    /// `3k` and `k` together (X9.62 D.3.2), adding or subtracting the base
    /// point where they differ; this halves the expected additions compared
    /// to plain double-and-add and produces identical results.
    pub fn multiply(&self, k: &BigInt) -> Result<Point, CurveError> {
        let e = match self.order() {
            Some(n) => k.mod_floor(n),
            None => k.clone(),
        };
        if e.is_zero() || self.is_infinity() {
            return Ok(Point::Infinity);
        }
        if e.is_negative() {
            return Err(CurveError::NegativeScalar(k.clone()));
        }

        let e3 = BigInt::from(3) * &e;
        let negative_self = self.negate();
        let mut result = self.clone();
        // Skip the leading bit of 3e (always set) and stop before bit 0.
        for i in (1..=e3.bits() - 2).rev() {
            result = result.double()?;
            if e3.bit(i) && !e.bit(i) {
                result = result.add(self)?;
            }
            if !e3.bit(i) && e.bit(i) {
                result = result.add(&negative_self)?;
            }
        }
        Ok(result)
    }
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn bi(v: i64) -> BigInt {
        BigInt::from(v)
    }

    /// y^2 = x^3 + 2x + 2 (mod 17), generator (5, 1) of order 19.
    fn toy_curve() -> CurveFp {
        CurveFp::new(bi(17), bi(2), bi(2))
    }

    fn toy_generator() -> Point {
        Point::with_order(toy_curve(), bi(5), bi(1), bi(19)).unwrap()
    }

    /// Reference double-and-add, for cross-checking the 3k walk.
    fn naive_multiply(point: &Point, k: u64) -> Point {
        let mut acc = Point::Infinity;
        for _ in 0..k {
            acc = acc.add(point).unwrap();
        }
        acc
    }

    #[test]
    fn test_contains() {
        let curve = toy_curve();
        assert!(curve.contains(&bi(5), &bi(1)));
        assert!(curve.contains(&bi(10), &bi(6)));
        assert!(!curve.contains(&bi(5), &bi(2)));
    }

    #[test]
    fn test_new_rejects_point_off_curve() {
        assert!(matches!(
            Point::new(toy_curve(), bi(5), bi(2)),
            Err(CurveError::NotOnCurve { .. })
        ));
    }

    #[test]
    fn test_with_order_rejects_wrong_order() {
        assert!(matches!(
            Point::with_order(toy_curve(), bi(5), bi(1), bi(18)),
            Err(CurveError::BadOrder(..))
        ));
    }

    #[test]
    fn test_identity_laws() {
        let g = toy_generator();
        assert_eq!(Point::Infinity.add(&g).unwrap(), g);
        assert_eq!(g.add(&Point::Infinity).unwrap(), g);
        assert_eq!(
            Point::Infinity.add(&Point::Infinity).unwrap(),
            Point::Infinity
        );
        assert_eq!(Point::Infinity.double().unwrap(), Point::Infinity);
    }

    #[test]
    fn test_point_plus_negation_is_infinity() {
        let g = toy_generator();
        assert_eq!(g.add(&g.negate()).unwrap(), Point::Infinity);
    }

    #[test]
    fn test_known_multiples() {
        // Subgroup table for the toy curve, verifiable by hand.
        let expected = [
            (1, 5, 1),
            (2, 6, 3),
            (3, 10, 6),
            (4, 3, 1),
            (5, 9, 16),
            (6, 16, 13),
            (7, 0, 6),
            (8, 13, 7),
            (9, 7, 6),
            (10, 7, 11),
            (11, 13, 10),
            (12, 0, 11),
            (13, 16, 4),
            (14, 9, 1),
            (15, 3, 16),
            (16, 10, 11),
            (17, 6, 14),
            (18, 5, 16),
        ];
        let g = toy_generator();
        for (k, x, y) in expected {
            let got = g.multiply(&bi(k)).unwrap();
            assert_eq!(got.x(), Some(&bi(x)), "k={}", k);
            assert_eq!(got.y(), Some(&bi(y)), "k={}", k);
        }
        assert!(g.multiply(&bi(19)).unwrap().is_infinity());
        assert!(g.multiply(&bi(0)).unwrap().is_infinity());
    }

    #[test]
    fn test_multiply_matches_repeated_addition() {
        let g = toy_generator();
        for k in 0..=40u64 {
            assert_eq!(
                g.multiply(&BigInt::from(k)).unwrap(),
                naive_multiply(&g.without_order(), k % 19),
                "k={}",
                k
            );
        }
    }

    #[test]
    fn test_multiply_reduces_by_order() {
        let g = toy_generator();
        assert_eq!(g.multiply(&bi(3)).unwrap(), g.multiply(&bi(3 + 19)).unwrap());
        assert_eq!(g.multiply(&bi(-1)).unwrap(), g.negate());
    }

    #[test]
    fn test_multiply_negative_scalar_without_order() {
        let g = toy_generator().without_order();
        assert!(matches!(
            g.multiply(&bi(-1)),
            Err(CurveError::NegativeScalar(..))
        ));
    }

    #[test]
    fn test_equality_by_value_not_identity() {
        let a = Point::new(toy_curve(), bi(5), bi(1)).unwrap();
        let b = Point::with_order(toy_curve(), bi(5), bi(1), bi(19)).unwrap();
        // Separately constructed, same parameters; order annotation ignored.
        assert_eq!(a, b);
        assert_eq!(toy_curve(), toy_curve());

        let other_curve = CurveFp::new(bi(17), bi(2), bi(2));
        let c = Point::new(other_curve, bi(5), bi(1)).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_addition_commutes() {
        let g = toy_generator();
        let p2 = g.double().unwrap();
        let p3 = g.multiply(&bi(3)).unwrap();
        assert_eq!(p2.add(&p3).unwrap(), p3.add(&p2).unwrap());
    }
}
