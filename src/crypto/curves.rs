//! Named Curve Catalogue
//!
//! Process-wide curve and generator constants:
//!
//! - `mini`: the custom 40-bit curve used for short printable license codes.
//!   Parameters were produced with a modified ecgen searching for a random
//!   40-bit prime modulus and a prime subgroup order.
//! - `aacs`: the 160-bit AACS curve from the AACS common specification.
//! - `p192` .. `p521`: the NIST prime-modulus curves.
//! - `secp256k1`: the Certicom curve.
//!
//! Constants are created at startup and never mutated. All generators carry
//! their subgroup order, so scalar arithmetic on them reduces correctly.

use lazy_static::lazy_static;
use num_bigint::BigInt;

use super::curve::{CurveFp, Point};

fn dec(s: &str) -> BigInt {
    BigInt::parse_bytes(s.as_bytes(), 10).expect("valid decimal curve constant")
}

fn hex(s: &str) -> BigInt {
    BigInt::parse_bytes(s.as_bytes(), 16).expect("valid hexadecimal curve constant")
}

fn generator(curve: &CurveFp, gx: BigInt, gy: BigInt, order: BigInt) -> Point {
    Point::with_order(curve.clone(), gx, gy, order).expect("valid generator constant")
}

lazy_static! {
    /// Custom 40-bit curve for license codes.
    pub static ref CURVE_MINI: CurveFp = CurveFp::new(
        BigInt::from(989292117823u64),
        BigInt::from(-3),
        BigInt::from(911333413149u64),
    );
    pub static ref GENERATOR_MINI: Point = generator(
        &CURVE_MINI,
        BigInt::from(146885098810u64),
        BigInt::from(687327530143u64),
        BigInt::from(989291303419u64),
    );

    /// AACS curve (AACS common specification, section on ECDSA).
    pub static ref CURVE_AACS: CurveFp = CurveFp::new(
        dec("900812823637587646514106462588455890498729007071"),
        BigInt::from(-3),
        dec("366394034647231750324370400222002566844354703832"),
    );
    pub static ref GENERATOR_AACS: Point = generator(
        &CURVE_AACS,
        dec("264865613959729647018113670854605162895977008838"),
        dec("51841075954883162510413392745168936296187808697"),
        dec("900812823637587646514106555566573588779770753047"),
    );

    /// NIST curve P-192.
    pub static ref CURVE_P192: CurveFp = CurveFp::new(
        dec("6277101735386680763835789423207666416083908700390324961279"),
        BigInt::from(-3),
        hex("64210519e59c80e70fa7e9ab72243049feb8deecc146b9b1"),
    );
    pub static ref GENERATOR_P192: Point = generator(
        &CURVE_P192,
        hex("188da80eb03090f67cbf20eb43a18800f4ff0afd82ff1012"),
        hex("07192b95ffc8da78631011ed6b24cdd573f977a11e794811"),
        dec("6277101735386680763835789423176059013767194773182842284081"),
    );

    /// NIST curve P-224.
    pub static ref CURVE_P224: CurveFp = CurveFp::new(
        dec("26959946667150639794667015087019630673557916260026308143510066298881"),
        BigInt::from(-3),
        hex("b4050a850c04b3abf54132565044b0b7d7bfd8ba270b39432355ffb4"),
    );
    pub static ref GENERATOR_P224: Point = generator(
        &CURVE_P224,
        hex("b70e0cbd6bb4bf7f321390b94a03c1d356c21122343280d6115c1d21"),
        hex("bd376388b5f723fb4c22dfe6cd4375a05a07476444d5819985007e34"),
        dec("26959946667150639794667015087019625940457807714424391721682722368061"),
    );

    /// NIST curve P-256.
    pub static ref CURVE_P256: CurveFp = CurveFp::new(
        dec("115792089210356248762697446949407573530086143415290314195533631308867097853951"),
        BigInt::from(-3),
        hex("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
    );
    pub static ref GENERATOR_P256: Point = generator(
        &CURVE_P256,
        hex("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
        hex("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
        dec("115792089210356248762697446949407573529996955224135760342422259061068512044369"),
    );

    /// NIST curve P-384.
    pub static ref CURVE_P384: CurveFp = CurveFp::new(
        dec("39402006196394479212279040100143613805079739270465446667948293404245721771496870329047266088258938001861606973112319"),
        BigInt::from(-3),
        hex("b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875ac656398d8a2ed19d2a85c8edd3ec2aef"),
    );
    pub static ref GENERATOR_P384: Point = generator(
        &CURVE_P384,
        hex("aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a385502f25dbf55296c3a545e3872760ab7"),
        hex("3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c00a60b1ce1d7e819d7a431d7c90ea0e5f"),
        dec("39402006196394479212279040100143613805079739270465446667946905279627659399113263569398956308152294913554433653942643"),
    );

    /// NIST curve P-521.
    pub static ref CURVE_P521: CurveFp = CurveFp::new(
        dec("6864797660130609714981900799081393217269435300143305409394463459185543183397656052122559640661454554977296311391480858037121987999716643812574028291115057151"),
        BigInt::from(-3),
        hex("051953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef109e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b503f00"),
    );
    pub static ref GENERATOR_P521: Point = generator(
        &CURVE_P521,
        hex("c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d3dbaa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5bd66"),
        hex("11839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e662c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd16650"),
        dec("6864797660130609714981900799081393217269435300143305409394463459185543183397655394245057746333217197532963996371363321113864768612440380340372808892707005449"),
    );

    /// Certicom secp256k1.
    pub static ref CURVE_SECP256K1: CurveFp = CurveFp::new(
        hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f"),
        BigInt::from(0),
        BigInt::from(7),
    );
    pub static ref GENERATOR_SECP256K1: Point = generator(
        &CURVE_SECP256K1,
        hex("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
        hex("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
        hex("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"),
    );
}

/// Look up a generator by curve name.
pub fn generator_for(name: &str) -> Option<&'static Point> {
    match name.to_ascii_lowercase().as_str() {
        "mini" => Some(&GENERATOR_MINI),
        "aacs" => Some(&GENERATOR_AACS),
        "p192" | "p-192" => Some(&GENERATOR_P192),
        "p224" | "p-224" => Some(&GENERATOR_P224),
        "p256" | "p-256" => Some(&GENERATOR_P256),
        "p384" | "p-384" => Some(&GENERATOR_P384),
        "p521" | "p-521" => Some(&GENERATOR_P521),
        "secp256k1" => Some(&GENERATOR_SECP256K1),
        _ => None,
    }
}

/// All registered curve names, catalogue order.
pub fn curve_names() -> &'static [&'static str] {
    &["mini", "aacs", "p192", "p224", "p256", "p384", "p521", "secp256k1"]
}
