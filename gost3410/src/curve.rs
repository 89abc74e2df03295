//! GOST R 34.10 curve parameter sets and group arithmetic.
//!
//! A [`Curve`] is a runtime value: the standard names several parameter
//! sets sharing one short Weierstrass shape `y² = x³ + ax + b (mod p)`,
//! and higher-level protocol code selects one by OID at run time. The
//! named constructors below memoize each set behind an [`Arc`] so the
//! lazily computed twisted Edwards constants are shared between all
//! holders of the same set.
//!
//! Arithmetic is affine over [`BigUint`] with explicit modular reduction.
//! Scalar inputs may be of arbitrary magnitude; the engine reduces them
//! modulo the subgroup order internally.

use std::sync::{Arc, OnceLock};

use hex_literal::hex;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

use crate::error::{Error, Result};

/// A named set of GOST R 34.10 curve parameters.
///
/// Holds the field modulus `p`, the Weierstrass coefficients `a` and `b`,
/// the subgroup order `q`, the base point, and (for dual-form curves) the
/// twisted Edwards coefficients `e` and `d`. Immutable after construction
/// apart from the one-time memoization of the derived Edwards constants.
#[derive(Debug)]
pub struct Curve {
    name: &'static str,
    p: BigUint,
    a: BigUint,
    b: BigUint,
    q: BigUint,
    x: BigUint,
    y: BigUint,
    pub(crate) e: Option<BigUint>,
    pub(crate) d: Option<BigUint>,
    pub(crate) edwards_st: OnceLock<(BigUint, BigUint)>,
}

/// Affine point with an explicit identity element, used internally by the
/// group operations.
#[derive(Clone, PartialEq, Eq)]
enum Point {
    Infinity,
    Affine(BigUint, BigUint),
}

impl Curve {
    /// Construct a curve from raw parameters.
    ///
    /// The named constructors in this module cover the standardized sets;
    /// this entry point exists for callers that carry other parameter
    /// sets (the engine and the signature scheme are width-agnostic).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &'static str,
        p: BigUint,
        a: BigUint,
        b: BigUint,
        q: BigUint,
        x: BigUint,
        y: BigUint,
        e: Option<BigUint>,
        d: Option<BigUint>,
    ) -> Self {
        Self {
            name,
            p,
            a,
            b,
            q,
            x,
            y,
            e,
            d,
            edwards_st: OnceLock::new(),
        }
    }

    /// Name of the parameter set (the OID dotted name).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field modulus.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Subgroup order.
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// Base point of the prime-order subgroup.
    pub fn generator(&self) -> (&BigUint, &BigUint) {
        (&self.x, &self.y)
    }

    /// Byte length of a serialized coordinate or scalar.
    pub fn point_size(&self) -> usize {
        ((self.q.bits() + 7) / 8) as usize
    }

    /// Normalize a signed value into `[0, p)` by explicit modulus
    /// addition.
    pub fn pos(&self, v: &BigInt) -> BigUint {
        let p = BigInt::from_biguint(Sign::Plus, self.p.clone());
        let mut v = v % &p;
        while v.sign() == Sign::Minus {
            v += &p;
        }
        v.magnitude().clone()
    }

    /// Multiply the point `(x, y)` by the scalar `k`.
    ///
    /// `k` is reduced modulo the subgroup order first. Fails with
    /// [`Error::PointAtInfinity`] when the reduced scalar is zero or the
    /// result has no affine representation.
    pub fn scalar_mult(&self, k: &BigUint, x: &BigUint, y: &BigUint) -> Result<(BigUint, BigUint)> {
        let k = k % &self.q;
        if k.is_zero() {
            return Err(Error::PointAtInfinity);
        }
        let base = Point::Affine(x % &self.p, y % &self.p);
        let mut acc = Point::Infinity;
        for i in (0..k.bits()).rev() {
            acc = self.add_point(&acc, &acc);
            if k.bit(i) {
                acc = self.add_point(&acc, &base);
            }
        }
        match acc {
            Point::Affine(x, y) => Ok((x, y)),
            Point::Infinity => Err(Error::PointAtInfinity),
        }
    }

    /// Multiply the base point by the scalar `k`.
    pub fn scalar_mult_base(&self, k: &BigUint) -> Result<(BigUint, BigUint)> {
        self.scalar_mult(k, &self.x, &self.y)
    }

    /// Draw a uniformly distributed scalar in `[1, q-1]`.
    ///
    /// Reads `point_size() + 8` bytes so the reduction bias is negligible,
    /// then maps into the range by `(v mod (q-1)) + 1`; the result is
    /// never zero.
    pub fn random_field_element<R: CryptoRng + RngCore>(&self, rng: &mut R) -> BigUint {
        let mut buf = vec![0u8; self.point_size() + 8];
        rng.fill_bytes(&mut buf);
        let v = BigUint::from_bytes_be(&buf);
        (v % (&self.q - 1u32)) + 1u32
    }

    /// Add two affine points, `None` meaning the point at infinity.
    pub(crate) fn add_xy(
        &self,
        p1: &(BigUint, BigUint),
        p2: &(BigUint, BigUint),
    ) -> Option<(BigUint, BigUint)> {
        let sum = self.add_point(
            &Point::Affine(p1.0.clone(), p1.1.clone()),
            &Point::Affine(p2.0.clone(), p2.1.clone()),
        );
        match sum {
            Point::Affine(x, y) => Some((x, y)),
            Point::Infinity => None,
        }
    }

    fn add_point(&self, lhs: &Point, rhs: &Point) -> Point {
        let (x1, y1, x2, y2) = match (lhs, rhs) {
            (Point::Infinity, _) => return rhs.clone(),
            (_, Point::Infinity) => return lhs.clone(),
            (Point::Affine(x1, y1), Point::Affine(x2, y2)) => (x1, y1, x2, y2),
        };
        let lambda = if x1 == x2 {
            // Either a doubling or the sum of a point and its negation.
            if y1 != y2 || y1.is_zero() {
                return Point::Infinity;
            }
            let num = ((x1 * x1) * 3u32 + &self.a) % &self.p;
            let den = self.inv_p(&((y1 * 2u32) % &self.p));
            (num * den) % &self.p
        } else {
            let num = self.sub_p(y2, y1);
            let den = self.inv_p(&self.sub_p(x2, x1));
            (num * den) % &self.p
        };
        let lambda2 = (&lambda * &lambda) % &self.p;
        let x3 = self.sub_p(&self.sub_p(&lambda2, x1), x2);
        let y3 = self.sub_p(&((lambda * self.sub_p(x1, &x3)) % &self.p), y1);
        Point::Affine(x3, y3)
    }

    /// Field subtraction; operands must already be reduced.
    fn sub_p(&self, a: &BigUint, b: &BigUint) -> BigUint {
        ((a + &self.p) - b) % &self.p
    }

    /// Field inversion by Fermat's little theorem (`p` is prime).
    pub(crate) fn inv_p(&self, a: &BigUint) -> BigUint {
        a.modpow(&(&self.p - 2u32), &self.p)
    }
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.p == other.p
            && self.a == other.a
            && self.b == other.b
            && self.q == other.q
            && self.x == other.x
            && self.y == other.y
            && self.e == other.e
            && self.d == other.d
    }
}

impl Eq for Curve {}

/// Serialize a value as a fixed-width big-endian buffer.
pub(crate) fn pad_be(v: &BigUint, size: usize) -> Vec<u8> {
    let bytes = v.to_bytes_be();
    let mut out = vec![0u8; size];
    if bytes.len() >= size {
        out.copy_from_slice(&bytes[bytes.len() - size..]);
    } else {
        out[size - bytes.len()..].copy_from_slice(&bytes);
    }
    out
}

fn uint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// id-GostR3410-2001-TestParamSet.
///
/// The 256-bit test set the standard's worked signature example is
/// defined over (also published in RFC 7091).
pub fn gost_r3410_2001_test() -> Arc<Curve> {
    static CURVE: OnceLock<Arc<Curve>> = OnceLock::new();
    CURVE
        .get_or_init(|| {
            Arc::new(Curve::new(
                "id-GostR3410-2001-TestParamSet",
                uint(&hex!(
                    "8000000000000000000000000000000000000000000000000000000000000431"
                )),
                uint(&hex!("07")),
                uint(&hex!(
                    "5FBFF498AA938CE739B8E022FBAFEF40563F6E6A3472FC2A514C0CE9DAE23B7E"
                )),
                uint(&hex!(
                    "8000000000000000000000000000000150FE8A1892976154C59CFC193ACCF5B3"
                )),
                uint(&hex!("02")),
                uint(&hex!(
                    "08E2A8A0E65147D4BD6316030E16D19C85C97F0A9CA267122B96ABBCEA7E8FC8"
                )),
                None,
                None,
            ))
        })
        .clone()
}

/// id-GostR3410-2001-CryptoPro-A-ParamSet.
///
/// The production 256-bit set, also registered for 34.10-2012 as
/// id-tc26-gost-3410-2012-256-paramSetB.
pub fn gost_r3410_2001_crypto_pro_a() -> Arc<Curve> {
    static CURVE: OnceLock<Arc<Curve>> = OnceLock::new();
    CURVE
        .get_or_init(|| {
            Arc::new(Curve::new(
                "id-GostR3410-2001-CryptoPro-A-ParamSet",
                uint(&hex!(
                    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFD97"
                )),
                uint(&hex!(
                    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFD94"
                )),
                uint(&hex!("A6")),
                uint(&hex!(
                    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF6C611070995AD10045841B09B761B893"
                )),
                uint(&hex!("01")),
                uint(&hex!(
                    "8D91E471E0989CDA27DF505A453F2B7635294F2DDF23E3B122ACC99C9E9F1E14"
                )),
                None,
                None,
            ))
        })
        .clone()
}

/// id-tc26-gost-3410-2012-256-paramSetA.
///
/// 256-bit set with a twisted Edwards form (`e`, `d` present); the base
/// point generates the prime-order subgroup of a cofactor-4 curve.
pub fn tc26_gost3410_2012_256_a() -> Arc<Curve> {
    static CURVE: OnceLock<Arc<Curve>> = OnceLock::new();
    CURVE
        .get_or_init(|| {
            Arc::new(Curve::new(
                "id-tc26-gost-3410-2012-256-paramSetA",
                uint(&hex!(
                    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFD97"
                )),
                uint(&hex!(
                    "C2173F1513981673AF4892C23035A27CE25E2013BF95AA33B22C656F277E7335"
                )),
                uint(&hex!(
                    "295F9BAE7428ED9CCC20E7C359A9D41A22FCCD9108E17BF7BA9337A6F8AE9513"
                )),
                uint(&hex!(
                    "400000000000000000000000000000000FD8CDDFC87B6635C115AF556C360C67"
                )),
                uint(&hex!(
                    "91E38443A5E82C0D880923425712B2BB658B9196932E02C78B2582FE742DAA28"
                )),
                uint(&hex!(
                    "32879423AB1A0375895786C4BB46E9565FDE0B5344766740AF268ADB32322E5C"
                )),
                Some(uint(&hex!("01"))),
                Some(uint(&hex!(
                    "0605F6B7C183FA81578BC39CFAD518132B9DF62897009AF7E522C32D6DC7BFFB"
                ))),
            ))
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_curve(curve: &Curve) -> bool {
        let (x, y) = curve.generator();
        let lhs = (y * y) % curve.p();
        let rhs = ((x * x * x) + &curve.a * x + &curve.b) % curve.p();
        lhs == rhs
    }

    #[test]
    fn generators_satisfy_curve_equation() {
        assert!(on_curve(&gost_r3410_2001_test()));
        assert!(on_curve(&gost_r3410_2001_crypto_pro_a()));
    }

    #[test]
    fn point_sizes() {
        assert_eq!(gost_r3410_2001_test().point_size(), 32);
        assert_eq!(gost_r3410_2001_crypto_pro_a().point_size(), 32);
        assert_eq!(tc26_gost3410_2012_256_a().point_size(), 32);
    }

    #[test]
    fn base_point_has_subgroup_order() {
        // q·G is the identity, so (q-1)·G + G must degenerate.
        let curve = gost_r3410_2001_test();
        let q_minus_1 = curve.q() - 1u32;
        let prev = curve.scalar_mult_base(&q_minus_1).unwrap();
        let g = {
            let (x, y) = curve.generator();
            (x.clone(), y.clone())
        };
        assert_eq!(curve.add_xy(&prev, &g), None);
    }

    #[test]
    fn scalar_mult_matches_repeated_addition() {
        let curve = gost_r3410_2001_test();
        let (gx, gy) = curve.generator();
        let g = (gx.clone(), gy.clone());
        let mut acc = g.clone();
        for k in 2u32..=8 {
            acc = curve.add_xy(&acc, &g).unwrap();
            let got = curve.scalar_mult_base(&BigUint::from(k)).unwrap();
            assert_eq!(got, acc);
        }
    }

    #[test]
    fn zero_scalar_is_rejected() {
        let curve = gost_r3410_2001_test();
        assert_eq!(
            curve.scalar_mult_base(&BigUint::zero()),
            Err(Error::PointAtInfinity)
        );
        // A scalar equal to the subgroup order reduces to zero.
        assert_eq!(
            curve.scalar_mult_base(curve.q()),
            Err(Error::PointAtInfinity)
        );
    }

    #[test]
    fn pos_normalizes_negative_values() {
        let curve = gost_r3410_2001_test();
        let v = BigInt::from(-5) - BigInt::from_biguint(Sign::Plus, curve.p().clone());
        assert_eq!(curve.pos(&v), curve.p() - 5u32);
    }
}
