//! GOST R 34.10 public keys and signature verification.

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::curve::{pad_be, Curve};
use crate::error::{Error, Result};

/// GOST R 34.10 public key: an affine point bound to a parameter set.
///
/// Decoding performs no on-curve membership check; verification treats a
/// degenerate point as a verification failure, not an error.
#[derive(Clone, Debug)]
pub struct PublicKey {
    curve: Arc<Curve>,
    x: BigUint,
    y: BigUint,
}

impl PublicKey {
    /// Build a public key from affine coordinates.
    pub fn from_affine(curve: Arc<Curve>, x: BigUint, y: BigUint) -> Self {
        Self { curve, x, y }
    }

    /// Deserialize a `LE(X) || LE(Y)` public key of exactly
    /// `2 * point_size()` bytes.
    pub fn from_bytes_le(curve: Arc<Curve>, raw: &[u8]) -> Result<Self> {
        let point_size = curve.point_size();
        if raw.len() != 2 * point_size {
            return Err(Error::LengthMismatch {
                expected: 2 * point_size,
                actual: raw.len(),
            });
        }
        let mut key = raw.to_vec();
        key.reverse();
        Ok(Self {
            x: BigUint::from_bytes_be(&key[point_size..]),
            y: BigUint::from_bytes_be(&key[..point_size]),
            curve,
        })
    }

    /// Deserialize a `BE(X) || BE(Y)` public key of exactly
    /// `2 * point_size()` bytes.
    pub fn from_bytes_be(curve: Arc<Curve>, raw: &[u8]) -> Result<Self> {
        let point_size = curve.point_size();
        if raw.len() != 2 * point_size {
            return Err(Error::LengthMismatch {
                expected: 2 * point_size,
                actual: raw.len(),
            });
        }
        Ok(Self {
            x: BigUint::from_bytes_be(&raw[..point_size]),
            y: BigUint::from_bytes_be(&raw[point_size..]),
            curve,
        })
    }

    /// Serialize as `LE(X) || LE(Y)`: the byte reversal of
    /// `pad(Y) || pad(X)`.
    ///
    /// The Y-before-X packing prior to the reversal is a fixed wire
    /// contract shared with interoperating implementations.
    pub fn to_bytes_le(&self) -> Vec<u8> {
        let point_size = self.curve.point_size();
        let mut raw = pad_be(&self.y, point_size);
        raw.extend_from_slice(&pad_be(&self.x, point_size));
        raw.reverse();
        raw
    }

    /// Serialize as `BE(X) || BE(Y)`.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let point_size = self.curve.point_size();
        let mut raw = pad_be(&self.x, point_size);
        raw.extend_from_slice(&pad_be(&self.y, point_size));
        raw
    }

    /// Parameter set this key is bound to.
    pub fn curve(&self) -> &Arc<Curve> {
        &self.curve
    }

    /// Affine x-coordinate.
    pub fn x(&self) -> &BigUint {
        &self.x
    }

    /// Affine y-coordinate.
    pub fn y(&self) -> &BigUint {
        &self.y
    }

    /// Verify a `pad(s) || pad(r)` signature over a message digest.
    ///
    /// Fails with [`Error::LengthMismatch`] when the signature buffer is
    /// not `2 * point_size()` bytes. A well-formed but invalid signature
    /// is reported as `Ok(false)`.
    pub fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<bool> {
        let point_size = self.curve.point_size();
        if signature.len() != 2 * point_size {
            return Err(Error::LengthMismatch {
                expected: 2 * point_size,
                actual: signature.len(),
            });
        }
        let s = BigUint::from_bytes_be(&signature[..point_size]);
        let r = BigUint::from_bytes_be(&signature[point_size..]);
        let q = self.curve.q();
        if s.is_zero() || r.is_zero() || &s >= q || &r >= q {
            return Ok(false);
        }
        let mut e = BigUint::from_bytes_be(digest) % q;
        if e.is_zero() {
            e = BigUint::one();
        }
        let v = e.modpow(&(q - 2u32), q);
        let z1 = (&s * &v) % q;
        let z2 = (q - (&r * &v) % q) % q;
        let p1 = self.curve.scalar_mult_base(&z1)?;
        let p2 = match self.curve.scalar_mult(&z2, &self.x, &self.y) {
            Ok(p) => p,
            // A degenerate public point cannot validate anything.
            Err(Error::PointAtInfinity) => return Ok(false),
            Err(err) => return Err(err),
        };
        let sum = match self.curve.add_xy(&p1, &p2) {
            Some(sum) => sum,
            None => return Ok(false),
        };
        Ok(sum.0 % q == r)
    }
}

impl PartialEq for PublicKey {
    /// Keys are equal when both coordinates and the parameter sets match.
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.curve == other.curve
    }
}

impl Eq for PublicKey {}
