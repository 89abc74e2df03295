//! GOST R 34.10 secret keys and digest signing.

use core::fmt::{self, Debug};
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::curve::{pad_be, Curve};
use crate::error::{Error, Result};
use crate::public_key::PublicKey;
use crate::RETRY_LIMIT;

/// GOST R 34.10 secret key: a scalar in `[1, q-1]` bound to a parameter
/// set.
#[derive(Clone)]
pub struct SecretKey {
    curve: Arc<Curve>,
    key: BigUint,
}

impl SecretKey {
    /// Generate a random [`SecretKey`].
    ///
    /// Draws `point_size()` bytes, interprets them as a little-endian
    /// integer and reduces modulo the subgroup order. A zero residue is
    /// rejected with [`Error::ZeroKey`].
    pub fn random<R: CryptoRng + RngCore>(curve: Arc<Curve>, rng: &mut R) -> Result<Self> {
        let mut raw = vec![0u8; curve.point_size()];
        rng.fill_bytes(&mut raw);
        let result = Self::from_bytes_le(curve, &raw);
        raw.zeroize();
        result
    }

    /// Deserialize a little-endian secret scalar of exactly
    /// `point_size()` bytes.
    pub fn from_bytes_le(curve: Arc<Curve>, raw: &[u8]) -> Result<Self> {
        let point_size = curve.point_size();
        if raw.len() != point_size {
            return Err(Error::LengthMismatch {
                expected: point_size,
                actual: raw.len(),
            });
        }
        Self::reduced(curve, BigUint::from_bytes_le(raw))
    }

    /// Deserialize a big-endian secret scalar of exactly `point_size()`
    /// bytes.
    pub fn from_bytes_be(curve: Arc<Curve>, raw: &[u8]) -> Result<Self> {
        let point_size = curve.point_size();
        if raw.len() != point_size {
            return Err(Error::LengthMismatch {
                expected: point_size,
                actual: raw.len(),
            });
        }
        Self::reduced(curve, BigUint::from_bytes_be(raw))
    }

    /// The residue modulo q must be non-zero, not merely the raw value.
    fn reduced(curve: Arc<Curve>, raw: BigUint) -> Result<Self> {
        let key = raw % curve.q();
        if key.is_zero() {
            return Err(Error::ZeroKey);
        }
        Ok(Self { curve, key })
    }

    /// Serialize as a little-endian scalar: the byte reversal of the
    /// fixed-width big-endian form.
    pub fn to_bytes_le(&self) -> Vec<u8> {
        let mut raw = self.to_bytes_be();
        raw.reverse();
        raw
    }

    /// Serialize as a fixed-width big-endian scalar.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        pad_be(&self.key, self.curve.point_size())
    }

    /// Parameter set this key is bound to.
    pub fn curve(&self) -> &Arc<Curve> {
        &self.curve
    }

    /// Borrow the secret scalar.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    ///
    /// Please treat it with the care it deserves!
    pub fn as_scalar(&self) -> &BigUint {
        &self.key
    }

    /// Derive the [`PublicKey`] corresponding to this secret key.
    pub fn public_key(&self) -> Result<PublicKey> {
        let (x, y) = self.curve.scalar_mult_base(&self.key)?;
        Ok(PublicKey::from_affine(self.curve.clone(), x, y))
    }

    /// Sign a message digest.
    ///
    /// The digest is consumed as a big-endian integer and reduced modulo
    /// the subgroup order; a zero reduction signs the value 1 instead.
    /// The output is `pad(s) || pad(r)`, each half exactly
    /// `point_size()` bytes, with s first.
    ///
    /// # Panics
    ///
    /// When the randomness source keeps producing degenerate nonces
    /// (a broken source, not a recoverable condition).
    pub fn sign_digest<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        digest: &[u8],
    ) -> Result<Vec<u8>> {
        let q = self.curve.q();
        let mut e = BigUint::from_bytes_be(digest) % q;
        if e.is_zero() {
            e = BigUint::one();
        }
        let point_size = self.curve.point_size();
        let mut k_raw = vec![0u8; point_size];
        for _ in 0..RETRY_LIMIT {
            rng.fill_bytes(&mut k_raw);
            let k = BigUint::from_bytes_be(&k_raw) % q;
            if k.is_zero() {
                continue;
            }
            let (r, _) = self.curve.scalar_mult_base(&k)?;
            let r = r % q;
            if r.is_zero() {
                continue;
            }
            let s = (&self.key * &r + &k * &e) % q;
            if s.is_zero() {
                continue;
            }
            let mut signature = pad_be(&s, point_size);
            signature.extend_from_slice(&pad_be(&r, point_size));
            return Ok(signature);
        }
        panic!("randomness source failed to produce a usable signing nonce");
    }
}

impl Zeroize for SecretKey {
    /// Best effort: the scalar is replaced by zero; freed limbs are not
    /// scrubbed by the arbitrary-precision backend.
    fn zeroize(&mut self) {
        self.key.set_zero();
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("curve", &self.curve.name())
            .finish_non_exhaustive()
    }
}
