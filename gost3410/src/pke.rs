//! ECC asymmetric encryption scheme over 256-bit GOST curves.
//!
//! Hybrid construction: an ephemeral key agreement produces a shared
//! point `(x2, y2)`, a counter-mode Streebog KDF over the shared
//! coordinates masks the plaintext, and `H(x2 || msg || y2)` binds the
//! message to the agreement as an integrity tag. The ciphertext is the
//! ephemeral point, the tag and the masked payload behind a one-byte
//! `0x04` uncompressed-point prefix, in one of two field orderings:
//!
//! - [`Mode::C1C3C2`]: `04 || X1 || Y1 || H || C`, the layout the
//!   ASN.1 structure wraps;
//! - [`Mode::C1C2C3`]: `04 || X1 || Y1 || C || H`.
//!
//! The scheme is defined for 256-bit parameter sets only: the coordinate
//! width is fixed at 32 bytes and is not generalized to other point
//! sizes.
//!
//! ```
//! use gost3410::pke::{DecryptingKey, EncryptingKey, Mode};
//! use gost3410::{curve, SecretKey};
//!
//! # fn main() -> gost3410::Result<()> {
//! let mut rng = rand_core::OsRng;
//! let secret_key = SecretKey::random(curve::gost_r3410_2001_test(), &mut rng)?;
//!
//! let encrypting_key = EncryptingKey::new(secret_key.public_key()?);
//! let ciphertext = encrypting_key.encrypt(&mut rng, b"plaintext")?;
//!
//! let decrypting_key = DecryptingKey::new(secret_key)?;
//! assert_eq!(decrypting_key.decrypt(&ciphertext)?, b"plaintext");
//! # Ok(())
//! # }
//! ```

use der::asn1::{OctetStringRef, UintRef};
use der::{Decode, Encode, Sequence};
use digest::{Digest, FixedOutputReset};
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use streebog::Streebog256;
use subtle::ConstantTimeEq;

use crate::curve::pad_be;
use crate::error::{Error, Result};
use crate::public_key::PublicKey;
use crate::secret_key::SecretKey;
use crate::RETRY_LIMIT;

/// Coordinate width of a 256-bit curve.
const POINT_BYTES: usize = 32;

/// Field orderings of the ciphertext trailer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Tag before payload: `04 || X1 || Y1 || H || C`.
    #[default]
    C1C3C2,
    /// Payload before tag: `04 || X1 || Y1 || C || H`.
    C1C2C3,
}

/// Public-key half of the scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptingKey {
    public_key: PublicKey,
    mode: Mode,
}

impl EncryptingKey {
    /// Initialize from a [`PublicKey`] with the default [`Mode::C1C3C2`]
    /// ordering.
    pub fn new(public_key: PublicKey) -> Self {
        Self::new_with_mode(public_key, Mode::C1C3C2)
    }

    /// Initialize from a [`PublicKey`] and an explicit field ordering.
    pub fn new_with_mode(public_key: PublicKey, mode: Mode) -> Self {
        Self { public_key, mode }
    }

    /// Borrow the wrapped [`PublicKey`].
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Encrypt a message using the default Streebog-256 digest.
    pub fn encrypt<R: CryptoRng + RngCore>(&self, rng: &mut R, msg: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_digest::<R, Streebog256>(rng, msg)
    }

    /// Encrypt a message using the specified digest algorithm.
    pub fn encrypt_digest<R, D>(&self, rng: &mut R, msg: &[u8]) -> Result<Vec<u8>>
    where
        R: CryptoRng + RngCore,
        D: Digest + FixedOutputReset,
    {
        encrypt::<R, D>(rng, &self.public_key, self.mode, msg)
    }

    /// Encrypt a message and wrap it into the ASN.1 ciphertext structure
    /// using the default Streebog-256 digest.
    pub fn encrypt_der<R: CryptoRng + RngCore>(&self, rng: &mut R, msg: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_der_digest::<R, Streebog256>(rng, msg)
    }

    /// Encrypt a message and wrap it into the ASN.1 ciphertext structure
    /// using the specified digest algorithm.
    ///
    /// The structure always wraps the [`Mode::C1C3C2`] wire layout,
    /// whatever ordering this key was configured with.
    pub fn encrypt_der_digest<R, D>(&self, rng: &mut R, msg: &[u8]) -> Result<Vec<u8>>
    where
        R: CryptoRng + RngCore,
        D: Digest + FixedOutputReset,
    {
        let raw = encrypt::<R, D>(rng, &self.public_key, Mode::C1C3C2, msg)?;
        let tag_len = <D as Digest>::output_size();
        let body = &raw[1..];
        let (x, rest) = body.split_at(POINT_BYTES);
        let (y, rest) = rest.split_at(POINT_BYTES);
        let (hash, cipher) = rest.split_at(tag_len);
        let cipher = Ciphertext {
            x: UintRef::new(trim_leading_zeroes(x))?,
            y: UintRef::new(trim_leading_zeroes(y))?,
            hash: OctetStringRef::new(hash)?,
            cipher: OctetStringRef::new(cipher)?,
        };
        Ok(cipher.to_der()?)
    }
}

impl From<PublicKey> for EncryptingKey {
    fn from(public_key: PublicKey) -> Self {
        Self::new(public_key)
    }
}

/// Secret-key half of the scheme.
#[derive(Clone, Debug)]
pub struct DecryptingKey {
    secret_key: SecretKey,
    encrypting_key: EncryptingKey,
    mode: Mode,
}

impl DecryptingKey {
    /// Initialize from a [`SecretKey`] with the default [`Mode::C1C3C2`]
    /// ordering.
    pub fn new(secret_key: SecretKey) -> Result<Self> {
        Self::new_with_mode(secret_key, Mode::C1C3C2)
    }

    /// Initialize from a [`SecretKey`] and an explicit field ordering.
    pub fn new_with_mode(secret_key: SecretKey, mode: Mode) -> Result<Self> {
        let encrypting_key = EncryptingKey::new_with_mode(secret_key.public_key()?, mode);
        Ok(Self {
            secret_key,
            encrypting_key,
            mode,
        })
    }

    /// Get the [`EncryptingKey`] which corresponds to this key.
    pub fn encrypting_key(&self) -> &EncryptingKey {
        &self.encrypting_key
    }

    /// Decrypt a ciphertext using the default Streebog-256 digest.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_digest::<Streebog256>(ciphertext)
    }

    /// Decrypt a ciphertext using the specified digest algorithm.
    pub fn decrypt_digest<D>(&self, ciphertext: &[u8]) -> Result<Vec<u8>>
    where
        D: Digest + FixedOutputReset,
    {
        decrypt::<D>(&self.secret_key, self.mode, ciphertext)
    }

    /// Decrypt an ASN.1-wrapped ciphertext using the default
    /// Streebog-256 digest.
    pub fn decrypt_der(&self, der_bytes: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_der_digest::<Streebog256>(der_bytes)
    }

    /// Decrypt an ASN.1-wrapped ciphertext using the specified digest
    /// algorithm.
    ///
    /// Fixed-width zero padding of the coordinates is restored before
    /// decryption; the wrapped layout is always [`Mode::C1C3C2`].
    pub fn decrypt_der_digest<D>(&self, der_bytes: &[u8]) -> Result<Vec<u8>>
    where
        D: Digest + FixedOutputReset,
    {
        let cipher = Ciphertext::from_der(der_bytes)?;
        let tag_len = <D as Digest>::output_size();
        let hash = cipher.hash.as_bytes();
        if hash.len() != tag_len {
            return Err(Error::LengthMismatch {
                expected: tag_len,
                actual: hash.len(),
            });
        }
        let x = left_pad(cipher.x.as_bytes())?;
        let y = left_pad(cipher.y.as_bytes())?;
        let body = cipher.cipher.as_bytes();
        let mut raw = Vec::with_capacity(1 + 2 * POINT_BYTES + tag_len + body.len());
        raw.push(0x04);
        raw.extend_from_slice(&x);
        raw.extend_from_slice(&y);
        raw.extend_from_slice(hash);
        raw.extend_from_slice(body);
        decrypt::<D>(&self.secret_key, Mode::C1C3C2, &raw)
    }
}

impl PublicKey {
    /// Encrypt a message for this key; see [`EncryptingKey::encrypt`].
    pub fn encrypt<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        msg: &[u8],
        mode: Mode,
    ) -> Result<Vec<u8>> {
        EncryptingKey::new_with_mode(self.clone(), mode).encrypt(rng, msg)
    }

    /// Encrypt a message into the ASN.1 ciphertext structure; see
    /// [`EncryptingKey::encrypt_der`].
    pub fn encrypt_der<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        EncryptingKey::new(self.clone()).encrypt_der(rng, msg)
    }
}

impl SecretKey {
    /// Decrypt a ciphertext with this key; see [`DecryptingKey::decrypt`].
    pub fn decrypt(&self, ciphertext: &[u8], mode: Mode) -> Result<Vec<u8>> {
        decrypt::<Streebog256>(self, mode, ciphertext)
    }

    /// Decrypt an ASN.1-wrapped ciphertext with this key; see
    /// [`DecryptingKey::decrypt_der`].
    pub fn decrypt_der(&self, der_bytes: &[u8]) -> Result<Vec<u8>> {
        DecryptingKey::new(self.clone())?.decrypt_der(der_bytes)
    }
}

/// ASN.1 form of a [`Mode::C1C3C2`] ciphertext.
#[derive(Sequence)]
struct Ciphertext<'a> {
    x: UintRef<'a>,
    y: UintRef<'a>,
    hash: OctetStringRef<'a>,
    cipher: OctetStringRef<'a>,
}

fn encrypt<R, D>(rng: &mut R, public_key: &PublicKey, mode: Mode, msg: &[u8]) -> Result<Vec<u8>>
where
    R: CryptoRng + RngCore,
    D: Digest + FixedOutputReset,
{
    let curve = public_key.curve();
    let point_size = curve.point_size();
    if point_size != POINT_BYTES {
        return Err(Error::UnsupportedPointSize { actual: point_size });
    }
    let mut hasher = D::new();
    for _ in 0..RETRY_LIMIT {
        let k = curve.random_field_element(rng);
        let (x1, y1) = curve.scalar_mult_base(&k)?;
        let (x2, y2) = curve.scalar_mult(&k, public_key.x(), public_key.y())?;
        let x2 = pad_be(&x2, POINT_BYTES);
        let y2 = pad_be(&y2, POINT_BYTES);
        // An all-zero mask leaks the plaintext; redo the agreement.
        let mask = match kdf(&mut hasher, msg.len(), &x2, &y2) {
            Some(mask) => mask,
            None => continue,
        };
        Digest::update(&mut hasher, &x2);
        Digest::update(&mut hasher, msg);
        Digest::update(&mut hasher, &y2);
        let tag = hasher.finalize_reset();
        let body: Vec<u8> = msg.iter().zip(&mask).map(|(m, k)| m ^ k).collect();
        let mut out = Vec::with_capacity(1 + 2 * POINT_BYTES + tag.len() + body.len());
        out.push(0x04);
        out.extend_from_slice(&pad_be(&x1, POINT_BYTES));
        out.extend_from_slice(&pad_be(&y1, POINT_BYTES));
        match mode {
            Mode::C1C3C2 => {
                out.extend_from_slice(&tag);
                out.extend_from_slice(&body);
            }
            Mode::C1C2C3 => {
                out.extend_from_slice(&body);
                out.extend_from_slice(&tag);
            }
        }
        return Ok(out);
    }
    panic!("randomness source failed to produce a usable mask stream");
}

fn decrypt<D>(secret_key: &SecretKey, mode: Mode, ciphertext: &[u8]) -> Result<Vec<u8>>
where
    D: Digest + FixedOutputReset,
{
    let curve = secret_key.curve();
    let point_size = curve.point_size();
    if point_size != POINT_BYTES {
        return Err(Error::UnsupportedPointSize { actual: point_size });
    }
    let tag_len = <D as Digest>::output_size();
    let expected_min = 1 + 2 * POINT_BYTES + tag_len;
    if ciphertext.len() < expected_min {
        return Err(Error::LengthMismatch {
            expected: expected_min,
            actual: ciphertext.len(),
        });
    }
    let data = &ciphertext[1..];
    let data: Vec<u8> = match mode {
        Mode::C1C3C2 => data.to_vec(),
        Mode::C1C2C3 => {
            let (points, rest) = data.split_at(2 * POINT_BYTES);
            let (body, tag) = rest.split_at(rest.len() - tag_len);
            [points, tag, body].concat()
        }
    };
    let (x1, rest) = data.split_at(POINT_BYTES);
    let (y1, rest) = rest.split_at(POINT_BYTES);
    let (tag, body) = rest.split_at(tag_len);
    let (x2, y2) = curve.scalar_mult(
        secret_key.as_scalar(),
        &BigUint::from_bytes_be(x1),
        &BigUint::from_bytes_be(y1),
    )?;
    let x2 = pad_be(&x2, POINT_BYTES);
    let y2 = pad_be(&y2, POINT_BYTES);
    let mut hasher = D::new();
    let mask = kdf(&mut hasher, body.len(), &x2, &y2).ok_or(Error::KdfExhausted)?;
    let plaintext: Vec<u8> = body.iter().zip(&mask).map(|(c, k)| c ^ k).collect();
    Digest::update(&mut hasher, &x2);
    Digest::update(&mut hasher, &plaintext);
    Digest::update(&mut hasher, &y2);
    let expected = hasher.finalize_reset();
    if bool::from(expected.as_slice().ct_eq(tag)) {
        Ok(plaintext)
    } else {
        Err(Error::TagMismatch { plaintext })
    }
}

/// Counter-mode mask derivation over the shared coordinates.
///
/// Hashes `x2 || y2 || counter` with a big-endian 32-bit counter
/// starting at 1 and truncates the concatenated blocks to `len` bytes.
/// Returns `None` for the degenerate all-zero stream; the empty stream
/// of a zero-length message is not degenerate.
fn kdf<D>(hasher: &mut D, len: usize, x2: &[u8], y2: &[u8]) -> Option<Vec<u8>>
where
    D: Digest + FixedOutputReset,
{
    let mut stream = Vec::with_capacity(len);
    let mut counter: u32 = 1;
    while stream.len() < len {
        Digest::update(hasher, x2);
        Digest::update(hasher, y2);
        Digest::update(hasher, counter.to_be_bytes());
        let block = hasher.finalize_reset();
        let take = core::cmp::min(block.len(), len - stream.len());
        stream.extend_from_slice(&block[..take]);
        counter += 1;
    }
    if !stream.is_empty() && stream.iter().all(|&b| b == 0) {
        return None;
    }
    Some(stream)
}

fn trim_leading_zeroes(mut bytes: &[u8]) -> &[u8] {
    while bytes.len() > 1 && bytes[0] == 0 {
        bytes = &bytes[1..];
    }
    bytes
}

/// Restore the fixed-width zero padding of an unwrapped coordinate.
fn left_pad(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() > POINT_BYTES {
        return Err(Error::LengthMismatch {
            expected: POINT_BYTES,
            actual: bytes.len(),
        });
    }
    let mut out = vec![0u8; POINT_BYTES];
    out[POINT_BYTES - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}
