//! Digest-level signing traits and byte-order interop adapters.
//!
//! The native convention of this crate is little-endian: digests are
//! consumed as produced by the hash, signatures are emitted as
//! `pad(s) || pad(r)`. Several interoperating stacks mirror one or both
//! of those byte streams. The decorators below adapt a [`Signer`] or
//! [`Verifier`] to such callers without adding any cryptographic logic:
//!
//! - [`ReverseDigest`] reverses the digest before delegating;
//! - [`ReverseDigestAndSignature`] reverses the digest and the
//!   produced/consumed signature.
//!
//! Both wrap any implementation, owned or borrowed:
//!
//! ```
//! use gost3410::dsa::{ReverseDigest, Signer, Verifier};
//! use gost3410::{curve, SecretKey};
//!
//! # fn main() -> gost3410::Result<()> {
//! let mut rng = rand_core::OsRng;
//! let key = SecretKey::random(curve::gost_r3410_2001_test(), &mut rng)?;
//! let digest = [0x42; 32];
//!
//! let signer = ReverseDigest { inner: &key };
//! let signature = signer.sign_digest(&mut rng, &digest)?;
//! let verifier = ReverseDigest { inner: signer.public_key()? };
//! assert!(verifier.verify_digest(&digest, &signature)?);
//! # Ok(())
//! # }
//! ```

use rand_core::{CryptoRng, RngCore};

use crate::error::Result;
use crate::public_key::PublicKey;
use crate::secret_key::SecretKey;

/// Digest signing capability.
pub trait Signer {
    /// Derive the verification key for this signer.
    fn public_key(&self) -> Result<PublicKey>;

    /// Sign a message digest, returning the raw `pad(s) || pad(r)` wire
    /// form.
    fn sign_digest<R: CryptoRng + RngCore>(&self, rng: &mut R, digest: &[u8])
        -> Result<Vec<u8>>;
}

/// Digest verification capability.
pub trait Verifier {
    /// Verify a raw signature over a message digest; a well-formed but
    /// invalid signature is `Ok(false)`.
    fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<bool>;
}

impl Signer for SecretKey {
    fn public_key(&self) -> Result<PublicKey> {
        SecretKey::public_key(self)
    }

    fn sign_digest<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        digest: &[u8],
    ) -> Result<Vec<u8>> {
        SecretKey::sign_digest(self, rng, digest)
    }
}

impl Verifier for PublicKey {
    fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<bool> {
        PublicKey::verify_digest(self, digest, signature)
    }
}

impl<T: Signer> Signer for &T {
    fn public_key(&self) -> Result<PublicKey> {
        (**self).public_key()
    }

    fn sign_digest<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        digest: &[u8],
    ) -> Result<Vec<u8>> {
        (**self).sign_digest(rng, digest)
    }
}

impl<T: Verifier> Verifier for &T {
    fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<bool> {
        (**self).verify_digest(digest, signature)
    }
}

fn reversed(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    out.reverse();
    out
}

/// Decorator reversing the digest byte order before delegating.
#[derive(Clone, Debug)]
pub struct ReverseDigest<T> {
    /// Wrapped signer or verifier.
    pub inner: T,
}

impl<T: Signer> Signer for ReverseDigest<T> {
    fn public_key(&self) -> Result<PublicKey> {
        self.inner.public_key()
    }

    fn sign_digest<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        digest: &[u8],
    ) -> Result<Vec<u8>> {
        self.inner.sign_digest(rng, &reversed(digest))
    }
}

impl<T: Verifier> Verifier for ReverseDigest<T> {
    fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<bool> {
        self.inner.verify_digest(&reversed(digest), signature)
    }
}

/// Decorator reversing both the digest and the signature byte order.
#[derive(Clone, Debug)]
pub struct ReverseDigestAndSignature<T> {
    /// Wrapped signer or verifier.
    pub inner: T,
}

impl<T: Signer> Signer for ReverseDigestAndSignature<T> {
    fn public_key(&self) -> Result<PublicKey> {
        self.inner.public_key()
    }

    fn sign_digest<R: CryptoRng + RngCore>(
        &self,
        rng: &mut R,
        digest: &[u8],
    ) -> Result<Vec<u8>> {
        let mut signature = self.inner.sign_digest(rng, &reversed(digest))?;
        signature.reverse();
        Ok(signature)
    }
}

impl<T: Verifier> Verifier for ReverseDigestAndSignature<T> {
    fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<bool> {
        self.inner
            .verify_digest(&reversed(digest), &reversed(signature))
    }
}
