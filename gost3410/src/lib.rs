//! Pure Rust implementation of the GOST R 34.10-2012 public-key
//! algorithms: key-pair lifecycle, digital signatures over message
//! digests, an ECC hybrid encryption scheme, and the Weierstrass ↔
//! twisted Edwards coordinate transform for dual-form parameter sets.
//!
//! Curve parameters are runtime values selected by name (see [`curve`]),
//! and all arithmetic is arbitrary-precision with explicit modular
//! reduction. Randomness is always supplied per call, which keeps the
//! primitives deterministic under test.
//!
//! ## Signing
//!
//! ```
//! use gost3410::{curve, SecretKey};
//!
//! # fn main() -> gost3410::Result<()> {
//! let mut rng = rand_core::OsRng;
//! let curve = curve::gost_r3410_2001_crypto_pro_a();
//!
//! let secret_key = SecretKey::random(curve, &mut rng)?;
//! let public_key = secret_key.public_key()?;
//!
//! let digest = [0xA5; 32]; // Streebog-256 output of the message
//! let signature = secret_key.sign_digest(&mut rng, &digest)?;
//! assert!(public_key.verify_digest(&digest, &signature)?);
//! # Ok(())
//! # }
//! ```
//!
//! Encryption lives in [`pke`], interop byte-order adapters in [`dsa`].
//!
//! This crate is **not** hardened against side channels: apart from the
//! constant-time integrity-tag comparison, the arbitrary-precision
//! arithmetic is variable-time.

#![forbid(unsafe_code)]
#![warn(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
    clippy::implicit_saturating_sub,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

pub mod curve;
pub mod dsa;
pub mod pke;

mod edwards;
mod error;
mod public_key;
mod secret_key;

pub use crate::curve::Curve;
pub use crate::error::{Error, Result};
pub use crate::public_key::PublicKey;
pub use crate::secret_key::SecretKey;

pub use num_bigint;
pub use rand_core;

/// Retry budget for the nonce and mask-derivation loops. Exceeding it
/// means the randomness source is broken, which is fatal.
pub(crate) const RETRY_LIMIT: usize = 1000;
