//! Error types.

/// Result type for GOST R 34.10 operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced by key management, signing and encryption.
///
/// Invalid-but-well-formed signatures are not errors: verification reports
/// them as `Ok(false)`. A broken randomness source is a fatal condition and
/// panics once the bounded retry budget is exhausted.
#[derive(Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A private-key scalar reduced to zero modulo the subgroup order.
    #[error("private key scalar is zero modulo the subgroup order")]
    ZeroKey,

    /// An input buffer has the wrong size for the operation.
    #[error("input is {actual} bytes, expected {expected}")]
    LengthMismatch {
        /// Size the operation requires.
        expected: usize,
        /// Size that was provided.
        actual: usize,
    },

    /// Mask derivation produced an all-zero stream while decrypting.
    #[error("key derivation produced an all-zero mask stream")]
    KdfExhausted,

    /// The ciphertext integrity tag did not match.
    ///
    /// The unauthenticated plaintext is carried alongside the error so that
    /// interoperating callers can inspect it, but it MUST be treated as
    /// rejected data.
    #[error("ciphertext integrity tag mismatch")]
    TagMismatch {
        /// Plaintext recovered before the tag check failed.
        plaintext: Vec<u8>,
    },

    /// A twisted Edwards transform was requested on a curve that has no
    /// Edwards coefficients.
    #[error("curve has no twisted Edwards form")]
    UnsupportedCurveForm,

    /// The encryption scheme is defined for 256-bit curves only.
    #[error("point size {actual} is unsupported, encryption requires a 256-bit curve")]
    UnsupportedPointSize {
        /// Point size of the curve that was supplied.
        actual: usize,
    },

    /// Scalar multiplication degenerated to the point at infinity.
    #[error("scalar multiplication produced the point at infinity")]
    PointAtInfinity,

    /// DER encoding or decoding of the ciphertext structure failed.
    #[error("ASN.1 error: {0}")]
    Asn1(#[from] der::Error),
}
