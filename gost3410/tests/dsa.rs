//! Signature generation and verification tests.

use gost3410::dsa::{ReverseDigest, ReverseDigestAndSignature, Signer, Verifier};
use gost3410::num_bigint::BigUint;
use gost3410::{curve, Error, PublicKey, SecretKey};
use hex_literal::hex;
use proptest::prelude::*;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_core::{impls, CryptoRng, RngCore};

/// The worked 256-bit signature example of GOST R 34.10-2012 over
/// id-GostR3410-2001-TestParamSet, as published in RFC 7091.
const D: [u8; 32] = hex!("7A929ADE789BB9BE10ED359DD39A72C11B60961F49397EEE1D19CE9891EC3B28");
const K: [u8; 32] = hex!("77105C9B20BCD3122823C8CF6FCC7B956DE33814E95B7FE64FED924594DCEAB3");
const E: [u8; 32] = hex!("2DFBC1B372D89A1188C09C52E0EEC61FCE52032AB1022E8E67ECE6672B043EE5");
const R: [u8; 32] = hex!("41AA28D2F1AB148280CD9ED56FEDA41974053554A42767B83AD043FD39DC0493");
const S: [u8; 32] = hex!("01456C64BA4642A1653C235A98A60249BCD6D3F746B631DF928014F6C5BF9C40");
const PUB_X: [u8; 32] = hex!("7F2B49E270DB6D90D8595BEC458B50C58585BA1D4E9B788F6689DBD8E56FD80B");
const PUB_Y: [u8; 32] = hex!("26F1B489D6701DD185C8413A977B3CBBAF64D1C593D26627DFFB101A87FF77DA");

/// Replays a fixed byte script, for reproducing standardized nonces.
struct ScriptedRng(Vec<u8>);

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let take: Vec<u8> = self.0.drain(..dest.len()).collect();
        dest.copy_from_slice(&take);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for ScriptedRng {}

#[test]
fn sign_reproduces_the_standard_example() {
    let curve = curve::gost_r3410_2001_test();
    let key = SecretKey::from_bytes_be(curve, &D).unwrap();
    let mut rng = ScriptedRng(K.to_vec());
    let signature = key.sign_digest(&mut rng, &E).unwrap();
    // s comes first on the wire.
    assert_eq!(&signature[..32], S);
    assert_eq!(&signature[32..], R);
}

#[test]
fn verify_accepts_the_standard_example() {
    let curve = curve::gost_r3410_2001_test();
    let public_key = PublicKey::from_affine(
        curve.clone(),
        BigUint::from_bytes_be(&PUB_X),
        BigUint::from_bytes_be(&PUB_Y),
    );
    let derived = SecretKey::from_bytes_be(curve, &D)
        .unwrap()
        .public_key()
        .unwrap();
    assert_eq!(derived, public_key);

    let mut signature = S.to_vec();
    signature.extend_from_slice(&R);
    assert!(public_key.verify_digest(&E, &signature).unwrap());
}

#[test]
fn sign_then_verify_round_trips() {
    for curve in [
        curve::gost_r3410_2001_test(),
        curve::gost_r3410_2001_crypto_pro_a(),
    ] {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let key = SecretKey::random(curve, &mut rng).unwrap();
        let public_key = key.public_key().unwrap();
        let digest = hex!("00112233445566778899AABBCCDDEEFF00112233445566778899AABBCCDDEEFF");
        let signature = key.sign_digest(&mut rng, &digest).unwrap();
        assert!(public_key.verify_digest(&digest, &signature).unwrap());
    }
}

#[test]
fn zero_digest_signs_as_one() {
    // A digest reducing to zero is signed as e = 1, so a signature over
    // the all-zero digest must verify against the digest encoding 1 and
    // vice versa.
    let mut rng = ChaCha20Rng::seed_from_u64(13);
    let key = SecretKey::random(curve::gost_r3410_2001_test(), &mut rng).unwrap();
    let public_key = key.public_key().unwrap();

    let zero = [0u8; 32];
    let mut one = [0u8; 32];
    one[31] = 1;

    let signature = key.sign_digest(&mut rng, &zero).unwrap();
    assert!(public_key.verify_digest(&zero, &signature).unwrap());
    assert!(public_key.verify_digest(&one, &signature).unwrap());
}

#[test]
fn degenerate_unit_key_follows_the_signature_equation() {
    // With d = 1 and a scripted nonce the whole signature is fixed by
    // the engine alone: r = x(kG) mod q, s = (r + k·e) mod q.
    let curve = curve::gost_r3410_2001_test();
    let mut raw = [0u8; 32];
    raw[31] = 1;
    let key = SecretKey::from_bytes_be(curve.clone(), &raw).unwrap();

    let digest = hex!("0102030405060708091011121314151617181920212223242526272829303132");
    let q = curve.q();
    let e = BigUint::from_bytes_be(&digest) % q;
    let k = BigUint::from_bytes_be(&K) % q;
    let (rx, _) = curve.scalar_mult_base(&k).unwrap();
    let r = rx % q;
    let s = (&r + &k * &e) % q;

    let mut rng = ScriptedRng(K.to_vec());
    let signature = key.sign_digest(&mut rng, &digest).unwrap();
    assert_eq!(BigUint::from_bytes_be(&signature[..32]), s);
    assert_eq!(BigUint::from_bytes_be(&signature[32..]), r);
}

#[test]
fn verify_rejects_wrong_signature_length() {
    let mut rng = ChaCha20Rng::seed_from_u64(17);
    let public_key = SecretKey::random(curve::gost_r3410_2001_test(), &mut rng)
        .unwrap()
        .public_key()
        .unwrap();
    let err = public_key.verify_digest(&[0u8; 32], &[0u8; 63]).unwrap_err();
    assert_eq!(
        err,
        Error::LengthMismatch {
            expected: 64,
            actual: 63
        }
    );
}

#[test]
fn verify_rejects_out_of_range_halves() {
    let curve = curve::gost_r3410_2001_test();
    let mut rng = ChaCha20Rng::seed_from_u64(19);
    let key = SecretKey::random(curve.clone(), &mut rng).unwrap();
    let public_key = key.public_key().unwrap();
    let digest = [0x5A; 32];
    let signature = key.sign_digest(&mut rng, &digest).unwrap();

    let q_bytes = {
        let bytes = curve.q().to_bytes_be();
        let mut out = vec![0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    };

    // s >= q
    let mut tampered = signature.clone();
    tampered[..32].copy_from_slice(&q_bytes);
    assert!(!public_key.verify_digest(&digest, &tampered).unwrap());

    // r = 0
    let mut tampered = signature.clone();
    tampered[32..].fill(0);
    assert!(!public_key.verify_digest(&digest, &tampered).unwrap());
}

#[test]
fn adapters_round_trip() {
    let mut rng = ChaCha20Rng::seed_from_u64(23);
    let key = SecretKey::random(curve::gost_r3410_2001_crypto_pro_a(), &mut rng).unwrap();
    let digest = hex!("F00DF00DF00DF00DF00DF00DF00DF00DF00DF00DF00DF00DF00DF00DF00DF00D");

    let signer = ReverseDigest { inner: &key };
    let signature = signer.sign_digest(&mut rng, &digest).unwrap();
    let verifier = ReverseDigest {
        inner: signer.public_key().unwrap(),
    };
    assert!(verifier.verify_digest(&digest, &signature).unwrap());

    let signer = ReverseDigestAndSignature { inner: &key };
    let signature = signer.sign_digest(&mut rng, &digest).unwrap();
    let verifier = ReverseDigestAndSignature {
        inner: signer.public_key().unwrap(),
    };
    assert!(verifier.verify_digest(&digest, &signature).unwrap());
}

#[test]
fn adapters_reverse_the_byte_streams() {
    let curve = curve::gost_r3410_2001_test();
    let key = SecretKey::from_bytes_be(curve, &D).unwrap();
    let digest = E;
    let mut reversed_digest = digest;
    reversed_digest.reverse();

    // Same scripted nonce on both sides makes the outputs comparable.
    let plain = key
        .sign_digest(&mut ScriptedRng(K.to_vec()), &reversed_digest)
        .unwrap();

    let signer = ReverseDigest { inner: &key };
    let adapted = signer
        .sign_digest(&mut ScriptedRng(K.to_vec()), &digest)
        .unwrap();
    assert_eq!(adapted, plain);

    let signer = ReverseDigestAndSignature { inner: &key };
    let adapted = signer
        .sign_digest(&mut ScriptedRng(K.to_vec()), &digest)
        .unwrap();
    let mut expected = plain;
    expected.reverse();
    assert_eq!(adapted, expected);
}

prop_compose! {
    fn signing_key()(seed in any::<u64>()) -> SecretKey {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        loop {
            if let Ok(key) = SecretKey::random(curve::gost_r3410_2001_test(), &mut rng) {
                return key;
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn tampered_signatures_are_rejected(
        key in signing_key(),
        byte in 0usize..64,
        bit in 0usize..8,
    ) {
        let mut rng = ChaCha20Rng::seed_from_u64(byte as u64 ^ 0xDEAD);
        let digest = [0xC3; 32];
        let mut signature = key.sign_digest(&mut rng, &digest).unwrap();
        let public_key = key.public_key().unwrap();
        prop_assert!(public_key.verify_digest(&digest, &signature).unwrap());

        signature[byte] ^= 1 << bit;
        prop_assert!(!public_key.verify_digest(&digest, &signature).unwrap());
    }
}
