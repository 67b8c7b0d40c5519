//! Setup integrity codec
//!
//! A setup file is the YAML of `{hero, time}` plus a `hash` field holding
//! `SHA3-224(yaml || secret)` in hex. Loading checks the hash and, separately,
//! that the file was last written right after the embedded time.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_224};

use super::error::TamperSignal;
use crate::models::hero::HeroRecord;

/// Secret appended to the serialized record before hashing.
pub const DEFAULT_SECRET: &[u8] = b"career-setup-integrity";

/// Largest accepted gap between the file's mtime and the embedded time.
pub const MTIME_TOLERANCE_SECS: f64 = 0.1;

/// Hex length of a SHA3-224 digest.
pub const DIGEST_HEX_LEN: usize = 56;

/// The hashed part of a setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetupEnvelope {
    pub hero: HeroRecord,
    /// Unix seconds at save time.
    pub time: f64,
}

/// What ends up on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SealedSetup {
    pub hero: HeroRecord,
    pub time: f64,
    pub hash: String,
}

impl SealedSetup {
    pub fn envelope(&self) -> SetupEnvelope {
        SetupEnvelope { hero: self.hero.clone(), time: self.time }
    }
}

#[derive(Debug, Clone)]
pub struct IntegrityCodec {
    secret: Vec<u8>,
}

impl Default for IntegrityCodec {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET)
    }
}

impl IntegrityCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into() }
    }

    /// Hex SHA3-224 of `bytes || secret`.
    pub fn digest(&self, bytes: &[u8]) -> String {
        let mut hasher = Sha3_224::new();
        hasher.update(bytes);
        hasher.update(&self.secret);
        let mut hex = String::with_capacity(DIGEST_HEX_LEN);
        for byte in hasher.finalize() {
            let _ = write!(hex, "{:02x}", byte);
        }
        hex
    }

    pub fn hash_envelope(&self, envelope: &SetupEnvelope) -> Result<String, serde_yaml::Error> {
        let yaml = serde_yaml::to_string(envelope)?;
        Ok(self.digest(yaml.as_bytes()))
    }

    pub fn seal(&self, hero: HeroRecord, time: f64) -> Result<SealedSetup, serde_yaml::Error> {
        let hash = self.hash_envelope(&SetupEnvelope { hero: hero.clone(), time })?;
        Ok(SealedSetup { hero, time, hash })
    }

    pub fn hash_matches(&self, sealed: &SealedSetup) -> bool {
        self.hash_envelope(&sealed.envelope())
            .map(|hash| hash.eq_ignore_ascii_case(sealed.hash.trim()))
            .unwrap_or(false)
    }

    /// Runs both checks against the file's modification time.
    pub fn verify(&self, sealed: &SealedSetup, mtime: f64) -> Result<(), TamperSignal> {
        let hash_ok = self.hash_matches(sealed);
        let time_ok = mtime - sealed.time < MTIME_TOLERANCE_SECS;
        match TamperSignal::from_checks(hash_ok, time_ok) {
            None => Ok(()),
            Some(signal) => Err(signal),
        }
    }
}

/// Whether `hash` looks like a digest this codec could have written.
pub fn is_digest(hash: &str) -> bool {
    let hash = hash.trim();
    hash.len() == DIGEST_HEX_LEN && hash.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::Foot;
    use proptest::prelude::*;

    fn record() -> HeroRecord {
        HeroRecord {
            full_name: "Ada Stone".into(),
            shirt_name: "Stone".into(),
            nation: "England".into(),
            age: 16,
            pace: 50,
            shooting: 50,
            passing: 50,
            dribbling: 50,
            defending: 50,
            physicality: 50,
            foot: Foot::Left,
            traits: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_sealed_setup_verifies() {
        let codec = IntegrityCodec::default();
        let sealed = codec.seal(record(), 1_700_000_000.25).unwrap();
        assert!(is_digest(&sealed.hash));
        assert_eq!(codec.verify(&sealed, 1_700_000_000.30), Ok(()));
    }

    #[test]
    fn test_signals_are_distinguishable() {
        let codec = IntegrityCodec::default();
        let sealed = codec.seal(record(), 1000.0).unwrap();

        let mut edited = sealed.clone();
        edited.hero.pace = 80;
        assert_eq!(codec.verify(&edited, 1000.0), Err(TamperSignal::HashMismatch));
        assert_eq!(codec.verify(&sealed, 1005.0), Err(TamperSignal::TimeMismatch));
        assert_eq!(codec.verify(&edited, 1005.0), Err(TamperSignal::Both));
    }

    #[test]
    fn test_secret_changes_digest() {
        let a = IntegrityCodec::default().digest(b"hero");
        let b = IntegrityCodec::new(b"other".to_vec()).digest(b"hero");
        assert_ne!(a, b);
        assert_eq!(a.len(), DIGEST_HEX_LEN);
    }

    proptest! {
        #[test]
        fn prop_single_byte_flip_changes_digest(
            bytes in proptest::collection::vec(any::<u8>(), 1..256),
            index in any::<proptest::sample::Index>(),
            mask in 1u8..=255,
        ) {
            let codec = IntegrityCodec::default();
            let mut flipped = bytes.clone();
            let i = index.index(flipped.len());
            flipped[i] ^= mask;
            prop_assert_ne!(codec.digest(&bytes), codec.digest(&flipped));
        }
    }
}
