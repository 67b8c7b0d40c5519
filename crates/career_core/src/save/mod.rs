//! Hero setups
//!
//! Setups are YAML files sealed with a SHA3-224 digest and checked against
//! their modification time on load.

pub mod codec;
pub mod error;
pub mod store;

pub use codec::{IntegrityCodec, SealedSetup, SetupEnvelope, DEFAULT_SECRET};
pub use error::{SetupError, TamperSignal};
pub use store::{SetupStore, SETUP_EXTENSION};
