use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::error::ErrorKind;
use crate::player::validation::ValidationError;

/// Which integrity checks a setup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TamperSignal {
    HashMismatch,
    TimeMismatch,
    Both,
}

impl TamperSignal {
    /// Short code shown to the user.
    pub fn flag(self) -> &'static str {
        match self {
            TamperSignal::HashMismatch => "H001",
            TamperSignal::TimeMismatch => "T001",
            TamperSignal::Both => "B001",
        }
    }

    pub fn from_checks(hash_ok: bool, time_ok: bool) -> Option<Self> {
        match (hash_ok, time_ok) {
            (true, true) => None,
            (false, true) => Some(TamperSignal::HashMismatch),
            (true, false) => Some(TamperSignal::TimeMismatch),
            (false, false) => Some(TamperSignal::Both),
        }
    }
}

impl fmt::Display for TamperSignal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.flag())
    }
}

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("This setup has been modified outside the game ({0}).")]
    Tampered(TamperSignal),

    #[error("Setup {} is corrupted: {reason}", path.display())]
    Corrupted { path: PathBuf, reason: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Setup {} could not be parsed: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Setup hero is invalid: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Setup names cannot be empty.")]
    EmptyName,

    #[error("Setup name \"{0}\" cannot contain path separators.")]
    InvalidName(String),

    #[error("There is no setup named \"{0}\".")]
    NotFound(String),
}

impl SetupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SetupError::Tampered(_) | SetupError::Corrupted { .. } => ErrorKind::Integrity,
            SetupError::Io { .. } => ErrorKind::Io,
            SetupError::Parse { .. } => ErrorKind::Parse,
            SetupError::Invalid(_) | SetupError::EmptyName | SetupError::InvalidName(_) => {
                ErrorKind::Validation
            }
            SetupError::NotFound(_) => ErrorKind::Configuration,
        }
    }

    /// Whether the caller should simply ask the user for another setup.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SetupError::Tampered(_) => true,
            SetupError::Corrupted { .. } => true,
            SetupError::Parse { .. } => true,
            SetupError::Invalid(_) => true,
            SetupError::EmptyName | SetupError::InvalidName(_) => true,
            SetupError::NotFound(_) => true,
            SetupError::Io { .. } => false,
        }
    }

    pub fn tamper_signal(&self) -> Option<TamperSignal> {
        match self {
            SetupError::Tampered(signal) => Some(*signal),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_from_checks() {
        assert_eq!(TamperSignal::from_checks(true, true), None);
        assert_eq!(TamperSignal::from_checks(false, true).map(TamperSignal::flag), Some("H001"));
        assert_eq!(TamperSignal::from_checks(true, false).map(TamperSignal::flag), Some("T001"));
        assert_eq!(TamperSignal::from_checks(false, false).map(TamperSignal::flag), Some("B001"));
    }

    #[test]
    fn test_tamper_is_recoverable_integrity_error() {
        let err = SetupError::Tampered(TamperSignal::Both);
        assert!(err.is_recoverable());
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert!(err.to_string().contains("B001"));

        let io = SetupError::Io {
            path: "setups/a.plc".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!io.is_recoverable());
    }
}
