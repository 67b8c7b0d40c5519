use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Classification used when ingestion errors are reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Parse,
    Io,
    GenerationInvariant,
    Integrity,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Parse => "ParseError",
            ErrorKind::Io => "IoError",
            ErrorKind::GenerationInvariant => "GenerationInvariantError",
            ErrorKind::Integrity => "IntegrityError",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathKind::File => f.write_str("File"),
            PathKind::Directory => f.write_str("Directory"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CareerError {
    #[error("{kind} \"{}\" does not exist.", path.display())]
    MissingPath { path: PathBuf, kind: PathKind },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{0}")]
    Validation(String),

    #[error("could not find a {entity} named \"{query}\"")]
    NotFound { entity: &'static str, query: String },

    #[error("{}", duplicate_codes_message(.0))]
    DuplicateClubCodes(Vec<String>),

    #[error("the traits file has no \"Weak Foot\" trait, which the rating formula requires")]
    MissingWeakFoot,

    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Invariant(String),
}

impl CareerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CareerError::MissingPath { .. }
            | CareerError::MissingWeakFoot
            | CareerError::Configuration(_) => ErrorKind::Configuration,
            CareerError::Io { .. } => ErrorKind::Io,
            CareerError::Parse { .. } => ErrorKind::Parse,
            CareerError::Validation(_)
            | CareerError::NotFound { .. }
            | CareerError::DuplicateClubCodes(_) => ErrorKind::Validation,
            CareerError::Invariant(_) => ErrorKind::GenerationInvariant,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CareerError::Validation(msg.into())
    }
}

fn duplicate_codes_message(codes: &[String]) -> String {
    if codes.len() > 1 {
        format!("there are duplicate club short names: {}", codes.join(", "))
    } else {
        format!("there is a duplicate club short name: {}", codes.join(", "))
    }
}

/// Every error a single loader produced. A loader keeps going past record
/// failures it can isolate, so one call may surface several at once.
#[derive(Debug, Default)]
pub struct LoadErrors(pub Vec<CareerError>);

impl LoadErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, err: CareerError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result<T>(self, value: T) -> std::result::Result<T, LoadErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<CareerError> for LoadErrors {
    fn from(err: CareerError) -> Self {
        Self(vec![err])
    }
}

impl IntoIterator for LoadErrors {
    type Item = CareerError;
    type IntoIter = std::vec::IntoIter<CareerError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

pub type Result<T> = std::result::Result<T, CareerError>;
pub type LoadResult<T> = std::result::Result<T, LoadErrors>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_message() {
        let err = CareerError::MissingPath {
            path: PathBuf::from("database/"),
            kind: PathKind::Directory,
        };
        assert_eq!(err.to_string(), "Directory \"database/\" does not exist.");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_duplicate_codes_plural() {
        let one = CareerError::DuplicateClubCodes(vec!["ARS".into()]);
        assert_eq!(one.to_string(), "there is a duplicate club short name: ARS");

        let two = CareerError::DuplicateClubCodes(vec!["ARS".into(), "CHE".into()]);
        assert_eq!(two.to_string(), "there are duplicate club short names: ARS, CHE");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ErrorKind::Validation.to_string(), "ValidationError");
        assert_eq!(CareerError::MissingWeakFoot.kind(), ErrorKind::Configuration);
        assert_eq!(
            CareerError::Invariant("x".into()).kind(),
            ErrorKind::GenerationInvariant
        );
    }
}
