//! Observation input: a text source of `0`/`1` symbols.
//!
//! All whitespace is removed before parsing, so observations may be split
//! across lines. Symbol positions in errors refer to the stripped text.

use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::inference::{Chain, InferenceError};

/// Where observations are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationSource {
    Stdin,
    File(PathBuf),
}

impl ObservationSource {
    /// `-` selects stdin; anything else is a file path.
    pub fn from_arg(arg: &Path) -> Self {
        if arg == Path::new("-") {
            ObservationSource::Stdin
        } else {
            ObservationSource::File(arg.to_path_buf())
        }
    }
}

impl fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationSource::Stdin => write!(f, "<stdin>"),
            ObservationSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Errors reading or parsing observations.
#[derive(Debug, Error)]
pub enum ObservationError {
    #[error("I/O error reading {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: io::Error,
    },

    #[error("{source_name}: {error}")]
    Invalid {
        source_name: String,
        #[source]
        error: InferenceError,
    },
}

impl From<ObservationError> for um_common::Error {
    fn from(err: ObservationError) -> Self {
        match err {
            ObservationError::Io { source_name, error } => um_common::Error::Io(io::Error::new(
                error.kind(),
                format!("{}: {}", source_name, error),
            )),
            ObservationError::Invalid { error, .. } => error.into(),
        }
    }
}

/// Remove every whitespace character.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse observation text into a chain.
pub fn parse_observations(text: &str) -> Result<Chain, InferenceError> {
    Chain::from_symbols(&strip_whitespace(text))
}

/// Read and parse observations from `source`.
pub fn read_observations(source: &ObservationSource) -> Result<Chain, ObservationError> {
    let text = match source {
        ObservationSource::Stdin => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|error| ObservationError::Io {
                    source_name: source.to_string(),
                    error,
                })?;
            buf
        }
        ObservationSource::File(path) => {
            std::fs::read_to_string(path).map_err(|error| ObservationError::Io {
                source_name: source.to_string(),
                error,
            })?
        }
    };

    parse_observations(&text).map_err(|error| ObservationError::Invalid {
        source_name: source.to_string(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_ignored() {
        let chain = parse_observations("01 1\n0\t1\r\n").unwrap();
        assert_eq!(chain.to_symbols(), "01101");
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(
            parse_observations(" \n\t"),
            Err(InferenceError::EmptyObservations)
        );
    }

    #[test]
    fn position_counts_stripped_symbols() {
        assert_eq!(
            parse_observations("1 1\n2"),
            Err(InferenceError::InvalidSymbol {
                position: 2,
                symbol: '2'
            })
        );
    }

    #[test]
    fn dash_selects_stdin() {
        assert_eq!(ObservationSource::from_arg(Path::new("-")), ObservationSource::Stdin);
        assert_eq!(
            ObservationSource::from_arg(Path::new("obs.txt")),
            ObservationSource::File(PathBuf::from("obs.txt"))
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = ObservationSource::File(PathBuf::from("/nonexistent/observations.txt"));
        let err = read_observations(&source).unwrap_err();
        assert!(matches!(err, ObservationError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/observations.txt"));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obs.txt");
        std::fs::write(&path, "0101\n0101\n").unwrap();
        let chain = read_observations(&ObservationSource::File(path)).unwrap();
        assert_eq!(chain.len(), 8);
    }
}
