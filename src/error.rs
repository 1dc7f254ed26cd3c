use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop the analysis of one compilation unit.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The unit did not parse cleanly; no partial results are produced.
    #[error("Parse error at byte {offset}: {message}")]
    Parse { message: String, offset: usize },

    /// The syntax tree lacks positions needed to build reliable scopes
    #[error("Malformed syntax tree: {message}")]
    Malformed { message: String },

    #[error("Config error at {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Unsupported file type: {}", path.display())]
    UnsupportedFile { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mentions_path() {
        let err = Error::io(
            "/src/app.ts",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("/src/app.ts"));
    }

    #[test]
    fn parse_error_mentions_offset() {
        let err = Error::Parse {
            message: "Expected ';'".to_string(),
            offset: 12,
        };
        assert_eq!(err.to_string(), "Parse error at byte 12: Expected ';'");
    }
}
