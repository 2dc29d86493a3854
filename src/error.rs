use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl ScrapeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Filesystem { path: path.into(), source }
    }

    /// For reading an input the operator must provide: a missing file becomes `NotFound`.
    pub fn input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ScrapeError::NotFound(path)
        } else {
            ScrapeError::Filesystem { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn missing_input_maps_to_not_found() {
        let err = ScrapeError::input("urls.txt", Error::from(ErrorKind::NotFound));
        assert!(matches!(err, ScrapeError::NotFound(p) if p == PathBuf::from("urls.txt")));
    }

    #[test]
    fn other_input_errors_map_to_filesystem() {
        let err = ScrapeError::input("items.txt", Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(err, ScrapeError::Filesystem { .. }));
    }

    #[test]
    fn io_errors_are_filesystem_even_when_not_found() {
        let err = ScrapeError::io("missing/progreso_urls.txt", Error::from(ErrorKind::NotFound));
        assert!(matches!(err, ScrapeError::Filesystem { .. }));
    }
}
