use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the post loader and the notebook patcher.
#[derive(Error, Debug)]
pub enum PostsError {
    /// The requested input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A file exists but could not be read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written back to disk.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The JSON root of a post export was not an array.
    #[error("Expected JSON data to be a list of posts in {0}")]
    NotAnArray(PathBuf),

    /// A notebook document is missing the structure the patcher relies on.
    #[error("Malformed notebook {path}: {reason}")]
    MalformedNotebook { path: PathBuf, reason: String },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the posts crates.
pub type Result<T> = std::result::Result<T, PostsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_not_found() {
        let err = PostsError::FileNotFound(PathBuf::from("/missing/posts.json"));
        assert_eq!(err.to_string(), "File not found: /missing/posts.json");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PostsError::FileRead {
            path: PathBuf::from("/some/posts.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/posts.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_not_an_array() {
        let err = PostsError::NotAnArray(PathBuf::from("data.json"));
        assert_eq!(
            err.to_string(),
            "Expected JSON data to be a list of posts in data.json"
        );
    }

    #[test]
    fn test_error_display_malformed_notebook() {
        let err = PostsError::MalformedNotebook {
            path: PathBuf::from("nb.ipynb"),
            reason: "missing cells".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed notebook nb.ipynb: missing cells");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: PostsError = io_err.into();
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let err: PostsError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
