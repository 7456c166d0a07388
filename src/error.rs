//! Error handling for the capture core
//!
//! Every failure the sampler, classifier, partitioner or exporters can hit is
//! reported through [`CaptureError`]. All of them are recoverable by the caller
//! (skip the actor, skip the frame); none abort a capture session.

use std::error::Error as StdError;
use std::fmt;

/// Main error type for the capture core
#[derive(Debug)]
pub enum CaptureError {
    // Input errors
    InvalidInput {
        what: String,
        reason: String,
    },
    LodOutOfRange {
        mesh: String,
        lod: usize,
        lod_count: usize,
    },
    SkinningError {
        mesh: String,
        reason: String,
    },
    IndexOutOfBounds {
        index: usize,
        size: usize,
    },
    UnsupportedActor {
        actor: String,
        kind: String,
    },

    // Transform errors
    DegenerateAxes {
        reason: String,
    },

    // Configuration errors
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    // Output errors
    IoError {
        path: String,
        error: String,
    },
    SerializationError {
        context: String,
        error: String,
    },

    // Search errors
    SeedNotFound {
        attempts: u32,
    },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::InvalidInput { what, reason } => {
                write!(f, "Invalid input {}: {}", what, reason)
            }
            CaptureError::LodOutOfRange {
                mesh,
                lod,
                lod_count,
            } => write!(
                f,
                "LOD error: {} only has {} LODs, but accessing LOD {}",
                mesh, lod_count, lod
            ),
            CaptureError::SkinningError { mesh, reason } => {
                write!(f, "Skinning failed for {}: {}", mesh, reason)
            }
            CaptureError::IndexOutOfBounds { index, size } => write!(
                f,
                "Index out of bounds: index {} >= size {}",
                index, size
            ),
            CaptureError::UnsupportedActor { actor, kind } => {
                write!(f, "Actor {} of kind {} cannot be sampled", actor, kind)
            }

            CaptureError::DegenerateAxes { reason } => {
                write!(f, "Degenerate axis mapping: {}", reason)
            }

            CaptureError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "Invalid config: {} = {} ({})", field, value, reason),

            CaptureError::IoError { path, error } => write!(f, "IO error for {}: {}", path, error),
            CaptureError::SerializationError { context, error } => {
                write!(f, "Serialization error in {}: {}", context, error)
            }

            CaptureError::SeedNotFound { attempts } => write!(
                f,
                "No seed point hit the scene after {} attempts",
                attempts
            ),

        }
    }
}

impl StdError for CaptureError {}

/// Type alias for Results in the capture core
pub type CaptureResult<T> = Result<T, CaptureError>;

impl From<std::io::Error> for CaptureError {
    fn from(error: std::io::Error) -> Self {
        CaptureError::IoError {
            path: String::new(),
            error: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for CaptureError {
    fn from(error: toml::de::Error) -> Self {
        CaptureError::SerializationError {
            context: "toml".to_string(),
            error: error.to_string(),
        }
    }
}

impl From<crate::transform::TransformError> for CaptureError {
    fn from(err: crate::transform::TransformError) -> Self {
        CaptureError::DegenerateAxes {
            reason: err.to_string(),
        }
    }
}

/// Convert Option to Result with context
pub trait OptionExt<T> {
    fn ok_or_capture<F>(self, f: F) -> CaptureResult<T>
    where
        F: FnOnce() -> CaptureError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_capture<F>(self, f: F) -> CaptureResult<T>
    where
        F: FnOnce() -> CaptureError,
    {
        self.ok_or_else(f)
    }
}

/// Attach a file path to IO failures
pub trait IoContext<T> {
    fn with_path<P: AsRef<std::path::Path>>(self, path: P) -> CaptureResult<T>;
}

impl<T> IoContext<T> for Result<T, std::io::Error> {
    fn with_path<P: AsRef<std::path::Path>>(self, path: P) -> CaptureResult<T> {
        self.map_err(|e| CaptureError::IoError {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CaptureError::LodOutOfRange {
            mesh: "SK_Actor".to_string(),
            lod: 4,
            lod_count: 2,
        };
        assert_eq!(
            err.to_string(),
            "LOD error: SK_Actor only has 2 LODs, but accessing LOD 4"
        );
    }

    #[test]
    fn test_option_ext() {
        let opt: Option<i32> = None;
        let result = opt.ok_or_capture(|| CaptureError::InvalidInput {
            what: "bone index".to_string(),
            reason: "missing".to_string(),
        });
        assert!(matches!(result, Err(CaptureError::InvalidInput { .. })));
        assert_eq!(Some(3).ok_or_capture(|| CaptureError::SeedNotFound { attempts: 1 }).ok(), Some(3));
    }

    #[test]
    fn test_io_context_keeps_path() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        match result.with_path("/tmp/frame.dat") {
            Err(CaptureError::IoError { path, .. }) => assert_eq!(path, "/tmp/frame.dat"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
