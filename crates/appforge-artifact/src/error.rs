//! Error types for the artifact model

/// Errors raised while building generated files
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    /// Path was empty after normalization
    #[error("empty path: {0:?}")]
    EmptyPath(String),

    /// Path has no file name segment
    #[error("path has no file name: {0}")]
    MissingFileName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ArtifactError::EmptyPath("//".to_string());
        assert!(err.to_string().contains("empty path"));
    }
}
