use crate::assessment::{AssessmentServiceError, ResolveError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidArgument(String),
    Submission(ResolveError),
    Assessment(AssessmentServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::InvalidArgument(reason) => write!(f, "invalid argument: {}", reason),
            AppError::Submission(err) => write!(f, "submission error: {}", err),
            AppError::Assessment(err) => write!(f, "assessment error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::InvalidArgument(_) => None,
            AppError::Submission(err) => Some(err),
            AppError::Assessment(err) => Some(err),
        }
    }
}

impl AppError {
    /// True when the failure stems from caller input rather than the environment.
    pub fn is_client_error(&self) -> bool {
        match self {
            AppError::Json(_) | AppError::InvalidArgument(_) | AppError::Submission(_) => true,
            AppError::Assessment(err) => !matches!(err, AssessmentServiceError::Repository(_)),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => false,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ResolveError> for AppError {
    fn from(value: ResolveError) -> Self {
        Self::Submission(value)
    }
}

impl From<AssessmentServiceError> for AppError {
    fn from(value: AssessmentServiceError) -> Self {
        Self::Assessment(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{FormId, RepositoryError};

    #[test]
    fn classifies_caller_mistakes_as_client_errors() {
        assert!(AppError::from(ResolveError::EmptyResponses).is_client_error());
        assert!(AppError::from(AssessmentServiceError::FormNotFound(FormId(
            "form-x".to_string()
        )))
        .is_client_error());
        assert!(!AppError::from(AssessmentServiceError::Repository(
            RepositoryError::Unavailable("down".to_string())
        ))
        .is_client_error());
    }

    #[test]
    fn display_prefixes_the_failing_layer() {
        let err = AppError::from(ResolveError::EmptyResponses);
        assert_eq!(
            err.to_string(),
            "submission error: submission must contain at least one response"
        );
    }
}
