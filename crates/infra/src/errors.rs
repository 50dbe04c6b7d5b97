//! Conversions from infrastructure errors into `ParasutError`

use parasut_domain::ParasutError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ParasutError);

impl From<InfraError> for ParasutError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ParasutError> for InfraError {
    fn from(value: ParasutError) -> Self {
        InfraError(value)
    }
}

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        if err.is_timeout() {
            return InfraError(ParasutError::Timeout("HTTP request timed out".into()));
        }

        if err.is_connect() {
            return InfraError(ParasutError::Network(format!("HTTP connection failure: {err}")));
        }

        if err.is_builder() {
            return InfraError(ParasutError::Internal(format!("Invalid HTTP request: {err}")));
        }

        if err.is_decode() || err.is_body() {
            return InfraError(ParasutError::Serialization(format!(
                "Unreadable response body: {err}"
            )));
        }

        InfraError(ParasutError::Network(err.to_string()))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        InfraError(ParasutError::Serialization(err.to_string()))
    }
}
