use thiserror::Error;

use crate::prompt::GenerationRequest;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generation service unavailable: {0}")]
    Unavailable(String),
    #[error("generation request rejected: {0}")]
    Rejected(String),
    #[error("generation service returned an empty response")]
    EmptyResponse,
}

/// The external text-generation service. Returns the raw response text.
pub trait Generator {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

impl<F> Generator for F
where
    F: Fn(&GenerationRequest) -> Result<String, GenerationError>,
{
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self(request)
    }
}
