use thiserror::Error;

/// Errors raised while interpreting color strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color '{0}'")]
    InvalidHex(String),
}

/// Errors raised while turning a generated payload into a resource reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("inline image payload is empty")]
    Empty,

    #[error("inline image payload has no <svg> root element")]
    NotSvg,

    #[error("inline image payload is {len} bytes (maximum {max})")]
    TooLarge { len: usize, max: usize },
}
