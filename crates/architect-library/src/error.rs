/// Errors raised while managing or exchanging presets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("preset name must not be blank")]
    UnnamedPreset,

    #[error("malformed preset JSON: {0}")]
    Parse(String),

    #[error("no importable presets found")]
    Empty,

    #[error("failed to serialize preset: {0}")]
    Serialize(String),
}
