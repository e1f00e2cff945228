pub mod catalog;
pub mod compress;
pub mod decode;
pub mod expand;
pub mod generator;
pub mod loader;
pub mod pipeline;
pub mod prompt;
pub mod settings;

pub use catalog::{CatalogError, Catalogs, ResourceCatalog};
pub use compress::{compress, CompactConfig, Compressed};
pub use decode::{decode, DecodeError};
pub use expand::{enforce_visibility, expand, ExpandContext};
pub use generator::{GenerationError, Generator};
pub use loader::LoadError;
pub use pipeline::{fallback, Stage, TranslateError, TranslationOutcome, Translator};
pub use prompt::{build_request, GenerationRequest};
pub use settings::TranslatorSettings;
