pub mod error;
pub mod export;
pub mod import;
pub mod presets;

pub use error::LibraryError;
pub use export::{bundle_script, runtime_config};
pub use import::import_presets;
pub use presets::PresetLibrary;
