use std::cmp::Ordering;

use architect_core::ParticleConfig;

use crate::error::LibraryError;

/// Named configs, kept sorted by name. Names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetLibrary {
    presets: Vec<ParticleConfig>,
}

/// Case-insensitive first, so "fire" sorts next to "Fire".
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `preset`, replacing any preset with the same name.
    pub fn save(&mut self, preset: ParticleConfig) -> Result<(), LibraryError> {
        if preset.name.trim().is_empty() {
            return Err(LibraryError::UnnamedPreset);
        }
        match self
            .presets
            .binary_search_by(|p| compare_names(&p.name, &preset.name))
        {
            Ok(i) => {
                log::debug!("Replacing preset '{}'", preset.name);
                self.presets[i] = preset;
            }
            Err(i) => self.presets.insert(i, preset),
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<ParticleConfig> {
        let index = self.presets.iter().position(|p| p.name == name)?;
        Some(self.presets.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&ParticleConfig> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticleConfig> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Add imported presets. Same-named presets are replaced; unnamed ones
    /// are skipped. Returns how many were stored.
    pub fn merge(&mut self, imported: impl IntoIterator<Item = ParticleConfig>) -> usize {
        let mut stored = 0;
        for preset in imported {
            match self.save(preset) {
                Ok(()) => stored += 1,
                Err(e) => log::warn!("Skipping imported preset: {e}"),
            }
        }
        stored
    }

    pub fn to_json(&self) -> Result<String, LibraryError> {
        serde_json::to_string_pretty(&self.presets)
            .map_err(|e| LibraryError::Serialize(e.to_string()))
    }

    /// Rebuild a library from [`PresetLibrary::to_json`] output.
    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        let presets: Vec<ParticleConfig> =
            serde_json::from_str(json).map_err(|e| LibraryError::Parse(e.to_string()))?;
        let mut library = Self::new();
        library.merge(presets);
        Ok(library)
    }
}
