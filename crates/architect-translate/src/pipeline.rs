//! The translation state machine.
//!
//! A request walks `Idle → Compressing → AwaitingGeneration → Decoding →
//! Expanding → Done`. Any failure jumps to `Fallback`, which answers with the
//! base config untouched, or the fixed fallback config when there is no base.

use architect_core::ParticleConfig;
use thiserror::Error;

use crate::catalog::Catalogs;
use crate::compress::compress;
use crate::decode::{decode, DecodeError};
use crate::expand::{expand, ExpandContext};
use crate::generator::{GenerationError, Generator};
use crate::prompt::build_request;
use crate::settings::TranslatorSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Compressing,
    AwaitingGeneration,
    Decoding,
    Expanding,
    Done,
    Fallback,
}

/// Why a translation ended in `Fallback`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("failed to encode compact config: {0}")]
    Encode(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    pub config: ParticleConfig,
    /// Stages visited, in order. Always starts at `Idle` and ends at `Done`
    /// or `Fallback`.
    pub stages: Vec<Stage>,
    pub failure: Option<TranslateError>,
}

impl TranslationOutcome {
    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}

/// Turns prompts into particle configs through a [`Generator`].
///
/// Each call makes exactly one generation request. Catalogs and settings are
/// only read, so one translator can serve any number of requests.
pub struct Translator<'a, G> {
    catalogs: &'a Catalogs,
    settings: &'a TranslatorSettings,
    generator: G,
}

impl<'a, G: Generator> Translator<'a, G> {
    pub fn new(catalogs: &'a Catalogs, settings: &'a TranslatorSettings, generator: G) -> Self {
        Self {
            catalogs,
            settings,
            generator,
        }
    }

    /// Translate `prompt` into a config, optionally modifying `base`.
    /// Always returns a usable config.
    pub fn translate(
        &self,
        prompt: &str,
        base: Option<&ParticleConfig>,
        force_new_shape: bool,
    ) -> ParticleConfig {
        self.translate_traced(prompt, base, force_new_shape).config
    }

    /// Like [`Translator::translate`], also reporting the stages visited and
    /// the failure that caused a fallback.
    pub fn translate_traced(
        &self,
        prompt: &str,
        base: Option<&ParticleConfig>,
        force_new_shape: bool,
    ) -> TranslationOutcome {
        let mut stages = vec![Stage::Idle];
        match self.run(prompt, base, force_new_shape, &mut stages) {
            Ok(config) => {
                stages.push(Stage::Done);
                log::info!("Translated prompt into '{}'", config.name);
                TranslationOutcome {
                    config,
                    stages,
                    failure: None,
                }
            }
            Err(e) => {
                log::error!("Translation failed, falling back: {e}");
                stages.push(Stage::Fallback);
                TranslationOutcome {
                    config: fallback(base),
                    stages,
                    failure: Some(e),
                }
            }
        }
    }

    fn run(
        &self,
        prompt: &str,
        base: Option<&ParticleConfig>,
        force_new_shape: bool,
        stages: &mut Vec<Stage>,
    ) -> Result<ParticleConfig, TranslateError> {
        stages.push(Stage::Compressing);
        let compressed = base.map(|config| compress(config, self.catalogs));
        let compact_json = compressed
            .as_ref()
            .map(|c| c.compact.to_json())
            .transpose()
            .map_err(|e| TranslateError::Encode(e.to_string()))?;
        let request = build_request(
            prompt,
            compact_json.as_deref(),
            self.catalogs,
            self.settings,
            force_new_shape,
        );

        stages.push(Stage::AwaitingGeneration);
        let raw = self.generator.generate(&request)?;
        if raw.trim().is_empty() {
            return Err(GenerationError::EmptyResponse.into());
        }
        log::debug!("Received {} bytes from generator", raw.len());

        stages.push(Stage::Decoding);
        let decoded = decode(&raw)?;

        stages.push(Stage::Expanding);
        let ctx = match (base, compressed.as_ref()) {
            (Some(base), Some(compressed)) => ExpandContext::from_compressed(base, compressed),
            _ => ExpandContext::default(),
        };
        Ok(expand(&decoded, &ctx, self.catalogs, self.settings))
    }
}

/// Result of a failed translation.
pub fn fallback(base: Option<&ParticleConfig>) -> ParticleConfig {
    base.cloned().unwrap_or_else(ParticleConfig::fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::GenerationRequest;
    use architect_core::constants::FALLBACK_PRESET_NAME;
    use architect_core::resource::decode_svg_data_uri;

    fn catalogs() -> Catalogs {
        Catalogs::builtin().expect("builtin catalogs")
    }

    fn scripted(
        response: Result<&'static str, GenerationError>,
    ) -> impl Fn(&GenerationRequest) -> Result<String, GenerationError> {
        move |_| response.clone().map(str::to_string)
    }

    fn echo(request: &GenerationRequest) -> Result<String, GenerationError> {
        request
            .compact
            .clone()
            .ok_or_else(|| GenerationError::Rejected("nothing to echo".into()))
    }

    fn base_config() -> ParticleConfig {
        ParticleConfig {
            name: "Base".into(),
            capacity: 800,
            ..ParticleConfig::default()
        }
    }

    #[test]
    fn test_successful_translation_stages() {
        let catalogs = catalogs();
        let settings = TranslatorSettings::default();
        let translator = Translator::new(
            &catalogs,
            &settings,
            scripted(Ok(r##"```json
{"name": "Blue Sparks", "capacity": 250, "textureID": "STAR", "color1": "#0000ff"}
```"##)),
        );
        let outcome = translator.translate_traced("blue sparks", None, false);
        assert_eq!(
            outcome.stages,
            vec![
                Stage::Idle,
                Stage::Compressing,
                Stage::AwaitingGeneration,
                Stage::Decoding,
                Stage::Expanding,
                Stage::Done,
            ]
        );
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.config.name, "Blue Sparks");
        assert_eq!(outcome.config.capacity, 250);
        assert_eq!(outcome.config.color1, "#0000ff");
        assert_eq!(
            Some(outcome.config.texture_url.as_str()),
            catalogs.shapes.reference("STAR")
        );
    }

    #[test]
    fn test_generation_failure_returns_base() {
        let catalogs = catalogs();
        let settings = TranslatorSettings::default();
        let translator = Translator::new(
            &catalogs,
            &settings,
            scripted(Err(GenerationError::Unavailable("timeout".into()))),
        );
        let base = base_config();
        let outcome = translator.translate_traced("anything", Some(&base), false);
        assert_eq!(outcome.config, base);
        assert_eq!(outcome.stages.last(), Some(&Stage::Fallback));
        assert!(!outcome.stages.contains(&Stage::Decoding));
        assert!(matches!(
            outcome.failure,
            Some(TranslateError::Generation(GenerationError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_decode_failure_returns_base() {
        let catalogs = catalogs();
        let settings = TranslatorSettings::default();
        let translator = Translator::new(
            &catalogs,
            &settings,
            scripted(Ok("I'm sorry, I can't produce that effect.")),
        );
        let base = base_config();
        assert_eq!(translator.translate("fire", Some(&base), false), base);
    }

    #[test]
    fn test_decode_failure_without_base_returns_fallback() {
        let catalogs = catalogs();
        let settings = TranslatorSettings::default();
        let translator = Translator::new(
            &catalogs,
            &settings,
            scripted(Ok("{\"name\": unquoted, \"capacity\": }")),
        );
        let outcome = translator.translate_traced("fire", None, false);
        assert_eq!(outcome.config, ParticleConfig::fallback());
        assert_eq!(outcome.config.name, FALLBACK_PRESET_NAME);
        assert!(matches!(outcome.failure, Some(TranslateError::Decode(_))));
        assert_eq!(outcome.stages.last(), Some(&Stage::Fallback));
    }

    #[test]
    fn test_blank_response_is_generation_failure() {
        let catalogs = catalogs();
        let settings = TranslatorSettings::default();
        let translator = Translator::new(&catalogs, &settings, scripted(Ok("  \n ")));
        let outcome = translator.translate_traced("smoke", None, false);
        assert_eq!(
            outcome.failure,
            Some(TranslateError::Generation(GenerationError::EmptyResponse))
        );
        assert!(!outcome.stages.contains(&Stage::Decoding));
    }

    #[test]
    fn test_echo_preserves_cataloged_base() {
        let catalogs = catalogs();
        let settings = TranslatorSettings::default();
        let base = ParticleConfig {
            texture_url: catalogs.shapes.reference("SKULL").expect("SKULL").to_string(),
            noise_texture_url: catalogs.noise.reference("Ripple").map(str::to_string),
            ..base_config()
        };
        let translator = Translator::new(&catalogs, &settings, echo);
        assert_eq!(translator.translate("keep it", Some(&base), false), base);
    }

    #[test]
    fn test_echo_preserves_custom_shape() {
        let catalogs = catalogs();
        let settings = TranslatorSettings::default();
        let base = ParticleConfig {
            texture_url: "data:image/png;base64,UPLOADEDIMAGEPAYLOAD".into(),
            noise_texture_url: Some("https://cdn.example/custom-noise.png".into()),
            ..base_config()
        };
        let guarded = |request: &GenerationRequest| {
            assert!(!request.contents.contains("UPLOADEDIMAGEPAYLOAD"));
            assert!(!request.contents.contains("custom-noise.png"));
            echo(request)
        };
        let translator = Translator::new(&catalogs, &settings, guarded);
        let outcome = translator.translate_traced("keep it", Some(&base), false);
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.config, base);
    }

    #[test]
    fn test_generated_shape_is_inlined() {
        let catalogs = catalogs();
        let settings = TranslatorSettings::default();
        let translator = Translator::new(
            &catalogs,
            &settings,
            scripted(Ok(r#"{"name": "Bolt", "textureID": "GENERATED", "customSVG": "<svg xmlns='http://www.w3.org/2000/svg'><path d='M0 0L10 10'/></svg>"}"#)),
        );
        let config = translator.translate("lightning bolts", None, true);
        let svg = decode_svg_data_uri(&config.texture_url).expect("inline svg");
        assert!(svg.contains("M0 0L10 10"));
    }

    #[test]
    fn test_fallback_prefers_base() {
        let base = base_config();
        assert_eq!(fallback(Some(&base)), base);
        assert_eq!(fallback(None), ParticleConfig::fallback());
    }
}
