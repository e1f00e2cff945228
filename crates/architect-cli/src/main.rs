use std::fs;
use std::path::PathBuf;
use std::process;

use architect_core::{EmitterParams, ParticleConfig};
use architect_library::runtime_config;
use architect_translate::loader::load_settings_from_str;
use architect_translate::{
    build_request, compress, Catalogs, GenerationError, GenerationRequest, Translator,
    TranslatorSettings,
};

fn print_usage() {
    eprintln!("Usage: architect --prompt <text> [OPTIONS]");
    eprintln!("  --prompt <text>        Effect description or modification request");
    eprintln!("  --base <path>          Config JSON to modify");
    eprintln!("  --response <path>      Replay this file as the generation response");
    eprintln!("  --settings <path>      Translator settings RON");
    eprintln!("  --new-shape            Ask for a freshly generated shape");
    eprintln!("  --runtime              Emit the runtime form (alpha baked into colors)");
    eprintln!("  --output <path>        Write the result here instead of stdout");
    eprintln!();
    eprintln!("Without --response the outbound request is printed and nothing is translated.");
}

fn fail(message: impl std::fmt::Display) -> ! {
    log::error!("{message}");
    process::exit(1);
}

fn next_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Missing value for {flag}");
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut prompt: Option<String> = None;
    let mut base_path: Option<PathBuf> = None;
    let mut response_path: Option<PathBuf> = None;
    let mut settings_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut force_new_shape = false;
    let mut runtime = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--prompt" => {
                i += 1;
                prompt = Some(next_value(&args, i, "--prompt"));
            }
            "--base" => {
                i += 1;
                base_path = Some(PathBuf::from(next_value(&args, i, "--base")));
            }
            "--response" => {
                i += 1;
                response_path = Some(PathBuf::from(next_value(&args, i, "--response")));
            }
            "--settings" => {
                i += 1;
                settings_path = Some(PathBuf::from(next_value(&args, i, "--settings")));
            }
            "--output" => {
                i += 1;
                output_path = Some(PathBuf::from(next_value(&args, i, "--output")));
            }
            "--new-shape" => force_new_shape = true,
            "--runtime" => runtime = true,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(prompt) = prompt else {
        print_usage();
        process::exit(1);
    };

    let settings = match &settings_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(format!("Failed to read {}: {e}", path.display())));
            load_settings_from_str(&text).unwrap_or_else(|e| fail(e))
        }
        None => TranslatorSettings::default(),
    };
    let catalogs = Catalogs::builtin().unwrap_or_else(|e| fail(e));

    let base: Option<ParticleConfig> = base_path.as_ref().map(|path| {
        let text = fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format!("Failed to read {}: {e}", path.display())));
        serde_json::from_str(&text)
            .unwrap_or_else(|e| fail(format!("Invalid base config {}: {e}", path.display())))
    });

    let output = match response_path {
        None => dry_run(&prompt, base.as_ref(), &catalogs, &settings, force_new_shape),
        Some(path) => {
            let replay = move |_: &GenerationRequest| {
                fs::read_to_string(&path).map_err(|e| {
                    GenerationError::Unavailable(format!("{}: {e}", path.display()))
                })
            };
            let translator = Translator::new(&catalogs, &settings, replay);
            let outcome = translator.translate_traced(&prompt, base.as_ref(), force_new_shape);
            log::info!("Pipeline stages: {:?}", outcome.stages);
            if let Some(failure) = &outcome.failure {
                log::warn!("Returned fallback config: {failure}");
            }
            match EmitterParams::from_config(&outcome.config) {
                Ok(params) => log::info!(
                    "Emitter: {} particles, {} color stops, noise {}",
                    params.capacity,
                    params.color_stops.len(),
                    if params.noise.is_some() { "on" } else { "off" }
                ),
                Err(e) => log::warn!("Config will not render as-is: {e}"),
            }
            let value = if runtime {
                runtime_config(&outcome.config).unwrap_or_else(|e| fail(e))
            } else {
                serde_json::to_value(&outcome.config).unwrap_or_else(|e| fail(e))
            };
            serde_json::to_string_pretty(&value).unwrap_or_else(|e| fail(e))
        }
    };

    match output_path {
        Some(path) => {
            fs::write(&path, output)
                .unwrap_or_else(|e| fail(format!("Failed to write {}: {e}", path.display())));
            log::info!("Wrote {}", path.display());
        }
        None => println!("{output}"),
    }
}

/// Render the request that would be sent, without sending it.
fn dry_run(
    prompt: &str,
    base: Option<&ParticleConfig>,
    catalogs: &Catalogs,
    settings: &TranslatorSettings,
    force_new_shape: bool,
) -> String {
    let compact = base.map(|config| {
        compress(config, catalogs)
            .compact
            .to_json()
            .unwrap_or_else(|e| fail(e))
    });
    let request = build_request(prompt, compact.as_deref(), catalogs, settings, force_new_shape);
    let value = serde_json::json!({
        "model": request.model,
        "maxOutputTokens": request.max_output_tokens,
        "systemInstruction": request.system_instruction,
        "contents": request.contents,
        "responseSchema": request.response_schema,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|e| fail(e))
}
