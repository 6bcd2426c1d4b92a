//! Product Studio - AI product photo studio CLI.

mod adapters;
mod asset;
mod cassette;
mod cli;
mod config;
mod context;
mod error;
mod format;
mod model;
mod normalize;
mod options;
mod output;
mod ports;
mod prompt;
mod session;
mod studio;
mod vocab;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::asset::ImageAsset;
use crate::cli::{Cli, Command, GenerateArgs, IdeaArgs, NormalizeArgs, SuggestArgs};
use crate::config::Config;
use crate::context::{RecordingSession, ServiceContext};
use crate::error::StudioError;
use crate::model::{resolve_model, validate_model};
use crate::output::{normalized_filename, resolve_output_path, save_image};
use crate::format::OutputFormat;
use crate::session::{Applied, Session};
use crate::studio::Studio;

/// Exit status when the model answered without an image.
const EXIT_NO_IMAGE: i32 = 2;

/// How a successful run ended.
enum Outcome {
    Done,
    NoImage,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(Outcome::Done) => {}
        Ok(Outcome::NoImage) => process::exit(EXIT_NO_IMAGE),
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_service_failure() {
                eprintln!("Check your API key and network connection, then try again.");
            }
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "product_studio=debug" } else { "product_studio=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<Outcome, StudioError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(StudioError::Config)?;
    debug!(path = %config_path.display(), "config loaded");

    // Local commands never need the service.
    let command = match cli.command {
        Command::Options => {
            print!("{}", options::render_options());
            return Ok(Outcome::Done);
        }
        Command::Normalize(args) => return normalize_image(&args, &config),
        other => other,
    };

    let text_model = resolve_model(&config.models.text);
    let image_model = match &command {
        Command::Generate(args) => args.model.as_deref().unwrap_or(&config.models.image),
        _ => config.models.image.as_str(),
    };
    let image_model = resolve_model(image_model);
    validate_model(&text_model).map_err(StudioError::InvalidArgument)?;
    validate_model(&image_model).map_err(StudioError::InvalidArgument)?;
    if let Command::Generate(args) = &command {
        if args.count == 0 {
            return Err(StudioError::InvalidArgument("--count must be at least 1".into()));
        }
    }
    debug!(%text_model, %image_model, "models resolved");

    let (ctx, recording) = open_context(&config)?;
    let outcome = {
        let studio = Studio::new(&*ctx.service, text_model, image_model);
        match command {
            Command::Generate(args) => generate(&studio, &args, &config).await,
            Command::Idea(args) => idea(&studio, &args).await,
            Command::Suggest(args) => suggest(&studio, &args).await,
            Command::Options | Command::Normalize(_) => Ok(Outcome::Done),
        }
    };

    // The recorder is shared with the context; release it before writing.
    drop(ctx);
    if let Some(session) = recording {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    outcome
}

/// Create the service context based on mode (live / recording / replaying).
fn open_context(config: &Config) -> Result<(ServiceContext, Option<RecordingSession>), StudioError> {
    let replay_path = std::env::var("PRODUCT_STUDIO_REPLAY").ok();
    let is_recording =
        std::env::var("PRODUCT_STUDIO_REC").is_ok_and(|v| v == "true" || v == "1");

    if let Some(cassette_path) = replay_path {
        info!(cassette = %cassette_path, "replaying");
        Ok((ServiceContext::replaying(Path::new(&cassette_path))?, None))
    } else if is_recording {
        info!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(config)?;
        Ok((ctx, Some(session)))
    } else {
        Ok((ServiceContext::live(config)?, None))
    }
}

async fn generate(
    studio: &Studio<'_>,
    args: &GenerateArgs,
    config: &Config,
) -> Result<Outcome, StudioError> {
    let aspect_ratio = args.aspect_ratio.unwrap_or(config.defaults.aspect_ratio);
    let lighting = args.lighting.unwrap_or(config.defaults.lighting);
    let camera = args.camera.unwrap_or(config.defaults.camera);
    let format = args.format.unwrap_or(config.defaults.format);
    let scene = args.resolve_scene()?;

    let product = ImageAsset::from_path(&args.product)?;
    let normalized = normalize::normalize(&product, aspect_ratio)?;
    let prompt = prompt::build_edit_prompt(aspect_ratio, lighting, camera, scene.as_deref());
    debug!(%prompt, "edit prompt");

    let total = args.count as usize;
    let mut session = Session::new();
    for index in 0..total {
        let ticket = session.begin();
        let request = studio.edit_request(normalized.clone(), prompt.clone());
        let result = studio.submit_edit(&request).await?;

        match session.apply(ticket, &result) {
            Applied::Displayed => {
                if let Some(url) = session.current() {
                    let image = ImageAsset::from_data_url(url)?;
                    let path = resolve_output_path(args.output.as_deref(), format, index, total);
                    save_image(&image, format, &path)?;
                    eprintln!("Saved: {}", path.display());
                }
                if let Some(text) = &result.text {
                    eprintln!("Model note: {}", text.trim());
                }
            }
            Applied::NoImage(text) => {
                eprintln!(
                    "The model did not return an image. It might have returned text instead: {}",
                    text.unwrap_or_default().trim()
                );
            }
            Applied::Superseded => debug!(index, "result superseded"),
        }
    }

    for (position, url) in session.history().iter().enumerate() {
        debug!(position, bytes = url.len(), "history entry");
    }
    info!(generated = session.history().len(), requested = total, "generation finished");
    if session.history().is_empty() {
        Ok(Outcome::NoImage)
    } else {
        Ok(Outcome::Done)
    }
}

async fn idea(studio: &Studio<'_>, args: &IdeaArgs) -> Result<Outcome, StudioError> {
    let scene = match (&args.text, &args.style_image) {
        (Some(text), _) => studio.get_scene_idea_from_text(text).await?,
        (None, Some(path)) => {
            let style = ImageAsset::from_path(path)?;
            studio.get_scene_idea_from_image(&style).await?
        }
        (None, None) => {
            return Err(StudioError::InvalidArgument("Provide --text or --style-image".into()));
        }
    };
    println!("{}", scene.trim());
    Ok(Outcome::Done)
}

async fn suggest(studio: &Studio<'_>, args: &SuggestArgs) -> Result<Outcome, StudioError> {
    let product = ImageAsset::from_path(&args.product)?;
    let suggestion = studio.get_style_suggestions(&product, &args.notes).await?;
    println!("Lighting: {}", suggestion.lighting_style);
    println!("Camera: {}", suggestion.camera_perspective);
    println!("Scene: {}", suggestion.scene_description.trim());
    println!(
        "Flags: --lighting {} --camera {}",
        suggestion.lighting_style.slug(),
        suggestion.camera_perspective.slug()
    );
    Ok(Outcome::Done)
}

fn normalize_image(args: &NormalizeArgs, config: &Config) -> Result<Outcome, StudioError> {
    let ratio = args.aspect_ratio.unwrap_or(config.defaults.aspect_ratio);
    let source = ImageAsset::from_path(&args.image)?;
    let normalized = normalize::normalize(&source, ratio)?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(normalized_filename(&args.image, ratio)));
    save_image(&normalized, OutputFormat::Jpeg, &path)?;
    eprintln!("Saved: {}", path.display());
    Ok(Outcome::Done)
}
