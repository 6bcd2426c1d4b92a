//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::format::OutputFormat;
use crate::vocab::{AspectRatio, CameraPerspective, LightingStyle};

/// AI product photo studio - restage product photos with Gemini.
#[derive(Parser, Debug)]
#[command(name = "product-studio", version, about)]
pub struct Cli {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,

    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a new product shot from a product photo.
    Generate(GenerateArgs),
    /// Get a detailed scene description from a short idea or a style image.
    Idea(IdeaArgs),
    /// Ask the model to suggest lighting, camera and scene for a product photo.
    Suggest(SuggestArgs),
    /// Pad an image onto a white canvas of the given aspect ratio (local only).
    Normalize(NormalizeArgs),
    /// List aspect ratios, lighting styles and camera perspectives.
    Options,
}

/// Arguments for `generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Product photo.
    pub product: PathBuf,

    /// Aspect ratio (e.g., 1:1, 3:4, 16:9).
    #[arg(short, long)]
    pub aspect_ratio: Option<AspectRatio>,

    /// Lighting style (e.g., golden-hour or "Golden Hour Sunlight").
    #[arg(short, long)]
    pub lighting: Option<LightingStyle>,

    /// Camera perspective (e.g., low-angle or "Low-Angle Shot").
    #[arg(short, long)]
    pub camera: Option<CameraPerspective>,

    /// Scene description.
    #[arg(short, long, conflicts_with = "scene_file")]
    pub scene: Option<String>,

    /// Path to a file containing the scene description.
    #[arg(long, conflicts_with = "scene")]
    pub scene_file: Option<PathBuf>,

    /// Image model name or alias.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output format: jpeg, png, webp.
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (timestamped if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of shots to generate.
    #[arg(short = 'n', long, default_value = "1")]
    pub count: u32,
}

impl GenerateArgs {
    /// Resolve the scene from either the flag or the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene file cannot be read.
    pub fn resolve_scene(&self) -> Result<Option<String>, std::io::Error> {
        match (&self.scene, &self.scene_file) {
            (Some(text), _) => Ok(Some(text.clone())),
            (None, Some(path)) => std::fs::read_to_string(path).map(Some),
            (None, None) => Ok(None),
        }
    }
}

/// Arguments for `idea`.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct IdeaArgs {
    /// Short scene idea to expand.
    #[arg(short, long)]
    pub text: Option<String>,

    /// Style reference image to describe.
    #[arg(short, long)]
    pub style_image: Option<PathBuf>,
}

/// Arguments for `suggest`.
#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Product photo.
    pub product: PathBuf,

    /// Notes about the product or brand.
    #[arg(long, default_value = "")]
    pub notes: String,
}

/// Arguments for `normalize`.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Image to normalize.
    pub image: PathBuf,

    /// Target aspect ratio.
    #[arg(short, long)]
    pub aspect_ratio: Option<AspectRatio>,

    /// Output file path (derived from the input name if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_defaults() {
        let cli = Cli::parse_from(["product-studio", "generate", "mug.png"]);
        let Command::Generate(args) = cli.command else { panic!("expected generate") };
        assert_eq!(args.product, PathBuf::from("mug.png"));
        assert!(args.aspect_ratio.is_none());
        assert!(args.lighting.is_none());
        assert!(args.camera.is_none());
        assert!(args.output.is_none());
        assert_eq!(args.count, 1);
        assert_eq!(args.resolve_scene().unwrap(), None);
        assert!(!cli.verbose);
    }

    #[test]
    fn generate_all_options() {
        let cli = Cli::parse_from([
            "product-studio",
            "generate",
            "-a",
            "16:9",
            "-l",
            "golden-hour",
            "-c",
            "Low-Angle Shot",
            "-s",
            "a marble counter",
            "-m",
            "nano-banana",
            "-f",
            "png",
            "-o",
            "out.png",
            "-n",
            "3",
            "-v",
            "mug.png",
        ]);
        let Command::Generate(args) = cli.command else { panic!("expected generate") };
        assert_eq!(args.aspect_ratio, Some(AspectRatio::Landscape));
        assert_eq!(args.lighting, Some(LightingStyle::GoldenHour));
        assert_eq!(args.camera, Some(CameraPerspective::LowAngle));
        assert_eq!(args.resolve_scene().unwrap().as_deref(), Some("a marble counter"));
        assert_eq!(args.model.as_deref(), Some("nano-banana"));
        assert_eq!(args.format, Some(OutputFormat::Png));
        assert_eq!(args.output.as_deref(), Some("out.png"));
        assert_eq!(args.count, 3);
        assert!(cli.verbose);
    }

    #[test]
    fn scene_file_flag() {
        let dir = std::env::temp_dir().join("product_studio_cli_scene_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scene.txt");
        std::fs::write(&path, "scene from file").unwrap();

        let cli = Cli::parse_from([
            "product-studio",
            "generate",
            "--scene-file",
            path.to_str().unwrap(),
            "mug.png",
        ]);
        let Command::Generate(args) = cli.command else { panic!("expected generate") };
        assert_eq!(args.resolve_scene().unwrap().as_deref(), Some("scene from file"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bad_vocabulary_is_rejected() {
        assert!(Cli::try_parse_from(["product-studio", "generate", "-a", "7:3", "mug.png"]).is_err());
        assert!(Cli::try_parse_from(["product-studio", "generate", "-l", "candle", "mug.png"]).is_err());
    }

    #[test]
    fn idea_needs_exactly_one_source() {
        assert!(Cli::try_parse_from(["product-studio", "idea"]).is_err());
        assert!(Cli::try_parse_from(["product-studio", "idea", "-t", "beach", "-s", "ref.png"]).is_err());
        let cli = Cli::parse_from(["product-studio", "idea", "--text", "beach"]);
        let Command::Idea(args) = cli.command else { panic!("expected idea") };
        assert_eq!(args.text.as_deref(), Some("beach"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["product-studio", "options", "--config", "c.toml", "-v"]);
        assert!(matches!(cli.command, Command::Options));
        assert_eq!(cli.config.as_deref(), Some("c.toml"));
        assert!(cli.verbose);
    }
}
