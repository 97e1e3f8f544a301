use clap::{Parser, Subcommand};
use cli::{CliError, ConfigFile, DetectSummary, Preset};
use color_eyre::eyre::{eyre, Result};
use std::path::{Path, PathBuf};
use target_vision::{
    encode::{read_trailer, required_buffer_len},
    CapturedTexture, DisplayMode, FrameParams, FrameProcessor, ImageFrameSource, TargetsInfo,
    TextureHandle, VisionConfig,
};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run target detection on a single image
    Detect {
        /// Path to the input image
        #[arg(short, long)]
        input: PathBuf,
        /// Path to a TOML or JSON configuration file
        #[arg(short, long, conflicts_with = "preset")]
        config: Option<PathBuf>,
        /// Built-in configuration to use instead of a file
        #[arg(short, long, value_enum)]
        preset: Option<Preset>,
        /// Override the configured display mode
        #[arg(short, long)]
        mode: Option<DisplayMode>,
        /// Save the visualization frame as an image
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Save the encoded JPEG preview
        #[arg(long)]
        jpeg: Option<PathBuf>,
    },
    /// Print the configuration JSON schema
    Schema,
    /// Write a preset configuration file
    InitConfig {
        #[arg(short, long, value_enum, default_value = "general")]
        preset: Preset,
        /// Destination (.toml or .json)
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Detect {
            input,
            config,
            preset,
            mode,
            output,
            jpeg,
        } => {
            let config = load_config(config.as_deref(), *preset)?;
            detect(input, &config, *mode, output.as_deref(), jpeg.as_deref())?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&VisionConfig::schema())?);
        }
        Commands::InitConfig { preset, output } => {
            preset.config().to_file(output)?;
            info!("Wrote {:?} configuration to {:?}", preset, output);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, preset: Option<Preset>) -> Result<VisionConfig, CliError> {
    match (path, preset) {
        (Some(path), _) => VisionConfig::from_file(path),
        (None, Some(preset)) => Ok(preset.config()),
        (None, None) => Err(CliError::MissingConfig),
    }
}

fn detect(
    input: &Path,
    config: &VisionConfig,
    mode: Option<DisplayMode>,
    output: Option<&Path>,
    jpeg: Option<&Path>,
) -> Result<()> {
    let frame = image::open(input)?.to_rgba8();
    let (width, height) = frame.dimensions();
    info!("Loaded {:?} ({} x {})", input, width, height);

    let mut params = FrameParams::from_config(width, height, TextureHandle(0), config);
    if let Some(mode) = mode {
        params.mode = mode;
    }

    let mut processor = FrameProcessor::from_config(config);
    let mut info = TargetsInfo::new();
    processor.initialize(&mut info)?;

    let mut source = ImageFrameSource::new(frame);
    let mut texture = CapturedTexture::new();

    let report = match jpeg {
        Some(jpeg_path) => {
            let mut buffer = vec![0u8; required_buffer_len(width, height)];
            let report = processor.process_frame_and_set_image(
                &mut source,
                &params,
                &mut texture,
                &mut buffer,
                &mut info,
            )?;
            let len = read_trailer(&buffer, width, height)
                .ok_or_else(|| eyre!("Encoded buffer is missing its length trailer"))?;
            std::fs::write(jpeg_path, &buffer[..len as usize])?;
            info!("Saved {} byte JPEG preview to {:?}", len, jpeg_path);
            report
        }
        None => processor.process_frame(&mut source, &params, &mut texture, &mut info)?,
    };

    info!(
        "{} targets from {} accepted / {} rejected candidates",
        report.num_targets, report.accepted, report.rejected
    );

    if let Some(output_path) = output {
        let frame = texture
            .into_last_frame()
            .ok_or_else(|| eyre!("No visualization frame was uploaded"))?;
        frame.save(output_path)?;
        info!("Saved {} visualization to {:?}", params.mode, output_path);
    }

    println!("{}", serde_json::to_string_pretty(&DetectSummary::new(report, &info))?);
    Ok(())
}
