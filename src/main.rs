use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use color_adjust::{Brightness, FilterPreset, ImageAdjustments};
use revdup::flow::{FlowEvent, PostFlowController, PostFlowState, StepRoute, Transition};
use revdup::models::{AppConfig, MediaRef};
use revdup::rendering::{render_preview, render_thumbnails};
use revdup::services::{
    CameraProvider, GalleryProvider, HttpPostService, InMemoryPostService, MediaProvider,
    PostService,
};

#[derive(Parser)]
#[command(name = "revdup")]
#[command(about = "RevdUp - share your car with the feed")]
struct Cli {
    /// Config file (defaults to $CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List filter presets and their color matrices
    Filters,
    /// Encode or decode a step route
    Route {
        #[command(subcommand)]
        action: RouteAction,
    },
    /// Apply a filter and brightness to a PNG
    Preview {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Preset name or index (0-4)
        #[arg(short, long, default_value = "original")]
        filter: FilterPreset,

        /// Brightness in [-1, 1]
        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        brightness: f32,
    },
    /// Render one thumbnail per preset
    Thumbnails {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Run the posting flow end to end
    Post {
        /// Media URI to post
        #[arg(long, conflicts_with_all = ["gallery", "camera"])]
        media: Option<String>,

        /// Pick the newest image from the configured gallery directory
        #[arg(long, conflicts_with = "camera")]
        gallery: bool,

        /// Capture by copying this file into the capture directory
        #[arg(long)]
        camera: Option<PathBuf>,

        #[arg(short, long, default_value = "original")]
        filter: FilterPreset,

        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        brightness: f32,

        #[arg(long)]
        caption: String,

        #[arg(long)]
        location: Option<String>,

        /// Submit to an in-memory service instead of the configured endpoint
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum RouteAction {
    Encode {
        /// Media URI; without it the picker route is printed
        #[arg(long)]
        media: Option<String>,

        /// Filter index; selects the caption step
        #[arg(long)]
        filter: Option<u32>,
    },
    Decode { route: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revdup=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = AppConfig::load(cli.config.as_deref());

    match cli.command {
        Some(Commands::Filters) => {
            run_filters_command();
            Ok(())
        }
        Some(Commands::Route { action }) => run_route_command(action),
        Some(Commands::Preview {
            input,
            output,
            filter,
            brightness,
        }) => run_preview_command(&input, &output, filter, brightness),
        Some(Commands::Thumbnails { input, out_dir }) => run_thumbnails_command(&input, &out_dir),
        Some(Commands::Post {
            media,
            gallery,
            camera,
            filter,
            brightness,
            caption,
            location,
            dry_run,
        }) => {
            let source = match (media, gallery, camera) {
                (Some(uri), _, _) => MediaSource::Uri(uri),
                (None, true, _) => MediaSource::Gallery,
                (None, false, Some(file)) => MediaSource::Camera(file),
                (None, false, None) => anyhow::bail!("One of --media, --gallery or --camera is required"),
            };
            let draft = PostArgs {
                filter,
                brightness: Brightness::new(brightness)?,
                caption,
                location,
            };
            run_post_command(&config, source, draft, dry_run).await
        }
        None => {
            run_status_command(&config);
            Ok(())
        }
    }
}

fn run_filters_command() {
    for preset in FilterPreset::ALL {
        println!("{} {}", preset.index(), preset.name());
        for row in preset.base_transform().rows() {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>8.4}")).collect();
            println!("   [{}]", cells.join(" "));
        }
    }
}

fn run_route_command(action: RouteAction) -> anyhow::Result<()> {
    match action {
        RouteAction::Encode { media, filter } => {
            let route = match (media, filter) {
                (None, _) => StepRoute::PickMedia,
                (Some(uri), None) => StepRoute::FilterEdit {
                    media: MediaRef::new(uri).context("Media URI must not be blank")?,
                },
                (Some(uri), Some(index)) => StepRoute::CaptionDetails {
                    media: MediaRef::new(uri).context("Media URI must not be blank")?,
                    filter: FilterPreset::from_index(index)?,
                },
            };
            println!("{route}");
        }
        RouteAction::Decode { route } => match StepRoute::decode(&route) {
            Ok(decoded) => println!("{decoded:?}"),
            Err(e) => {
                println!("{e}");
                println!("fallback: {}", e.fallback());
            }
        },
    }
    Ok(())
}

fn run_preview_command(
    input: &Path,
    output: &Path,
    filter: FilterPreset,
    brightness: f32,
) -> anyhow::Result<()> {
    let adjustments = ImageAdjustments::new(filter, Brightness::new(brightness)?);
    let bytes = std::fs::read(input).with_context(|| format!("Reading {}", input.display()))?;
    let png = render_preview(&bytes, &adjustments)?;
    std::fs::write(output, &png).with_context(|| format!("Writing {}", output.display()))?;

    println!(
        "Rendered {} ({}, brightness {}) to {}",
        input.display(),
        filter,
        adjustments.brightness,
        output.display()
    );
    Ok(())
}

fn run_thumbnails_command(input: &Path, out_dir: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("Reading {}", input.display()))?;
    std::fs::create_dir_all(out_dir)?;

    for (preset, png) in render_thumbnails(&bytes)? {
        let path = out_dir.join(format!("{}_{}.png", preset.index(), preset.name().to_lowercase()));
        std::fs::write(&path, &png).with_context(|| format!("Writing {}", path.display()))?;
        println!("  + {}", path.display());
    }
    Ok(())
}

enum MediaSource {
    Uri(String),
    Gallery,
    Camera(PathBuf),
}

struct PostArgs {
    filter: FilterPreset,
    brightness: Brightness,
    caption: String,
    location: Option<String>,
}

async fn run_post_command(
    config: &AppConfig,
    source: MediaSource,
    args: PostArgs,
    dry_run: bool,
) -> anyhow::Result<()> {
    let service: Box<dyn PostService> = if dry_run {
        Box::new(InMemoryPostService::new())
    } else {
        Box::new(HttpPostService::from_config(&config.post_service)?)
    };

    let mut flow = PostFlowController::new(config.flow_options());

    // Step 1: pick media
    let picked = match source {
        MediaSource::Uri(uri) => Ok(MediaRef::new(uri)),
        MediaSource::Gallery => {
            let dir = config
                .gallery_dir
                .as_deref()
                .context("gallery_dir is not configured")?;
            GalleryProvider::new(dir).pick()
        }
        MediaSource::Camera(file) => {
            let dir = config
                .capture_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir);
            CameraProvider::new(dir, |target: &Path| {
                std::fs::copy(&file, target)?;
                Ok(true)
            })
            .pick()
        }
    };
    flow.apply(FlowEvent::from_pick(picked).context("Picking media")?);
    if let PostFlowState::PickMedia(s) = flow.state() {
        if let Some(warning) = &s.access_warning {
            anyhow::bail!("{warning}");
        }
    }
    expect_step(flow.apply(FlowEvent::ConfirmMedia))?;

    // Step 2: filter and brightness
    flow.apply(FlowEvent::FilterSelected(args.filter));
    flow.apply(FlowEvent::BrightnessChanged(args.brightness));
    expect_step(flow.apply(FlowEvent::ConfirmAdjustments))?;

    // Step 3: caption and submit
    flow.apply(FlowEvent::CaptionChanged(args.caption));
    if let Some(location) = args.location {
        flow.apply(FlowEvent::LocationChanged(location));
    }
    if let Some(route) = flow.route() {
        tracing::info!(%route, "Submitting post");
    }

    match flow.submit(service.as_ref()).await {
        Transition::Posted(post_id) => {
            println!("Posted {post_id}");
            Ok(())
        }
        Transition::Rejected(rejection) => Err(rejection.into()),
        other => {
            let notice = match flow.state() {
                PostFlowState::Caption(s) => s.notice.clone(),
                _ => None,
            };
            anyhow::bail!(
                "{}",
                notice.unwrap_or_else(|| format!("Post not created: {other:?}"))
            )
        }
    }
}

fn expect_step(transition: Transition) -> anyhow::Result<()> {
    match transition {
        Transition::Entered(_) => Ok(()),
        Transition::Rejected(rejection) => Err(rejection.into()),
        other => anyhow::bail!("Unexpected flow transition: {other:?}"),
    }
}

/// Display status and configuration information
fn run_status_command(config: &AppConfig) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("RevdUp v{VERSION}");
    println!("Post creation flow: pick media, adjust, caption\n");

    println!("Configuration:");
    println!(
        "  CONFIG_FILE     = {}",
        std::env::var("CONFIG_FILE").as_deref().unwrap_or("(not set)")
    );
    println!(
        "  post service    = {}",
        config
            .post_service
            .base_url
            .as_deref()
            .unwrap_or("(not configured)")
    );
    println!("  default tags    = {}", config.default_tags.join(", "));
    println!(
        "  gallery dir     = {}",
        config
            .gallery_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!(
        "  capture dir     = {}",
        config
            .capture_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(temp dir)".to_string())
    );
    println!("  annotate filter = {}", config.annotate_filter);

    println!("\nCommands:");
    println!("  revdup filters      List filter presets");
    println!("  revdup route        Encode or decode step routes");
    println!("  revdup preview      Apply a filter to a PNG");
    println!("  revdup thumbnails   Render preset thumbnails");
    println!("  revdup post         Create a post");
    println!("\nRun 'revdup --help' for more details.");
}
